//! Hex grid topology with axial coordinates
//!
//! Cells are stored in a flat vector in canonical order and addressed by
//! [`CellId`]. Adjacency for all six directions is computed once when the
//! grid is built and never changes afterwards.

use crate::error::{HexMergeError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Largest supported board radius
pub const MAX_RADIUS: u8 = 32;

/// Index of a cell in canonical order
pub type CellId = usize;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i8 {
        (self.q.abs() + self.r.abs() + (self.q + self.r).abs()) / 2
    }

    /// Check if this hex lies inside a board of the given radius
    pub fn in_radius(&self, radius: u8) -> bool {
        self.distance_to_center() <= radius as i8
    }

    /// Neighboring coordinate in a direction (may be off the board)
    pub fn step(&self, direction: Direction) -> Hex {
        let (dq, dr) = direction.axial_offset();
        Hex::new(self.q + dq, self.r + dr)
    }
}

/// The six merge directions, clockwise from up-right
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    UpRight = 0,
    Right = 1,
    DownRight = 2,
    DownLeft = 3,
    Left = 4,
    UpLeft = 5,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 3) % 6]
    }

    /// Axial offset (dq, dr); `r` grows downward on screen
    pub fn axial_offset(self) -> (i8, i8) {
        match self {
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (0, -1),
        }
    }

    /// Screen angle in degrees, Right = 0, counter-clockwise positive
    pub fn angle_degrees(self) -> f32 {
        match self {
            Direction::UpRight => 60.0,
            Direction::Right => 0.0,
            Direction::DownRight => -60.0,
            Direction::DownLeft => -120.0,
            Direction::Left => 180.0,
            Direction::UpLeft => 120.0,
        }
    }

    /// Unit vector for animation consumers. Never used by game logic.
    pub fn vector(self) -> [f32; 2] {
        let theta = self.angle_degrees().to_radians();
        [theta.cos(), theta.sin()]
    }
}

/// Fixed set of cells for one board radius, with precomputed adjacency
#[derive(Clone, Debug)]
pub struct Grid {
    radius: u8,
    cells: Vec<Hex>,
    lookup: FxHashMap<Hex, CellId>,
    neighbors: Vec<[Option<CellId>; 6]>,
}

impl Grid {
    pub fn new(radius: u8) -> Result<Self> {
        if radius == 0 || radius > MAX_RADIUS {
            return Err(HexMergeError::RadiusOutOfRange {
                radius,
                max: MAX_RADIUS,
            });
        }

        let cells = canonical_cells(radius);
        let lookup: FxHashMap<Hex, CellId> = cells
            .iter()
            .enumerate()
            .map(|(id, &hex)| (hex, id))
            .collect();

        let neighbors = cells
            .iter()
            .map(|hex| {
                let mut links = [None; 6];
                for dir in Direction::ALL {
                    links[dir.index()] = lookup.get(&hex.step(dir)).copied();
                }
                links
            })
            .collect();

        Ok(Self {
            radius,
            cells,
            lookup,
            neighbors,
        })
    }

    pub fn radius(&self) -> u8 {
        self.radius
    }

    /// Number of cells (3R² + 3R + 1)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Coordinate of a cell
    pub fn hex(&self, cell: CellId) -> Hex {
        self.cells[cell]
    }

    /// Cell at a coordinate, if on the board
    pub fn cell_at(&self, hex: Hex) -> Option<CellId> {
        self.lookup.get(&hex).copied()
    }

    /// Neighbor of `cell` in `direction`; `None` at the board edge
    pub fn neighbor(&self, cell: CellId, direction: Direction) -> Option<CellId> {
        self.neighbors[cell][direction.index()]
    }

    /// All existing neighbors of a cell
    pub fn neighbors(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.neighbors[cell].iter().filter_map(|n| *n)
    }

    /// Cell ids in canonical order
    pub fn cell_ids(&self) -> std::ops::Range<CellId> {
        0..self.cells.len()
    }
}

/// Canonical enumeration shared by the grid and the save format.
///
/// Rows are walked bottom to top as offset rows `y in -R..=R` with columns
/// `x in 0..=2R-|y|`. Rows above the center are shifted one column per row
/// relative to rows below, which is what maps offset columns onto axial `q`.
fn canonical_cells(radius: u8) -> Vec<Hex> {
    let radius = radius as i8;
    let mut cells = Vec::new();
    for y in -radius..=radius {
        let r = -y;
        for x in 0..=(radius * 2 - y.abs()) {
            let q = if y >= 0 { x + y - radius } else { x - radius };
            cells.push(Hex::new(q, r));
        }
    }
    cells
}
