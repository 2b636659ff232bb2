//! Game mode policy: spawn distribution, combo curves, progression
//!
//! All three modes share one algorithm; they differ only in the numbers in
//! their [`ModeParams`] table.

use crate::pieces::{PieceType, Rank};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// Game mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Normal,
    Hardcore,
    Zen,
}

/// One override tier: fires when a draw is below `chance` and the
/// sampling level has reached `min_level`
#[derive(Clone, Copy, Debug)]
pub struct Tier {
    pub chance: f32,
    pub min_level: f32,
}

const fn tier(chance: f32, min_level: f32) -> Tier {
    Tier { chance, min_level }
}

/// How long a combo survives, as a function of its size
#[derive(Clone, Copy, Debug)]
pub enum ComboDecay {
    /// `max(base - step * combo, floor)`
    Linear { base: f32, step: f32, floor: f32 },
    /// `base * ratio^combo`
    Geometric { base: f32, ratio: f32 },
}

/// Numeric constants for one mode
#[derive(Clone, Copy, Debug)]
pub struct ModeParams {
    /// Multiplier applied to the spawning score before sampling
    pub level_scale: f32,
    /// Center offset: `f = L - center_weight * ln(L)^center_exponent`
    pub center_weight: f32,
    pub center_exponent: f32,
    /// Span below the center: `low = floor(f - span_weight * f^span_exponent)`
    pub span_weight: f32,
    pub span_exponent: f32,
    /// Chance per rank of gap to respawn a lone lowest piece
    pub starved_override: Option<f32>,
    /// First-match chains, applied in this order; later chains win
    pub bomb_tiers: [Tier; 3],
    pub wall_tiers: [Tier; 3],
    pub incrementer_tiers: [Tier; 3],
    pub combo_decay: ComboDecay,
    pub multiplier_exponent: f32,
    pub multiplier_cap: f32,
    /// Added to the spawning score after every changed move
    pub progression: f64,
}

const NORMAL: ModeParams = ModeParams {
    level_scale: 1.0,
    center_weight: 0.5,
    center_exponent: 1.1,
    span_weight: 0.4,
    span_exponent: 0.47,
    starved_override: Some(0.05),
    bomb_tiers: [tier(0.045, 40.0), tier(0.035, 20.0), tier(0.025, 12.0)],
    wall_tiers: [tier(0.16, 30.0), tier(0.13, 18.0), tier(0.1, 7.0)],
    incrementer_tiers: [tier(0.1, 50.0), tier(0.07, 35.0), tier(0.04, 19.0)],
    combo_decay: ComboDecay::Linear { base: 4.0, step: 0.1, floor: 1.5 },
    multiplier_exponent: 0.5,
    multiplier_cap: 15.0,
    progression: 0.01,
};

const HARDCORE: ModeParams = ModeParams {
    level_scale: 0.9,
    center_weight: 0.6,
    center_exponent: 1.3,
    span_weight: 0.5,
    span_exponent: 0.49,
    starved_override: None,
    bomb_tiers: [tier(0.04, 25.0), tier(0.03, 14.0), tier(0.02, 9.0)],
    wall_tiers: [tier(0.15, 20.0), tier(0.11, 11.0), tier(0.08, 4.0)],
    incrementer_tiers: [tier(0.05, 40.0), tier(0.035, 29.0), tier(0.02, 20.0)],
    combo_decay: ComboDecay::Geometric { base: 3.5, ratio: 0.95 },
    multiplier_exponent: 0.7,
    multiplier_cap: 20.0,
    progression: 0.02,
};

const ZEN: ModeParams = ModeParams {
    level_scale: 1.0,
    center_weight: 0.4,
    center_exponent: 0.75,
    span_weight: 0.3,
    span_exponent: 0.45,
    starved_override: Some(0.1),
    bomb_tiers: [tier(0.05, 28.0), tier(0.04, 18.0), tier(0.03, 10.0)],
    wall_tiers: [tier(0.04, 30.0), tier(0.03, 20.0), tier(0.02, 12.0)],
    incrementer_tiers: [tier(0.14, 40.0), tier(0.1, 25.0), tier(0.07, 14.0)],
    combo_decay: ComboDecay::Linear { base: 10.0, step: 0.05, floor: 5.0 },
    multiplier_exponent: 0.3,
    multiplier_cap: 12.0,
    progression: 0.005,
};

/// Board-derived inputs to spawning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnContext {
    pub spawning_score: f64,
    pub highest: Rank,
    /// Smallest numbered rank on the board and how many pieces hold it
    pub lowest: Option<(Rank, usize)>,
}

/// Rank range a mode samples from at a given level
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRange {
    pub level: f32,
    pub low: f32,
    pub high: f32,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Normal, GameMode::Hardcore, GameMode::Zen];

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Hardcore => "hardcore",
            GameMode::Zen => "zen",
        }
    }

    /// Parse a mode name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "hardcore" => Some(GameMode::Hardcore),
            "zen" => Some(GameMode::Zen),
            _ => None,
        }
    }

    /// Parse a mode name, falling back to Normal
    pub fn parse_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    pub fn params(&self) -> &'static ModeParams {
        match self {
            GameMode::Normal => &NORMAL,
            GameMode::Hardcore => &HARDCORE,
            GameMode::Zen => &ZEN,
        }
    }

    /// Store key for this mode's saved board
    pub fn save_key(&self) -> String {
        format!("board_{}", self.name())
    }

    /// Seconds a combo of this size stays alive
    pub fn combo_time(&self, combo: u32) -> f32 {
        match self.params().combo_decay {
            ComboDecay::Linear { base, step, floor } => (base - combo as f32 * step).max(floor),
            ComboDecay::Geometric { base, ratio } => base * ratio.powi(combo as i32),
        }
    }

    /// Score multiplier for a combo of this size
    pub fn combo_multiplier(&self, combo: u32) -> f32 {
        let params = self.params();
        (combo as f32 + 1.0)
            .powf(params.multiplier_exponent)
            .min(params.multiplier_cap)
    }

    /// Spawning-score increment per changed move
    pub fn progression_speed(&self) -> f64 {
        self.params().progression
    }

    /// Sampling range for a context
    pub fn spawn_range(&self, ctx: &SpawnContext) -> SpawnRange {
        let params = self.params();
        let level = ctx.spawning_score.max(ctx.highest as f64) as f32 * params.level_scale;
        // ln(level) is negative below 1 and would make the power NaN
        let center = level - params.center_weight * level.max(1.0).ln().powf(params.center_exponent);
        let low = (center - params.span_weight * center.max(0.0).powf(params.span_exponent)).floor();
        let high = center.ceil();
        SpawnRange { level, low, high }
    }

    /// Generate the next piece to spawn
    pub fn spawn_piece<R: RandomSource + ?Sized>(&self, ctx: &SpawnContext, rng: &mut R) -> PieceType {
        let params = self.params();
        let range = self.spawn_range(ctx);
        let mut rank = rng.uniform_range(range.low, range.high).max(1.0) as Rank;

        if let (Some(factor), Some((lowest, 1))) = (params.starved_override, ctx.lowest) {
            let lowest_f = lowest as f32;
            if lowest_f < range.low && rng.uniform() < (range.low - lowest_f) * factor {
                rank = lowest;
            }
        }

        let mut piece_type = PieceType::Standard(rank);
        if roll_tiers(&params.bomb_tiers, range.level, rng) {
            piece_type = PieceType::Bomb(rank);
        }
        if roll_tiers(&params.wall_tiers, range.level, rng) {
            piece_type = PieceType::Wall;
        }
        if roll_tiers(&params.incrementer_tiers, range.level, rng) {
            piece_type = PieceType::Incrementer;
        }
        piece_type
    }
}

/// First-match chain: every visited tier consumes one draw
fn roll_tiers<R: RandomSource + ?Sized>(tiers: &[Tier], level: f32, rng: &mut R) -> bool {
    tiers
        .iter()
        .any(|t| rng.uniform() < t.chance && level >= t.min_level)
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
