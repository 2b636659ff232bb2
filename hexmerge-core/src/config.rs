//! Session configuration

use crate::error::{HexMergeError, Result};
use crate::grid::MAX_RADIUS;
use crate::mode::GameMode;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings a host chooses before starting a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Hexagon radius (1 = 7 cells, 2 = 19 cells)
    pub board_radius: u8,
    pub mode: GameMode,
    /// Ignore any saved board and start fresh
    pub force_new_game: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_radius: 2,
            mode: GameMode::Normal,
            force_new_game: false,
        }
    }
}

impl GameConfig {
    pub fn with_radius(mut self, radius: u8) -> Self {
        self.board_radius = radius;
        self
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_new_game(mut self, force: bool) -> Self {
        self.force_new_game = force;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.board_radius == 0 || self.board_radius > MAX_RADIUS {
            return Err(HexMergeError::InvalidConfig(format!(
                "board_radius must be in 1..={MAX_RADIUS}, got {}",
                self.board_radius
            )));
        }
        Ok(())
    }

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
