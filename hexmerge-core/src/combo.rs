//! Combo tracker
//!
//! The combo grows with every merging move and decays on wall-clock time.
//! The core owns no clock: the host calls [`ComboTracker::tick`] each frame.

use crate::mode::GameMode;

#[derive(Clone, Debug, PartialEq)]
pub struct ComboTracker {
    mode: GameMode,
    combo: u32,
    time_remaining: f32,
}

impl ComboTracker {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            combo: 0,
            time_remaining: 0.0,
        }
    }

    /// Mode whose curves this tracker follows
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current combo (0 when inactive)
    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn is_active(&self) -> bool {
        self.combo > 0
    }

    /// Add a move's combo value and restart the timer
    pub fn submit(&mut self, value: u32) {
        if value == 0 {
            return;
        }
        self.combo = self.combo.saturating_add(value);
        self.time_remaining = self.mode.combo_time(self.combo);
    }

    /// Multiplier for the current combo
    pub fn multiplier(&self) -> f32 {
        self.mode.combo_multiplier(self.combo)
    }

    /// Advance the decay clock by `delta_seconds`
    pub fn tick(&mut self, delta_seconds: f32) {
        if self.combo == 0 {
            return;
        }
        self.time_remaining -= delta_seconds;
        if self.time_remaining <= 0.0 {
            self.time_remaining = 0.0;
            self.combo = 0;
        }
    }

    /// Fraction of the combo window left, for a countdown bar
    pub fn progress(&self) -> f32 {
        if self.combo == 0 {
            return 0.0;
        }
        (self.time_remaining / self.mode.combo_time(self.combo)).clamp(0.0, 1.0)
    }

    /// Overwrite state from a saved snapshot
    pub fn restore(&mut self, combo: u32, time_remaining: f32) {
        self.combo = combo;
        self.time_remaining = time_remaining.max(0.0);
    }

    pub fn reset(&mut self) {
        self.combo = 0;
        self.time_remaining = 0.0;
    }
}
