//! Host-ticked display smoothing
//!
//! Nothing here feeds back into game logic.

/// Exponential approach toward a target, independent of frame rate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedValue {
    current: f64,
    target: f64,
    /// Fraction of the remaining distance covered per second
    rate: f64,
    /// Jump to the target once within this distance
    snap: Option<f64>,
}

impl SmoothedValue {
    pub fn new(value: f64, rate: f64) -> Self {
        Self {
            current: value,
            target: value,
            rate: rate.clamp(0.0, 1.0),
            snap: None,
        }
    }

    pub fn with_snap(mut self, threshold: f64) -> Self {
        self.snap = Some(threshold);
        self
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jump straight to `value`
    pub fn reset(&mut self, value: f64) {
        self.current = value;
        self.target = value;
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn tick(&mut self, delta_seconds: f64) {
        let lerp = 1.0 - (1.0 - self.rate).powf(delta_seconds.max(0.0));
        self.current += (self.target - self.current) * lerp;
        if let Some(snap) = self.snap {
            if (self.target - self.current).abs() <= snap {
                self.current = self.target;
            }
        }
    }
}

/// Rolling score counter shown by hosts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreDisplay {
    value: SmoothedValue,
}

impl ScoreDisplay {
    const RATE: f64 = 0.95;
    const SNAP: f64 = 0.5;

    pub fn new(score: u64) -> Self {
        Self {
            value: SmoothedValue::new(score as f64, Self::RATE).with_snap(Self::SNAP),
        }
    }

    pub fn set_score(&mut self, score: u64) {
        self.value.set_target(score as f64);
    }

    /// Show `score` immediately (after a load or new game)
    pub fn reset(&mut self, score: u64) {
        self.value.reset(score as f64);
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        self.value.tick(delta_seconds as f64);
    }

    /// Integer shown to the player
    pub fn shown(&self) -> u64 {
        self.value.current().round() as u64
    }
}
