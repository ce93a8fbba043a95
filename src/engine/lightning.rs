use std::time::Duration;

use rand::Rng;

/// Frames that must pass after a strike before another can fire.
pub const DWELL_FRAMES: u32 = 60;
pub const STRIKE_CHANCE: f64 = 0.005;
pub const REBOUND_CHANCE: f64 = 0.5;

const PRIMARY: Duration = Duration::from_millis(150);
const REBOUND_START: Duration = Duration::from_millis(250);
const REBOUND_END: Duration = Duration::from_millis(300);

/// Decides, frame by frame, whether a storm produces a strike.
#[derive(Debug, Clone, Default)]
pub struct LightningGate {
    frames_since_strike: u32,
}

impl LightningGate {
    /// Advances one frame. The counter only climbs while `storm` holds.
    pub fn tick<R: Rng>(&mut self, storm: bool, rng: &mut R) -> bool {
        if !storm {
            return false;
        }
        self.frames_since_strike = self.frames_since_strike.saturating_add(1);
        if self.frames_since_strike > DWELL_FRAMES && rng.random_bool(STRIKE_CHANCE) {
            self.frames_since_strike = 0;
            return true;
        }
        false
    }

    #[must_use]
    pub fn frames_since_strike(&self) -> u32 {
        self.frames_since_strike
    }
}

/// One strike: a 150 ms flash, optionally followed 100 ms later by a 50 ms
/// rebound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashPulse {
    elapsed: Duration,
    rebound: bool,
}

impl FlashPulse {
    #[must_use]
    pub fn new(rebound: bool) -> Self {
        Self {
            elapsed: Duration::ZERO,
            rebound,
        }
    }

    pub fn strike<R: Rng>(rng: &mut R) -> Self {
        Self::new(rng.random_bool(REBOUND_CHANCE))
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    #[must_use]
    pub fn has_rebound(&self) -> bool {
        self.rebound
    }

    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.elapsed < PRIMARY
            || (self.rebound && self.elapsed >= REBOUND_START && self.elapsed < REBOUND_END)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= if self.rebound { REBOUND_END } else { PRIMARY }
    }
}
