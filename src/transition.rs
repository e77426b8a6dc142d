use embassy_time::{Duration, Instant};

use crate::correction::clamp_level;

/// Linear interpolation between two levels
///
/// `elapsed` is clamped to `duration`.
#[inline]
#[allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub const fn lerp_level(source: u16, target: u16, elapsed: Duration, duration: Duration) -> u16 {
    let total = duration.as_millis();
    if total == 0 {
        return target;
    }
    let elapsed = if elapsed.as_millis() > total {
        total
    } else {
        elapsed.as_millis()
    };
    let delta = target as i64 - source as i64;
    let step = delta * elapsed as i64 / total as i64;
    (source as i64 + step) as u16
}

/// Timed linear transition of a brightness level
#[derive(Debug, Clone)]
pub struct LevelTransition {
    /// Current interpolated level
    current: u16,
    /// Level at the start of transition
    source: u16,
    /// Target level (None if no transition in progress)
    target: Option<u16>,
    /// Total transition duration
    duration: Duration,
    /// Time at which the transition started
    start_time: Instant,
}

impl LevelTransition {
    /// Create a new transition resting at `initial`
    pub const fn new(initial: u16) -> Self {
        let initial = clamp_level(initial);
        Self {
            current: initial,
            source: initial,
            target: None,
            duration: Duration::from_millis(0),
            start_time: Instant::from_millis(0),
        }
    }

    /// Get current level
    pub const fn current(&self) -> u16 {
        self.current
    }

    /// Get the level being approached, or the resting level
    pub const fn target(&self) -> u16 {
        match self.target {
            Some(target) => target,
            None => self.current,
        }
    }

    /// Check if a transition is in progress
    pub const fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }

    /// Start moving towards `level`
    ///
    /// A zero duration jumps immediately.
    pub fn set(&mut self, level: u16, duration: Duration, start_time: Instant) {
        let level = clamp_level(level);
        self.start_time = start_time;
        if duration.as_millis() == 0 {
            self.jump(level);
        } else {
            self.source = self.current;
            self.target = Some(level);
            self.duration = duration;
        }
    }

    /// Rest at `level` without interpolating
    pub fn jump(&mut self, level: u16) {
        let level = clamp_level(level);
        self.current = level;
        self.source = level;
        self.target = None;
        self.duration = Duration::from_millis(0);
    }

    /// Update transition state
    pub fn tick(&mut self, now: Instant) {
        let Some(target) = self.target else {
            return;
        };

        let elapsed = now
            .checked_duration_since(self.start_time)
            .unwrap_or(Duration::from_millis(0));
        if elapsed >= self.duration {
            self.jump(target);
            return;
        }

        self.current = lerp_level(self.source, target, elapsed, self.duration);
    }
}
