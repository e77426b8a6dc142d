//! Status LED pulse sequencer
//!
//! Signals which user action just completed by pulsing the status LED a
//! fixed number of times. Sequencing is non-blocking: [`Blinker::tick`] has
//! to be called from every loop that runs while a pattern is playing.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::{Error as _, OutputPin};

use crate::error::Error;

/// Pulse pattern of the status LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPattern {
    /// Number of pulses
    pub count: u8,
    /// Lit time of each pulse
    pub on: Duration,
    /// Dark time after each pulse
    pub off: Duration,
}

impl BlinkPattern {
    /// Long single pulse emitted once at power-up
    pub const BOOT: Self = Self {
        count: 1,
        on: Duration::from_millis(500),
        off: Duration::from_millis(100),
    };

    /// `count` short pulses
    pub const fn pulses(count: u8) -> Self {
        Self {
            count,
            on: Duration::from_millis(100),
            off: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Armed, first pulse starts on the next tick
    Pending,
    Lit { until: Instant },
    Dark { until: Instant },
}

/// Drives an [`OutputPin`] through a [`BlinkPattern`]
#[derive(Debug)]
pub struct Blinker<P: OutputPin> {
    pin: P,
    pattern: BlinkPattern,
    remaining: u8,
    phase: Phase,
}

impl<P: OutputPin> Blinker<P> {
    pub const fn new(pin: P) -> Self {
        Self {
            pin,
            pattern: BlinkPattern::pulses(0),
            remaining: 0,
            phase: Phase::Idle,
        }
    }

    /// Start `pattern`, replacing whatever is playing
    pub fn blink(&mut self, pattern: BlinkPattern) {
        self.pattern = pattern;
        self.remaining = pattern.count;
        self.phase = if pattern.count == 0 {
            Phase::Idle
        } else {
            Phase::Pending
        };
    }

    /// Check if a pattern is still playing
    pub const fn is_blinking(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Advance the pattern
    pub fn tick(&mut self, now: Instant) -> Result<(), Error> {
        match self.phase {
            Phase::Idle => {}
            Phase::Pending => self.light(now)?,
            Phase::Lit { until } if now >= until => {
                self.pin
                    .set_low()
                    .map_err(|e| Error::Indicator(e.kind()))?;
                self.remaining = self.remaining.saturating_sub(1);
                self.phase = Phase::Dark {
                    until: now + self.pattern.off,
                };
            }
            Phase::Dark { until } if now >= until => {
                if self.remaining == 0 {
                    self.phase = Phase::Idle;
                } else {
                    self.light(now)?;
                }
            }
            Phase::Lit { .. } | Phase::Dark { .. } => {}
        }
        Ok(())
    }

    fn light(&mut self, now: Instant) -> Result<(), Error> {
        self.pin
            .set_high()
            .map_err(|e| Error::Indicator(e.kind()))?;
        self.phase = Phase::Lit {
            until: now + self.pattern.on,
        };
        Ok(())
    }
}
