//! Debounced multi-click counter
//!
//! Groups presses of a single button into click counts: presses separated by
//! less than the click timeout add up, and the total is reported once the
//! button has stayed released for the full timeout. Presses held longer than
//! the hold timeout are not clicks and discard the running count.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::{Error as _, InputPin};

use crate::ClickSource;
use crate::error::Error;

/// Timing of the click counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTimings {
    /// Minimum time between two accepted level changes
    pub debounce: Duration,
    /// Release time that closes a click series
    pub click_timeout: Duration,
    /// Press time after which a press is a hold, not a click
    pub hold_timeout: Duration,
}

impl Default for ButtonTimings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(80),
            click_timeout: Duration::from_millis(500),
            hold_timeout: Duration::from_millis(300),
        }
    }
}

/// Which pin level means "pressed"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    /// Pulled down, closes to VCC
    High,
    /// Pulled up, closes to GND
    Low,
}

/// Click counter over an [`InputPin`]
#[derive(Debug)]
pub struct ClickCounter<P: InputPin> {
    pin: P,
    active: ActiveLevel,
    timings: ButtonTimings,
    pressed: bool,
    last_change: Option<Instant>,
    clicks: u8,
    settled: Option<u8>,
}

impl<P: InputPin> ClickCounter<P> {
    pub fn new(pin: P, active: ActiveLevel, timings: ButtonTimings) -> Self {
        Self {
            pin,
            active,
            timings,
            pressed: false,
            last_change: None,
            clicks: 0,
            settled: None,
        }
    }

    /// Check if the button is currently held down (debounced)
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn read_pressed(&mut self) -> Result<bool, Error> {
        let high = self.pin.is_high().map_err(|e| Error::Button(e.kind()))?;
        Ok(match self.active {
            ActiveLevel::High => high,
            ActiveLevel::Low => !high,
        })
    }

    fn since_change(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .and_then(|changed| now.checked_duration_since(changed))
    }
}

impl<P: InputPin> ClickSource for ClickCounter<P> {
    fn tick(&mut self, now: Instant) -> Result<(), Error> {
        let raw = self.read_pressed()?;
        let stable = self
            .since_change(now)
            .is_none_or(|elapsed| elapsed >= self.timings.debounce);

        if raw != self.pressed && stable {
            let held = self.since_change(now);
            self.pressed = raw;
            self.last_change = Some(now);

            if !raw {
                let is_hold = held.is_some_and(|held| held >= self.timings.hold_timeout);
                self.clicks = if is_hold {
                    0
                } else {
                    self.clicks.saturating_add(1)
                };
            }
            return Ok(());
        }

        if !self.pressed && self.clicks > 0 {
            let idle = self.since_change(now);
            if idle.is_some_and(|idle| idle >= self.timings.click_timeout) {
                self.settled = Some(self.clicks);
                self.clicks = 0;
            }
        }
        Ok(())
    }

    fn take_clicks(&mut self) -> Option<u8> {
        self.settled.take()
    }
}
