//! Interactive level calibration
//!
//! The output first ramps to the potentiometer, then follows it directly while
//! the button decides what happens to the reading:
//! - 2 clicks: switch which active mode is being calibrated
//! - 3 clicks: store the reading as that mode's level and leave
//! - 4 clicks: leave without storing
//!
//! Stored levels live in memory only until the settings are flushed.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::dimmer::Dimmer;
use crate::error::Error;
use crate::indicator::BlinkPattern;
use crate::mode::ActiveMode;
use crate::{Board, ClickSource, Clock};

/// How a calibration session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationOutcome {
    /// `level` was stored for `mode`
    Saved { mode: ActiveMode, level: u16 },
    /// Left without storing anything
    Discarded,
}

impl<B: Board> Dimmer<B> {
    /// Run a calibration session for the current active mode
    ///
    /// Does nothing outside `First`/`Second`.
    pub fn calibrate(&mut self) -> Result<CalibrationOutcome, Error> {
        if !self.mode.is_active() {
            return Ok(CalibrationOutcome::Discarded);
        }

        let mut level = self.read_potentiometer();
        let indicator = &mut self.indicator;
        self.output
            .ramp(level, &self.clock, |now| indicator.tick(now))?;

        let outcome = loop {
            let now = self.clock.now();
            self.indicator.tick(now)?;
            self.button.tick(now)?;

            let finished = match self.button.take_clicks() {
                Some(2) => {
                    self.indicator.blink(BlinkPattern::pulses(2));
                    self.mode = self.mode.toggled();
                    None
                }
                Some(3) => self.mode.active().map(|mode| {
                    self.store.settings_mut().set_level(mode, level);
                    CalibrationOutcome::Saved { mode, level }
                }),
                Some(4) => Some(CalibrationOutcome::Discarded),
                _ => None,
            };

            level = self.read_potentiometer();
            self.output.track(level, self.tracking_ceiling)?;

            if let Some(outcome) = finished {
                break outcome;
            }
        };

        #[cfg(feature = "esp32-log")]
        println!("[Dimmer.calibrate] {:?}", outcome);
        self.indicator.blink(BlinkPattern::pulses(3));
        Ok(outcome)
    }
}
