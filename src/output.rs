//! Corrected PWM output with timed ramps
//!
//! Every write goes through the same path: linear level, rescale to the
//! output domain, cubic correction, duty update. Ramps block the caller for
//! the transition time plus a settle margin and interpolate linearly as fast
//! as the loop spins, with no fixed tick rate.

use embassy_time::{Duration, Instant};
use embedded_hal::pwm::{Error as _, SetDutyCycle};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::Clock;
use crate::correction::{PwmResolution, clamp_level, rescale};
use crate::error::Error;
use crate::transition::LevelTransition;

/// Snapshot of what the output is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessState {
    /// Current linear level (0-1023)
    pub level: u16,
    /// Duty last written to the PWM channel
    pub output: u16,
    /// Level the output is heading to
    pub target: u16,
}

/// Ramp timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampTimings {
    /// Time to interpolate from source to target
    pub transition: Duration,
    /// Extra hold at the target before the ramp returns
    pub settle: Duration,
}

impl RampTimings {
    /// Total time a ramp blocks for
    pub fn total(self) -> Duration {
        self.transition + self.settle
    }
}

impl Default for RampTimings {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(800),
            settle: Duration::from_millis(50),
        }
    }
}

/// PWM channel driven with corrected brightness
#[derive(Debug)]
pub struct BrightnessOutput<P: SetDutyCycle> {
    pwm: P,
    resolution: PwmResolution,
    timings: RampTimings,
    level: LevelTransition,
    output: u16,
}

impl<P: SetDutyCycle> BrightnessOutput<P> {
    pub const fn new(pwm: P, resolution: PwmResolution, timings: RampTimings) -> Self {
        Self {
            pwm,
            resolution,
            timings,
            level: LevelTransition::new(0),
            output: 0,
        }
    }

    pub const fn resolution(&self) -> PwmResolution {
        self.resolution
    }

    pub const fn state(&self) -> BrightnessState {
        BrightnessState {
            level: self.level.current(),
            output: self.output,
            target: self.level.target(),
        }
    }

    /// Jump to `level` with no interpolation
    pub fn set_level(&mut self, level: u16) -> Result<(), Error> {
        self.level.jump(level);
        self.write(self.resolution.output(self.level.current()))
    }

    /// Follow `level` directly, rescaled onto `0..=ceiling` before correction
    ///
    /// The ceiling is clamped to the resolution's maximum duty.
    pub fn track(&mut self, level: u16, ceiling: u16) -> Result<(), Error> {
        let ceiling = ceiling.min(self.resolution.max_duty());
        self.level.jump(level);
        let duty = self.resolution.correct(rescale(self.level.current(), ceiling));
        self.write(duty)
    }

    /// Ramp from the current level to `target`, blocking until the ramp settles
    ///
    /// `on_tick` runs once per iteration with the time of that iteration, so
    /// background services keep running while the output moves.
    pub fn ramp<C, F>(&mut self, target: u16, clock: &C, mut on_tick: F) -> Result<(), Error>
    where
        C: Clock,
        F: FnMut(Instant) -> Result<(), Error>,
    {
        let target = clamp_level(target);
        let start = clock.now();
        let total = self.timings.total();
        #[cfg(feature = "esp32-log")]
        println!(
            "[BrightnessOutput.ramp] {:?} -> {:?}",
            self.level.current(),
            target
        );

        self.level.set(target, self.timings.transition, start);
        loop {
            let now = clock.now();
            let elapsed = now
                .checked_duration_since(start)
                .unwrap_or(Duration::from_millis(0));
            if elapsed > total {
                break;
            }

            on_tick(now)?;
            self.level.tick(now);
            self.write(self.resolution.output(self.level.current()))?;
        }

        // The loop may exit before the final interpolation step was observed
        self.level.jump(target);
        self.write(self.resolution.output(target))
    }

    fn write(&mut self, duty: u16) -> Result<(), Error> {
        let max = self.resolution.max_duty();
        let duty = duty.min(max);
        self.pwm
            .set_duty_cycle_fraction(duty, max)
            .map_err(|e| Error::Pwm(e.kind()))?;
        self.output = duty;
        Ok(())
    }
}
