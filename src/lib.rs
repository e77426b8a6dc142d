#![no_std]

pub mod button;
pub mod calibration;
pub mod correction;
pub mod dimmer;
pub mod error;
pub mod indicator;
pub mod mode;
pub mod output;
pub mod settings;
pub mod store;
pub mod transition;

pub use button::{ActiveLevel, ButtonTimings, ClickCounter};
pub use calibration::CalibrationOutcome;
pub use correction::{MAX_LEVEL, PWM_RESOLUTION, PwmResolution};
pub use dimmer::{Dimmer, DimmerConfig};
pub use error::Error;
pub use indicator::{BlinkPattern, Blinker};
pub use mode::{ActiveMode, Mode};
pub use output::{BrightnessOutput, BrightnessState, RampTimings};
pub use settings::Settings;
pub use store::SettingsStore;
pub use embassy_time::{Duration, Instant};

/// Monotonic time source
///
/// Ramps and the calibration loop block on wall-clock time read through this
/// trait, so the control loop can run against a simulated clock.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by the `embassy-time` driver of the target
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Source of settled click counts
///
/// Debouncing and grouping presses into a count happen behind this trait;
/// [`ClickCounter`] is the stock implementation.
pub trait ClickSource {
    /// Sample the button
    fn tick(&mut self, now: Instant) -> Result<(), Error>;

    /// Take the last settled click count, if any
    fn take_clicks(&mut self) -> Option<u8>;
}

/// Potentiometer channel
pub trait AnalogInput {
    /// Raw 10-bit reading; values above 1023 are clamped by the caller
    fn read(&mut self) -> u16;
}

/// Byte-addressed non-volatile storage (EEPROM or an emulation of it)
pub trait Storage {
    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Error>;

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Error>;
}

/// Power management of the microcontroller
pub trait PowerControl {
    /// Switch off on-chip peripherals the dimmer does not use
    fn disable_unused_peripherals(&mut self);

    /// Enter deep sleep; returns once the button wake interrupt fires
    fn sleep_until_wake(&mut self);
}

/// Hardware the dimmer runs on
///
/// Implement this trait once per board to name the concrete peripheral types.
pub trait Board {
    type Pwm: embedded_hal::pwm::SetDutyCycle;
    type Indicator: embedded_hal::digital::OutputPin;
    type Button: ClickSource;
    type Potentiometer: AnalogInput;
    type Storage: Storage;
    type Power: PowerControl;
    type Clock: Clock;
}

/// Owned peripheral instances for a [`Board`]
pub struct Peripherals<B: Board> {
    pub pwm: B::Pwm,
    pub indicator: B::Indicator,
    pub button: B::Button,
    pub potentiometer: B::Potentiometer,
    pub storage: B::Storage,
    pub power: B::Power,
    pub clock: B::Clock,
}
