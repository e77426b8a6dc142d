//! Error types for the dimmer.

use embedded_hal::{digital, pwm};

/// Hardware faults raised while driving the dimmer.
///
/// Brightness values and click counts are never errors: they are clamped or
/// ignored. Only the peripherals behind the traits can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The PWM channel rejected a duty update.
    #[error("PWM output failed: {0:?}")]
    Pwm(pwm::ErrorKind),

    /// The status LED pin could not be driven.
    #[error("Indicator pin failed: {0:?}")]
    Indicator(digital::ErrorKind),

    /// The control button pin could not be read.
    #[error("Button pin failed: {0:?}")]
    Button(digital::ErrorKind),

    /// Persistent storage access failed.
    #[error("Storage access failed at address {address}")]
    Storage {
        /// First address of the failed access.
        address: u16,
    },
}
