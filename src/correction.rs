//! Perceptual brightness correction
//!
//! Maps the linear 10-bit brightness domain onto PWM duty values through a
//! cubic approximation of the CRT gamma curve, so that equal steps of the
//! potentiometer look like equal steps of light.

/// Highest linear brightness level (10-bit potentiometer domain).
pub const MAX_LEVEL: u16 = 1023;

/// Additive rounding constant of the 8-bit cubic.
const CUBIC_8BIT_BIAS: u32 = 130_305;

/// Additive rounding constant of the 10-bit cubic.
const CUBIC_10BIT_BIAS: u32 = 2_094_081;

/// PWM resolution in use, selected at build time.
#[cfg(not(feature = "pwm-10bit"))]
pub const PWM_RESOLUTION: PwmResolution = PwmResolution::Bits8;

/// PWM resolution in use, selected at build time.
#[cfg(feature = "pwm-10bit")]
pub const PWM_RESOLUTION: PwmResolution = PwmResolution::Bits10;

/// Output resolution of the PWM timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmResolution {
    /// 8-bit duty at 62.5 kHz
    Bits8,
    /// 10-bit duty at 15.6 kHz
    Bits10,
}

impl PwmResolution {
    /// Highest duty value of the output domain
    pub const fn max_duty(self) -> u16 {
        match self {
            Self::Bits8 => 255,
            Self::Bits10 => MAX_LEVEL,
        }
    }

    /// Carrier frequency the timer is expected to run at
    pub const fn carrier_hz(self) -> u32 {
        match self {
            Self::Bits8 => 62_500,
            Self::Bits10 => 15_625,
        }
    }

    /// Output ceiling used while the potentiometer is tracked live during calibration.
    pub const fn tracking_ceiling(self) -> u16 {
        match self {
            Self::Bits8 => 225,
            Self::Bits10 => MAX_LEVEL,
        }
    }

    /// Rescale a linear level into the output domain
    pub const fn rescale(self, level: u16) -> u16 {
        rescale(level, self.max_duty())
    }

    /// Apply the cubic correction to a value already in the output domain
    pub const fn correct(self, value: u16) -> u16 {
        match self {
            Self::Bits8 => correct8(value),
            Self::Bits10 => correct10(value),
        }
    }

    /// Linear level to corrected duty
    pub const fn output(self, level: u16) -> u16 {
        self.correct(self.rescale(level))
    }
}

/// Clamp a raw reading into the linear brightness domain
#[inline]
pub const fn clamp_level(value: u16) -> u16 {
    if value > MAX_LEVEL { MAX_LEVEL } else { value }
}

/// Linearly rescale `level` (0..=1023) onto `0..=ceiling`
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn rescale(level: u16, ceiling: u16) -> u16 {
    ((clamp_level(level) as u32 * ceiling as u32) / MAX_LEVEL as u32) as u16
}

/// Cubic correction for an 8-bit output domain
///
/// `(v³ + 130305) >> 16`, with zero kept dark.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn correct8(value: u16) -> u16 {
    let value = if value > 255 { 255 } else { value as u32 };
    if value == 0 {
        return 0;
    }
    ((value * value * value + CUBIC_8BIT_BIAS) >> 16) as u16
}

/// Cubic correction for a 10-bit output domain
///
/// `(v³ + 2094081) >> 20`, with zero kept dark.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn correct10(value: u16) -> u16 {
    let value = clamp_level(value) as u32;
    if value == 0 {
        return 0;
    }
    ((value * value * value + CUBIC_10BIT_BIAS) >> 20) as u16
}
