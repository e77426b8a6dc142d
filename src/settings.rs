//! Persisted brightness settings and their storage layout.

use crate::correction::clamp_level;
use crate::mode::ActiveMode;

/// Size of the encoded settings blob, excluding the init marker
pub const SETTINGS_LEN: usize = 5;

/// Settings kept in non-volatile storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Target level of the first active mode (0-1023)
    pub first_level: u16,
    /// Target level of the second active mode (0-1023)
    pub second_level: u16,
    /// Active mode restored when the light is switched on
    pub last_active: ActiveMode,
}

impl Settings {
    /// First-run defaults
    pub const DEFAULT: Self = Self {
        first_level: 512,
        second_level: 1023,
        last_active: ActiveMode::First,
    };

    /// Target level stored for `mode`
    pub const fn level(&self, mode: ActiveMode) -> u16 {
        match mode {
            ActiveMode::First => self.first_level,
            ActiveMode::Second => self.second_level,
        }
    }

    /// Store a new target level for `mode`, clamped to the linear domain
    pub fn set_level(&mut self, mode: ActiveMode, level: u16) {
        let level = clamp_level(level);
        match mode {
            ActiveMode::First => self.first_level = level,
            ActiveMode::Second => self.second_level = level,
        }
    }

    /// Encode into the storage layout: two little-endian levels and the mode byte
    pub fn to_bytes(&self) -> [u8; SETTINGS_LEN] {
        let first = self.first_level.to_le_bytes();
        let second = self.second_level.to_le_bytes();
        [
            first[0],
            first[1],
            second[0],
            second[1],
            self.last_active.index(),
        ]
    }

    /// Decode from the storage layout, clamping levels into range
    pub fn from_bytes(bytes: &[u8; SETTINGS_LEN]) -> Self {
        Self {
            first_level: clamp_level(u16::from_le_bytes([bytes[0], bytes[1]])),
            second_level: clamp_level(u16::from_le_bytes([bytes[2], bytes[3]])),
            last_active: ActiveMode::from_index(bytes[4]),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
