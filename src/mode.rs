//! Runtime modes of the dimmer

const MODE_ID_FIRST: u8 = 0;
const MODE_ID_SECOND: u8 = 1;
const MODE_ID_OFF: u8 = 2;
const MODE_ID_MAX: u8 = 3;

/// One of the two user-configurable brightness levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveMode {
    #[default]
    First,
    Second,
}

impl ActiveMode {
    /// The other active mode
    pub const fn toggled(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Persisted single-bit index
    pub const fn index(self) -> u8 {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// Any nonzero index selects the second mode
    pub const fn from_index(index: u8) -> Self {
        if index == 0 { Self::First } else { Self::Second }
    }
}

/// Mode the control loop is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// First persisted level
    First = MODE_ID_FIRST,
    /// Second persisted level
    Second = MODE_ID_SECOND,
    /// Output dark
    Off = MODE_ID_OFF,
    /// Full brightness, not bound to any click sequence
    Max = MODE_ID_MAX,
}

impl Mode {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_FIRST => Self::First,
            MODE_ID_SECOND => Self::Second,
            MODE_ID_OFF => Self::Off,
            MODE_ID_MAX => Self::Max,
            _ => return None,
        })
    }

    /// Returns the active mode, if any
    pub const fn active(self) -> Option<ActiveMode> {
        match self {
            Self::First => Some(ActiveMode::First),
            Self::Second => Some(ActiveMode::Second),
            Self::Off | Self::Max => None,
        }
    }

    pub const fn is_active(self) -> bool {
        self.active().is_some()
    }

    /// Swap the two active modes; `Off` and `Max` stay put
    pub const fn toggled(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
            Self::Off | Self::Max => self,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Off => "off",
            Self::Max => "max",
        }
    }
}

impl From<ActiveMode> for Mode {
    fn from(mode: ActiveMode) -> Self {
        match mode {
            ActiveMode::First => Self::First,
            ActiveMode::Second => Self::Second,
        }
    }
}
