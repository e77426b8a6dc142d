//! Deferred persistence of [`Settings`]
//!
//! The store keeps the working copy of the settings in memory and writes it
//! back lazily. The blob lives at a fixed address followed by a one-byte
//! init marker; a missing or foreign marker means first run, and defaults are
//! written instead of reading garbage.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::Storage;
use crate::error::Error;
use crate::settings::{SETTINGS_LEN, Settings};

/// Default storage address of the settings blob.
pub const DEFAULT_ADDRESS: u16 = 512;

/// Marker byte stored after the blob once it has been initialized.
pub const INIT_MARKER: u8 = b's';

/// Default delay between the last update and the write-back.
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(5000);

/// Pending write-back state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteBack {
    Idle,
    /// Flush once the delay has passed since this instant
    Deferred(Instant),
    /// Flush on the next tick
    Immediate,
}

/// Settings with lazy write-back to a [`Storage`]
#[derive(Debug)]
pub struct SettingsStore<S: Storage> {
    storage: S,
    address: u16,
    commit_delay: Duration,
    settings: Settings,
    write_back: WriteBack,
}

impl<S: Storage> SettingsStore<S> {
    /// Create a store holding defaults until [`begin`](Self::begin) is called
    pub const fn new(storage: S, address: u16, commit_delay: Duration) -> Self {
        Self {
            storage,
            address,
            commit_delay,
            settings: Settings::DEFAULT,
            write_back: WriteBack::Idle,
        }
    }

    /// Load settings from storage, writing defaults on first run
    ///
    /// Returns `true` if defaults had to be written.
    pub fn begin(&mut self) -> Result<bool, Error> {
        let mut marker = [0u8; 1];
        self.storage.read(self.marker_address(), &mut marker)?;

        self.write_back = WriteBack::Idle;
        if marker[0] != INIT_MARKER {
            #[cfg(feature = "esp32-log")]
            println!("[SettingsStore.begin] no init marker, writing defaults");
            self.settings = Settings::DEFAULT;
            self.write_blob()?;
            self.storage.write(self.marker_address(), &[INIT_MARKER])?;
            return Ok(true);
        }

        let mut blob = [0u8; SETTINGS_LEN];
        self.storage.read(self.address, &mut blob)?;
        self.settings = Settings::from_bytes(&blob);
        #[cfg(feature = "esp32-log")]
        println!("[SettingsStore.begin] loaded {:?}", self.settings);
        Ok(false)
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access to the working copy; does not schedule a write-back
    pub const fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Check if a write-back is scheduled
    pub const fn is_dirty(&self) -> bool {
        !matches!(self.write_back, WriteBack::Idle)
    }

    /// Schedule a write-back after the commit delay
    ///
    /// Each call restarts the delay. An immediate request is not downgraded.
    pub fn update(&mut self, now: Instant) {
        if self.write_back != WriteBack::Immediate {
            self.write_back = WriteBack::Deferred(now);
        }
    }

    /// Schedule a write-back on the next [`tick`](Self::tick)
    pub fn request_flush(&mut self) {
        self.write_back = WriteBack::Immediate;
    }

    /// Write the settings right away
    pub fn update_now(&mut self) -> Result<(), Error> {
        self.write_back = WriteBack::Idle;
        self.write_blob()
    }

    /// Flush a scheduled write-back when it is due
    ///
    /// Returns `true` if storage was written.
    pub fn tick(&mut self, now: Instant) -> Result<bool, Error> {
        let due = match self.write_back {
            WriteBack::Idle => false,
            WriteBack::Immediate => true,
            WriteBack::Deferred(since) => now
                .checked_duration_since(since)
                .is_some_and(|elapsed| elapsed >= self.commit_delay),
        };
        if !due {
            return Ok(false);
        }
        self.update_now()?;
        Ok(true)
    }

    /// Invalidate the init marker so the next [`begin`](Self::begin) writes defaults
    pub fn reset(&mut self) -> Result<(), Error> {
        self.storage
            .write(self.marker_address(), &[INIT_MARKER.wrapping_add(1)])
    }

    /// Reset the marker and reinitialize, restoring defaults
    pub fn factory_reset(&mut self) -> Result<(), Error> {
        #[cfg(feature = "esp32-log")]
        println!("[SettingsStore.factory_reset] restoring defaults");
        self.reset()?;
        self.begin()?;
        Ok(())
    }

    fn write_blob(&mut self) -> Result<(), Error> {
        #[cfg(feature = "esp32-log")]
        println!("[SettingsStore] writing {:?}", self.settings);
        self.storage.write(self.address, &self.settings.to_bytes())
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn marker_address(&self) -> u16 {
        self.address.wrapping_add(SETTINGS_LEN as u16)
    }
}
