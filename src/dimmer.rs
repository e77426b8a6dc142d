use core::convert::Infallible;

use embassy_time::Duration;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::correction::{MAX_LEVEL, PWM_RESOLUTION, PwmResolution, clamp_level};
use crate::error::Error;
use crate::indicator::{BlinkPattern, Blinker};
use crate::mode::Mode;
use crate::output::{BrightnessOutput, BrightnessState, RampTimings};
use crate::settings::Settings;
use crate::store::{DEFAULT_ADDRESS, DEFAULT_COMMIT_DELAY, SettingsStore};
use crate::{AnalogInput, Board, ClickSource, Clock, Peripherals, PowerControl};

/// Configuration for the dimmer
#[derive(Debug, Clone, Copy)]
pub struct DimmerConfig {
    /// Output resolution of the PWM channel
    pub resolution: PwmResolution,
    /// Brightness ramp timing
    pub ramp: RampTimings,
    /// Quiet period of [`SettingsStore::update`] before a deferred write-back
    ///
    /// The control loop never defers: a 5-click commit is flushed on the
    /// next [`Dimmer::poll`] whatever this is set to.
    pub commit_delay: Duration,
    /// Storage address of the settings blob
    pub storage_address: u16,
    /// Output ceiling while the potentiometer is tracked during calibration
    pub tracking_ceiling: u16,
}

impl Default for DimmerConfig {
    fn default() -> Self {
        Self {
            resolution: PWM_RESOLUTION,
            ramp: RampTimings::default(),
            commit_delay: DEFAULT_COMMIT_DELAY,
            storage_address: DEFAULT_ADDRESS,
            tracking_ceiling: PWM_RESOLUTION.tracking_ceiling(),
        }
    }
}

/// Single-channel dimmer - owns the hardware and the control loop state
pub struct Dimmer<B: Board> {
    // Hardware
    pub(crate) clock: B::Clock,
    pub(crate) output: BrightnessOutput<B::Pwm>,
    pub(crate) indicator: Blinker<B::Indicator>,
    pub(crate) button: B::Button,
    pub(crate) potentiometer: B::Potentiometer,
    pub(crate) power: B::Power,

    // State
    pub(crate) store: SettingsStore<B::Storage>,
    pub(crate) mode: Mode,
    pub(crate) tracking_ceiling: u16,
}

impl<B: Board> Dimmer<B> {
    /// Create a dimmer in the `Off` mode
    ///
    /// Nothing touches the hardware until [`start`](Self::start).
    pub fn new(peripherals: Peripherals<B>, config: &DimmerConfig) -> Self {
        Self {
            clock: peripherals.clock,
            output: BrightnessOutput::new(peripherals.pwm, config.resolution, config.ramp),
            indicator: Blinker::new(peripherals.indicator),
            button: peripherals.button,
            potentiometer: peripherals.potentiometer,
            power: peripherals.power,
            store: SettingsStore::new(
                peripherals.storage,
                config.storage_address,
                config.commit_delay,
            ),
            mode: Mode::Off,
            tracking_ceiling: config.tracking_ceiling,
        }
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub const fn brightness(&self) -> BrightnessState {
        self.output.state()
    }

    /// Check if settings are waiting to be written back
    pub const fn has_pending_write(&self) -> bool {
        self.store.is_dirty()
    }

    /// Power-up sequence
    pub fn start(&mut self) -> Result<(), Error> {
        self.power.disable_unused_peripherals();
        #[cfg_attr(not(feature = "esp32-log"), allow(unused_variables))]
        let first_run = self.store.begin()?;
        #[cfg(feature = "esp32-log")]
        println!(
            "[Dimmer.start] {:?} Hz carrier, first run: {:?}",
            self.output.resolution().carrier_hz(),
            first_run
        );
        self.output.set_level(0)?;
        self.indicator.blink(BlinkPattern::BOOT);
        Ok(())
    }

    /// One iteration of the control loop
    pub fn poll(&mut self) -> Result<(), Error> {
        let now = self.clock.now();
        self.store.tick(now)?;
        self.indicator.tick(now)?;
        self.button.tick(now)?;

        if let Some(clicks) = self.button.take_clicks() {
            self.handle_clicks(clicks)?;
        }
        Ok(())
    }

    /// Start and spin the control loop until a hardware fault
    pub fn run(&mut self) -> Result<Infallible, Error> {
        self.start()?;
        loop {
            self.poll()?;
        }
    }

    /// Dispatch a settled click count, then converge the output to the mode
    pub fn handle_clicks(&mut self, clicks: u8) -> Result<(), Error> {
        #[cfg(feature = "esp32-log")]
        println!("[Dimmer.handle_clicks] {:?} clicks in {:?}", clicks, self.mode.as_str());
        match clicks {
            1 => {
                self.indicator.blink(BlinkPattern::pulses(1));
                if self.mode == Mode::Off {
                    self.mode = self.last_active();
                } else {
                    self.mode = Mode::Off;
                    self.converge()?;
                    self.power.sleep_until_wake();
                    self.indicator.blink(BlinkPattern::pulses(1));
                    self.mode = self.last_active();
                }
            }
            2 => {
                self.indicator.blink(BlinkPattern::pulses(2));
                self.mode = self.mode.toggled();
            }
            3 => {
                self.indicator.blink(BlinkPattern::pulses(3));
                if self.mode.is_active() {
                    #[cfg_attr(not(feature = "esp32-log"), allow(unused_variables))]
                    let outcome = self.calibrate()?;
                    #[cfg(feature = "esp32-log")]
                    println!("[Dimmer.handle_clicks] calibration {:?}", outcome);
                }
            }
            5 if self.mode.is_active() => {
                self.indicator.blink(BlinkPattern::pulses(4));
                self.store.request_flush();
            }
            10 if self.mode.is_active() => {
                self.indicator.blink(BlinkPattern::pulses(5));
                self.store.factory_reset()?;
            }
            _ => {}
        }

        self.converge()
    }

    /// Switch to `mode` and ramp to its level
    ///
    /// This is the only way into [`Mode::Max`].
    pub fn apply_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.mode = mode;
        self.converge()
    }

    /// Ramp the output to the level of the current mode
    fn converge(&mut self) -> Result<(), Error> {
        let target = self.resolve_target();
        let indicator = &mut self.indicator;
        self.output
            .ramp(target, &self.clock, |now| indicator.tick(now))
    }

    /// Linear target of the current mode
    ///
    /// Resolving an active mode records it as the last active one.
    fn resolve_target(&mut self) -> u16 {
        match self.mode.active() {
            Some(active) => {
                let settings = self.store.settings_mut();
                settings.last_active = active;
                settings.level(active)
            }
            None if self.mode == Mode::Max => MAX_LEVEL,
            None => 0,
        }
    }

    fn last_active(&self) -> Mode {
        self.store.settings().last_active.into()
    }

    pub(crate) fn read_potentiometer(&mut self) -> u16 {
        clamp_level(self.potentiometer.read())
    }
}
