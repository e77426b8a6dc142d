//! Host fakes for the dimmer hardware traits.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::{digital, pwm};
use strip_dimmer::{
    AnalogInput, Board, ClickSource, Clock, Dimmer, DimmerConfig, Error, Instant, Peripherals,
    PowerControl, PwmResolution, Storage,
};

pub const EEPROM_SIZE: usize = 1024;

/// Clock that moves forward by `step_ms` every time it is read
#[derive(Clone)]
pub struct FakeClock {
    pub now_ms: Rc<Cell<u64>>,
    pub step_ms: u64,
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        let now = self.now_ms.get();
        self.now_ms.set(now + self.step_ms);
        Instant::from_millis(now)
    }
}

/// PWM channel recording every duty written
pub struct FakePwm {
    pub max: u16,
    pub duties: Rc<RefCell<Vec<u16>>>,
}

impl pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl pwm::SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duties.borrow_mut().push(duty);
        Ok(())
    }
}

/// Pin usable as output (indicator) and input (button)
#[derive(Clone, Default)]
pub struct FakePin {
    pub high: Rc<Cell<bool>>,
    pub rising_edges: Rc<Cell<u32>>,
}

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl digital::OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high.get() {
            self.rising_edges.set(self.rising_edges.get() + 1);
        }
        self.high.set(true);
        Ok(())
    }
}

impl digital::InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}

/// Button yielding one queued click count per `take_clicks`
pub struct ScriptedClicks {
    pub queue: Rc<RefCell<VecDeque<u8>>>,
}

impl ClickSource for ScriptedClicks {
    fn tick(&mut self, _now: Instant) -> Result<(), Error> {
        Ok(())
    }

    fn take_clicks(&mut self) -> Option<u8> {
        self.queue.borrow_mut().pop_front()
    }
}

pub struct FakePot {
    pub value: Rc<Cell<u16>>,
}

impl AnalogInput for FakePot {
    fn read(&mut self) -> u16 {
        self.value.get()
    }
}

/// Erased (0xFF) EEPROM shared across simulated power cycles
#[derive(Clone)]
pub struct FakeEeprom {
    pub bytes: Rc<RefCell<Vec<u8>>>,
}

impl FakeEeprom {
    pub fn erased() -> Self {
        Self {
            bytes: Rc::new(RefCell::new(vec![0xFF; EEPROM_SIZE])),
        }
    }

    pub fn slice(&self, address: usize, len: usize) -> Vec<u8> {
        self.bytes.borrow()[address..address + len].to_vec()
    }
}

impl Storage for FakeEeprom {
    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Error> {
        let start = usize::from(address);
        let bytes = self.bytes.borrow();
        let src = bytes
            .get(start..start + buf.len())
            .ok_or(Error::Storage { address })?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Error> {
        let start = usize::from(address);
        let mut bytes = self.bytes.borrow_mut();
        let dst = bytes
            .get_mut(start..start + data.len())
            .ok_or(Error::Storage { address })?;
        dst.copy_from_slice(data);
        Ok(())
    }
}

/// Power controller whose sleep returns right away, as if woken
#[derive(Default)]
pub struct FakePower {
    pub sleeps: Rc<Cell<u32>>,
    pub peripherals_disabled: Rc<Cell<bool>>,
}

impl PowerControl for FakePower {
    fn disable_unused_peripherals(&mut self) {
        self.peripherals_disabled.set(true);
    }

    fn sleep_until_wake(&mut self) {
        self.sleeps.set(self.sleeps.get() + 1);
    }
}

pub struct TestBoard;

impl Board for TestBoard {
    type Pwm = FakePwm;
    type Indicator = FakePin;
    type Button = ScriptedClicks;
    type Potentiometer = FakePot;
    type Storage = FakeEeprom;
    type Power = FakePower;
    type Clock = FakeClock;
}

/// Handles kept by the test to drive and observe a dimmer
pub struct Rig {
    pub now_ms: Rc<Cell<u64>>,
    pub duties: Rc<RefCell<Vec<u16>>>,
    pub indicator: FakePin,
    pub clicks: Rc<RefCell<VecDeque<u8>>>,
    pub pot: Rc<Cell<u16>>,
    pub eeprom: FakeEeprom,
    pub sleeps: Rc<Cell<u32>>,
    pub peripherals_disabled: Rc<Cell<bool>>,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_eeprom(FakeEeprom::erased())
    }

    /// Fresh hardware around an existing EEPROM, i.e. a power cycle
    pub fn with_eeprom(eeprom: FakeEeprom) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(0)),
            duties: Rc::new(RefCell::new(Vec::new())),
            indicator: FakePin::default(),
            clicks: Rc::new(RefCell::new(VecDeque::new())),
            pot: Rc::new(Cell::new(0)),
            eeprom,
            sleeps: Rc::new(Cell::new(0)),
            peripherals_disabled: Rc::new(Cell::new(false)),
        }
    }

    pub fn config() -> DimmerConfig {
        DimmerConfig {
            resolution: PwmResolution::Bits8,
            tracking_ceiling: 225,
            ..DimmerConfig::default()
        }
    }

    /// Build and start a dimmer on this rig
    pub fn dimmer(&self) -> Dimmer<TestBoard> {
        self.dimmer_with(&Self::config())
    }

    pub fn dimmer_with(&self, config: &DimmerConfig) -> Dimmer<TestBoard> {
        let peripherals = Peripherals {
            pwm: FakePwm {
                max: 255,
                duties: Rc::clone(&self.duties),
            },
            indicator: self.indicator.clone(),
            button: ScriptedClicks {
                queue: Rc::clone(&self.clicks),
            },
            potentiometer: FakePot {
                value: Rc::clone(&self.pot),
            },
            storage: self.eeprom.clone(),
            power: FakePower {
                sleeps: Rc::clone(&self.sleeps),
                peripherals_disabled: Rc::clone(&self.peripherals_disabled),
            },
            clock: FakeClock {
                now_ms: Rc::clone(&self.now_ms),
                step_ms: 5,
            },
        };
        let mut dimmer = Dimmer::new(peripherals, config);
        dimmer.start().expect("start");
        dimmer
    }

    pub fn push_clicks(&self, clicks: &[u8]) {
        self.clicks.borrow_mut().extend(clicks.iter().copied());
    }

    /// Poll long enough for any ramp and pulse pattern to finish
    pub fn settle(&self, dimmer: &mut Dimmer<TestBoard>) {
        for _ in 0..400 {
            dimmer.poll().unwrap();
        }
    }

    /// Rising edges of the status LED caused by `clicks`
    pub fn pulses_for(&self, dimmer: &mut Dimmer<TestBoard>, clicks: &[u8]) -> u32 {
        self.indicator.rising_edges.set(0);
        self.push_clicks(clicks);
        self.settle(dimmer);
        self.indicator.rising_edges.get()
    }

    pub fn last_duty(&self) -> Option<u16> {
        self.duties.borrow().last().copied()
    }
}
