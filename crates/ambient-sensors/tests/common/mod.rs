use std::cell::RefCell;
use std::rc::Rc;

use ambient_sensors::I2cBus;
use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

/// Remembers every delay in nanoseconds instead of sleeping
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay(Rc<RefCell<Vec<u32>>>);

impl RecordingDelay {
    pub fn recorded(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(ns);
    }
}

pub const MS: u32 = 1_000_000;
pub const US: u32 = 1_000;

/// Returns the bus for the driver and a handle to check all expectations were
/// met.
pub fn mock_bus(expectations: &[Transaction]) -> (I2cBus<I2cMock>, I2cMock) {
    logger::setup_for_tests();
    let mock = I2cMock::new(expectations);
    (I2cBus::new(mock.clone()), mock)
}
