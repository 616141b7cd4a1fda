//! AM2315 humidity and temperature sensor.
//!
//! The sensor sleeps between requests and misses the first transfer after
//! waking up. Every read therefore goes: wake up, request the four
//! measurement registers, wait for the conversion and read an 8 byte
//! [`Frame`] protected by a crc16.

mod crc;
mod frame;

use embedded_hal::delay::DelayNs;
use tracing::{debug, trace, warn};

use crate::bus::Device;
use crate::{Bus, Error};

pub use crc::crc16;
pub use frame::Frame;

pub const ADDRESS: u16 = 0x5C;

/// Modbus "read input registers"
const READ_REGISTERS: u8 = 0x03;
const START_REGISTER: u8 = 0x00;
/// humidity high, humidity low, temperature high, temperature low
const REGISTER_COUNT: u8 = 0x04;

/// Oscillator start up after the wake up transfer
const WAKE_UP_US: u32 = 900;
const RESPONSE_MS: u32 = 10;

/// A decoded reading. Only trust it when `crc_ok` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Degrees celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
    pub crc_ok: bool,
    transmitted_crc: u16,
    computed_crc: u16,
}

impl Measurement {
    fn from_frame(frame: &Frame) -> Self {
        Self {
            temperature: frame.temperature(),
            humidity: frame.humidity(),
            crc_ok: frame.crc_ok(),
            transmitted_crc: frame.transmitted_crc(),
            computed_crc: frame.computed_crc(),
        }
    }

    /// Turns a measurement that failed its integrity check into an error.
    pub fn verified<E>(self) -> Result<Self, Error<E>> {
        if self.crc_ok {
            Ok(self)
        } else {
            Err(Error::IntegrityFailure {
                expected: self.transmitted_crc,
                computed: self.computed_crc,
            })
        }
    }
}

pub struct Am2315<B, D> {
    device: Device<B>,
    delay: D,
}

impl<B: Bus, D: DelayNs> Am2315<B, D> {
    /// Fails if the address can not be selected. Does not talk to the sensor
    /// as it is most likely asleep.
    pub fn init(bus: B, delay: D, address: u16) -> Result<Self, Error<B::Error>> {
        let mut device = Device::new(bus, address);
        device.select()?;
        debug!("am2315 at {address:#x} ready");
        Ok(Self { device, delay })
    }

    pub fn close(self) -> B {
        self.device.into_bus()
    }

    /// Reads temperature and humidity. A crc mismatch is reported through
    /// [`Measurement::crc_ok`], not as an error.
    pub fn read(&mut self) -> Result<Measurement, Error<B::Error>> {
        self.wake_up();

        self.device
            .write(&[READ_REGISTERS, START_REGISTER, REGISTER_COUNT])?;
        self.delay.delay_ms(RESPONSE_MS);

        let mut buf = [0u8; frame::FRAME_LEN];
        self.device.read(&mut buf)?;
        let frame = Frame(buf);

        if !frame.header_ok() {
            warn!(
                "am2315 {:#x}: unexpected response header {:02x?}",
                self.device.address(),
                &buf[..2]
            );
        }

        let measurement = Measurement::from_frame(&frame);
        if measurement.crc_ok {
            debug!(
                "am2315 {:#x}: temperature={}, humidity={}",
                self.device.address(),
                measurement.temperature,
                measurement.humidity
            );
        } else {
            warn!(
                "am2315 {:#x}: crc mismatch, frame says {:#06x} computed {:#06x}",
                self.device.address(),
                measurement.transmitted_crc,
                measurement.computed_crc
            );
        }
        Ok(measurement)
    }

    /// Degrees celsius, unverified.
    pub fn temperature(&mut self) -> Result<f32, Error<B::Error>> {
        self.read().map(|m| m.temperature)
    }

    /// Relative humidity in percent, unverified.
    pub fn humidity(&mut self) -> Result<f32, Error<B::Error>> {
        self.read().map(|m| m.humidity)
    }

    /// The sensor does not acknowledge this transfer, it only wakes it up.
    fn wake_up(&mut self) {
        if let Err(e) = self.device.write(&[]) {
            trace!("wake up transfer not acknowledged (expected): {e}");
        }
        self.delay.delay_us(WAKE_UP_US);
    }
}
