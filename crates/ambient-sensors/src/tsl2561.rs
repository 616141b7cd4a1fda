//! TSL2561 light-to-digital converter.
//!
//! The sensor is powered up for every measurement and powered down again
//! once both channels are read. With autogain enabled a reading that is too
//! dark or too bright is retaken once with the other gain.
//!
//! Datasheet: <https://cdn-shop.adafruit.com/datasheets/TSL2561.pdf>

mod autogain;
mod config;
mod lux;

use embedded_hal::delay::DelayNs;
use tracing::{debug, instrument};

use crate::bus::Device;
use crate::{Bus, Error};

use autogain::Verdict;
pub use config::{Gain, IntegrationTime, LightSensorConfig, Package};
pub use lux::{breakpoint_index, calculate_lux, illuminance, Breakpoint, Illuminance};
pub use lux::{CS_PACKAGE, T_PACKAGE};

/// ADDR pin pulled to ground
pub const ADDRESS_LOW: u16 = 0x29;
/// ADDR pin floating
pub const ADDRESS_DEFAULT: u16 = 0x39;
/// ADDR pin pulled to VDD
pub const ADDRESS_HIGH: u16 = 0x49;

const COMMAND_BIT: u8 = 0x80;
const WORD_BIT: u8 = 0x20;

mod register {
    pub const CONTROL: u8 = 0x00;
    pub const TIMING: u8 = 0x01;
    pub const CHANNEL0_LOW: u8 = 0x0C;
    pub const CHANNEL1_LOW: u8 = 0x0E;
}

const POWER_ON: u8 = 0x03;
const POWER_OFF: u8 = 0x00;

/// Counts of the two photodiodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChannels {
    /// Visible and infrared
    pub channel0: u16,
    /// Infrared only
    pub channel1: u16,
}

pub struct Tsl2561<B, D> {
    device: Device<B>,
    delay: D,
    config: LightSensorConfig,
}

impl<B: Bus, D: DelayNs> Tsl2561<B, D> {
    /// Powers the sensor up with 402ms integration time and 1x gain.
    pub fn init(bus: B, delay: D, address: u16) -> Result<Self, Error<B::Error>> {
        Self::init_with_config(bus, delay, address, LightSensorConfig::default())
    }

    pub fn init_with_config(
        bus: B,
        delay: D,
        address: u16,
        config: LightSensorConfig,
    ) -> Result<Self, Error<B::Error>> {
        let mut device = Device::new(bus, address);
        device.select()?;

        let mut sensor = Self {
            device,
            delay,
            config,
        };
        sensor.enable()?;
        sensor.set_timing(config.integration_time, config.gain)?;
        debug!("tsl2561 at {address:#x} ready: {config:?}");
        Ok(sensor)
    }

    /// Hands back the bus, the sensor is left in whatever power state it
    /// was in.
    pub fn close(self) -> B {
        self.device.into_bus()
    }

    pub fn config(&self) -> &LightSensorConfig {
        &self.config
    }

    pub fn enable(&mut self) -> Result<(), Error<B::Error>> {
        self.write_register(register::CONTROL, POWER_ON)
    }

    pub fn disable(&mut self) -> Result<(), Error<B::Error>> {
        self.write_register(register::CONTROL, POWER_OFF)
    }

    /// Writes integration time and gain in one go. Takes effect on the next
    /// measurement.
    pub fn set_timing(&mut self, time: IntegrationTime, gain: Gain) -> Result<(), Error<B::Error>> {
        self.config.integration_time = time;
        self.config.gain = gain;
        self.write_register(register::TIMING, self.config.timing_byte())
    }

    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<B::Error>> {
        self.set_timing(self.config.integration_time, gain)
    }

    pub fn set_integration_time(&mut self, time: IntegrationTime) -> Result<(), Error<B::Error>> {
        self.set_timing(time, self.config.gain)
    }

    /// Only affects the lux calculation, nothing is written to the sensor.
    pub fn set_package(&mut self, package: Package) {
        self.config.package = package;
    }

    pub fn enable_autogain(&mut self) {
        self.config.autogain = true;
    }

    pub fn disable_autogain(&mut self) {
        self.config.autogain = false;
    }

    /// One measurement with the current settings: power up, wait for the
    /// conversion, read both channels then power down.
    pub fn read_raw(&mut self) -> Result<RawChannels, Error<B::Error>> {
        self.enable()?;
        self.delay
            .delay_ms(self.config.integration_time.conversion_ms());

        let channels = self.read_channels_once();
        // power down even if reading failed
        let disabled = self.disable();
        let channels = channels?;
        disabled?;

        debug!(
            "tsl2561 {:#x}: channel0={}, channel1={}",
            self.device.address(),
            channels.channel0,
            channels.channel1
        );
        Ok(channels)
    }

    /// Like [`read_raw`](Self::read_raw) but with autogain applied when it is
    /// enabled. Takes at most two raw readings and changes gain at most once.
    #[instrument(level = "trace", skip(self))]
    pub fn read_channels(&mut self) -> Result<RawChannels, Error<B::Error>> {
        let first = self.read_raw()?;
        if !self.config.autogain {
            return Ok(first);
        }

        let verdict = autogain::judge(
            self.config.integration_time,
            self.config.gain,
            first.channel0,
        );
        match verdict {
            Verdict::Accept => Ok(first),
            Verdict::Retake { gain } => {
                debug!(
                    "channel0 at {} out of range for gain {:?}, retaking with {gain:?}",
                    first.channel0, self.config.gain
                );
                self.set_gain(gain)?;
                self.read_raw()
            }
        }
    }

    pub fn illuminance(&mut self) -> Result<Illuminance, Error<B::Error>> {
        let channels = self.read_channels()?;
        let illuminance = lux::illuminance(channels, &self.config);
        if illuminance.is_saturated() {
            debug!("tsl2561 {:#x}: sensor saturated", self.device.address());
        }
        Ok(illuminance)
    }

    /// Illuminance in lux. A saturated sensor reads as zero, use
    /// [`illuminance`](Self::illuminance) to tell the two apart.
    pub fn lux(&mut self) -> Result<u32, Error<B::Error>> {
        self.illuminance().map(Illuminance::lux)
    }

    fn read_channels_once(&mut self) -> Result<RawChannels, Error<B::Error>> {
        Ok(RawChannels {
            channel0: self.read_word(register::CHANNEL0_LOW)?,
            channel1: self.read_word(register::CHANNEL1_LOW)?,
        })
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<B::Error>> {
        self.device.write(&[COMMAND_BIT | register, value])
    }

    fn read_word(&mut self, register: u8) -> Result<u16, Error<B::Error>> {
        self.device.write(&[COMMAND_BIT | WORD_BIT | register])?;
        let mut buf = [0u8; 2];
        self.device.read(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }
}
