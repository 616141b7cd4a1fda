use std::cell::RefCell;

use ambient_sensors::am2315::Measurement;
use ambient_sensors::linux::{self, SharedBus};
use ambient_sensors::tsl2561::{Illuminance, LightSensorConfig};
use ambient_sensors::{Am2315, Tsl2561};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tracing::debug;

/// Light sensor that is set up again on the next measurement after any error
pub(crate) struct Light<'a, I, D> {
    bus: &'a RefCell<I>,
    new_delay: fn() -> D,
    address: u16,
    config: LightSensorConfig,
    driver: Option<Tsl2561<SharedBus<'a, I>, D>>,
}

impl<'a, I, D> Light<'a, I, D>
where
    I: I2c,
    I::Error: Send + Sync + 'static,
    D: DelayNs,
{
    pub(crate) fn new(
        bus: &'a RefCell<I>,
        new_delay: fn() -> D,
        address: u16,
        config: LightSensorConfig,
    ) -> Self {
        Self {
            bus,
            new_delay,
            address,
            config,
            driver: None,
        }
    }

    pub(crate) fn measure(&mut self) -> Result<Illuminance> {
        let mut driver = match self.driver.take() {
            Some(driver) => driver,
            None => {
                debug!("setting up tsl2561 at {:#x}", self.address);
                let delay = (self.new_delay)();
                Tsl2561::init_with_config(linux::share(self.bus), delay, self.address, self.config)
                    .wrap_err("Could not set up tsl2561 light sensor")?
            }
        };

        let illuminance = driver
            .illuminance()
            .wrap_err("Could not read tsl2561 light sensor")?;
        // autogain may have changed the gain, start from there next time
        self.config = *driver.config();
        self.driver = Some(driver);
        Ok(illuminance)
    }
}

/// Climate sensor that is set up again on the next measurement after any
/// error, including a failed checksum.
pub(crate) struct Climate<'a, I, D> {
    bus: &'a RefCell<I>,
    new_delay: fn() -> D,
    address: u16,
    driver: Option<Am2315<SharedBus<'a, I>, D>>,
}

impl<'a, I, D> Climate<'a, I, D>
where
    I: I2c,
    I::Error: Send + Sync + 'static,
    D: DelayNs,
{
    pub(crate) fn new(bus: &'a RefCell<I>, new_delay: fn() -> D, address: u16) -> Self {
        Self {
            bus,
            new_delay,
            address,
            driver: None,
        }
    }

    pub(crate) fn measure(&mut self) -> Result<Measurement> {
        let mut driver = match self.driver.take() {
            Some(driver) => driver,
            None => {
                debug!("setting up am2315 at {:#x}", self.address);
                let delay = (self.new_delay)();
                Am2315::init(linux::share(self.bus), delay, self.address)
                    .wrap_err("Could not set up am2315 climate sensor")?
            }
        };

        let measurement = driver
            .read()
            .and_then(Measurement::verified)
            .wrap_err("Could not read am2315 climate sensor")?;
        self.driver = Some(driver);
        Ok(measurement)
    }
}

#[cfg(test)]
mod tests {
    use ambient_sensors::tsl2561::Gain;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    use super::*;

    const LIGHT: u8 = 0x39;
    const CLIMATE: u8 = 0x5C;

    fn light_setup(timing: u8) -> Vec<Transaction> {
        vec![
            Transaction::write(LIGHT, vec![0x80, 0x03]),
            Transaction::write(LIGHT, vec![0x81, timing]),
        ]
    }

    fn light_reading(channel0: u16, channel1: u16) -> Vec<Transaction> {
        vec![
            Transaction::write(LIGHT, vec![0x80, 0x03]),
            Transaction::write(LIGHT, vec![0xAC]),
            Transaction::read(LIGHT, channel0.to_le_bytes().to_vec()),
            Transaction::write(LIGHT, vec![0xAE]),
            Transaction::read(LIGHT, channel1.to_le_bytes().to_vec()),
            Transaction::write(LIGHT, vec![0x80, 0x00]),
        ]
    }

    fn climate_reading(response: [u8; 8]) -> Vec<Transaction> {
        vec![
            Transaction::write(CLIMATE, vec![]),
            Transaction::write(CLIMATE, vec![0x03, 0x00, 0x04]),
            Transaction::read(CLIMATE, response.to_vec()),
        ]
    }

    #[test]
    fn light_is_set_up_again_after_an_error() {
        logger::setup_for_tests();
        let expectations: Vec<_> = [
            light_setup(0x02),
            vec![
                Transaction::write(LIGHT, vec![0x80, 0x03]),
                Transaction::write(LIGHT, vec![0xAC]).with_error(ErrorKind::Other),
                Transaction::write(LIGHT, vec![0x80, 0x00]),
            ],
            light_setup(0x02),
            light_reading(1000, 200),
            light_reading(1000, 200),
        ]
        .concat();
        let mut mock = I2cMock::new(&expectations);
        let bus = RefCell::new(mock.clone());
        let mut light = Light::new(&bus, NoopDelay::new, 0x39, LightSensorConfig::default());

        assert!(light.measure().is_err());
        assert_eq!(light.measure().unwrap(), Illuminance::Lux(379));
        // no setup in between, the driver is kept after a good reading
        assert_eq!(light.measure().unwrap(), Illuminance::Lux(379));
        mock.done();
    }

    #[test]
    fn light_setup_keeps_gain_chosen_by_autogain() {
        logger::setup_for_tests();
        let expectations: Vec<_> = [
            light_setup(0x02),
            light_reading(100, 20),
            vec![Transaction::write(LIGHT, vec![0x81, 0x12])],
            light_reading(1000, 200),
            vec![
                Transaction::write(LIGHT, vec![0x80, 0x03]).with_error(ErrorKind::Other),
            ],
            light_setup(0x12),
            light_reading(1000, 200),
        ]
        .concat();
        let mut mock = I2cMock::new(&expectations);
        let bus = RefCell::new(mock.clone());
        let config = LightSensorConfig {
            autogain: true,
            ..LightSensorConfig::default()
        };
        let mut light = Light::new(&bus, NoopDelay::new, 0x39, config);

        assert_eq!(light.measure().unwrap(), Illuminance::Lux(24));
        assert!(light.measure().is_err());
        assert_eq!(light.measure().unwrap(), Illuminance::Lux(24));
        assert_eq!(light.config.gain, Gain::X16);
        mock.done();
    }

    #[test]
    fn climate_recovers_after_checksum_failure() {
        logger::setup_for_tests();
        let good = [0x03, 0x04, 0x02, 0x58, 0x00, 0xFA, 0xF1, 0xC0];
        let mut corrupted = good;
        corrupted[5] ^= 0x01;
        let expectations = [climate_reading(corrupted), climate_reading(good)].concat();
        let mut mock = I2cMock::new(&expectations);
        let bus = RefCell::new(mock.clone());
        let mut climate = Climate::new(&bus, NoopDelay::new, 0x5C);

        assert!(climate.measure().is_err());
        assert!(climate.driver.is_none());
        let measurement = climate.measure().unwrap();
        assert_eq!(measurement.humidity, 60.0);
        assert_eq!(measurement.temperature, 25.0);
        assert!(climate.driver.is_some());
        mock.done();
    }
}
