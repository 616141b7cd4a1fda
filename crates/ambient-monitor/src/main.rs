use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use ambient_sensors::tsl2561::LightSensorConfig;
use ambient_sensors::{am2315, linux, tsl2561};
use clap::Parser;
use color_eyre::Result;
use linux_embedded_hal::Delay;
use tracing::info;

mod errors;
mod sensors;
mod settings;

use settings::{Gain, IntegrationTime, Package, Sensor};

#[derive(Parser)]
#[command(name = "ambient monitor")]
#[command(version = "1.0")]
#[command(about = "reads a tsl2561 light sensor and an am2315 climate sensor on an i2c bus")]
struct Cli {
    /// i2c character device the sensors are attached to
    #[arg(short, long, default_value = "/dev/i2c-1")]
    bus: PathBuf,

    /// tsl2561 address, 0x29, 0x39 or 0x49 depending on its ADDR pin
    #[arg(long, default_value = "0x39", value_parser = settings::parse_address)]
    light_address: u16,

    #[arg(long, default_value = "0x5c", value_parser = settings::parse_address)]
    climate_address: u16,

    /// seconds between measurements
    #[arg(short, long, default_value_t = 5)]
    period: u64,

    /// stop after this many measurements, keeps going if not set
    #[arg(short, long)]
    count: Option<usize>,

    #[arg(long, value_enum, default_value_t = IntegrationTime::Ms402)]
    integration_time: IntegrationTime,

    #[arg(long, value_enum, default_value_t = Gain::X1)]
    gain: Gain,

    #[arg(long, value_enum, default_value_t = Package::T)]
    package: Package,

    /// let the driver switch gain when it is too dark or too bright
    #[arg(long)]
    autogain: bool,

    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Sensor::Light, Sensor::Climate])]
    sensors: Vec<Sensor>,
}

impl Cli {
    fn light_config(&self) -> LightSensorConfig {
        LightSensorConfig {
            integration_time: self.integration_time.into(),
            gain: self.gain.into(),
            autogain: self.autogain,
            package: self.package.into(),
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logger::setup();

    let bus = linux::open_shared(&cli.bus)?;
    info!("opened i2c bus: {}", cli.bus.display());

    let light_config = cli.light_config();
    let mut light = cli
        .sensors
        .contains(&Sensor::Light)
        .then(|| sensors::Light::new(&bus, || Delay, cli.light_address, light_config));
    let mut climate = cli
        .sensors
        .contains(&Sensor::Climate)
        .then(|| sensors::Climate::new(&bus, || Delay, cli.climate_address));

    let mut reporter: errors::Reporter = errors::Reporter::default();
    let period = Duration::from_secs(cli.period);
    let mut measured = 0;

    loop {
        if let Some(light) = light.as_mut() {
            match light.measure() {
                Ok(tsl2561::Illuminance::Lux(lux)) => info!("illuminance: {lux} lux"),
                Ok(tsl2561::Illuminance::Saturated) => {
                    info!("light sensor saturated, try a shorter integration time")
                }
                Err(report) => reporter.report(&report),
            }
        }

        if let Some(climate) = climate.as_mut() {
            match climate.measure() {
                Ok(am2315::Measurement {
                    temperature,
                    humidity,
                    ..
                }) => info!("temperature: {temperature:.1} °C, humidity: {humidity:.1} %"),
                Err(report) => reporter.report(&report),
            }
        }

        measured += 1;
        if cli.count.is_some_and(|count| measured >= count) {
            return Ok(());
        }
        thread::sleep(period);
    }
}
