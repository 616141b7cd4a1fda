//! Drivers for a TSL2561 light sensor and an AM2315 humidity/temperature
//! sensor sharing an i2c bus.
//!
//! Both drivers are blocking. They take a [`Bus`] and a
//! [`DelayNs`](embedded_hal::delay::DelayNs) provider at construction and
//! hand the bus back on [`close`](Tsl2561::close). Every transfer selects the
//! peripheral address first, other devices may have used the bus in between.
//!
//! ```no_run
//! # #[cfg(feature = "linux")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ambient_sensors::{tsl2561, Tsl2561};
//! use linux_embedded_hal::Delay;
//!
//! let bus = ambient_sensors::linux::open("/dev/i2c-1")?;
//! let mut light = Tsl2561::init(bus, Delay, tsl2561::ADDRESS_DEFAULT)?;
//! light.enable_autogain();
//! println!("lux: {}", light.lux()?);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "linux"))]
//! # fn main() {}
//! ```

pub mod am2315;
mod bus;
mod error;
#[cfg(feature = "linux")]
pub mod linux;
pub mod tsl2561;

pub use am2315::Am2315;
pub use bus::{Bus, I2cBus, I2cBusError};
pub use error::Error;
pub use tsl2561::Tsl2561;
