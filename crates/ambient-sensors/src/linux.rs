//! Linux `/dev/i2c-N` bus through [`linux_embedded_hal`].

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::I2cdev;
use tracing::error;

use crate::I2cBus;

/// A bus owned by a single driver
pub type LinuxBus = I2cBus<I2cdev>;
/// One of several handles to a bus shared between drivers on one thread
pub type SharedBus<'a, I = I2cdev> = I2cBus<RefCellDevice<'a, I>>;

#[derive(Debug, thiserror::Error)]
#[error("Could not open i2c bus {}: {cause}", path.display())]
pub struct OpenError {
    pub path: PathBuf,
    pub cause: LinuxI2CError,
}

/// Open an i2c character device, for example `/dev/i2c-1` on a Raspberry Pi.
pub fn open(path: impl AsRef<Path>) -> Result<LinuxBus, OpenError> {
    open_device(path.as_ref()).map(I2cBus::new)
}

/// Open an i2c character device for use by multiple drivers, give each
/// driver its own handle using [`share`].
pub fn open_shared(path: impl AsRef<Path>) -> Result<RefCell<I2cdev>, OpenError> {
    open_device(path.as_ref()).map(RefCell::new)
}

/// The `RefCell` makes sure transfers of different drivers never interleave.
pub fn share<I: I2c>(bus: &RefCell<I>) -> SharedBus<'_, I> {
    I2cBus::new(RefCellDevice::new(bus))
}

fn open_device(path: &Path) -> Result<I2cdev, OpenError> {
    I2cdev::new(path)
        .inspect_err(|e| error!("Could not open i2c bus: {e}"))
        .map_err(|cause| OpenError {
            path: path.to_owned(),
            cause,
        })
}
