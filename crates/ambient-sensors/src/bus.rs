use core::fmt::Debug;

use embedded_hal::i2c::{I2c, SevenBitAddress};
use tracing::trace;

use crate::Error;

/// The three things the drivers need from a bus.
///
/// A transfer must be preceded by a call to [`select_address`] for the same
/// address. Other peripherals on the bus may have been addressed in between
/// so the drivers select again before every single transfer.
///
/// [`select_address`]: Bus::select_address
pub trait Bus {
    type Error: Debug;

    fn select_address(&mut self, address: u16) -> Result<(), Self::Error>;
    fn write_bytes(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error>;
    /// Fill all of `buf`, a short read is an error.
    fn read_bytes(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    type Error = B::Error;

    fn select_address(&mut self, address: u16) -> Result<(), Self::Error> {
        (**self).select_address(address)
    }

    fn write_bytes(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_bytes(address, data)
    }

    fn read_bytes(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_bytes(address, buf)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum I2cBusError<E> {
    #[error("Address {0:#x} does not fit in 7 bits")]
    InvalidAddress(u16),
    #[error("Transfer to {0:#x} without selecting it first")]
    NotSelected(u16),
    #[error("I2c transfer failed: {0:?}")]
    I2c(E),
}

/// Adapts an [`embedded_hal`] i2c bus to [`Bus`].
///
/// A selection is consumed by the transfer that follows it, so a driver that
/// forgets to select gets [`I2cBusError::NotSelected`] instead of silently
/// talking to whatever was addressed last.
pub struct I2cBus<I> {
    i2c: I,
    selected: Option<SevenBitAddress>,
}

impl<I> I2cBus<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            selected: None,
        }
    }

    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl<I: I2c> I2cBus<I> {
    fn take_selected(&mut self, address: u16) -> Result<SevenBitAddress, I2cBusError<I::Error>> {
        match self.selected.take() {
            Some(selected) if u16::from(selected) == address => Ok(selected),
            _ => Err(I2cBusError::NotSelected(address)),
        }
    }
}

impl<I: I2c> Bus for I2cBus<I> {
    type Error = I2cBusError<I::Error>;

    fn select_address(&mut self, address: u16) -> Result<(), Self::Error> {
        let address = SevenBitAddress::try_from(address)
            .ok()
            .filter(|a| *a <= 0x7F)
            .ok_or(I2cBusError::InvalidAddress(address))?;
        self.selected = Some(address);
        Ok(())
    }

    fn write_bytes(&mut self, address: u16, data: &[u8]) -> Result<(), Self::Error> {
        let address = self.take_selected(address)?;
        self.i2c.write(address, data).map_err(I2cBusError::I2c)
    }

    fn read_bytes(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        let address = self.take_selected(address)?;
        self.i2c.read(address, buf).map_err(I2cBusError::I2c)
    }
}

/// A peripheral address bound to a bus. Selects the address before every
/// transfer.
pub(crate) struct Device<B> {
    bus: B,
    address: u16,
}

impl<B: Bus> Device<B> {
    pub(crate) fn new(bus: B, address: u16) -> Self {
        Self { bus, address }
    }

    pub(crate) fn address(&self) -> u16 {
        self.address
    }

    pub(crate) fn select(&mut self) -> Result<(), Error<B::Error>> {
        self.bus
            .select_address(self.address)
            .map_err(|cause| Error::BusUnavailable {
                address: self.address,
                cause,
            })
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> Result<(), Error<B::Error>> {
        self.select()?;
        trace!("device {:#x}: write {data:02x?}", self.address);
        self.bus
            .write_bytes(self.address, data)
            .map_err(|cause| Error::TransferFailed {
                address: self.address,
                cause,
            })
    }

    pub(crate) fn read(&mut self, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.select()?;
        self.bus
            .read_bytes(self.address, buf)
            .map_err(|cause| Error::TransferFailed {
                address: self.address,
                cause,
            })?;
        trace!("device {:#x}: read {buf:02x?}", self.address);
        Ok(())
    }

    pub(crate) fn into_bus(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    use super::*;

    #[test]
    fn transfer_without_select_is_refused() {
        let mut i2c = I2cMock::new(&[]);
        let mut bus = I2cBus::new(i2c.clone());

        assert_eq!(
            bus.write_bytes(0x39, &[0x80]),
            Err(I2cBusError::NotSelected(0x39))
        );
        i2c.done();
    }

    #[test]
    fn selection_is_used_up_by_one_transfer() {
        let mut i2c = I2cMock::new(&[Transaction::write(0x39, vec![0x80, 0x03])]);
        let mut bus = I2cBus::new(i2c.clone());

        bus.select_address(0x39).unwrap();
        bus.write_bytes(0x39, &[0x80, 0x03]).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(
            bus.read_bytes(0x39, &mut buf),
            Err(I2cBusError::NotSelected(0x39))
        );
        i2c.done();
    }

    #[test]
    fn selecting_one_address_does_not_allow_another() {
        let mut i2c = I2cMock::new(&[]);
        let mut bus = I2cBus::new(i2c.clone());

        bus.select_address(0x39).unwrap();
        assert_eq!(
            bus.write_bytes(0x5C, &[0x03]),
            Err(I2cBusError::NotSelected(0x5C))
        );
        i2c.done();
    }

    #[test]
    fn ten_bit_addresses_are_rejected() {
        let mut bus = I2cBus::new(I2cMock::new(&[]));
        assert_eq!(
            bus.select_address(0x80),
            Err(I2cBusError::InvalidAddress(0x80))
        );
        assert_eq!(
            bus.select_address(0x1234),
            Err(I2cBusError::InvalidAddress(0x1234))
        );
        bus.into_inner().done();
    }

    #[test]
    fn device_selects_before_every_transfer() {
        let mut i2c = I2cMock::new(&[
            Transaction::write(0x5C, vec![0x03, 0x00, 0x04]),
            Transaction::read(0x5C, vec![0x03, 0x04]),
        ]);
        let mut device = Device::new(I2cBus::new(i2c.clone()), 0x5C);

        device.write(&[0x03, 0x00, 0x04]).unwrap();
        let mut buf = [0u8; 2];
        device.read(&mut buf).unwrap();
        assert_eq!(buf, [0x03, 0x04]);
        i2c.done();
    }
}
