//! I2C interface implementation built on top of `embedded-hal` `I2c`.
//!
//! Several chips on one bus each get their own [`I2cInterface`] wrapping a
//! shared-bus handle such as `embedded_hal_bus::i2c::RefCellDevice`. The
//! handle is responsible for serializing transactions.

use embedded_hal::i2c::{I2c, SevenBitAddress};

use super::Cap1188Interface;

/// Lowest address selectable through the ADDR_COMM strap.
pub const MIN_ADDRESS: SevenBitAddress = 0x28;
/// Highest address selectable through the ADDR_COMM strap.
pub const MAX_ADDRESS: SevenBitAddress = 0x2D;
/// Address used when ADDR_COMM is left floating.
pub const DEFAULT_ADDRESS: SevenBitAddress = 0x29;

/// I2C-based interface implementation for the CAP1188 driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface for the chip answering at `address`.
    pub const fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// Returns the 7-bit bus address of the chip.
    pub const fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Provides mutable access to the wrapped I2C device.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I2C device.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Cap1188Interface for I2cInterface<I2C>
where
    I2C: I2c<SevenBitAddress>,
{
    type Error = I2C::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.i2c.write_read(self.address, &[register], &mut value)?;
        Ok(value[0])
    }
}

#[cfg(test)]
mod tests {
    use super::I2cInterface;
    use crate::interface::Cap1188Interface;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x29;

    #[test]
    fn write_register_sends_register_then_value() {
        let expectations = [I2cTransaction::write(ADDR, vec![0x44, 0x5A])];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations), ADDR);

        interface.write_register(0x44, 0x5A).unwrap();
        interface.release().done();
    }

    #[test]
    fn read_register_uses_repeated_start() {
        let expectations = [I2cTransaction::write_read(ADDR, vec![0xFD], vec![0x50])];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations), ADDR);

        assert_eq!(interface.read_register(0xFD).unwrap(), 0x50);
        interface.release().done();
    }

    #[test]
    fn bus_errors_are_returned_unchanged() {
        let expectations =
            [I2cTransaction::write_read(ADDR, vec![0x03], vec![0x00]).with_error(ErrorKind::Other)];
        let mut interface = I2cInterface::new(I2cMock::new(&expectations), ADDR);

        assert_eq!(interface.read_register(0x03), Err(ErrorKind::Other));
        interface.release().done();
    }

    #[test]
    fn reports_configured_address() {
        let expectations: [I2cTransaction; 0] = [];
        let interface = I2cInterface::new(I2cMock::new(&expectations), 0x2B);

        assert_eq!(interface.address(), 0x2B);
        interface.release().done();
    }
}
