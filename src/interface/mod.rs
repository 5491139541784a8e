//! Bus interface abstraction for the CAP1188 driver.

pub mod i2c;

/// Abstraction over the low-level bus access required by the driver.
///
/// Every call is one complete bus transaction against the current register
/// contents; implementations must not cache or batch.
pub trait Cap1188Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;
}
