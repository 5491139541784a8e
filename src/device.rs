//! High-level CAP1188 device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::{self, Identity, Summary};
use crate::interface::Cap1188Interface;
use crate::interface::i2c::I2cInterface;
use crate::params::SensorGain;
use crate::registers::{
    ALL_PADS,
    LED_LINK_ALL,
    LED_LINK_NONE,
    MAIN_GAIN_MASK,
    MAIN_GAIN_SHIFT,
    MAIN_INT,
    MULT_BLK_EN,
    MainControl,
    PADS_PER_CHIP,
    REG_CALIBRATION_ACTIVATE,
    REG_CONFIG_2,
    REG_LED_LINKING,
    REG_MAIN,
    REG_MANUFACTURER_ID,
    REG_MULTIPLE_TOUCH_CONFIG,
    REG_PRODUCT_ID,
    REG_REPEAT_RATE_ENABLE,
    REG_REVISION,
    REG_SENSOR_INPUT_STATUS,
    REG_STANDBY_CONFIG,
    Register,
    RegisterAccess,
    access_of,
};
use embedded_hal::i2c::{I2c, SevenBitAddress};

/// Pads currently asserted on one chip, as read from `SENSOR_INPUT_STATUS`.
///
/// Iterates local pad indices (`0..=7`) in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchReport {
    status: u8,
}

impl TouchReport {
    /// Wraps a raw `SENSOR_INPUT_STATUS` value.
    pub const fn from_status(status: u8) -> Self {
        Self { status }
    }

    /// Returns the raw status byte, one bit per pad.
    pub const fn status(self) -> u8 {
        self.status
    }

    /// Returns `true` when no pad is touched.
    pub const fn is_empty(self) -> bool {
        self.status == 0
    }

    /// Number of touched pads.
    pub const fn len(self) -> usize {
        self.status.count_ones() as usize
    }

    /// Returns `true` when `pad` is touched.
    pub const fn contains(self, pad: u8) -> bool {
        pad < PADS_PER_CHIP && self.status & (1 << pad) != 0
    }

    /// Iterates touched pad indices in ascending order.
    pub const fn iter(self) -> Pads {
        Pads {
            remaining: self.status,
        }
    }
}

impl IntoIterator for TouchReport {
    type Item = u8;
    type IntoIter = Pads;

    fn into_iter(self) -> Pads {
        self.iter()
    }
}

/// Ascending iterator over the pads of a [`TouchReport`].
#[derive(Debug, Clone)]
pub struct Pads {
    remaining: u8,
}

impl Iterator for Pads {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }

        let pad = self.remaining.trailing_zeros() as u8;
        self.remaining &= self.remaining - 1;
        Some(pad)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.remaining.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for Pads {}

/// High-level synchronous driver for one CAP1188 chip.
///
/// The driver owns a bus endpoint and the chip's global `touch_offset`.
/// It performs no locking; when several chips share a bus the endpoint must
/// serialize access (see [`I2cInterface`]).
pub struct Cap1188<IFACE> {
    interface: IFACE,
    touch_offset: u16,
}

impl<IFACE> Cap1188<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub const fn new(interface: IFACE, touch_offset: u16) -> Self {
        Self {
            interface,
            touch_offset,
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Offset added to local pad indices to form global indices.
    pub const fn touch_offset(&self) -> u16 {
        self.touch_offset
    }
}

impl<I2C> Cap1188<I2cInterface<I2C>>
where
    I2C: I2c<SevenBitAddress>,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I2C transports.
    pub const fn new_i2c(i2c: I2C, address: SevenBitAddress, touch_offset: u16) -> Self {
        Self::new(I2cInterface::new(i2c, address), touch_offset)
    }

    /// Releases the driver, returning the I2C device.
    pub fn release_i2c(self) -> I2C {
        self.release().release()
    }
}

impl<IFACE, CommE> Cap1188<IFACE>
where
    IFACE: Cap1188Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Global Configuration ==========================
    // ==================================================================
    /// Verifies the chip identity and applies the startup configuration.
    pub fn init(&mut self, config: &Config) -> Result<(), CommE> {
        self.check_ids()?;
        self.configure(config)
    }

    /// Applies a startup configuration without touching identity registers.
    pub fn configure(&mut self, config: &Config) -> Result<(), CommE> {
        self.set_multitouch_enabled(config.multitouch)?;
        self.set_leds_linked(config.leds_linked)?;
        self.set_standby_config(config.standby_config)?;
        self.set_cfg2(config.cfg2.into())?;
        self.set_repeat_enable_mask(config.repeat_enable_mask)?;
        self.set_sensor_gain(config.sensor_gain)?;

        debug!(
            "cap1188: configured offset={=u16} multitouch={=bool} leds_linked={=bool}",
            self.touch_offset,
            config.multitouch,
            config.leds_linked
        );
        Ok(())
    }

    /// Enables or disables multitouch.
    ///
    /// Enabled means the blocking register is all zero. Disabling sets
    /// `MULT_BLK_EN` so that only one simultaneous touch is reported.
    pub fn set_multitouch_enabled(&mut self, enabled: bool) -> Result<(), CommE> {
        let value = if enabled { 0x00 } else { MULT_BLK_EN };
        self.write_register(REG_MULTIPLE_TOUCH_CONFIG, value)
    }

    /// Returns `true` when the multiple-touch blocking register reads zero.
    pub fn is_multitouch_enabled(&mut self) -> Result<bool, CommE> {
        Ok(self.read_register(REG_MULTIPLE_TOUCH_CONFIG)? == 0)
    }

    /// Links (`0xFF`) or unlinks (`0x00`) every pad LED.
    pub fn set_leds_linked(&mut self, linked: bool) -> Result<(), CommE> {
        let value = if linked { LED_LINK_ALL } else { LED_LINK_NONE };
        self.write_register(REG_LED_LINKING, value)
    }

    /// Returns `true` only when every pad LED is linked.
    pub fn are_leds_linked(&mut self) -> Result<bool, CommE> {
        Ok(self.read_register(REG_LED_LINKING)? == LED_LINK_ALL)
    }

    /// Writes the per-pad repeat-rate enable mask.
    pub fn set_repeat_enable_mask(&mut self, mask: u8) -> Result<(), CommE> {
        self.write_register(REG_REPEAT_RATE_ENABLE, mask)
    }

    /// Reads the per-pad repeat-rate enable mask.
    pub fn repeat_enable_mask(&mut self) -> Result<u8, CommE> {
        self.read_register(REG_REPEAT_RATE_ENABLE)
    }

    /// Writes the raw `CONFIG_2` register.
    ///
    /// Use [`Config2`](crate::registers::Config2) to build the value by field.
    pub fn set_cfg2(&mut self, value: u8) -> Result<(), CommE> {
        self.write_register(REG_CONFIG_2, value)
    }

    /// Reads the raw `CONFIG_2` register.
    pub fn cfg2(&mut self) -> Result<u8, CommE> {
        self.read_register(REG_CONFIG_2)
    }

    /// Writes the raw `STANDBY_CONFIG` register.
    pub fn set_standby_config(&mut self, value: u8) -> Result<(), CommE> {
        self.write_register(REG_STANDBY_CONFIG, value)
    }

    /// Reads the raw `STANDBY_CONFIG` register.
    pub fn standby_config(&mut self) -> Result<u8, CommE> {
        self.read_register(REG_STANDBY_CONFIG)
    }

    /// Returns a typed snapshot of `MAIN_CONTROL`.
    pub fn main_control(&mut self) -> Result<MainControl, CommE> {
        self.read_typed::<MainControl>()
    }

    /// Reads the sensor gain from `MAIN_CONTROL[7:6]`.
    pub fn sensor_gain(&mut self) -> Result<SensorGain, CommE> {
        let main = self.read_register(REG_MAIN)?;
        Ok(SensorGain::from_bits(main >> MAIN_GAIN_SHIFT))
    }

    /// Updates the sensor gain, preserving every other `MAIN_CONTROL` bit.
    pub fn set_sensor_gain(&mut self, gain: SensorGain) -> Result<(), CommE> {
        self.modify_register(REG_MAIN, |main| {
            (main & !MAIN_GAIN_MASK) | (gain.bits() << MAIN_GAIN_SHIFT)
        })
    }

    // ==================================================================
    // == Calibration & Interrupts ======================================
    // ==================================================================
    /// Starts calibration of the pads set in `pad_mask`.
    ///
    /// Returns immediately. Readings for the selected pads are not reliable
    /// until [`CALIBRATION_TIME_MS`](crate::registers::CALIBRATION_TIME_MS)
    /// have elapsed.
    pub fn trigger_calibration(&mut self, pad_mask: u8) -> Result<(), CommE> {
        trace!("cap1188: calibrating pads {=u8:#b}", pad_mask);
        self.write_register(REG_CALIBRATION_ACTIVATE, pad_mask)
    }

    /// Starts calibration of every pad.
    pub fn calibrate_all(&mut self) -> Result<(), CommE> {
        self.trigger_calibration(ALL_PADS)
    }

    /// Clears the interrupt latch, leaving every other `MAIN_CONTROL` bit as read.
    pub fn reset_interrupt(&mut self) -> Result<(), CommE> {
        self.modify_register(REG_MAIN, |main| main & !MAIN_INT)
    }

    // ==================================================================
    // == Touch Acquisition =============================================
    // ==================================================================
    /// Reads the touched pads and clears the interrupt latch if any is set.
    ///
    /// No register is written when nothing is touched.
    pub fn poll_touches(&mut self) -> Result<TouchReport, CommE> {
        let report = TouchReport::from_status(self.read_register(REG_SENSOR_INPUT_STATUS)?);

        if !report.is_empty() {
            trace!(
                "cap1188: offset={=u16} touched={=u8:#b}",
                self.touch_offset,
                report.status()
            );
            self.reset_interrupt()?;
        }

        Ok(report)
    }

    // ==================================================================
    // == Identification ================================================
    // ==================================================================
    /// Reads the `PRODUCT_ID` register.
    pub fn product_id(&mut self) -> Result<u8, CommE> {
        self.read_register(REG_PRODUCT_ID)
    }

    /// Reads the `MANUFACTURER_ID` register.
    pub fn manufacturer_id(&mut self) -> Result<u8, CommE> {
        self.read_register(REG_MANUFACTURER_ID)
    }

    /// Reads the `REVISION` register.
    pub fn revision(&mut self) -> Result<u8, CommE> {
        self.read_register(REG_REVISION)
    }

    /// Reads all identification registers.
    pub fn identify(&mut self) -> Result<Identity, CommE> {
        identity::read_identity(self)
    }

    /// Verifies the identification registers and returns the silicon revision.
    pub fn check_ids(&mut self) -> Result<u8, CommE> {
        identity::check_identity(self)
    }

    /// Collects identity and linkage settings for diagnostics.
    pub fn summary(&mut self) -> Result<Summary, CommE> {
        identity::read_summary(self)
    }

    // ==================================================================
    // == Raw Register Access ===========================================
    // ==================================================================
    /// Reads a value from a given register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        Ok(self.interface.read_register(register)?)
    }

    /// Writes a value to a given register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        if access_of(register) == RegisterAccess::ReadOnly {
            return Err(Error::WriteToReadOnly);
        }

        Ok(self.interface.write_register(register, value)?)
    }

    /// Read-modify-write of a given register.
    pub fn modify_register<F>(&mut self, register: u8, f: F) -> Result<(), CommE>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_register(register)?;
        self.write_register(register, f(value))
    }

    fn read_typed<R>(&mut self) -> Result<R, CommE>
    where
        R: Register<Raw = u8> + From<u8>,
    {
        Ok(R::from(self.read_register(R::ADDRESS)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::Config2;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x28;

    fn read(register: u8, value: u8) -> I2cTransaction {
        I2cTransaction::write_read(ADDR, vec![register], vec![value])
    }

    fn write(register: u8, value: u8) -> I2cTransaction {
        I2cTransaction::write(ADDR, vec![register, value])
    }

    fn driver(expectations: &[I2cTransaction]) -> Cap1188<I2cInterface<I2cMock>> {
        Cap1188::new_i2c(I2cMock::new(expectations), ADDR, 0)
    }

    #[test]
    fn report_iterates_pads_in_ascending_order() {
        let report = TouchReport::from_status(0b1000_0101);
        let pads: Vec<u8> = report.iter().collect();
        assert_eq!(pads, [0, 2, 7]);
        assert_eq!(report.len(), 3);
        assert!(report.contains(7));
        assert!(!report.contains(1));
        assert!(!report.contains(8));
        assert!(TouchReport::default().is_empty());
    }

    #[test]
    fn poll_touches_clears_interrupt_when_touched() {
        let mut dev = driver(&[
            read(REG_SENSOR_INPUT_STATUS, 0b0000_0101),
            read(REG_MAIN, 0b0000_0001),
            write(REG_MAIN, 0b0000_0000),
        ]);

        let report = dev.poll_touches().unwrap();
        assert_eq!(report.iter().collect::<Vec<_>>(), [0, 2]);
        dev.release_i2c().done();
    }

    #[test]
    fn poll_touches_writes_nothing_when_idle() {
        let mut dev = driver(&[read(REG_SENSOR_INPUT_STATUS, 0x00)]);

        assert!(dev.poll_touches().unwrap().is_empty());
        dev.release_i2c().done();
    }

    #[test]
    fn repeated_polls_report_the_same_pads() {
        let mut dev = driver(&[
            read(REG_SENSOR_INPUT_STATUS, 0b0001_0000),
            read(REG_MAIN, 0b0000_0001),
            write(REG_MAIN, 0b0000_0000),
            read(REG_SENSOR_INPUT_STATUS, 0b0001_0000),
            read(REG_MAIN, 0b0000_0000),
            write(REG_MAIN, 0b0000_0000),
            read(REG_SENSOR_INPUT_STATUS, 0x00),
        ]);

        let first = dev.poll_touches().unwrap();
        let second = dev.poll_touches().unwrap();
        assert_eq!(first, second);
        assert!(dev.poll_touches().unwrap().is_empty());
        dev.release_i2c().done();
    }

    #[test]
    fn reset_interrupt_preserves_other_main_bits() {
        let mut dev = driver(&[read(REG_MAIN, 0b0011_0001), write(REG_MAIN, 0b0011_0000)]);

        dev.reset_interrupt().unwrap();
        dev.release_i2c().done();
    }

    #[test]
    fn reset_interrupt_keeps_gain_and_reserved_bits() {
        let mut dev = driver(&[read(REG_MAIN, 0b1100_1111), write(REG_MAIN, 0b1100_1110)]);

        dev.reset_interrupt().unwrap();
        dev.release_i2c().done();
    }

    #[test]
    fn multitouch_uses_inverted_blocking_register() {
        let mut dev = driver(&[
            write(REG_MULTIPLE_TOUCH_CONFIG, 0x00),
            write(REG_MULTIPLE_TOUCH_CONFIG, MULT_BLK_EN),
            read(REG_MULTIPLE_TOUCH_CONFIG, 0x00),
            read(REG_MULTIPLE_TOUCH_CONFIG, 0x80),
        ]);

        dev.set_multitouch_enabled(true).unwrap();
        dev.set_multitouch_enabled(false).unwrap();
        assert!(dev.is_multitouch_enabled().unwrap());
        assert!(!dev.is_multitouch_enabled().unwrap());
        dev.release_i2c().done();
    }

    #[test]
    fn led_linkage_is_all_or_nothing() {
        let mut dev = driver(&[
            write(REG_LED_LINKING, 0xFF),
            write(REG_LED_LINKING, 0x00),
            read(REG_LED_LINKING, 0xFF),
            read(REG_LED_LINKING, 0x0F),
        ]);

        dev.set_leds_linked(true).unwrap();
        dev.set_leds_linked(false).unwrap();
        assert!(dev.are_leds_linked().unwrap());
        assert!(!dev.are_leds_linked().unwrap());
        dev.release_i2c().done();
    }

    #[test]
    fn repeat_mask_reads_back_unchanged() {
        let mut dev = driver(&[
            write(REG_REPEAT_RATE_ENABLE, 0b1011_0010),
            read(REG_REPEAT_RATE_ENABLE, 0b1011_0010),
        ]);

        dev.set_repeat_enable_mask(0b1011_0010).unwrap();
        assert_eq!(dev.repeat_enable_mask().unwrap(), 0b1011_0010);
        dev.release_i2c().done();
    }

    #[test]
    fn cfg2_and_standby_read_back_unchanged() {
        let mut dev = driver(&[
            write(REG_CONFIG_2, 0b1100_0101),
            read(REG_CONFIG_2, 0b1100_0101),
            write(REG_STANDBY_CONFIG, 0x30),
            read(REG_STANDBY_CONFIG, 0x30),
        ]);

        dev.set_cfg2(0b1100_0101).unwrap();
        assert_eq!(dev.cfg2().unwrap(), 0b1100_0101);
        dev.set_standby_config(0x30).unwrap();
        assert_eq!(dev.standby_config().unwrap(), 0x30);
        dev.release_i2c().done();
    }

    #[test]
    fn calibration_writes_pad_mask() {
        let mut dev = driver(&[
            write(REG_CALIBRATION_ACTIVATE, 0b0000_0011),
            write(REG_CALIBRATION_ACTIVATE, 0xFF),
        ]);

        dev.trigger_calibration(0b0000_0011).unwrap();
        dev.calibrate_all().unwrap();
        dev.release_i2c().done();
    }

    #[test]
    fn sensor_gain_is_read_modify_write() {
        let mut dev = driver(&[
            read(REG_MAIN, 0b0010_0001),
            write(REG_MAIN, 0b1010_0001),
            read(REG_MAIN, 0b1010_0001),
        ]);

        dev.set_sensor_gain(SensorGain::X4).unwrap();
        assert_eq!(dev.sensor_gain().unwrap(), SensorGain::X4);
        dev.release_i2c().done();
    }

    #[test]
    fn main_control_snapshot_decodes_fields() {
        let mut dev = driver(&[read(REG_MAIN, 0b0110_0000)]);

        let main = dev.main_control().unwrap();
        assert!(main.standby());
        assert!(!main.int());
        assert_eq!(main.gain(), SensorGain::X2);
        dev.release_i2c().done();
    }

    #[test]
    fn writes_to_read_only_registers_are_rejected() {
        let mut dev = driver(&[]);

        assert_eq!(
            dev.write_register(REG_SENSOR_INPUT_STATUS, 0x00),
            Err(Error::WriteToReadOnly)
        );
        dev.release_i2c().done();
    }

    #[test]
    fn transport_errors_propagate_without_retry() {
        let mut dev = driver(&[
            I2cTransaction::write_read(ADDR, vec![REG_SENSOR_INPUT_STATUS], vec![0x00])
                .with_error(ErrorKind::Other),
        ]);

        assert_eq!(dev.poll_touches(), Err(Error::Interface(ErrorKind::Other)));
        dev.release_i2c().done();
    }

    #[test]
    fn failed_interrupt_clear_is_reported() {
        let mut dev = driver(&[
            read(REG_SENSOR_INPUT_STATUS, 0b0000_0010),
            read(REG_MAIN, 0b0000_0001),
            I2cTransaction::write(ADDR, vec![REG_MAIN, 0x00]).with_error(ErrorKind::Other),
        ]);

        assert_eq!(dev.poll_touches(), Err(Error::Interface(ErrorKind::Other)));
        dev.release_i2c().done();
    }

    #[test]
    fn configure_programs_every_startup_register() {
        let config = Config::new()
            .cfg2(Config2::new().with_int_rel_n(true))
            .repeat_enable_mask(0x0F)
            .sensor_gain(SensorGain::X2)
            .build();
        let mut dev = driver(&[
            write(REG_MULTIPLE_TOUCH_CONFIG, 0x00),
            write(REG_LED_LINKING, 0xFF),
            write(REG_STANDBY_CONFIG, 0x30),
            write(REG_CONFIG_2, 0x01),
            write(REG_REPEAT_RATE_ENABLE, 0x0F),
            read(REG_MAIN, 0b0000_0000),
            write(REG_MAIN, 0b0100_0000),
        ]);

        dev.configure(&config).unwrap();
        dev.release_i2c().done();
    }

    #[test]
    fn offset_is_fixed_at_construction() {
        let expectations: [I2cTransaction; 0] = [];
        let dev = Cap1188::new_i2c(I2cMock::new(&expectations), 0x29, 8);
        assert_eq!(dev.touch_offset(), 8);
        dev.release_i2c().done();
    }
}
