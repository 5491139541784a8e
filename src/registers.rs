//! Register map definitions for the CAP1188 capacitive touch controller.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::SensorGain;

/// Register address of `MAIN_CONTROL`.
pub const REG_MAIN: u8 = 0x00;
/// Register address of `SENSOR_INPUT_STATUS`.
pub const REG_SENSOR_INPUT_STATUS: u8 = 0x03;
/// Register address of `CALIBRATION_ACTIVATE`.
pub const REG_CALIBRATION_ACTIVATE: u8 = 0x26;
/// Register address of `REPEAT_RATE_ENABLE`.
pub const REG_REPEAT_RATE_ENABLE: u8 = 0x28;
/// Register address of `MULTIPLE_TOUCH_CONFIG`.
pub const REG_MULTIPLE_TOUCH_CONFIG: u8 = 0x2A;
/// Register address of `STANDBY_CONFIG`.
pub const REG_STANDBY_CONFIG: u8 = 0x41;
/// Register address of `CONFIG_2`.
pub const REG_CONFIG_2: u8 = 0x44;
/// Register address of `SENSOR_INPUT_LED_LINKING`.
pub const REG_LED_LINKING: u8 = 0x72;
/// Register address of `LED_POLARITY`.
pub const REG_LED_POLARITY: u8 = 0x73;
/// Register address of `PRODUCT_ID`.
pub const REG_PRODUCT_ID: u8 = 0xFD;
/// Register address of `MANUFACTURER_ID`.
pub const REG_MANUFACTURER_ID: u8 = 0xFE;
/// Register address of `REVISION`.
pub const REG_REVISION: u8 = 0xFF;

/// `MAIN_CONTROL[0]` interrupt asserted flag.
pub const MAIN_INT: u8 = 0x01 << 0;
/// `MAIN_CONTROL[4]` deep sleep flag.
pub const MAIN_DSLEEP: u8 = 0x01 << 4;
/// `MAIN_CONTROL[5]` standby flag.
pub const MAIN_STBY: u8 = 0x01 << 5;
/// `MAIN_CONTROL[7:6]` sensor gain field mask.
pub const MAIN_GAIN_MASK: u8 = 0b11 << MAIN_GAIN_SHIFT;
/// `MAIN_CONTROL[7:6]` sensor gain field shift.
pub const MAIN_GAIN_SHIFT: u8 = 6;

/// `MULTIPLE_TOUCH_CONFIG[7]` enables blocking of simultaneous touches.
pub const MULT_BLK_EN: u8 = 0x01 << 7;

/// `SENSOR_INPUT_LED_LINKING` value linking every LED to its pad.
pub const LED_LINK_ALL: u8 = 0xFF;
/// `SENSOR_INPUT_LED_LINKING` value unlinking every LED.
pub const LED_LINK_NONE: u8 = 0x00;

/// Pad CS1 bit in any per-pad mask register.
pub const PAD_1: u8 = 0x01 << 0;
/// Pad CS2 bit in any per-pad mask register.
pub const PAD_2: u8 = 0x01 << 1;
/// Pad CS3 bit in any per-pad mask register.
pub const PAD_3: u8 = 0x01 << 2;
/// Pad CS4 bit in any per-pad mask register.
pub const PAD_4: u8 = 0x01 << 3;
/// Pad CS5 bit in any per-pad mask register.
pub const PAD_5: u8 = 0x01 << 4;
/// Pad CS6 bit in any per-pad mask register.
pub const PAD_6: u8 = 0x01 << 5;
/// Pad CS7 bit in any per-pad mask register.
pub const PAD_7: u8 = 0x01 << 6;
/// Pad CS8 bit in any per-pad mask register.
pub const PAD_8: u8 = 0x01 << 7;
/// Every pad of the chip.
pub const ALL_PADS: u8 = 0xFF;

/// Number of sense pads handled by one chip.
pub const PADS_PER_CHIP: u8 = 8;

/// Time the chip needs after `CALIBRATION_ACTIVATE` before baselines are valid.
pub const CALIBRATION_TIME_MS: u32 = 600;

/// Expected `PRODUCT_ID` contents.
pub const EXPECTED_PRODUCT_ID: u8 = 0x50;
/// Expected `MANUFACTURER_ID` contents (Microchip / SMSC).
pub const EXPECTED_MANUFACTURER_ID: u8 = 0x5D;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `MAIN_CONTROL` register (address `0x00`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainControl {
    // Interrupt asserted latch (bit 0).
    pub int: bool,
    #[skip]
    __: B3,
    // Deep sleep enable (bit 4).
    pub deep_sleep: bool,
    // Standby enable (bit 5).
    pub standby: bool,
    // Sensor gain selection (bits 7:6).
    pub gain: SensorGain,
}

impl From<u8> for MainControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<MainControl> for u8 {
    fn from(value: MainControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CONFIG_2` register (address `0x44`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config2 {
    // INT_REL_n: when set, no interrupt is generated on release (bit 0).
    pub int_rel_n: bool,
    #[skip]
    __: B1,
    // DIS_RF_NOISE: disables the RF noise filter (bit 2).
    pub dis_rf_noise: bool,
    // SHOW_RF_NOISE: report RF noise only, ignore EMI (bit 3).
    pub show_rf_noise: bool,
    // BLK_POL_MIR: do not mirror LED output per polarity (bit 4).
    pub blk_pol_mir: bool,
    // BLK_PWR_CTRL: never power down the sensing circuitry (bit 5).
    pub blk_pwr_ctrl: bool,
    // ALT_POL: ALERT# active low / open drain (bit 6).
    pub alt_pol: bool,
    // INV_LINK_TRAN: invert linked LED transition behaviour (bit 7).
    pub inv_link_tran: bool,
}

impl From<u8> for Config2 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Config2> for u8 {
    fn from(value: Config2) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for MainControl {
    type Raw = u8;
    const ADDRESS: u8 = REG_MAIN;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for Config2 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CONFIG_2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x40);
}

/// Returns the access class of an arbitrary register address.
pub const fn access_of(register: u8) -> RegisterAccess {
    match register {
        REG_SENSOR_INPUT_STATUS | REG_PRODUCT_ID | REG_MANUFACTURER_ID | REG_REVISION => {
            RegisterAccess::ReadOnly
        }
        _ => RegisterAccess::ReadWrite,
    }
}
