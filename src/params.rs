//! Strongly typed parameter enumerations for the CAP1188 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs.
//!
//! # Examples
//!
//! ```rust
//! use cap1188::params::SensorGain;
//!
//! let gain = SensorGain::X2;
//! assert_eq!(gain.multiplier(), 2);
//! ```

use modular_bitfield::prelude::Specifier;

/// Sensor gain selection encoded in `MAIN_CONTROL[7:6]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum SensorGain {
    /// Gain of 1 (reset default).
    X1 = 0b00,
    /// Gain of 2.
    X2 = 0b01,
    /// Gain of 4.
    X4 = 0b10,
    /// Gain of 8.
    X8 = 0b11,
}

impl SensorGain {
    /// Returns the raw two-bit field encoding.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns the gain multiplier.
    pub const fn multiplier(self) -> u8 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }

    /// Decodes the two-bit field encoding, ignoring higher bits.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::X1,
            0b01 => Self::X2,
            0b10 => Self::X4,
            _ => Self::X8,
        }
    }
}

impl Default for SensorGain {
    fn default() -> Self {
        Self::X1
    }
}
