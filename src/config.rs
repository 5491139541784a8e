//! Startup configuration primitives for the CAP1188 driver.
//!
//! Everything here must be applied before the interrupt callback is
//! installed, since it changes what counts as a reportable touch and how
//! releases are signalled.

use crate::params::SensorGain;
use crate::registers::Config2;

/// Standby configuration used by the reference two-chip setup (faster cycle).
pub const FAST_STANDBY_CONFIG: u8 = 0x30;

/// User-facing startup configuration for one CAP1188.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Allow more than one pad to report a touch at the same time.
    pub multitouch: bool,
    /// Drive each pad's LED from its touch state.
    pub leds_linked: bool,
    /// `CONFIG_2` flags.
    pub cfg2: Config2,
    /// Per-pad repeat-rate enable mask.
    pub repeat_enable_mask: u8,
    /// Raw `STANDBY_CONFIG` value.
    pub standby_config: u8,
    /// Sensor gain programmed into `MAIN_CONTROL`.
    pub sensor_gain: SensorGain,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Enables or disables multitouch reporting.
    pub fn multitouch(mut self, enabled: bool) -> Self {
        self.config.multitouch = enabled;
        self
    }

    /// Links or unlinks the pad LEDs.
    pub fn leds_linked(mut self, linked: bool) -> Self {
        self.config.leds_linked = linked;
        self
    }

    /// Overrides the `CONFIG_2` flags.
    pub fn cfg2(mut self, cfg2: Config2) -> Self {
        self.config.cfg2 = cfg2;
        self
    }

    /// Sets the repeat-rate enable mask.
    pub fn repeat_enable_mask(mut self, mask: u8) -> Self {
        self.config.repeat_enable_mask = mask;
        self
    }

    /// Sets the raw standby configuration.
    pub fn standby_config(mut self, value: u8) -> Self {
        self.config.standby_config = value;
        self
    }

    /// Sets the sensor gain.
    pub fn sensor_gain(mut self, gain: SensorGain) -> Self {
        self.config.sensor_gain = gain;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            multitouch: true,
            leds_linked: true,
            cfg2: Config2::new().with_alt_pol(true),
            repeat_enable_mask: 0xFF,
            standby_config: FAST_STANDBY_CONFIG,
            sensor_gain: SensorGain::X1,
        }
    }
}
