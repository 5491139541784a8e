//! Identification and diagnostic summary helpers.

use crate::device::Cap1188;
use crate::error::{Error, Result};
use crate::interface::Cap1188Interface;
use crate::registers::{EXPECTED_MANUFACTURER_ID, EXPECTED_PRODUCT_ID};

/// Contents of the identification registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    /// `PRODUCT_ID` (`0xFD`).
    pub product_id: u8,
    /// `MANUFACTURER_ID` (`0xFE`).
    pub manufacturer_id: u8,
    /// `REVISION` (`0xFF`).
    pub revision: u8,
}

impl Identity {
    /// Returns `true` when product and manufacturer match a CAP1188.
    pub const fn is_cap1188(&self) -> bool {
        self.product_id == EXPECTED_PRODUCT_ID && self.manufacturer_id == EXPECTED_MANUFACTURER_ID
    }
}

/// Diagnostic snapshot of one chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Identification registers.
    pub identity: Identity,
    /// Multiple-touch blocking disabled.
    pub multitouch: bool,
    /// Every pad LED linked.
    pub leds_linked: bool,
    /// Global index offset of the chip.
    pub touch_offset: u16,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Summary {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "CAP1188 {{\n    mfg_id: {=u8:#x},\n    product_id: {=u8:#x},\n    revision: {=u8:#x},\n    multitouch: {},\n    leds_linked: {},\n    touch_offset: {}\n}}",
            self.identity.manufacturer_id,
            self.identity.product_id,
            self.identity.revision,
            self.multitouch,
            self.leds_linked,
            self.touch_offset
        );
    }
}

/// Reads all identification registers.
pub fn read_identity<IFACE, CommE>(device: &mut Cap1188<IFACE>) -> Result<Identity, CommE>
where
    IFACE: Cap1188Interface<Error = CommE>,
{
    Ok(Identity {
        product_id: device.product_id()?,
        manufacturer_id: device.manufacturer_id()?,
        revision: device.revision()?,
    })
}

/// Verifies the identity against the expected CAP1188 constants.
pub fn check_identity<IFACE, CommE>(device: &mut Cap1188<IFACE>) -> Result<u8, CommE>
where
    IFACE: Cap1188Interface<Error = CommE>,
{
    let identity = read_identity(device)?;
    if !identity.is_cap1188() {
        warn!(
            "cap1188: unexpected identity product={=u8:#x} manufacturer={=u8:#x}",
            identity.product_id,
            identity.manufacturer_id
        );
        return Err(Error::DeviceIdMismatch);
    }

    Ok(identity.revision)
}

/// Reads identity plus linkage settings.
pub fn read_summary<IFACE, CommE>(device: &mut Cap1188<IFACE>) -> Result<Summary, CommE>
where
    IFACE: Cap1188Interface<Error = CommE>,
{
    Ok(Summary {
        identity: read_identity(device)?,
        multitouch: device.is_multitouch_enabled()?,
        leds_linked: device.are_leds_linked()?,
        touch_offset: device.touch_offset(),
    })
}
