//! Ordered collection of chained chips sharing one global pad index space.

use heapless::Vec;

use crate::device::Cap1188;
use crate::error::Result;
use crate::interface::Cap1188Interface;
use crate::registers::PADS_PER_CHIP;

/// Maximum number of chips held by a [`ChipArray`].
pub const MAX_CHIPS: usize = 8;
/// Maximum number of global indices a single polling cycle can yield.
pub const MAX_GLOBAL_TOUCHES: usize = MAX_CHIPS * PADS_PER_CHIP as usize;

/// Global pad indices touched during one polling cycle.
///
/// Ordered by chip position first, then by ascending pad within a chip.
pub type GlobalTouchSet = Vec<u16, MAX_GLOBAL_TOUCHES>;

/// Validation errors generated while building a [`ChipArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// More than [`MAX_CHIPS`] chips were supplied.
    TooManyChips,
    /// `offset + 7` does not fit the global index type.
    OffsetOutOfRange {
        /// Position of the offending chip.
        chip: usize,
    },
    /// Two chips claim overlapping global index ranges.
    OverlappingOffsets {
        /// Position of the earlier chip.
        first: usize,
        /// Position of the later chip.
        second: usize,
    },
}

/// Chips polled together, each contributing `[offset, offset + 7]`.
pub struct ChipArray<IFACE> {
    chips: Vec<Cap1188<IFACE>, MAX_CHIPS>,
}

impl<IFACE> ChipArray<IFACE> {
    /// Builds the array, rejecting offset ranges that would collide.
    pub fn new<I>(chips: I) -> core::result::Result<Self, ConfigError>
    where
        I: IntoIterator<Item = Cap1188<IFACE>>,
    {
        let mut collected = Vec::new();
        for chip in chips {
            if collected.push(chip).is_err() {
                return Err(ConfigError::TooManyChips);
            }
        }

        validate_offsets(collected.iter().map(Cap1188::touch_offset))?;
        Ok(Self { chips: collected })
    }

    /// Number of chips in the array.
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// Returns `true` when the array holds no chip.
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// Chips in polling order.
    pub fn chips(&self) -> &[Cap1188<IFACE>] {
        &self.chips
    }

    /// Mutable access to the chips, e.g. for calibration or diagnostics.
    pub fn chips_mut(&mut self) -> &mut [Cap1188<IFACE>] {
        &mut self.chips
    }

    /// Consumes the array and returns the chips in polling order.
    pub fn release(self) -> Vec<Cap1188<IFACE>, MAX_CHIPS> {
        self.chips
    }
}

impl<IFACE, CommE> ChipArray<IFACE>
where
    IFACE: Cap1188Interface<Error = CommE>,
{
    /// Polls every chip in order and returns the offset-shifted touches.
    ///
    /// Stops at the first transport failure; chips polled before it have
    /// already had their interrupt cleared.
    pub fn poll_all_touches(&mut self) -> Result<GlobalTouchSet, CommE> {
        let mut touches = GlobalTouchSet::new();
        for chip in self.chips.iter_mut() {
            let offset = chip.touch_offset();
            let report = chip.poll_touches()?;
            // Capacity covers MAX_CHIPS full reports.
            touches.extend(report.iter().map(|pad| offset + u16::from(pad)));
        }

        Ok(touches)
    }
}

fn validate_offsets<I>(offsets: I) -> core::result::Result<(), ConfigError>
where
    I: Iterator<Item = u16> + Clone,
{
    let span = u16::from(PADS_PER_CHIP) - 1;

    for (chip, offset) in offsets.clone().enumerate() {
        if offset.checked_add(span).is_none() {
            return Err(ConfigError::OffsetOutOfRange { chip });
        }
    }

    for (first, a) in offsets.clone().enumerate() {
        for (second, b) in offsets.clone().enumerate().skip(first + 1) {
            if a <= b + span && b <= a + span {
                return Err(ConfigError::OverlappingOffsets { first, second });
            }
        }
    }

    Ok(())
}
