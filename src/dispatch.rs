//! Interrupt-driven touch dispatch.
//!
//! The platform's interrupt handler calls [`Dispatcher::on_interrupt`] once
//! per edge. A call polls every chip, then fires the mapped action of each
//! touched global index in [`GlobalTouchSet`](crate::array::GlobalTouchSet)
//! order. Nothing is queued between calls.

use crate::action::{ActionMapper, UnmappedIndex};
use crate::array::ChipArray;
use crate::error::{Error, Result};
use crate::interface::Cap1188Interface;

/// Dispatcher lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchState {
    /// Waiting for the next interrupt.
    Idle,
    /// Servicing one interrupt occurrence.
    Dispatching,
}

/// Glue between the interrupt source, the chip array and the action mapper.
pub struct Dispatcher<IFACE, M> {
    chips: ChipArray<IFACE>,
    mapper: M,
    state: DispatchState,
}

impl<IFACE, M> Dispatcher<IFACE, M> {
    /// Creates an idle dispatcher.
    pub fn new(chips: ChipArray<IFACE>, mapper: M) -> Self {
        Self {
            chips,
            mapper,
            state: DispatchState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Mutable access to the chip array, e.g. for recalibration between interrupts.
    pub fn chips_mut(&mut self) -> &mut ChipArray<IFACE> {
        &mut self.chips
    }

    /// Mutable access to the action mapper.
    pub fn mapper_mut(&mut self) -> &mut M {
        &mut self.mapper
    }

    /// Consumes the dispatcher and returns its parts.
    pub fn release(self) -> (ChipArray<IFACE>, M) {
        (self.chips, self.mapper)
    }
}

impl<IFACE, M, CommE> Dispatcher<IFACE, M>
where
    IFACE: Cap1188Interface<Error = CommE>,
    M: ActionMapper,
{
    /// Services one interrupt and returns the number of actions fired.
    ///
    /// A transport failure aborts the cycle before any action is fired. An
    /// index missing from the mapper aborts the remaining actions; every
    /// touched chip has had its interrupt cleared by then.
    pub fn on_interrupt(&mut self) -> Result<usize, CommE> {
        self.state = DispatchState::Dispatching;
        let outcome = self.dispatch();
        self.state = DispatchState::Idle;
        outcome
    }

    fn dispatch(&mut self) -> Result<usize, CommE> {
        let touches = match self.chips.poll_all_touches() {
            Ok(touches) => touches,
            Err(err) => {
                error!("cap1188: bus failure while polling, dispatch aborted");
                return Err(err);
            }
        };

        for &index in touches.iter() {
            if let Err(UnmappedIndex(index)) = self.mapper.fire(index) {
                error!("cap1188: pad index {=u16} has no action, check chip offsets", index);
                return Err(Error::UnmappedIndex(index));
            }
        }

        if !touches.is_empty() {
            debug!("cap1188: dispatched {=[?]}", touches.as_slice());
        }
        Ok(touches.len())
    }
}
