//! Driver for the Microchip CAP1188 8-pad capacitive touch controller, plus
//! the pipeline that turns a touch interrupt on a chain of chips into
//! actions such as notes played on a synthesizer.
//!
//! Data flows interrupt -> [`Dispatcher`] -> [`ChipArray`] ->
//! [`Cap1188::poll_touches`] -> [`ActionMapper`].
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod action;
pub mod array;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod identity;
pub mod interface;
pub mod params;
pub mod registers;

pub use crate::action::{ActionMapper, ActionSink, ActionTable};
pub use crate::array::{ChipArray, GlobalTouchSet};
pub use crate::device::{Cap1188, TouchReport};
pub use crate::dispatch::{DispatchState, Dispatcher};
pub use crate::error::{Error, Result};
