//! Error handling primitives for the CAP1188 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver and the dispatch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// The identification registers do not describe a CAP1188.
    DeviceIdMismatch,
    /// Attempted to write to a read-only register.
    WriteToReadOnly,
    /// A global pad index has no entry in the action table.
    ///
    /// Indicates that chip offsets and the table length disagree.
    UnmappedIndex(u16),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
