//! Mapping from global pad indices to actions fired on an external sink.

/// A global pad index outside the action table.
///
/// This is the configuration error of the pipeline: it means chip offsets
/// and the table length disagree, and is surfaced as
/// [`Error::UnmappedIndex`](crate::Error::UnmappedIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnmappedIndex(pub u16);

/// Turns a global pad index into a side effect.
pub trait ActionMapper {
    /// Fires the action bound to `index`.
    fn fire(&mut self, index: u16) -> Result<(), UnmappedIndex>;
}

impl<F> ActionMapper for F
where
    F: FnMut(u16) -> Result<(), UnmappedIndex>,
{
    fn fire(&mut self, index: u16) -> Result<(), UnmappedIndex> {
        self(index)
    }
}

/// Consumer of mapped values, e.g. a synthesizer playing MIDI notes.
pub trait ActionSink<V> {
    /// Plays or otherwise handles `value`. The result is not inspected.
    fn fire(&mut self, value: V);
}

/// Fixed lookup table from global pad index to a value sent to a sink.
///
/// ```rust
/// use cap1188::action::{ActionMapper, ActionSink, ActionTable};
///
/// struct Synth;
/// impl ActionSink<u8> for Synth {
///     fn fire(&mut self, _note: u8) {}
/// }
///
/// let mut notes = ActionTable::new([60u8, 62, 64, 65], Synth);
/// assert!(notes.fire(2).is_ok());
/// assert!(notes.fire(4).is_err());
/// ```
pub struct ActionTable<V, S, const L: usize> {
    table: [V; L],
    sink: S,
}

/// Note table playing MIDI note numbers.
pub type NoteTable<S, const L: usize> = ActionTable<u8, S, L>;

impl<V, S, const L: usize> ActionTable<V, S, L>
where
    V: Copy,
    S: ActionSink<V>,
{
    /// Creates a table whose entry `i` is fired for global index `i`.
    pub const fn new(table: [V; L], sink: S) -> Self {
        Self { table, sink }
    }

    /// Returns the value bound to `index`, if any.
    pub fn lookup(&self, index: u16) -> Option<V> {
        self.table.get(usize::from(index)).copied()
    }

    /// Number of mapped indices.
    pub const fn len(&self) -> usize {
        L
    }

    /// Returns `true` when the table maps no index.
    pub const fn is_empty(&self) -> bool {
        L == 0
    }

    /// Provides mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the table and returns the sink.
    pub fn release(self) -> S {
        self.sink
    }
}

impl<V, S, const L: usize> ActionMapper for ActionTable<V, S, L>
where
    V: Copy,
    S: ActionSink<V>,
{
    fn fire(&mut self, index: u16) -> Result<(), UnmappedIndex> {
        let value = self.lookup(index).ok_or(UnmappedIndex(index))?;
        self.sink.fire(value);
        Ok(())
    }
}
