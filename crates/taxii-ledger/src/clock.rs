use taxii_types::Timestamp;

/// Monotonic `date_added` generator for one collection.
///
/// `date_added` doubles as the pagination cursor axis, so successive stamps
/// within a collection must be strictly increasing even when writes land in
/// the same wall-clock nanosecond or the wall clock steps backwards. The
/// clock takes the wall time when it has advanced and otherwise bumps one
/// nanosecond past the last issued stamp: the hybrid-logical-clock rule
/// collapsed onto the timestamp's own sub-second axis, since `date_added`
/// must remain a plain RFC 3339 instant on the wire.
///
/// The clock carries no lock: it lives inside the collection state and is
/// only ticked under the collection's write guard.
#[derive(Debug, Default)]
pub struct AddedClock {
    /// Epoch nanoseconds of the last issued stamp.
    last_nanos: i64,
}

impl AddedClock {
    /// Create a clock that has issued nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next stamp, strictly greater than every prior one.
    pub fn tick(&mut self) -> Timestamp {
        let wall = Timestamp::now().as_nanos();
        let next = wall.max(self.last_nanos + 1);
        self.last_nanos = next;
        Timestamp::from_nanos(next)
    }
}
