use std::fmt;

use taxii_types::{StixId, Timestamp};

use crate::error::{FilterError, FilterResult};

/// Opaque pagination token marking a position in `(date_added, id)` order.
///
/// A cursor names the last item a previous page returned. Because
/// `date_added` is assigned strictly monotonically per collection, records
/// inserted after the cursor was issued always sort after it: resuming from
/// a cursor can never re-order or duplicate already-returned items, only
/// pick up new ones at the tail.
///
/// The wire form is hex over `nanos:id`, opaque to clients and echoed back
/// verbatim as the `next` query parameter.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    /// `date_added` of the last returned record.
    pub added: Timestamp,
    /// Object id of the last returned record (tie-break for equal stamps).
    pub id: StixId,
}

impl Cursor {
    /// Cursor pointing at the given record position.
    pub fn at(added: Timestamp, id: StixId) -> Self {
        Self { added, id }
    }

    /// Returns `true` if a record at `(added, id)` sorts strictly after
    /// this cursor.
    pub fn precedes(&self, added: Timestamp, id: &StixId) -> bool {
        (added, id) > (self.added, &self.id)
    }

    /// Encode to the opaque wire token.
    pub fn encode(&self) -> String {
        hex::encode(format!("{}:{}", self.added.as_nanos(), self.id))
    }

    /// Decode a wire token issued by [`Cursor::encode`].
    pub fn decode(token: &str) -> FilterResult<Self> {
        let raw = hex::decode(token).map_err(|_| FilterError::InvalidCursor)?;
        let text = String::from_utf8(raw).map_err(|_| FilterError::InvalidCursor)?;
        let (nanos, id) = text.split_once(':').ok_or(FilterError::InvalidCursor)?;
        let nanos: i64 = nanos.parse().map_err(|_| FilterError::InvalidCursor)?;
        let id = StixId::new(id).map_err(|_| FilterError::InvalidCursor)?;
        Ok(Self {
            added: Timestamp::from_nanos(nanos),
            id,
        })
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor({} @ {})", self.id, self.added)
    }
}
