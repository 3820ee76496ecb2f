use taxii_types::{StixId, Timestamp};

use crate::cursor::Cursor;

/// One page of a paginated listing.
///
/// `next` is populated only when `more` is true. `date_added_first` and
/// `date_added_last` are the stamps of the items actually returned in this
/// page: the values the HTTP layer maps onto the
/// `X-TAXII-Date-Added-First` / `X-TAXII-Date-Added-Last` headers.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Items in `(date_added, id)` order.
    pub items: Vec<T>,
    /// Whether more content matches beyond this page.
    pub more: bool,
    /// Opaque token resuming after the last item, when `more` is true.
    pub next: Option<String>,
    /// `date_added` of the first returned item.
    pub date_added_first: Option<Timestamp>,
    /// `date_added` of the last returned item.
    pub date_added_last: Option<Timestamp>,
}

impl<T> Page<T> {
    /// An empty page with no continuation.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            more: false,
            next: None,
            date_added_first: None,
            date_added_last: None,
        }
    }

    /// Assemble a page from the ordered match stream.
    ///
    /// `matches` must already be cursor-filtered and sorted by
    /// `(date_added, id)`; the page takes the first `limit` entries and
    /// derives `more`, `next`, and the header stamps from what it took.
    pub fn assemble(matches: Vec<(Timestamp, StixId, T)>, limit: usize) -> Self {
        let more = matches.len() > limit;
        let mut taken = matches;
        taken.truncate(limit);

        let date_added_first = taken.first().map(|(added, _, _)| *added);
        let date_added_last = taken.last().map(|(added, _, _)| *added);
        let next = if more {
            taken
                .last()
                .map(|(added, id, _)| Cursor::at(*added, id.clone()).encode())
        } else {
            None
        };

        Self {
            items: taken.into_iter().map(|(_, _, item)| item).collect(),
            more,
            next,
            date_added_first,
            date_added_last,
        }
    }

    /// Number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
