//! Filtering and searching over the in-memory record collections.
//!
//! Each tab of the transactions page owns a [FilterState]. The filtered view
//! is always recomputed from the full collection by [apply_filter], which
//! never mutates its inputs.

mod engine;
mod session;
mod state;

pub use engine::{FilteredRow, apply_filter};
pub use session::FilterSession;
pub use state::{FilterKind, FilterState};

use time::OffsetDateTime;

/// A closed set of statuses a record can be filtered by.
pub trait RecordStatus: Copy + Eq + 'static {
    /// Every status, in display order.
    fn all() -> &'static [Self];

    /// The value used in storage and in form fields.
    fn as_str(self) -> &'static str;

    /// The human readable name.
    fn label(self) -> &'static str {
        self.as_str()
    }

    /// Parse a form value, ignoring case.
    fn parse(text: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(text.trim()))
    }
}

/// A record that can be searched, filtered by status and date, and sorted.
pub trait FilterRecord {
    type Status: RecordStatus;

    fn record_id(&self) -> &str;

    /// The e-mail used to join the record to a customer.
    fn email(&self) -> &str;

    fn status(&self) -> Self::Status;

    /// The timestamp the record is sorted and date-filtered by.
    fn effective_timestamp(&self) -> Option<OffsetDateTime>;
}
