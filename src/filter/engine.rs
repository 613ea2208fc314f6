//! Derives the filtered, sorted view of a collection.

use time::{OffsetDateTime, UtcOffset};

use crate::customer::{Customer, CustomerIndex};

use super::{FilterRecord, FilterState};

/// A record that passed the filters, joined with its customer.
#[derive(Debug, PartialEq)]
pub struct FilteredRow<'a, R> {
    pub record: &'a R,
    /// `None` when no customer has the record's e-mail.
    pub customer: Option<&'a Customer>,
    pub timestamp: Option<OffsetDateTime>,
}

// Manual impls so that `R` does not need to be `Clone`/`Copy`.
impl<R> Clone for FilteredRow<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FilteredRow<'_, R> {}

/// Filter `records` by `state` and sort the result, most recent first.
///
/// * The query matches case-insensitively against the customer name,
///   customer id, e-mail and record id. An empty query matches everything.
/// * The status filter applies only while its chip is on and a specific
///   status is selected.
/// * The date filter applies only while its chip is on and a date is
///   selected. A record matches when its timestamp, seen from
///   `local_offset`, falls on the selected day. Records without a parseable
///   timestamp never match a date filter.
///
/// Records without a parseable timestamp sort last, and ties keep the input
/// order.
pub fn apply_filter<'a, R: FilterRecord>(
    records: &'a [R],
    customers: &CustomerIndex<'a>,
    state: &FilterState<R::Status>,
    local_offset: UtcOffset,
) -> Vec<FilteredRow<'a, R>> {
    let needle = state.query().trim().to_lowercase();
    let status = state.active_status();
    let date = state.active_date();

    let mut rows = records
        .iter()
        .map(|record| FilteredRow {
            record,
            customer: customers.get(record.email()),
            timestamp: record.effective_timestamp(),
        })
        .filter(|row| matches_query(row, &needle))
        .filter(|row| status.is_none_or(|status| row.record.status() == status))
        .filter(|row| {
            date.is_none_or(|date| {
                row.timestamp
                    .and_then(|timestamp| timestamp.checked_to_offset(local_offset))
                    .is_some_and(|timestamp| timestamp.date() == date)
            })
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    rows
}

fn matches_query<R: FilterRecord>(row: &FilteredRow<'_, R>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

    row.customer
        .is_some_and(|customer| contains(&customer.name) || contains(&customer.id))
        || contains(row.record.email())
        || contains(row.record.record_id())
}
