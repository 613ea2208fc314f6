//! The filter state of all three tabs.

use time::Date;

use crate::{
    collection::Collection, filter::RecordStatus, payment::PaymentStatus,
    transfer::TransferStatus,
};

use super::{FilterKind, FilterState};

/// The filter state of every tab on the transactions page.
///
/// Each tab keeps its own state, so switching tabs does not reset filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSession {
    pub payments: FilterState<PaymentStatus>,
    pub transfer_charges: FilterState<PaymentStatus>,
    pub transfers: FilterState<TransferStatus>,
}

impl FilterSession {
    pub fn set_query(&mut self, collection: Collection, query: &str) {
        match collection {
            Collection::Payments => self.payments.set_query(query),
            Collection::TransferCharges => self.transfer_charges.set_query(query),
            Collection::Transfers => self.transfers.set_query(query),
        }
    }

    pub fn toggle(&mut self, collection: Collection, kind: FilterKind) {
        match collection {
            Collection::Payments => self.payments.toggle(kind),
            Collection::TransferCharges => self.transfer_charges.toggle(kind),
            Collection::Transfers => self.transfers.toggle(kind),
        }
    }

    pub fn select_date(&mut self, collection: Collection, date: Option<Date>) {
        match collection {
            Collection::Payments => self.payments.select_date(date),
            Collection::TransferCharges => self.transfer_charges.select_date(date),
            Collection::Transfers => self.transfers.select_date(date),
        }
    }

    /// Select a status by its form value. `"all"`, an empty string and
    /// values that are not a status of the collection select every status.
    pub fn select_status(&mut self, collection: Collection, status: &str) {
        match collection {
            Collection::Payments => self.payments.select_status(parse_status(status)),
            Collection::TransferCharges => {
                self.transfer_charges.select_status(parse_status(status))
            }
            Collection::Transfers => self.transfers.select_status(parse_status(status)),
        }
    }
}

fn parse_status<S: RecordStatus>(text: &str) -> Option<S> {
    let status = S::parse(text);

    if status.is_none() && !text.trim().is_empty() && !text.trim().eq_ignore_ascii_case("all") {
        tracing::warn!("unknown status {text:?}, selecting all statuses");
    }

    status
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        collection::Collection, filter::FilterKind, payment::PaymentStatus,
        transfer::TransferStatus,
    };

    use super::FilterSession;

    #[test]
    fn tabs_keep_independent_state() {
        let mut session = FilterSession::default();

        session.set_query(Collection::Payments, "ana");
        session.toggle(Collection::Transfers, FilterKind::Status);
        session.select_status(Collection::Transfers, "pendiente");

        assert_eq!(session.payments.query(), "ana");
        assert_eq!(session.transfer_charges.query(), "");
        assert_eq!(
            session.transfers.active_status(),
            Some(TransferStatus::Pendiente)
        );
        assert_eq!(session.payments.active_status(), None);
    }

    #[test]
    fn select_status_all_clears_selection() {
        let mut session = FilterSession::default();
        session.toggle(Collection::TransferCharges, FilterKind::Status);
        session.select_status(Collection::TransferCharges, "Reembolsado");
        assert_eq!(
            session.transfer_charges.active_status(),
            Some(PaymentStatus::Reembolsado)
        );

        session.select_status(Collection::TransferCharges, "all");

        assert_eq!(session.transfer_charges.selected_status(), None);
    }

    #[test]
    fn select_date_routes_to_tab() {
        let mut session = FilterSession::default();
        session.toggle(Collection::Payments, FilterKind::Created);

        session.select_date(Collection::Payments, Some(date!(2026 - 01 - 18)));

        assert_eq!(session.payments.active_date(), Some(date!(2026 - 01 - 18)));
        assert_eq!(session.transfers.selected_date(), None);
    }
}
