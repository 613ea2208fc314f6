//! Turns the filtered view of a tab into the rows and columns of an export.

use time::{OffsetDateTime, UtcOffset};

use crate::{
    collection::Collection,
    customer::CustomerIndex,
    filter::{FilterSession, FilteredRow, RecordStatus, apply_filter},
    payment::Payment,
    seed::Collections,
    transfer::Transfer,
};

const PAYMENT_HEADERS: &[&str] = &[
    "ID",
    "Fecha",
    "Cliente",
    "ID cliente",
    "Correo",
    "Monto",
    "Moneda",
    "Estado",
    "Método",
    "Referencia",
    "Origen",
];

const TRANSFER_HEADERS: &[&str] = &[
    "ID",
    "Fecha",
    "Correo",
    "Monto",
    "Monto bruto",
    "Monto neto",
    "Moneda",
    "Estado",
    "Destino",
    "Motivo del fallo",
];

/// One exported row and the timestamp used to bound it by date.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub timestamp: Option<OffsetDateTime>,
    pub cells: Vec<String>,
}

/// The column headers and rows of an export, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub headers: &'static [&'static str],
    pub rows: Vec<ExportRow>,
}

impl ExportTable {
    /// Build the table from what the `kind` tab currently shows, i.e. after
    /// its search text and filters are applied.
    pub fn from_view(
        kind: Collection,
        collections: &Collections,
        filters: &FilterSession,
        local_offset: UtcOffset,
    ) -> Self {
        let customers = CustomerIndex::new(&collections.customers);

        match kind {
            Collection::Payments => Self::from_payments(&apply_filter(
                &collections.payments,
                &customers,
                &filters.payments,
                local_offset,
            )),
            Collection::TransferCharges => Self::from_payments(&apply_filter(
                &collections.transfer_charges,
                &customers,
                &filters.transfer_charges,
                local_offset,
            )),
            Collection::Transfers => Self::from_transfers(&apply_filter(
                &collections.transfers,
                &customers,
                &filters.transfers,
                local_offset,
            )),
        }
    }

    /// Build the table for payments or transfer charges.
    pub fn from_payments(rows: &[FilteredRow<'_, Payment>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                let payment = row.record;
                let (customer_name, customer_id) = row
                    .customer
                    .map(|customer| (customer.name.clone(), customer.id.clone()))
                    .unwrap_or_default();

                ExportRow {
                    timestamp: row.timestamp,
                    cells: vec![
                        payment.id.clone(),
                        payment.created_at.clone(),
                        customer_name,
                        customer_id,
                        payment.email.clone(),
                        format_amount(payment.amount),
                        payment.currency.clone(),
                        payment.status.label().to_owned(),
                        payment.method.clone(),
                        payment.reference.clone(),
                        payment.origin.clone(),
                    ],
                }
            })
            .collect();

        Self {
            headers: PAYMENT_HEADERS,
            rows,
        }
    }

    pub fn from_transfers(rows: &[FilteredRow<'_, Transfer>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                let transfer = row.record;
                let details = &transfer.details;
                let date = details
                    .created_at
                    .as_ref()
                    .or(details.date.as_ref())
                    .or(details.executed_at.as_ref())
                    .cloned()
                    .unwrap_or_default();

                ExportRow {
                    timestamp: row.timestamp,
                    cells: vec![
                        transfer.id.clone(),
                        date,
                        transfer.email.clone(),
                        format_amount(details.amount),
                        details.gross_amount.map(format_amount).unwrap_or_default(),
                        details.net_amount.map(format_amount).unwrap_or_default(),
                        details.currency.clone(),
                        details.status.label().to_owned(),
                        details.destination.clone(),
                        details.failure_reason.clone().unwrap_or_default(),
                    ],
                }
            })
            .collect();

        Self {
            headers: TRANSFER_HEADERS,
            rows,
        }
    }
}

/// Exported amounts always have exactly two decimals and no separators.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}
