//! Outbound transfers (payouts) and the one-time e-mail backfill applied to
//! legacy records when they are loaded from storage.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    filter::{FilterRecord, RecordStatus},
    timezone::parse_timestamp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Completada,
    Pendiente,
    Procesando,
    Fallida,
}

impl RecordStatus for TransferStatus {
    fn all() -> &'static [Self] {
        &[
            Self::Completada,
            Self::Pendiente,
            Self::Procesando,
            Self::Fallida,
        ]
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Completada => "completada",
            Self::Pendiente => "pendiente",
            Self::Procesando => "procesando",
            Self::Fallida => "fallida",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Completada => "Completada",
            Self::Pendiente => "Pendiente",
            Self::Procesando => "Procesando",
            Self::Fallida => "Fallida",
        }
    }
}

impl Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A transfer exactly as it may appear in storage.
///
/// Older records were written without an `email`; [normalize_transfers]
/// turns these into [Transfer]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTransfer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub details: TransferDetails,
}

/// The fields shared by stored and normalized transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDetails {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_amount: Option<f64>,
    pub currency: String,
    pub status: TransferStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<String>,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// A transfer that is guaranteed to have an e-mail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub email: String,
    #[serde(flatten)]
    pub details: TransferDetails,
}

impl Transfer {
    /// The timestamp shown and sorted on: the first parseable of
    /// `createdAt`, `date` and `executedAt`.
    pub fn effective_timestamp(&self) -> Option<OffsetDateTime> {
        let details = &self.details;

        [&details.created_at, &details.date, &details.executed_at]
            .into_iter()
            .flatten()
            .find_map(|text| parse_timestamp(text))
    }
}

impl FilterRecord for Transfer {
    type Status = TransferStatus;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn status(&self) -> TransferStatus {
        self.details.status
    }

    fn effective_timestamp(&self) -> Option<OffsetDateTime> {
        Transfer::effective_timestamp(self)
    }
}

/// E-mails for legacy transfers that were stored before transfers carried one.
const KNOWN_TRANSFER_EMAILS: &[(&str, &str)] = &[
    ("tr_1001", "pagos@ferreteriaelsol.com"),
    ("tr_1002", "contabilidad@cafelaplaza.com"),
    ("tr_1004", "maria.gomez@example.com"),
];

/// The result of [normalize_transfers].
#[derive(Debug, PartialEq)]
pub struct NormalizedTransfers {
    pub transfers: Vec<Transfer>,
    /// How many records had their e-mail backfilled.
    pub backfilled: usize,
}

/// Make sure every transfer has an e-mail.
///
/// Missing e-mails are taken from a fixed lookup table, or synthesized as
/// `user+<id>@example.com` when the id is unknown. Records that already
/// have an e-mail are passed through untouched, so normalizing an already
/// normalized array backfills nothing.
pub fn normalize_transfers(stored: Vec<StoredTransfer>) -> NormalizedTransfers {
    let mut backfilled = 0;

    let transfers = stored
        .into_iter()
        .map(|transfer| {
            let email = match transfer.email {
                Some(email) if !email.trim().is_empty() => email,
                _ => {
                    backfilled += 1;
                    backfill_email(&transfer.id)
                }
            };

            Transfer {
                id: transfer.id,
                email,
                details: transfer.details,
            }
        })
        .collect();

    NormalizedTransfers {
        transfers,
        backfilled,
    }
}

fn backfill_email(transfer_id: &str) -> String {
    KNOWN_TRANSFER_EMAILS
        .iter()
        .find(|(id, _)| *id == transfer_id)
        .map(|(_, email)| (*email).to_owned())
        .unwrap_or_else(|| format!("user+{transfer_id}@example.com"))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{
        StoredTransfer, Transfer, TransferDetails, TransferStatus, normalize_transfers,
    };

    fn details() -> TransferDetails {
        TransferDetails {
            amount: 100.0,
            gross_amount: Some(101.5),
            net_amount: Some(100.0),
            currency: "USD".to_owned(),
            status: TransferStatus::Completada,
            date: None,
            created_at: Some("2026-01-18T09:30:00-05:00".to_owned()),
            executed_at: None,
            failed_at: None,
            destination: "Banco Popular ****1234".to_owned(),
            failure_reason: None,
        }
    }

    fn stored(id: &str, email: Option<&str>) -> StoredTransfer {
        StoredTransfer {
            id: id.to_owned(),
            email: email.map(str::to_owned),
            details: details(),
        }
    }

    #[test]
    fn backfills_from_lookup_table() {
        let got = normalize_transfers(vec![stored("tr_1001", None)]);

        assert_eq!(got.backfilled, 1);
        assert_eq!(got.transfers[0].email, "pagos@ferreteriaelsol.com");
    }

    #[test]
    fn synthesizes_email_for_unknown_id() {
        let got = normalize_transfers(vec![stored("tr_9", None)]);

        assert_eq!(got.transfers[0].email, "user+tr_9@example.com");
    }

    #[test]
    fn blank_email_is_backfilled() {
        let got = normalize_transfers(vec![stored("tr_9", Some("  "))]);

        assert_eq!(got.backfilled, 1);
        assert_eq!(got.transfers[0].email, "user+tr_9@example.com");
    }

    #[test]
    fn existing_email_is_untouched() {
        let got = normalize_transfers(vec![stored("tr_1001", Some("otro@example.com"))]);

        assert_eq!(got.backfilled, 0);
        assert_eq!(got.transfers[0].email, "otro@example.com");
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let first = normalize_transfers(vec![
            stored("tr_1001", None),
            stored("tr_7", None),
            stored("tr_8", Some("ya@example.com")),
        ]);
        let json = serde_json::to_string(&first.transfers).unwrap();
        let reloaded: Vec<StoredTransfer> = serde_json::from_str(&json).unwrap();

        let second = normalize_transfers(reloaded);

        assert_eq!(second.backfilled, 0);
        assert_eq!(second.transfers, first.transfers);
    }

    #[test]
    fn legacy_json_without_email_deserializes() {
        let json = r#"{
            "id": "tr_1",
            "amount": 50,
            "currency": "USD",
            "status": "pendiente",
            "date": "2026-01-10",
            "destination": "BHD ****0001"
        }"#;

        let got: StoredTransfer = serde_json::from_str(json).unwrap();

        assert_eq!(got.email, None);
        assert_eq!(got.details.status, TransferStatus::Pendiente);
    }

    #[test]
    fn effective_timestamp_prefers_created_at_then_date() {
        let mut transfer = Transfer {
            id: "tr_1".to_owned(),
            email: "a@example.com".to_owned(),
            details: details(),
        };
        assert_eq!(
            transfer.effective_timestamp(),
            Some(datetime!(2026-01-18 14:30 UTC))
        );

        transfer.details.created_at = Some("garbage".to_owned());
        transfer.details.date = Some("2026-01-12".to_owned());
        assert_eq!(
            transfer.effective_timestamp(),
            Some(datetime!(2026-01-12 00:00 UTC))
        );

        transfer.details.date = None;
        assert_eq!(transfer.effective_timestamp(), None);
    }
}
