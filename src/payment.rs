//! Incoming payments ("cobros").
//!
//! Payments to the bank account and charges collected by transfer share the
//! same shape but live under separate storage keys.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    filter::{FilterRecord, RecordStatus},
    timezone::parse_timestamp,
};

/// The lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Completado,
    Fallido,
    Reembolsado,
}

impl RecordStatus for PaymentStatus {
    fn all() -> &'static [Self] {
        &[Self::Completado, Self::Fallido, Self::Reembolsado]
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Completado => "Completado",
            Self::Fallido => "Fallido",
            Self::Reembolsado => "Reembolsado",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment received from a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    /// The payer's e-mail, used to join against [crate::customer::Customer].
    pub email: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub method: String,
    pub reference: String,
    pub origin: String,
}

/// A charge collected by bank transfer. Stored separately from payments.
pub type TransferCharge = Payment;

impl FilterRecord for Payment {
    type Status = PaymentStatus;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn effective_timestamp(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }
}
