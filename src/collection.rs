//! The three record collections shown as tabs on the transactions page.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One of the listable collections. Used as the page tab, the export type
/// and the key for per-tab preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    /// Payments received into the bank account.
    #[default]
    Payments,
    /// Charges collected by bank transfer.
    TransferCharges,
    /// Outbound transfers (payouts).
    Transfers,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Payments,
        Collection::TransferCharges,
        Collection::Transfers,
    ];

    pub fn as_path_segment(self) -> &'static str {
        match self {
            Self::Payments => "payments",
            Self::TransferCharges => "transfer-charges",
            Self::Transfers => "transfers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Payments => "Cobros a cuenta bancaria",
            Self::TransferCharges => "Cobros por transferencia",
            Self::Transfers => "Transferencias",
        }
    }

    /// The prefix of exported file names.
    pub fn export_prefix(self) -> &'static str {
        match self {
            Self::Payments => "cobros-cuenta-bancaria",
            Self::TransferCharges => "cobros-transferencias",
            Self::Transfers => "transferencias",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path_segment())
    }
}
