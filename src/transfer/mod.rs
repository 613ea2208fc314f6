//! Outbound transfers: the stored model, e-mail normalization and PDF receipts.

mod core;
mod receipt;
mod receipt_endpoint;
mod refresh_endpoint;

pub use core::{StoredTransfer, Transfer, TransferDetails, TransferStatus, normalize_transfers};
pub use receipt::render_transfer_receipt;
pub use receipt_endpoint::get_transfer_receipt;
pub use refresh_endpoint::refresh_transfers_endpoint;
