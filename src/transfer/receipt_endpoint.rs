//! The route that serves the PDF receipt of a transfer.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, seed::load_collections};

use super::render_transfer_receipt;

/// The state needed to look up a transfer for its receipt.
#[derive(Debug, Clone)]
pub struct TransferReceiptState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransferReceiptState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler that downloads the PDF receipt of a single transfer.
pub async fn get_transfer_receipt(
    State(state): State<TransferReceiptState>,
    Path(transfer_id): Path<String>,
) -> Result<Response, Error> {
    let collections = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        load_collections(&connection)
            .inspect_err(|error| tracing::error!("could not load transfers: {error}"))?
    };

    let transfer = collections
        .transfers
        .iter()
        .find(|transfer| transfer.id == transfer_id)
        .ok_or(Error::NotFound)?;

    let bytes = render_transfer_receipt(transfer)
        .inspect_err(|error| tracing::error!("could not render receipt for {transfer_id}: {error}"))?;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"comprobante-{}.pdf\"", transfer.id),
            ),
        ],
        bytes,
    )
        .into_response())
}
