//! The route that tells the seeder the stored transfers changed.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{AppState, alert::Alert};

/// Route handler that tells listeners the stored transfers have changed.
///
/// The seeder re-runs in the background, so the response does not wait for
/// the reload to finish.
pub async fn refresh_transfers_endpoint(State(state): State<AppState>) -> Response {
    let receivers = state.notify_transfers_updated();
    tracing::debug!("sent transfers updated signal to {receivers} listeners");

    Alert::Success {
        message: "Transferencias actualizadas".to_owned(),
        details: String::new(),
    }
    .into_html()
    .into_response()
}
