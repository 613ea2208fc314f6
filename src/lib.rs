//! AntillaPay is the transactions section of a payments dashboard.
//!
//! It lists payments, transfer charges and transfers in tabs that can be
//! searched and filtered, exports the visible rows as CSV or a spreadsheet,
//! and renders a PDF receipt for each transfer.
//!
//! This library provides a REST API that directly serves HTML pages. Records
//! live as JSON documents in a SQLite key-value table that is seeded with demo
//! data on first use.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod collection;
mod customer;
mod endpoints;
mod error;
mod export;
mod filter;
mod html;
mod logging;
mod payment;
mod routing;
mod seed;
mod storage;
mod timezone;
mod transactions;
mod transfer;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use error::Error;
pub use export::ExportConfig;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use seed::write_demo_data;
pub use storage::initialize as initialize_db;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
