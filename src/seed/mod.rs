//! Loads the record collections from storage, seeding demo data where a
//! collection is missing or unreadable.

mod demo_data;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{
    Error,
    customer::Customer,
    payment::{Payment, TransferCharge},
    storage::{load_json, save_json},
    transfer::{StoredTransfer, Transfer, normalize_transfers},
};

pub use demo_data::{demo_customers, demo_payments, demo_transfer_charges, demo_transfers};

pub const PAYMENTS_KEY: &str = "payments";
pub const TRANSFER_CHARGES_KEY: &str = "transfer_charges";
pub const CUSTOMERS_KEY: &str = "customers";
pub const TRANSFERS_KEY: &str = "transfers";

/// Every collection shown on the transactions page.
#[derive(Debug, Clone, PartialEq)]
pub struct Collections {
    pub payments: Vec<Payment>,
    pub transfer_charges: Vec<TransferCharge>,
    pub customers: Vec<Customer>,
    pub transfers: Vec<Transfer>,
}

/// Read every collection from storage.
///
/// A collection that is absent or cannot be parsed is replaced with its demo
/// dataset, which is written back to storage. Transfers are normalized so
/// that every record has an e-mail, and the normalized array is written back
/// when any record was backfilled.
///
/// Calling this again without other writes in between leaves storage
/// unchanged.
///
/// # Errors
/// Returns an error if there is an SQL error or a dataset cannot be serialized.
pub fn load_collections(connection: &Connection) -> Result<Collections, Error> {
    let payments = load_or_seed(PAYMENTS_KEY, connection, demo_payments)?;
    let transfer_charges = load_or_seed(TRANSFER_CHARGES_KEY, connection, demo_transfer_charges)?;
    let customers = load_or_seed(CUSTOMERS_KEY, connection, demo_customers)?;

    let stored_transfers: Vec<StoredTransfer> =
        load_or_seed(TRANSFERS_KEY, connection, demo_transfers)?;
    let normalized = normalize_transfers(stored_transfers);

    if normalized.backfilled > 0 {
        tracing::info!(
            "backfilled the e-mail of {} stored transfers",
            normalized.backfilled
        );
        save_json(TRANSFERS_KEY, &normalized.transfers, connection)?;
    }

    Ok(Collections {
        payments,
        transfer_charges,
        customers,
        transfers: normalized.transfers,
    })
}

fn load_or_seed<T>(
    key: &str,
    connection: &Connection,
    demo_data: impl FnOnce() -> T,
) -> Result<T, Error>
where
    T: Serialize + DeserializeOwned,
{
    if let Some(value) = load_json(key, connection)? {
        return Ok(value);
    }

    tracing::info!("seeding \"{key}\" with demo data");
    let value = demo_data();
    save_json(key, &value, connection)?;

    Ok(value)
}

/// Write the raw demo datasets to storage, overwriting what is there.
///
/// Transfers are written as-is, so legacy records without an e-mail are
/// normalized the next time the collections are loaded.
pub fn write_demo_data(connection: &Connection) -> Result<(), Error> {
    save_json(PAYMENTS_KEY, &demo_payments(), connection)?;
    save_json(TRANSFER_CHARGES_KEY, &demo_transfer_charges(), connection)?;
    save_json(CUSTOMERS_KEY, &demo_customers(), connection)?;
    save_json(TRANSFERS_KEY, &demo_transfers(), connection)?;

    Ok(())
}

/// Re-run the seeder each time a "transfers updated" signal is received.
///
/// The task ends when every sender has been dropped.
pub fn spawn_transfers_listener(
    db_connection: Arc<Mutex<Connection>>,
    mut transfers_updated: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match transfers_updated.recv().await {
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }

            let result = db_connection
                .lock()
                .map_err(|_| Error::DatabaseLockError)
                .and_then(|connection| load_collections(&connection));

            match result {
                Ok(collections) => tracing::debug!(
                    "reloaded collections after transfers update ({} transfers)",
                    collections.transfers.len()
                ),
                Err(error) => tracing::error!("could not reload collections: {error}"),
            }
        }
    })
}
