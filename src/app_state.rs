//! Implements a struct that holds the state of the server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{
    Error,
    export::{ExportConfig, ExportJobs},
    filter::FilterSession,
    seed::spawn_transfers_listener,
    storage::initialize,
    timezone::require_local_offset,
};

/// How many "transfers updated" signals may queue up before old ones are dropped.
const TRANSFERS_UPDATED_CAPACITY: usize = 16;

/// The state of the server.
///
/// Created once at start up. Route handlers only change it through the
/// filter setters and the export job methods.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection holding the key-value storage.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The local timezone as a canonical timezone name, e.g. "America/Bogota".
    pub local_timezone: String,

    /// The filters of each tab on the transactions page.
    pub filters: Arc<Mutex<FilterSession>>,

    /// The single in-flight export and the export dialog.
    pub exports: ExportJobs,

    /// Signals that the stored transfers have changed and should be reloaded.
    pub transfers_updated: broadcast::Sender<()>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the storage table.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Bogota".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the timezone is invalid.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        export_config: ExportConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;
        require_local_offset(local_timezone)?;

        let (transfers_updated, _) = broadcast::channel(TRANSFERS_UPDATED_CAPACITY);

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            local_timezone: local_timezone.to_owned(),
            filters: Arc::new(Mutex::new(FilterSession::default())),
            exports: ExportJobs::new(export_config),
            transfers_updated,
        })
    }

    /// Tell every listener that the stored transfers have changed.
    ///
    /// Returns the number of listeners that were notified.
    pub fn notify_transfers_updated(&self) -> usize {
        self.transfers_updated.send(()).unwrap_or(0)
    }

    /// Start the background task that re-runs the seeder whenever
    /// [AppState::notify_transfers_updated] is called.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_transfers_listener(&self) -> JoinHandle<()> {
        spawn_transfers_listener(
            self.db_connection.clone(),
            self.transfers_updated.subscribe(),
        )
    }
}
