//! A key-value store for JSON documents backed by a single SQLite table.
//!
//! Each collection (payments, customers, etc.) is stored as one JSON array
//! under a fixed key. Values that are missing or fail to parse are treated
//! the same way by [load_json], which lets callers fall back to defaults.

use rusqlite::{Connection, OptionalExtension};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// Create the storage table if it does not exist yet.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Get the raw text stored under `key`, or `None` if the key is absent.
pub fn get_item(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    connection
        .query_row("SELECT value FROM storage WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(Error::from)
}

/// Store `value` under `key`, replacing any existing value.
pub fn set_item(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO storage (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key, value),
    )?;

    Ok(())
}

/// Delete the value stored under `key`. Deleting an absent key is not an error.
pub fn remove_item(key: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM storage WHERE key = ?1", [key])?;

    Ok(())
}

/// Load and deserialize the JSON document stored under `key`.
///
/// Returns `Ok(None)` both when the key is absent and when the stored text
/// cannot be parsed as a `T`. Parse failures are logged but never returned
/// as errors.
///
/// # Errors
/// Returns an error only if the underlying SQL query fails.
pub fn load_json<T: DeserializeOwned>(
    key: &str,
    connection: &Connection,
) -> Result<Option<T>, Error> {
    let Some(text) = get_item(key, connection)? else {
        return Ok(None);
    };

    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            tracing::warn!("discarding unparseable value stored under \"{key}\": {error}");
            Ok(None)
        }
    }
}

/// Serialize `value` as JSON and store it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    key: &str,
    value: &T,
    connection: &Connection,
) -> Result<(), Error> {
    let text = serde_json::to_string(value)?;
    set_item(key, &text, connection)
}
