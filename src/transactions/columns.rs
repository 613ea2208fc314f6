//! Which optional columns each tab of the transactions page shows.
//!
//! The record id is always shown. The remaining columns can be switched on
//! and off per tab, and the choice is stored as JSON so it survives restarts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    collection::Collection,
    endpoints,
    storage::{load_json, remove_item, save_json},
};

/// The storage key the column preferences are saved under.
pub const COLUMNS_KEY: &str = "transactions_columns";

/// An optional column of a records table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    Date,
    Customer,
    Email,
    Amount,
    Status,
    Method,
    Reference,
    Origin,
    Destination,
    FailureReason,
}

const PAYMENT_COLUMNS: &[Column] = &[
    Column::Date,
    Column::Customer,
    Column::Email,
    Column::Amount,
    Column::Status,
    Column::Method,
    Column::Reference,
    Column::Origin,
];

const TRANSFER_COLUMNS: &[Column] = &[
    Column::Date,
    Column::Email,
    Column::Amount,
    Column::Status,
    Column::Destination,
    Column::FailureReason,
];

impl Column {
    /// The columns a tab can show, in display order.
    pub fn available(collection: Collection) -> &'static [Column] {
        match collection {
            Collection::Payments | Collection::TransferCharges => PAYMENT_COLUMNS,
            Collection::Transfers => TRANSFER_COLUMNS,
        }
    }

    fn default_for(collection: Collection) -> Vec<Column> {
        Self::available(collection)
            .iter()
            .copied()
            .filter(|column| {
                !matches!(
                    column,
                    Column::Reference | Column::Origin | Column::FailureReason
                )
            })
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Customer => "customer",
            Self::Email => "email",
            Self::Amount => "amount",
            Self::Status => "status",
            Self::Method => "method",
            Self::Reference => "reference",
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::FailureReason => "failure-reason",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Fecha",
            Self::Customer => "Cliente",
            Self::Email => "Correo",
            Self::Amount => "Monto",
            Self::Status => "Estado",
            Self::Method => "Método",
            Self::Reference => "Referencia",
            Self::Origin => "Origen",
            Self::Destination => "Destino",
            Self::FailureReason => "Motivo del fallo",
        }
    }
}

/// The visible columns of every tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPreferences {
    pub payments: Vec<Column>,
    pub transfer_charges: Vec<Column>,
    pub transfers: Vec<Column>,
}

impl Default for ColumnPreferences {
    fn default() -> Self {
        Self {
            payments: Column::default_for(Collection::Payments),
            transfer_charges: Column::default_for(Collection::TransferCharges),
            transfers: Column::default_for(Collection::Transfers),
        }
    }
}

impl ColumnPreferences {
    pub fn visible(&self, collection: Collection) -> &[Column] {
        match collection {
            Collection::Payments => &self.payments,
            Collection::TransferCharges => &self.transfer_charges,
            Collection::Transfers => &self.transfers,
        }
    }

    pub fn is_visible(&self, collection: Collection, column: Column) -> bool {
        self.visible(collection).contains(&column)
    }

    /// Show exactly `columns` on the `collection` tab.
    ///
    /// Columns the tab does not have are dropped and the display order is
    /// kept regardless of the order given.
    pub fn set_visible(&mut self, collection: Collection, columns: &[Column]) {
        let visible = Column::available(collection)
            .iter()
            .copied()
            .filter(|column| columns.contains(column))
            .collect();

        match collection {
            Collection::Payments => self.payments = visible,
            Collection::TransferCharges => self.transfer_charges = visible,
            Collection::Transfers => self.transfers = visible,
        }
    }
}

/// Load the saved column preferences.
///
/// Missing or unreadable preferences fall back to the defaults.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn load_column_preferences(connection: &Connection) -> Result<ColumnPreferences, Error> {
    Ok(load_json(COLUMNS_KEY, connection)?.unwrap_or_default())
}

/// Save the column preferences. The defaults are not stored.
///
/// # Errors
/// Returns an error if there is an SQL error or the preferences cannot be serialized.
pub fn save_column_preferences(
    preferences: &ColumnPreferences,
    connection: &Connection,
) -> Result<(), Error> {
    if *preferences == ColumnPreferences::default() {
        return remove_item(COLUMNS_KEY, connection);
    }

    save_json(COLUMNS_KEY, preferences, connection)
}

/// The checked boxes of the column picker.
#[derive(Debug, Deserialize)]
pub struct ColumnsForm {
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// The state needed for saving column preferences.
#[derive(Debug, Clone)]
pub struct ColumnsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ColumnsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// API endpoint to save the visible columns of a tab and reload it.
pub async fn update_columns_endpoint(
    State(state): State<ColumnsState>,
    Path(collection): Path<Collection>,
    Form(form): Form<ColumnsForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let saved = load_column_preferences(&connection).and_then(|mut preferences| {
        preferences.set_visible(collection, &form.columns);
        save_column_preferences(&preferences, &connection)
    });

    if let Err(error) = saved {
        tracing::error!("Failed to save column preferences: {error}");
        return Error::ColumnPreferencesSaveError.into_alert_response();
    }

    let redirect_url = format!(
        "{}?tab={}",
        endpoints::TRANSACTIONS_VIEW,
        collection.as_path_segment()
    );

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        collection::Collection,
        endpoints::{self, format_endpoint},
        export::ExportConfig,
        storage::{get_item, initialize, set_item},
    };

    use super::{
        COLUMNS_KEY, Column, ColumnPreferences, ColumnsForm, load_column_preferences,
        save_column_preferences, update_columns_endpoint,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn defaults_when_nothing_is_saved() {
        let connection = get_test_connection();

        let got = load_column_preferences(&connection).unwrap();

        assert_eq!(got, ColumnPreferences::default());
        assert!(got.is_visible(Collection::Payments, Column::Customer));
        assert!(!got.is_visible(Collection::Payments, Column::Origin));
        assert!(!got.is_visible(Collection::Transfers, Column::Customer));
    }

    #[test]
    fn unreadable_preferences_fall_back_to_defaults() {
        let connection = get_test_connection();
        set_item(COLUMNS_KEY, "{not json", &connection).unwrap();

        let got = load_column_preferences(&connection).unwrap();

        assert_eq!(got, ColumnPreferences::default());
    }

    #[test]
    fn saved_preferences_are_loaded() {
        let connection = get_test_connection();
        let mut preferences = ColumnPreferences::default();
        preferences.set_visible(Collection::Transfers, &[Column::Amount]);

        save_column_preferences(&preferences, &connection).unwrap();

        assert_eq!(load_column_preferences(&connection).unwrap(), preferences);
    }

    #[test]
    fn saving_defaults_clears_stored_preferences() {
        let connection = get_test_connection();
        let mut preferences = ColumnPreferences::default();
        preferences.set_visible(Collection::Payments, &[Column::Date]);
        save_column_preferences(&preferences, &connection).unwrap();

        save_column_preferences(&ColumnPreferences::default(), &connection).unwrap();

        assert_eq!(get_item(COLUMNS_KEY, &connection).unwrap(), None);
    }

    #[test]
    fn set_visible_drops_foreign_columns_and_keeps_display_order() {
        let mut preferences = ColumnPreferences::default();

        preferences.set_visible(
            Collection::Transfers,
            &[Column::Status, Column::Customer, Column::Date],
        );

        assert_eq!(
            preferences.visible(Collection::Transfers),
            [Column::Date, Column::Status]
        );
        assert_eq!(
            preferences.visible(Collection::Payments),
            ColumnPreferences::default().visible(Collection::Payments)
        );
    }

    #[test]
    fn repeated_form_fields_parse_as_columns() {
        let form: ColumnsForm =
            serde_html_form::from_str("columns=date&columns=failure-reason").unwrap();
        assert_eq!(form.columns, [Column::Date, Column::FailureReason]);

        let form: ColumnsForm = serde_html_form::from_str("").unwrap();
        assert!(form.columns.is_empty());
    }

    #[tokio::test]
    async fn endpoint_saves_columns_and_redirects_to_tab() {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "America/Bogota",
            ExportConfig::default(),
        )
        .unwrap();
        let app = Router::new()
            .route(endpoints::TAB_COLUMNS, post(update_columns_endpoint))
            .with_state(state.clone());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .post(&format_endpoint(endpoints::TAB_COLUMNS, "transfer-charges"))
            .form(&[("columns", "amount"), ("columns", "status")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("hx-redirect"),
            "/transactions?tab=transfer-charges"
        );
        let connection = state.db_connection.lock().unwrap();
        let preferences = load_column_preferences(&connection).unwrap();
        assert_eq!(
            preferences.visible(Collection::TransferCharges),
            [Column::Amount, Column::Status]
        );
    }
}
