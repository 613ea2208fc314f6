//! Defines the route handler for the transactions page and the data every
//! tab fragment is rendered from.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::Markup;
use rusqlite::Connection;
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    AppState, Error,
    collection::Collection,
    export::ExportJobs,
    filter::FilterSession,
    seed::{Collections, load_collections},
    timezone::require_local_offset,
};

use super::{
    columns::{ColumnPreferences, load_column_preferences},
    view::{TabView, transactions_view},
};

/// The state needed to render the transactions page and its fragments.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection holding the stored collections.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Bogota".
    pub local_timezone: String,
    /// The filters of each tab.
    pub filters: Arc<Mutex<FilterSession>>,
    pub exports: ExportJobs,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            filters: state.filters.clone(),
            exports: state.exports.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TabQuery {
    /// The selected tab. Defaults to payments.
    #[serde(default)]
    pub tab: Collection,
}

/// The stored data a tab is rendered from.
pub(crate) struct TabData {
    pub collections: Collections,
    pub columns: ColumnPreferences,
    pub filters: FilterSession,
    pub local_offset: UtcOffset,
}

impl TabData {
    /// Load the collections, seeding any that are missing, along with the
    /// column preferences and a snapshot of the filters.
    pub(crate) fn load(state: &TransactionsState) -> Result<Self, Error> {
        let local_offset = require_local_offset(&state.local_timezone)?;

        let (collections, columns) = {
            let connection = state
                .db_connection
                .lock()
                .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
                .map_err(|_| Error::DatabaseLockError)?;

            let collections = load_collections(&connection)
                .inspect_err(|error| tracing::error!("could not load collections: {error}"))?;
            let columns = load_column_preferences(&connection)
                .inspect_err(|error| tracing::error!("could not load column preferences: {error}"))?;

            (collections, columns)
        };

        let filters = state
            .filters
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire filter lock: {error}"))
            .map_err(|_| Error::StateLockError)?
            .clone();

        Ok(Self {
            collections,
            columns,
            filters,
            local_offset,
        })
    }

    pub(crate) fn view(&self, tab: Collection) -> TabView<'_> {
        TabView {
            tab,
            collections: &self.collections,
            filters: &self.filters,
            columns: &self.columns,
            local_offset: self.local_offset,
        }
    }

    /// The `#tab-content` fragment.
    pub(crate) fn content(&self, tab: Collection) -> Markup {
        self.view(tab).content()
    }
}

/// Render the transactions page.
///
/// Loading the page seeds any collection that is missing from storage and
/// normalizes legacy transfers.
pub async fn get_transactions_page(
    State(state): State<TransactionsState>,
    Query(query): Query<TabQuery>,
) -> Result<Response, Error> {
    let data = TabData::load(&state)?;
    let dialog = state.exports.dialog()?;

    Ok(transactions_view(&data.view(query.tab), &dialog).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::Response,
    };
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        collection::Collection,
        export::{ExportConfig, ExportJobs},
        filter::FilterSession,
        seed::{PAYMENTS_KEY, TRANSFERS_KEY},
        storage::{get_item, initialize},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{TabQuery, TransactionsState, get_transactions_page};

    fn get_test_state() -> TransactionsState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        TransactionsState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "America/Bogota".to_owned(),
            filters: Arc::new(Mutex::new(FilterSession::default())),
            exports: ExportJobs::new(ExportConfig::default()),
        }
    }

    async fn get_page(state: &TransactionsState, tab: Collection) -> Response {
        get_transactions_page(State(state.clone()), Query(TabQuery { tab }))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn page_load_seeds_storage() {
        let state = get_test_state();

        let response = get_page(&state, Collection::Payments).await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_item(PAYMENTS_KEY, &connection).unwrap().is_some());
        let transfers = get_item(TRANSFERS_KEY, &connection).unwrap().unwrap();
        assert!(!transfers.contains("\"email\":null"));
    }

    #[tokio::test]
    async fn page_renders_selected_tab() {
        let state = get_test_state();

        let html = parse_html_document(get_page(&state, Collection::Transfers).await).await;

        assert_valid_html(&html);
        let content = html
            .select(&Selector::parse("#tab-content").unwrap())
            .next()
            .expect("No tab content");
        assert_eq!(content.value().attr("data-tab"), Some("transfers"));
        let rows = html
            .select(&Selector::parse("#records-table tbody tr[data-id]").unwrap())
            .count();
        assert_eq!(rows, 6);
    }

    #[test]
    fn missing_tab_defaults_to_payments() {
        let query: TabQuery = serde_urlencoded::from_str("").unwrap();

        assert_eq!(query.tab, Collection::Payments);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let state = TransactionsState {
            local_timezone: "Not/A_Zone".to_owned(),
            ..get_test_state()
        };

        let result = get_transactions_page(State(state), Query(TabQuery::default())).await;

        assert!(result.is_err());
    }
}
