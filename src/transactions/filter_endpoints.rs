//! Route handlers that change the filters of a tab and return the updated
//! fragment.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    collection::Collection,
    filter::{FilterKind, FilterSession},
    timezone::parse_date,
};

use super::page::{TabData, TransactionsState};

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct DateForm {
    /// A `YYYY-MM-DD` date. An empty string clears the selection.
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    /// A status value, or `"all"`.
    #[serde(default)]
    pub status: String,
}

fn update_filters(
    state: &TransactionsState,
    update: impl FnOnce(&mut FilterSession),
) -> Result<(), Error> {
    let mut filters = state
        .filters
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire filter lock: {error}"))
        .map_err(|_| Error::StateLockError)?;

    update(&mut filters);

    Ok(())
}

/// Apply `update` and render the whole `#tab-content` fragment.
fn update_and_render_tab(
    state: &TransactionsState,
    tab: Collection,
    update: impl FnOnce(&mut FilterSession),
) -> Response {
    let result = update_filters(state, update)
        .and_then(|()| TabData::load(state))
        .map(|data| data.content(tab));

    match result {
        Ok(content) => content.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Set the search text of a tab and return just its table, so that the
/// search box keeps focus while typing.
pub async fn set_query_endpoint(
    State(state): State<TransactionsState>,
    Path(tab): Path<Collection>,
    Form(form): Form<QueryForm>,
) -> Response {
    let result = update_filters(&state, |filters| filters.set_query(tab, &form.query))
        .and_then(|()| TabData::load(&state))
        .map(|data| data.view(tab).records_table());

    match result {
        Ok(table) => table.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Switch a filter chip on or off.
pub async fn toggle_filter_endpoint(
    State(state): State<TransactionsState>,
    Path((tab, kind)): Path<(Collection, FilterKind)>,
) -> Response {
    update_and_render_tab(&state, tab, |filters| filters.toggle(tab, kind))
}

/// Select the day to filter by.
///
/// A date that cannot be parsed clears the selection.
pub async fn select_date_endpoint(
    State(state): State<TransactionsState>,
    Path(tab): Path<Collection>,
    Form(form): Form<DateForm>,
) -> Response {
    let date = parse_date(&form.date);

    if date.is_none() && !form.date.trim().is_empty() {
        tracing::warn!("ignoring invalid filter date {:?}", form.date);
    }

    update_and_render_tab(&state, tab, |filters| filters.select_date(tab, date))
}

/// Select the status to filter by. `"all"` selects every status.
pub async fn select_status_endpoint(
    State(state): State<TransactionsState>,
    Path(tab): Path<Collection>,
    Form(form): Form<StatusForm>,
) -> Response {
    update_and_render_tab(&state, tab, |filters| {
        filters.select_status(tab, &form.status)
    })
}
