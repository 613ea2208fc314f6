//! Route handlers that drive the export dialog.
//!
//! Every handler responds with the dialog in its new state, which htmx swaps
//! into `#export-dialog`.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, collection::Collection, filter::FilterSession, seed::load_collections,
    timezone::require_local_offset,
};

use super::{ExportJobs, ExportRequest, ExportTable, export_dialog_view};

/// The state needed to build exports from the transactions page.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
    pub filters: Arc<Mutex<FilterSession>>,
    pub exports: ExportJobs,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            filters: state.filters.clone(),
            exports: state.exports.clone(),
        }
    }
}

/// The state needed to show or close the export dialog.
#[derive(Debug, Clone)]
pub struct ExportDialogState {
    pub exports: ExportJobs,
}

impl FromRef<AppState> for ExportDialogState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            exports: state.exports.clone(),
        }
    }
}

fn render_dialog(exports: &ExportJobs) -> Response {
    match exports.dialog() {
        Ok(dialog) => export_dialog_view(&dialog).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Open the export form, or re-render it with the given options.
///
/// The form calls this whenever an option changes so that a custom range is
/// validated as it is typed.
pub async fn get_export_dialog(
    State(state): State<ExportDialogState>,
    Query(request): Query<ExportRequest>,
) -> Response {
    match state.exports.open(request) {
        Ok(dialog) => export_dialog_view(&dialog).into_response(),
        Err(error) => {
            tracing::warn!("could not open the export dialog: {error}");
            error.into_alert_response()
        }
    }
}

/// Start exporting the rows the `kind` tab currently shows.
///
/// An invalid custom range keeps the form open with the reason shown under
/// the date inputs.
pub async fn start_export_endpoint(
    State(state): State<ExportState>,
    Form(request): Form<ExportRequest>,
) -> Response {
    let table = match current_view_table(&state, request.kind) {
        Ok(table) => table,
        Err(error) => return error.into_alert_response(),
    };

    match state
        .exports
        .start(request, table, OffsetDateTime::now_utc())
    {
        Ok(()) => render_dialog(&state.exports),
        Err(Error::InvalidExportRange(reason)) => {
            tracing::debug!("rejected export request: {reason}");
            render_dialog(&state.exports)
        }
        Err(error) => error.into_alert_response(),
    }
}

fn current_view_table(state: &ExportState, kind: Collection) -> Result<ExportTable, Error> {
    let local_offset = require_local_offset(&state.local_timezone)?;

    let collections = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        load_collections(&connection)?
    };

    let filters = state
        .filters
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire filter lock: {error}"))
        .map_err(|_| Error::StateLockError)?;

    Ok(ExportTable::from_view(
        kind,
        &collections,
        &filters,
        local_offset,
    ))
}

/// Polled while an export is loading.
pub async fn get_export_status(State(state): State<ExportDialogState>) -> Response {
    render_dialog(&state.exports)
}

/// Cancel the form or a pending export, or dismiss a finished one.
pub async fn cancel_export_endpoint(State(state): State<ExportDialogState>) -> Response {
    match state.exports.close() {
        Ok(()) => render_dialog(&state.exports),
        Err(error) => error.into_alert_response(),
    }
}

/// Download the file of the last successful export.
pub async fn download_export_endpoint(
    State(state): State<ExportDialogState>,
) -> Result<Response, Error> {
    let file = state.exports.download()?;

    Ok((
        [
            (CONTENT_TYPE, file.content_type.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        AppState,
        collection::Collection,
        endpoints,
        export::{ExportConfig, ExportDialog},
        filter::FilterKind,
    };

    use super::{
        cancel_export_endpoint, download_export_endpoint, get_export_dialog, get_export_status,
        start_export_endpoint,
    };

    const WAIT: Duration = Duration::from_millis(200);

    fn get_test_state() -> AppState {
        AppState::new(
            Connection::open_in_memory().unwrap(),
            "America/Bogota",
            ExportConfig {
                delay: Duration::from_millis(20),
            },
        )
        .unwrap()
    }

    fn get_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::EXPORT_DIALOG, get(get_export_dialog))
            .route(
                endpoints::EXPORTS,
                post(start_export_endpoint).delete(cancel_export_endpoint),
            )
            .route(endpoints::EXPORT_STATUS, get(get_export_status))
            .route(endpoints::EXPORT_DOWNLOAD, get(download_export_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn dialog_state(text: &str) -> String {
        let html = Html::parse_fragment(text);

        html.select(&Selector::parse("#export-dialog").unwrap())
            .next()
            .expect("No export dialog found")
            .value()
            .attr("data-state")
            .unwrap_or_default()
            .to_owned()
    }

    #[tokio::test]
    async fn export_round_trip_downloads_csv() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .get(endpoints::EXPORT_DIALOG)
            .add_query_param("kind", "payments")
            .await;
        response.assert_status_ok();
        assert_eq!(dialog_state(&response.text()), "open");

        let response = server
            .post(endpoints::EXPORTS)
            .form(&[("kind", "payments"), ("format", "csv"), ("range", "all")])
            .await;
        response.assert_status_ok();
        assert_eq!(dialog_state(&response.text()), "loading");

        tokio::time::sleep(WAIT).await;
        let response = server.get(endpoints::EXPORT_STATUS).await;
        assert_eq!(dialog_state(&response.text()), "finished");

        let response = server.get(endpoints::EXPORT_DOWNLOAD).await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "text/csv; charset=utf-8");
        let disposition = response.header("content-disposition");
        let disposition = disposition.to_str().unwrap();
        assert!(
            disposition.starts_with("attachment; filename=\"cobros-cuenta-bancaria-"),
            "got {disposition}"
        );
        assert_eq!(response.text().lines().count(), 7);
    }

    #[tokio::test]
    async fn export_follows_tab_filters() {
        let state = get_test_state();
        {
            let mut filters = state.filters.lock().unwrap();
            filters.set_query(Collection::Payments, "zzz-nonexistent");
            filters.toggle(Collection::Transfers, FilterKind::Status);
        }
        let server = get_test_server(state.clone());
        server
            .get(endpoints::EXPORT_DIALOG)
            .add_query_param("kind", "payments")
            .await;

        server
            .post(endpoints::EXPORTS)
            .form(&[("kind", "payments"), ("format", "xlsx"), ("range", "all")])
            .await
            .assert_status_ok();
        tokio::time::sleep(WAIT).await;

        assert_eq!(state.exports.dialog().unwrap(), ExportDialog::Empty);
        server
            .get(endpoints::EXPORT_DOWNLOAD)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_custom_range_keeps_form_open() {
        let state = get_test_state();
        let server = get_test_server(state.clone());
        server
            .get(endpoints::EXPORT_DIALOG)
            .add_query_param("kind", "transfers")
            .await;

        let response = server
            .post(endpoints::EXPORTS)
            .form(&[
                ("kind", "transfers"),
                ("format", "csv"),
                ("range", "custom"),
                ("custom_start", "2026-01-20"),
                ("custom_end", "2026-01-10"),
            ])
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert_eq!(dialog_state(&text), "open");
        let html = Html::parse_fragment(&text);
        assert!(
            html.select(&Selector::parse("#export-range-error").unwrap())
                .next()
                .is_some(),
            "want inline range error, got {text}"
        );
        assert!(matches!(
            state.exports.dialog().unwrap(),
            ExportDialog::Form { error: Some(_), .. }
        ));
    }

    #[tokio::test]
    async fn cancel_discards_pending_export() {
        let state = get_test_state();
        let server = get_test_server(state.clone());
        server
            .get(endpoints::EXPORT_DIALOG)
            .add_query_param("kind", "transfers")
            .await;
        server
            .post(endpoints::EXPORTS)
            .form(&[("kind", "transfers"), ("format", "csv"), ("range", "all")])
            .await
            .assert_status_ok();

        let response = server.delete(endpoints::EXPORTS).await;

        response.assert_status_ok();
        assert_eq!(dialog_state(&response.text()), "closed");
        tokio::time::sleep(WAIT).await;
        assert_eq!(state.exports.dialog().unwrap(), ExportDialog::Closed);
    }

    #[tokio::test]
    async fn second_start_while_loading_is_a_conflict() {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "America/Bogota",
            ExportConfig {
                delay: Duration::from_secs(5),
            },
        )
        .unwrap();
        let server = get_test_server(state);
        server
            .get(endpoints::EXPORT_DIALOG)
            .add_query_param("kind", "payments")
            .await;
        let form = [("kind", "payments"), ("format", "csv"), ("range", "all")];
        server
            .post(endpoints::EXPORTS)
            .form(&form)
            .await
            .assert_status_ok();

        let response = server.post(endpoints::EXPORTS).form(&form).await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn download_before_export_is_not_found() {
        let server = get_test_server(get_test_state());

        server
            .get(endpoints::EXPORT_DOWNLOAD)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dismissing_closed_dialog_is_a_no_op() {
        let server = get_test_server(get_test_state());

        let response = server.delete(endpoints::EXPORTS).await;

        response.assert_status_ok();
        assert_eq!(dialog_state(&response.text()), "closed");
    }
}
