//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    error::get_404_not_found,
    export::{
        cancel_export_endpoint, download_export_endpoint, get_export_dialog, get_export_status,
        start_export_endpoint,
    },
    transactions::{
        get_transactions_page, select_date_endpoint, select_status_endpoint, set_query_endpoint,
        toggle_filter_endpoint, update_columns_endpoint,
    },
    transfer::{get_transfer_receipt, refresh_transfers_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page));

    let filter_routes = Router::new()
        .route(endpoints::TAB_QUERY, post(set_query_endpoint))
        .route(endpoints::TAB_FILTER_TOGGLE, post(toggle_filter_endpoint))
        .route(endpoints::TAB_DATE, put(select_date_endpoint))
        .route(endpoints::TAB_STATUS, put(select_status_endpoint))
        .route(endpoints::TAB_COLUMNS, post(update_columns_endpoint));

    let export_routes = Router::new()
        .route(endpoints::EXPORT_DIALOG, get(get_export_dialog))
        .route(
            endpoints::EXPORTS,
            post(start_export_endpoint).delete(cancel_export_endpoint),
        )
        .route(endpoints::EXPORT_STATUS, get(get_export_status))
        .route(endpoints::EXPORT_DOWNLOAD, get(download_export_endpoint));

    let transfer_routes = Router::new()
        .route(endpoints::TRANSFER_RECEIPT, get(get_transfer_receipt))
        .route(endpoints::TRANSFERS_REFRESH, post(refresh_transfers_endpoint));

    page_routes
        .merge(filter_routes)
        .merge(export_routes)
        .merge(transfer_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}
