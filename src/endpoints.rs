//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transfers/{transfer_id}/receipt',
//! use [format_endpoint].

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page listing payments, transfer charges and transfers.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to set the search text of a tab.
pub const TAB_QUERY: &str = "/api/transactions/{tab}/query";
/// The route to toggle a filter chip of a tab.
pub const TAB_FILTER_TOGGLE: &str = "/api/transactions/{tab}/filters/{filter}";
/// The route to select the day a tab is filtered by.
pub const TAB_DATE: &str = "/api/transactions/{tab}/date";
/// The route to select the status a tab is filtered by.
pub const TAB_STATUS: &str = "/api/transactions/{tab}/status";
/// The route to save the visible columns of a tab.
pub const TAB_COLUMNS: &str = "/api/transactions/{tab}/columns";

/// The route to open the export dialog.
pub const EXPORT_DIALOG: &str = "/api/exports/dialog";
/// The route to start, cancel or dismiss an export.
pub const EXPORTS: &str = "/api/exports";
/// The route polled while an export is loading.
pub const EXPORT_STATUS: &str = "/api/exports/status";
/// The route to download the last generated export.
pub const EXPORT_DOWNLOAD: &str = "/api/exports/download";

/// The route to download the PDF receipt of a transfer.
pub const TRANSFER_RECEIPT: &str = "/api/transfers/{transfer_id}/receipt";
/// The route to signal that the stored transfers changed.
pub const TRANSFERS_REFRESH: &str = "/api/transfers/refresh";

/// Replace the first parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/transactions/{tab}/query', '{tab}' is the parameter.
///
/// For paths with more than one parameter, call this function once per
/// parameter, from left to right.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
