//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{alert::Alert, html::error_view};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., the transfer ID) are correct.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Could not acquire the lock guarding in-memory page or export state.
    #[error("could not acquire the application state lock")]
    StateLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The custom export range is missing a bound, has a malformed date or
    /// ends before it starts.
    ///
    /// The dates are never swapped to make the range valid.
    #[error("invalid export range: {0}")]
    InvalidExportRange(String),

    /// The export dialog was asked to move to a state that cannot be reached
    /// from its current state, e.g., starting a second export while one is
    /// already loading.
    #[error("cannot {action} while the export dialog is {state}")]
    InvalidExportTransition {
        /// The state the dialog was in.
        state: &'static str,
        /// The action that was attempted.
        action: &'static str,
    },

    /// A download was requested but no export file has been generated.
    #[error("there is no export file ready to download")]
    ExportNotReady,

    /// The CSV writer failed while serializing an export.
    #[error("could not write CSV export: {0}")]
    CsvWriteError(String),

    /// The PDF receipt could not be generated.
    #[error("could not generate PDF receipt: {0}")]
    PdfError(String),

    /// An error occurred while saving column preferences.
    #[error("failed to save column preferences")]
    ColumnPreferencesSaveError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        tracing::error!("could not serialize value as JSON: {value}");
        Error::JSONSerializationError(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvWriteError(value.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(value: lopdf::Error) -> Self {
        Error::PdfError(value.to_string())
    }
}

/// The page shown when something goes wrong on the server.
pub struct ErrorPage<'a> {
    pub status: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl ErrorPage<'_> {
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            description: "No encontramos lo que buscabas.",
            fix: "Revisa la dirección o vuelve al listado de transacciones.",
        }
    }

    pub fn internal_server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Algo salió mal.",
            fix: "Inténtalo de nuevo más tarde o revisa los registros del servidor.",
        }
    }
}

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        let header = self.status.as_u16().to_string();
        let title = self.status.canonical_reason().unwrap_or("Error");
        let page = error_view(title, &header, self.description, self.fix);

        (self.status, Html(page.into_string())).into_response()
    }
}

/// Route handler for requests that do not match any route.
pub async fn get_404_not_found() -> Response {
    ErrorPage::not_found().into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::ExportNotReady => ErrorPage::not_found().into_response(),
            Error::InvalidTimezoneError(timezone) => ErrorPage {
                fix: &format!(
                    "No se pudo obtener la zona horaria \"{timezone}\". Revisa la configuración \
                    del servidor y usa un nombre de zona horaria canónico."
                ),
                ..ErrorPage::internal_server_error()
            }
            .into_response(),
            Error::DatabaseLockError | Error::StateLockError => {
                ErrorPage::internal_server_error().into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::internal_server_error().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "No encontrado".to_owned(),
                    details: "El registro solicitado no existe. \
                    Actualiza la página para ver los datos más recientes."
                        .to_owned(),
                },
            ),
            Error::InvalidExportRange(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Rango de fechas inválido".to_owned(),
                    details: reason,
                },
            ),
            Error::InvalidExportTransition { .. } => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Exportación en curso".to_owned(),
                    details: "Espera a que termine la exportación actual o cancélala.".to_owned(),
                },
            ),
            Error::ExportNotReady => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "No hay archivo para descargar".to_owned(),
                    details: "Genera una nueva exportación e inténtalo de nuevo.".to_owned(),
                },
            ),
            Error::ColumnPreferencesSaveError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "No se guardaron las columnas".to_owned(),
                    details: "No pudimos guardar tus preferencias. Inténtalo de nuevo.".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Algo salió mal".to_owned(),
                        details: "Ocurrió un error inesperado, revisa los registros del \
                            servidor para más detalles."
                            .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
