//! The state machine behind the export dialog.
//!
//! ```text
//! Closed -> Form -> Loading -> Success | Empty
//! ```
//!
//! The form and the loading state can be cancelled, and both outcomes are
//! dismissed, which returns the dialog to `Closed`. Loading can only be
//! entered from the form.

use crate::Error;

use super::build::{ExportFile, ExportOutcome, ExportRequest};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportDialog {
    #[default]
    Closed,
    Form {
        request: ExportRequest,
        /// Shown next to the custom date inputs.
        error: Option<String>,
    },
    Loading {
        request: ExportRequest,
    },
    /// The generated file is kept so it can be downloaded again.
    Success(ExportFile),
    Empty,
}

impl ExportDialog {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Form { .. } => "open",
            Self::Loading { .. } => "loading",
            Self::Success(_) => "finished",
            Self::Empty => "finished",
        }
    }

    /// Show the form, prefilled with `request`.
    ///
    /// Reopening an already open form replaces its values.
    pub fn open(&mut self, request: ExportRequest) -> Result<(), Error> {
        match self {
            Self::Closed | Self::Form { .. } => {
                *self = Self::Form {
                    request,
                    error: None,
                };
                Ok(())
            }
            _ => Err(self.invalid("open the export dialog")),
        }
    }

    /// Keep the form open and show why `request` was rejected.
    pub fn reject(&mut self, request: ExportRequest, error: String) -> Result<(), Error> {
        match self {
            Self::Form { .. } => {
                *self = Self::Form {
                    request,
                    error: Some(error),
                };
                Ok(())
            }
            _ => Err(self.invalid("edit the export")),
        }
    }

    pub fn start_loading(&mut self, request: ExportRequest) -> Result<(), Error> {
        match self {
            Self::Form { .. } => {
                *self = Self::Loading { request };
                Ok(())
            }
            _ => Err(self.invalid("start an export")),
        }
    }

    pub fn finish(&mut self, outcome: ExportOutcome) -> Result<(), Error> {
        match self {
            Self::Loading { .. } => {
                *self = match outcome {
                    ExportOutcome::Empty => Self::Empty,
                    ExportOutcome::File(file) => Self::Success(file),
                };
                Ok(())
            }
            _ => Err(self.invalid("finish an export")),
        }
    }

    /// Cancel the form or a loading export, or dismiss an outcome.
    ///
    /// Closing a closed dialog does nothing.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidExportTransition {
            state: self.name(),
            action,
        }
    }
}
