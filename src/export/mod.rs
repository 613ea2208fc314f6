//! Exports the current view of a tab as CSV or as a spreadsheet, bounded by
//! a named date window, and the dialog that drives it.

mod build;
mod dialog;
mod encode;
mod endpoints;
mod job;
mod range;
mod table;
mod view;

pub use build::ExportRequest;
pub use dialog::ExportDialog;
pub use endpoints::{
    cancel_export_endpoint, download_export_endpoint, get_export_dialog, get_export_status,
    start_export_endpoint,
};
pub use job::{ExportConfig, ExportJobs};
pub use table::ExportTable;
pub use view::export_dialog_view;
