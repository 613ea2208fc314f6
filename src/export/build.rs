//! Validates export requests and produces export files.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{Error, collection::Collection};

use super::{
    encode::ExportFormat,
    range::{ExportRange, ExportTimezone, ExportWindow, export_window},
    table::ExportTable,
};

/// The options chosen in the export dialog.
///
/// Missing fields take their defaults, so the dialog can be opened with
/// only `kind` set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ExportRequest {
    pub kind: Collection,
    pub format: ExportFormat,
    pub timezone: ExportTimezone,
    pub range: ExportRange,
    pub custom_start: Option<String>,
    pub custom_end: Option<String>,
}

impl ExportRequest {
    /// Resolve the request's date window relative to `now`.
    ///
    /// # Errors
    /// Returns [Error::InvalidExportRange] for an invalid custom range.
    pub fn plan(&self, now: OffsetDateTime) -> Result<ExportPlan, Error> {
        let window = export_window(
            self.range,
            self.timezone,
            now,
            self.custom_start.as_deref(),
            self.custom_end.as_deref(),
        )?;

        Ok(ExportPlan {
            kind: self.kind,
            format: self.format,
            timezone: self.timezone,
            window,
            now,
        })
    }
}

/// A validated export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportPlan {
    pub kind: Collection,
    pub format: ExportFormat,
    pub timezone: ExportTimezone,
    pub window: ExportWindow,
    pub now: OffsetDateTime,
}

/// A generated file, ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No rows fall in the window, so no file was produced.
    Empty,
    File(ExportFile),
}

/// Keep the rows of `table` that fall in the plan's window and serialize
/// them.
///
/// # Errors
/// Returns an error if the rows cannot be serialized.
pub fn build_export(table: &ExportTable, plan: &ExportPlan) -> Result<ExportOutcome, Error> {
    let rows = table
        .rows
        .iter()
        .filter(|row| plan.window.contains(row.timestamp))
        .collect::<Vec<_>>();

    if rows.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    let bytes = plan.format.encode(table.headers, &rows)?;

    Ok(ExportOutcome::File(ExportFile {
        filename: export_filename(plan.kind, plan.format, plan.timezone, plan.now),
        content_type: plan.format.content_type(),
        bytes,
    }))
}

/// `{prefix}-{YYYY-MM-DD}.{ext}`, dated "now" in the export timezone.
pub fn export_filename(
    kind: Collection,
    format: ExportFormat,
    timezone: ExportTimezone,
    now: OffsetDateTime,
) -> String {
    let date = now.to_offset(timezone.offset()).date();

    format!(
        "{}-{}.{}",
        kind.export_prefix(),
        date,
        format.extension()
    )
}
