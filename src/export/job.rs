//! Runs at most one export at a time in the background.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use time::OffsetDateTime;
use tokio::task::JoinHandle;

use crate::Error;

use super::{
    build::{ExportFile, ExportRequest, build_export},
    dialog::ExportDialog,
    table::ExportTable,
};

/// How long an export takes before its outcome is shown.
pub const DEFAULT_EXPORT_DELAY: Duration = Duration::from_millis(900);

/// Settings for [ExportJobs].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    /// How long an export waits before building its file.
    pub delay: Duration,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_EXPORT_DELAY,
        }
    }
}

#[derive(Debug, Default)]
struct ExportSlot {
    dialog: ExportDialog,
    /// Bumped whenever an export is started or cancelled. A task only stores
    /// its outcome if the generation has not moved on since it was spawned.
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl ExportSlot {
    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
    }
}

/// The export dialog and the single in-flight export task.
///
/// Clones share the same slot.
#[derive(Debug, Clone)]
pub struct ExportJobs {
    config: ExportConfig,
    slot: Arc<Mutex<ExportSlot>>,
}

impl ExportJobs {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            slot: Arc::new(Mutex::new(ExportSlot::default())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ExportSlot>, Error> {
        self.slot
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire export lock: {error}"))
            .map_err(|_| Error::StateLockError)
    }

    /// A snapshot of the dialog.
    pub fn dialog(&self) -> Result<ExportDialog, Error> {
        Ok(self.lock()?.dialog.clone())
    }

    pub fn open(&self, request: ExportRequest) -> Result<ExportDialog, Error> {
        let mut slot = self.lock()?;
        slot.dialog.open(request)?;

        Ok(slot.dialog.clone())
    }

    /// Validate `request` and, if it is valid, schedule the export of `table`.
    ///
    /// Any export that is still pending is aborted first and its outcome is
    /// discarded. An invalid request leaves the form open with the reason
    /// and nothing is scheduled.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns [Error::InvalidExportRange] if the request is invalid, or
    /// [Error::InvalidExportTransition] if the dialog is not showing the form.
    pub fn start(
        &self,
        request: ExportRequest,
        table: ExportTable,
        now: OffsetDateTime,
    ) -> Result<(), Error> {
        let plan = request.plan(now);
        let mut slot = self.lock()?;

        let plan = match plan {
            Ok(plan) => plan,
            Err(Error::InvalidExportRange(reason)) => {
                slot.dialog.reject(request, reason.clone())?;
                return Err(Error::InvalidExportRange(reason));
            }
            Err(error) => return Err(error),
        };

        slot.dialog.start_loading(request)?;
        slot.abort_task();
        let generation = slot.generation;

        let delay = self.config.delay;
        let shared_slot = self.slot.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let outcome = build_export(&table, &plan);

            let Ok(mut slot) = shared_slot.lock() else {
                tracing::error!("could not acquire export lock to store the outcome");
                return;
            };

            if slot.generation != generation {
                tracing::debug!("discarding the outcome of superseded export #{generation}");
                return;
            }

            slot.task = None;
            match outcome {
                Ok(outcome) => {
                    if let Err(error) = slot.dialog.finish(outcome) {
                        tracing::warn!("could not store export outcome: {error}");
                    }
                }
                Err(error) => {
                    tracing::error!("export #{generation} failed: {error}");
                    slot.dialog.close();
                }
            }
        });

        tracing::debug!("scheduled export #{generation}");
        slot.task = Some(task);

        Ok(())
    }

    /// Abort any pending export and close the dialog. Also dismisses a
    /// finished export.
    pub fn close(&self) -> Result<(), Error> {
        let mut slot = self.lock()?;

        if slot.task.is_some() {
            tracing::debug!("cancelling export #{}", slot.generation);
        }
        slot.abort_task();
        slot.dialog.close();

        Ok(())
    }

    /// The file of the last successful export.
    ///
    /// # Errors
    /// Returns [Error::ExportNotReady] unless the dialog shows a successful export.
    pub fn download(&self) -> Result<ExportFile, Error> {
        match &self.lock()?.dialog {
            ExportDialog::Success(file) => Ok(file.clone()),
            _ => Err(Error::ExportNotReady),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use time::{UtcOffset, macros::datetime};

    use crate::{
        Error,
        collection::Collection,
        customer::CustomerIndex,
        export::{
            ExportDialog, ExportRequest, encode::ExportFormat, range::ExportRange, table::ExportTable,
        },
        filter::{FilterState, apply_filter},
        seed::{demo_customers, demo_payments},
    };

    use super::{ExportConfig, ExportJobs};

    const DELAY: Duration = Duration::from_millis(20);
    const WAIT: Duration = Duration::from_millis(200);

    fn jobs() -> ExportJobs {
        ExportJobs::new(ExportConfig { delay: DELAY })
    }

    fn table(query: &str) -> ExportTable {
        let payments = demo_payments();
        let customers = demo_customers();
        let index = CustomerIndex::new(&customers);
        let mut state = FilterState::default();
        state.set_query(query);

        ExportTable::from_payments(&apply_filter(&payments, &index, &state, UtcOffset::UTC))
    }

    fn request() -> ExportRequest {
        ExportRequest {
            kind: Collection::Payments,
            format: ExportFormat::Csv,
            range: ExportRange::All,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn finished_export_can_be_downloaded_repeatedly() {
        let jobs = jobs();
        jobs.open(request()).unwrap();

        jobs.start(request(), table(""), datetime!(2026-01-20 15:00 -5))
            .unwrap();
        assert!(matches!(
            jobs.dialog().unwrap(),
            ExportDialog::Loading { .. }
        ));
        assert_eq!(jobs.download(), Err(Error::ExportNotReady));
        tokio::time::sleep(WAIT).await;

        let first = jobs.download().unwrap();
        let second = jobs.download().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.filename, "cobros-cuenta-bancaria-2026-01-20.csv");
    }

    #[tokio::test]
    async fn empty_view_finishes_as_empty() {
        let jobs = jobs();
        jobs.open(request()).unwrap();

        jobs.start(
            request(),
            table("zzz-nonexistent"),
            datetime!(2026-01-20 15:00 -5),
        )
        .unwrap();
        tokio::time::sleep(WAIT).await;

        assert_eq!(jobs.dialog().unwrap(), ExportDialog::Empty);
        assert_eq!(jobs.download(), Err(Error::ExportNotReady));
    }

    #[tokio::test]
    async fn cancelled_export_produces_nothing() {
        let jobs = jobs();
        jobs.open(request()).unwrap();
        jobs.start(request(), table(""), datetime!(2026-01-20 15:00 -5))
            .unwrap();

        jobs.close().unwrap();
        tokio::time::sleep(WAIT).await;

        assert_eq!(jobs.dialog().unwrap(), ExportDialog::Closed);
        assert_eq!(jobs.download(), Err(Error::ExportNotReady));
    }

    #[tokio::test]
    async fn restarted_export_supersedes_cancelled_one() {
        let jobs = jobs();
        jobs.open(request()).unwrap();
        jobs.start(
            request(),
            table("zzz-nonexistent"),
            datetime!(2026-01-20 15:00 -5),
        )
        .unwrap();
        jobs.close().unwrap();

        jobs.open(request()).unwrap();
        jobs.start(request(), table(""), datetime!(2026-01-20 15:00 -5))
            .unwrap();
        tokio::time::sleep(WAIT).await;

        assert!(matches!(jobs.dialog().unwrap(), ExportDialog::Success(_)));
    }

    #[tokio::test]
    async fn invalid_custom_range_is_rejected_before_scheduling() {
        let jobs = jobs();
        jobs.open(request()).unwrap();
        let invalid = ExportRequest {
            range: ExportRange::Custom,
            custom_start: Some("2026-01-20".to_owned()),
            custom_end: Some("2026-01-10".to_owned()),
            ..request()
        };

        let result = jobs.start(invalid.clone(), table(""), datetime!(2026-01-20 15:00 -5));

        assert!(matches!(result, Err(Error::InvalidExportRange(_))));
        let ExportDialog::Form { request, error } = jobs.dialog().unwrap() else {
            panic!("want the form to stay open");
        };
        assert_eq!(request, invalid);
        assert!(error.is_some());
        tokio::time::sleep(WAIT).await;
        assert!(matches!(jobs.dialog().unwrap(), ExportDialog::Form { .. }));
    }

    #[tokio::test]
    async fn custom_range_ending_on_last_representable_day_keeps_jobs_usable() {
        let jobs = jobs();
        jobs.open(request()).unwrap();
        let far_future = ExportRequest {
            range: ExportRange::Custom,
            custom_start: Some("2026-01-01".to_owned()),
            custom_end: Some("9999-12-31".to_owned()),
            ..request()
        };

        let result = jobs.start(far_future, table(""), datetime!(2026-01-20 15:00 -5));

        assert!(matches!(result, Err(Error::InvalidExportRange(_))));
        assert!(matches!(
            jobs.dialog().unwrap(),
            ExportDialog::Form { error: Some(_), .. }
        ));
        jobs.close().unwrap();
        assert_eq!(jobs.dialog().unwrap(), ExportDialog::Closed);
    }

    #[tokio::test]
    async fn starting_twice_without_the_form_is_rejected() {
        let jobs = jobs();
        jobs.open(request()).unwrap();
        jobs.start(request(), table(""), datetime!(2026-01-20 15:00 -5))
            .unwrap();

        let result = jobs.start(request(), table(""), datetime!(2026-01-20 15:00 -5));

        assert!(matches!(
            result,
            Err(Error::InvalidExportTransition { .. })
        ));
    }
}
