//! Named date windows that bound which rows are exported.

use std::fmt::Display;

use serde::Deserialize;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::{Error, timezone::parse_date};

/// The timezone export windows and file names are computed in.
///
/// Only fixed offsets are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ExportTimezone {
    #[default]
    #[serde(rename = "GMT-5")]
    GmtMinus5,
    #[serde(rename = "UTC")]
    Utc,
}

impl ExportTimezone {
    pub const ALL: [ExportTimezone; 2] = [ExportTimezone::GmtMinus5, ExportTimezone::Utc];

    pub fn offset(self) -> UtcOffset {
        match self {
            Self::GmtMinus5 => GMT_MINUS_5,
            Self::Utc => UtcOffset::UTC,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GmtMinus5 => "GMT-5",
            Self::Utc => "UTC",
        }
    }
}

impl Display for ExportTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const GMT_MINUS_5: UtcOffset = match UtcOffset::from_hms(-5, 0, 0) {
    Ok(offset) => offset,
    Err(_) => panic!("-05:00 is a valid offset"),
};

/// A named export window, relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportRange {
    Today,
    CurrentMonth,
    #[serde(rename = "last-7-days")]
    Last7Days,
    #[serde(rename = "last-4-weeks")]
    Last4Weeks,
    LastMonth,
    #[default]
    All,
    Custom,
}

impl ExportRange {
    pub const ALL: [ExportRange; 7] = [
        ExportRange::Today,
        ExportRange::CurrentMonth,
        ExportRange::Last7Days,
        ExportRange::Last4Weeks,
        ExportRange::LastMonth,
        ExportRange::All,
        ExportRange::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::CurrentMonth => "current-month",
            Self::Last7Days => "last-7-days",
            Self::Last4Weeks => "last-4-weeks",
            Self::LastMonth => "last-month",
            Self::All => "all",
            Self::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Hoy",
            Self::CurrentMonth => "Mes actual",
            Self::Last7Days => "Últimos 7 días",
            Self::Last4Weeks => "Últimas 4 semanas",
            Self::LastMonth => "Mes pasado",
            Self::All => "Todo",
            Self::Custom => "Personalizado",
        }
    }
}

/// The inclusive bounds of an export. `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportWindow {
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

impl ExportWindow {
    pub const UNBOUNDED: ExportWindow = ExportWindow {
        start: None,
        end: None,
    };

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a row with `timestamp` falls in the window.
    ///
    /// An unbounded window contains every row, even those without a
    /// timestamp. A bounded window never contains a row without one.
    pub fn contains(&self, timestamp: Option<OffsetDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }

        timestamp.is_some_and(|timestamp| {
            self.start.is_none_or(|start| timestamp >= start)
                && self.end.is_none_or(|end| timestamp <= end)
        })
    }
}

/// Compute the window for `range` as seen from `now` in `timezone`.
///
/// The custom range needs both dates as `YYYY-MM-DD` and the start must not
/// be after the end. The dates are never swapped. Its window runs from the
/// start of the first day to the last millisecond of the last day.
///
/// # Errors
/// Returns [Error::InvalidExportRange] if the custom range is missing a
/// bound, has a malformed date, ends before it starts or ends on the last
/// representable day.
pub fn export_window(
    range: ExportRange,
    timezone: ExportTimezone,
    now: OffsetDateTime,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
) -> Result<ExportWindow, Error> {
    let offset = timezone.offset();
    let now = now.to_offset(offset);
    let today = now.date();
    let start_of = |date: Date| date.midnight().assume_offset(offset);
    let first_of_month = today.saturating_sub(Duration::days(i64::from(today.day()) - 1));

    let window = match range {
        ExportRange::Today => bounded(start_of(today), now),
        ExportRange::CurrentMonth => bounded(start_of(first_of_month), now),
        ExportRange::Last7Days => bounded(start_of(today.saturating_sub(Duration::days(6))), now),
        ExportRange::Last4Weeks => {
            bounded(start_of(today.saturating_sub(Duration::days(27))), now)
        }
        ExportRange::LastMonth => {
            let last_of_previous_month = first_of_month.saturating_sub(Duration::days(1));
            let first_of_previous_month = last_of_previous_month
                .saturating_sub(Duration::days(i64::from(last_of_previous_month.day()) - 1));

            bounded(
                start_of(first_of_previous_month),
                start_of(first_of_month) - Duration::milliseconds(1),
            )
        }
        ExportRange::All => ExportWindow::UNBOUNDED,
        ExportRange::Custom => {
            let (start, end) = parse_custom_range(custom_start, custom_end)?;
            let after_end = end.next_day().ok_or_else(end_out_of_range)?;

            bounded(
                start_of(start),
                start_of(after_end) - Duration::milliseconds(1),
            )
        }
    };

    Ok(window)
}

fn bounded(start: OffsetDateTime, end: OffsetDateTime) -> ExportWindow {
    ExportWindow {
        start: Some(start),
        end: Some(end),
    }
}

/// Validate the two dates of a custom range.
///
/// # Errors
/// Returns [Error::InvalidExportRange] with a message that can be shown next
/// to the date inputs.
pub fn parse_custom_range(
    custom_start: Option<&str>,
    custom_end: Option<&str>,
) -> Result<(Date, Date), Error> {
    fn non_empty(text: Option<&str>) -> Option<&str> {
        text.map(str::trim).filter(|text| !text.is_empty())
    }

    let (Some(start), Some(end)) = (non_empty(custom_start), non_empty(custom_end)) else {
        return Err(Error::InvalidExportRange(
            "Selecciona la fecha de inicio y la fecha de fin.".to_owned(),
        ));
    };

    let (Some(start_date), Some(end_date)) = (parse_date(start), parse_date(end)) else {
        return Err(Error::InvalidExportRange(format!(
            "Las fechas deben tener el formato AAAA-MM-DD, se recibió \"{start}\" y \"{end}\"."
        )));
    };

    if start_date > end_date {
        return Err(Error::InvalidExportRange(
            "La fecha de inicio no puede ser posterior a la fecha de fin.".to_owned(),
        ));
    }

    if end_date.next_day().is_none() {
        return Err(end_out_of_range());
    }

    Ok((start_date, end_date))
}

fn end_out_of_range() -> Error {
    Error::InvalidExportRange("La fecha de fin está fuera del rango permitido.".to_owned())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{ExportRange, ExportTimezone, ExportWindow, export_window, parse_custom_range};

    fn window(range: ExportRange) -> ExportWindow {
        export_window(
            range,
            ExportTimezone::GmtMinus5,
            datetime!(2026-01-20 15:00 -5),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn today_starts_at_local_midnight() {
        assert_eq!(
            window(ExportRange::Today),
            ExportWindow {
                start: Some(datetime!(2026-01-20 00:00 -5)),
                end: Some(datetime!(2026-01-20 15:00 -5)),
            }
        );
    }

    #[test]
    fn last_7_days_includes_today() {
        assert_eq!(
            window(ExportRange::Last7Days),
            ExportWindow {
                start: Some(datetime!(2026-01-14 00:00 -5)),
                end: Some(datetime!(2026-01-20 15:00 -5)),
            }
        );
    }

    #[test]
    fn last_4_weeks_spans_28_days() {
        assert_eq!(
            window(ExportRange::Last4Weeks).start,
            Some(datetime!(2025-12-24 00:00 -5))
        );
    }

    #[test]
    fn current_month_starts_on_the_first() {
        assert_eq!(
            window(ExportRange::CurrentMonth).start,
            Some(datetime!(2026-01-01 00:00 -5))
        );
    }

    #[test]
    fn last_month_crosses_year_boundary() {
        assert_eq!(
            window(ExportRange::LastMonth),
            ExportWindow {
                start: Some(datetime!(2025-12-01 00:00 -5)),
                end: Some(datetime!(2025-12-31 23:59:59.999 -5)),
            }
        );
    }

    #[test]
    fn all_is_unbounded() {
        assert_eq!(window(ExportRange::All), ExportWindow::UNBOUNDED);
    }

    #[test]
    fn utc_uses_the_utc_calendar_day() {
        let window = export_window(
            ExportRange::Today,
            ExportTimezone::Utc,
            datetime!(2026-01-20 21:30 -5),
            None,
            None,
        )
        .unwrap();

        assert_eq!(window.start, Some(datetime!(2026-01-21 00:00 UTC)));
    }

    #[test]
    fn custom_range_covers_whole_days() {
        let window = export_window(
            ExportRange::Custom,
            ExportTimezone::GmtMinus5,
            datetime!(2026-01-20 15:00 -5),
            Some("2026-01-10"),
            Some("2026-01-12"),
        )
        .unwrap();

        assert_eq!(
            window,
            ExportWindow {
                start: Some(datetime!(2026-01-10 00:00 -5)),
                end: Some(datetime!(2026-01-12 23:59:59.999 -5)),
            }
        );
    }

    #[test]
    fn custom_range_ending_before_start_is_rejected() {
        let result = export_window(
            ExportRange::Custom,
            ExportTimezone::GmtMinus5,
            datetime!(2026-01-20 15:00 -5),
            Some("2026-01-20"),
            Some("2026-01-10"),
        );

        assert!(matches!(result, Err(Error::InvalidExportRange(_))));
    }

    #[test]
    fn custom_range_missing_or_malformed_bound_is_rejected() {
        for (start, end) in [
            (None, Some("2026-01-10")),
            (Some("2026-01-10"), Some("  ")),
            (Some("10/01/2026"), Some("2026-01-12")),
        ] {
            let result = export_window(
                ExportRange::Custom,
                ExportTimezone::Utc,
                datetime!(2026-01-20 15:00 UTC),
                start,
                end,
            );

            assert!(
                matches!(result, Err(Error::InvalidExportRange(_))),
                "want error for {start:?}..{end:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn custom_range_ending_on_last_representable_day_is_rejected() {
        let result = export_window(
            ExportRange::Custom,
            ExportTimezone::GmtMinus5,
            datetime!(2026-01-20 15:00 -5),
            Some("2026-01-01"),
            Some("9999-12-31"),
        );

        assert!(matches!(result, Err(Error::InvalidExportRange(_))));
        assert!(parse_custom_range(Some("2026-01-01"), Some("9999-12-31")).is_err());
    }

    #[test]
    fn custom_range_ending_on_day_before_last_is_accepted() {
        let window = export_window(
            ExportRange::Custom,
            ExportTimezone::Utc,
            datetime!(2026-01-20 15:00 UTC),
            Some("2026-01-01"),
            Some("9999-12-30"),
        )
        .unwrap();

        assert_eq!(window.end, Some(datetime!(9999-12-30 23:59:59.999 UTC)));
    }

    #[test]
    fn bounded_window_excludes_rows_without_timestamp() {
        let window = window(ExportRange::Today);

        assert!(!window.contains(None));
        assert!(window.contains(Some(datetime!(2026-01-20 08:00 -5))));
        assert!(!window.contains(Some(datetime!(2026-01-19 23:59 -5))));
        assert!(ExportWindow::UNBOUNDED.contains(None));
    }
}
