//! The per-tab filter state and the rules for toggling filter chips.

use serde::Deserialize;
use time::Date;

use super::RecordStatus;

/// A filter chip that can be toggled on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Filter by creation date.
    Created,
    /// Filter by status.
    Status,
}

/// Which filter chips are switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterToggles {
    pub created: bool,
    pub status: bool,
}

/// Everything that determines the filtered view of one collection.
///
/// The fields are private so that the chip side effects (opening the date
/// picker, resetting the selected status) cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState<S> {
    query: String,
    toggles: FilterToggles,
    /// `None` is the "all statuses" sentinel.
    selected_status: Option<S>,
    selected_date: Option<Date>,
    date_picker_open: bool,
}

impl<S> Default for FilterState<S> {
    fn default() -> Self {
        Self {
            query: String::new(),
            toggles: FilterToggles::default(),
            selected_status: None,
            selected_date: None,
            date_picker_open: false,
        }
    }
}

impl<S: RecordStatus> FilterState<S> {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn toggles(&self) -> FilterToggles {
        self.toggles
    }

    pub fn selected_status(&self) -> Option<S> {
        self.selected_status
    }

    pub fn selected_date(&self) -> Option<Date> {
        self.selected_date
    }

    pub fn is_date_picker_open(&self) -> bool {
        self.date_picker_open
    }

    /// The status to filter by, if the status filter is in effect.
    pub fn active_status(&self) -> Option<S> {
        if self.toggles.status {
            self.selected_status
        } else {
            None
        }
    }

    /// The date to filter by, if the date filter is in effect.
    pub fn active_date(&self) -> Option<Date> {
        if self.toggles.created {
            self.selected_date
        } else {
            None
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn toggle(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Created => self.toggle_created(),
            FilterKind::Status => self.toggle_status(),
        }
    }

    /// Switching the date chip on opens the picker; switching it off clears
    /// the selected date and closes the picker.
    pub fn toggle_created(&mut self) {
        self.toggles.created = !self.toggles.created;

        if self.toggles.created {
            self.date_picker_open = true;
        } else {
            self.selected_date = None;
            self.date_picker_open = false;
        }
    }

    /// Switching the status chip on resets the selection to "all".
    pub fn toggle_status(&mut self) {
        self.toggles.status = !self.toggles.status;

        if self.toggles.status {
            self.selected_status = None;
        }
    }

    /// Select the day to filter by and close the picker.
    ///
    /// Ignored while the date chip is off.
    pub fn select_date(&mut self, date: Option<Date>) {
        if !self.toggles.created {
            tracing::debug!("ignoring date selection while the date filter is off");
            return;
        }

        self.selected_date = date;
        self.date_picker_open = false;
    }

    /// Select the status to filter by. `None` selects every status.
    pub fn select_status(&mut self, status: Option<S>) {
        self.selected_status = status;
    }
}
