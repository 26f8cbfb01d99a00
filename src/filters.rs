//! Filter state and query composition.
//!
//! `FilterState` mirrors the view's controls; `compose()` maps it
//! deterministically onto the wire query. A field absent from the query
//! means "no constraint" — the service only filters on what it receives.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::AppointmentStatus;

// ─── Date tabs ────────────────────────────────────────────────────────────────

/// Coarse date bucket driving the primary date constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateTab {
    /// Strictly after today.
    Upcoming,
    Today,
    /// Strictly before today.
    Past,
    All,
    /// Entered implicitly when a calendar date is clicked; pins the query
    /// to `selected_date`.
    Custom,
}

// ─── Filter state ─────────────────────────────────────────────────────────────

/// The view's current selection. Lives for the lifetime of the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected_date: NaiveDate,
    pub active_tab: DateTab,
    pub search_query: String,
    /// `None` is the "All Status" sentinel.
    pub status_filter: Option<AppointmentStatus>,
    /// `None` is the "All Doctors" sentinel.
    pub doctor_filter: Option<String>,
}

impl FilterState {
    /// Initial selection: today's date, `Today` tab, no secondary filters.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_date: today,
            active_tab: DateTab::Today,
            search_query: String::new(),
            status_filter: None,
            doctor_filter: None,
        }
    }

    /// Build the wire query for the current selection.
    pub fn compose(&self, today: NaiveDate) -> AppointmentQuery {
        let mut query = AppointmentQuery::default();

        match self.active_tab {
            DateTab::Today => query.date = Some(today),
            DateTab::Upcoming => query.start_date = Some(today + Duration::days(1)),
            DateTab::Past => query.end_date = Some(today - Duration::days(1)),
            DateTab::All => {}
            DateTab::Custom => query.date = Some(self.selected_date),
        }

        if !self.search_query.is_empty() {
            query.search_query = Some(self.search_query.clone());
        }
        query.status = self.status_filter;
        query.doctor_name = self.doctor_filter.clone();

        query
    }
}

// ─── Wire query ───────────────────────────────────────────────────────────────

/// Query for `GET /appointments`. Each field constrains the result only
/// when present; `None` fields are omitted from the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
}

// ─── Tests ────────────────────────────────────────────────────────────────────
