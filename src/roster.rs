//! The held record set and its derived statistics.
//!
//! The roster is always exactly what the remote source returned for the
//! last accepted query — a fetch replaces the whole set, never merges.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, AppointmentStatus};

// ─── Derived statistics ───────────────────────────────────────────────────────

/// Summary counts over the held record set. Recomputed on demand —
/// never cached across replacements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    /// Appointments dated today.
    pub today: u32,
    /// Appointments currently `Confirmed`.
    pub confirmed: u32,
    /// Appointments still `Scheduled`, awaiting confirmation.
    pub upcoming: u32,
    /// Appointments held over a video mode.
    pub telemedicine: u32,
}

// ─── Roster ───────────────────────────────────────────────────────────────────

/// Owns the fetched record set.
#[derive(Debug, Clone, Default)]
pub struct AppointmentRoster {
    records: Vec<Appointment>,
}

impl AppointmentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set with a fresh fetch result, in service order.
    pub fn replace(&mut self, records: Vec<Appointment>) {
        self.records = records;
    }

    pub fn records(&self) -> &[Appointment] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.records.iter().find(|apt| apt.id == id)
    }

    /// Patch one record's status in place. Returns `false` when the id is
    /// not in the held set.
    pub fn set_status(&mut self, id: &str, status: AppointmentStatus) -> bool {
        match self.records.iter_mut().find(|apt| apt.id == id) {
            Some(apt) => {
                apt.status = status;
                true
            }
            None => false,
        }
    }

    /// Reduce the held set to its summary counts.
    pub fn stats(&self, today: NaiveDate) -> DayStats {
        let mut stats = DayStats::default();
        for apt in &self.records {
            if apt.date == today {
                stats.today += 1;
            }
            match apt.status {
                AppointmentStatus::Confirmed => stats.confirmed += 1,
                AppointmentStatus::Scheduled => stats.upcoming += 1,
                AppointmentStatus::Completed | AppointmentStatus::Cancelled => {}
            }
            if apt.is_telemedicine() {
                stats.telemedicine += 1;
            }
        }
        stats
    }

    /// Distinct provider names, sorted — options for the doctor dropdown.
    pub fn doctor_names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|apt| apt.doctor_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
