//! Pure view state: filters + roster + fetch generations.
//!
//! No I/O lives here. The controller owns one `ScheduleState` and drives
//! it from events; every method is synchronous, so the whole
//! request-shaping layer is unit-testable without a runtime or a live UI.
//!
//! The generation counter is the stale-response guard: every filter
//! change bumps it, every issued query is stamped with it, and a fetch
//! result is applied only if its stamp still matches. Responses that
//! resolve out of order can therefore never clobber a newer result.

use chrono::NaiveDate;

use crate::filters::{AppointmentQuery, DateTab, FilterState};
use crate::models::{Appointment, AppointmentStatus};
use crate::roster::{AppointmentRoster, DayStats};

pub struct ScheduleState {
    filters: FilterState,
    roster: AppointmentRoster,
    generation: u64,
}

impl ScheduleState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            filters: FilterState::new(today),
            roster: AppointmentRoster::new(),
            generation: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn roster(&self) -> &AppointmentRoster {
        &self.roster
    }

    // ── Filter mutations ────────────────────────────────────
    // Each one invalidates any outstanding query.

    pub fn select_tab(&mut self, tab: DateTab) {
        self.filters.active_tab = tab;
        self.generation += 1;
    }

    /// Calendar click: pins the date and implicitly enters `Custom`.
    /// `Custom` then persists until an explicit tab click leaves it.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.filters.selected_date = date;
        self.filters.active_tab = DateTab::Custom;
        self.generation += 1;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filters.search_query = query.into();
        self.generation += 1;
    }

    pub fn set_status_filter(&mut self, status: Option<AppointmentStatus>) {
        self.filters.status_filter = status;
        self.generation += 1;
    }

    pub fn set_doctor_filter(&mut self, doctor: Option<String>) {
        self.filters.doctor_filter = doctor;
        self.generation += 1;
    }

    // ── Fetch lifecycle ─────────────────────────────────────

    /// Compose the query for the current selection, stamped with the
    /// current generation.
    pub fn issue(&self, today: NaiveDate) -> (u64, AppointmentQuery) {
        (self.generation, self.filters.compose(today))
    }

    /// Accept a fetch result iff the filters have not changed since its
    /// query was issued. Returns whether the records were applied.
    pub fn apply_fetch(&mut self, generation: u64, records: Vec<Appointment>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.roster.replace(records);
        true
    }

    // ── Status lifecycle ────────────────────────────────────

    /// The status a remote update should request for this record, per the
    /// transition table. `None` when the id is not in the held set.
    pub fn advance_target(&self, id: &str) -> Option<AppointmentStatus> {
        self.roster.get(id).map(|apt| apt.status.advance())
    }

    /// Patch a record in place after the remote update confirmed.
    pub fn apply_status_update(&mut self, id: &str, status: AppointmentStatus) -> bool {
        self.roster.set_status(id, status)
    }

    pub fn stats(&self, today: NaiveDate) -> DayStats {
        self.roster.stats(today)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn apt(id: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            name: format!("Patient {id}"),
            date: date(2024, 6, 10),
            time: "09:00 AM".into(),
            duration: "30 min".into(),
            doctor_name: "Dr. Smith".into(),
            mode: "In-Person".into(),
            status,
            reason: None,
            note: None,
            phone: None,
            email: None,
        }
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let today = date(2024, 6, 10);
        let mut state = ScheduleState::new(today);

        // Q1 issued under the Today tab.
        state.select_tab(DateTab::Today);
        let (gen1, _) = state.issue(today);

        // Filters change before Q1 resolves; Q2 issued under Past.
        state.select_tab(DateTab::Past);
        let (gen2, _) = state.issue(today);

        // Q2 resolves first and is applied.
        assert!(state.apply_fetch(gen2, vec![apt("past", AppointmentStatus::Completed)]));
        // Q1 resolves late and must not overwrite Q2's records.
        assert!(!state.apply_fetch(gen1, vec![apt("today", AppointmentStatus::Confirmed)]));

        assert!(state.roster().get("past").is_some());
        assert!(state.roster().get("today").is_none());
    }

    #[test]
    fn every_filter_mutation_invalidates_the_issued_query() {
        let today = date(2024, 6, 10);
        let mut state = ScheduleState::new(today);

        let mutations: [&dyn Fn(&mut ScheduleState); 5] = [
            &|s| s.select_tab(DateTab::All),
            &|s| s.select_date(date(2024, 6, 21)),
            &|s| s.set_search("app"),
            &|s| s.set_status_filter(Some(AppointmentStatus::Confirmed)),
            &|s| s.set_doctor_filter(Some("Dr. Jones".into())),
        ];

        for mutate in mutations {
            let (generation, _) = state.issue(today);
            mutate(&mut state);
            assert!(!state.apply_fetch(generation, vec![]));
        }
    }

    #[test]
    fn current_fetch_is_applied() {
        let today = date(2024, 6, 10);
        let mut state = ScheduleState::new(today);
        let (generation, _) = state.issue(today);
        assert!(state.apply_fetch(generation, vec![apt("1", AppointmentStatus::Scheduled)]));
        assert_eq!(state.roster().len(), 1);
    }

    #[test]
    fn calendar_click_enters_custom() {
        let today = date(2024, 6, 10);
        let mut state = ScheduleState::new(today);
        state.select_date(date(2024, 6, 21));

        assert_eq!(state.filters().active_tab, DateTab::Custom);
        let (_, query) = state.issue(today);
        assert_eq!(query.date, Some(date(2024, 6, 21)));
    }

    #[test]
    fn custom_persists_across_non_calendar_changes() {
        let today = date(2024, 6, 10);
        let mut state = ScheduleState::new(today);
        state.select_date(date(2024, 6, 21));

        state.set_search("roe");
        state.set_status_filter(Some(AppointmentStatus::Scheduled));

        // The pinned date keeps applying until an explicit tab click.
        assert_eq!(state.filters().active_tab, DateTab::Custom);
        let (_, query) = state.issue(today);
        assert_eq!(query.date, Some(date(2024, 6, 21)));
        assert_eq!(query.search_query.as_deref(), Some("roe"));

        state.select_tab(DateTab::Today);
        let (_, query) = state.issue(today);
        assert_eq!(query.date, Some(today));
    }

    #[test]
    fn advance_target_follows_the_table() {
        let today = date(2024, 6, 10);
        let mut state = ScheduleState::new(today);
        let (generation, _) = state.issue(today);
        state.apply_fetch(
            generation,
            vec![
                apt("s", AppointmentStatus::Scheduled),
                apt("co", AppointmentStatus::Confirmed),
                apt("d", AppointmentStatus::Completed),
                apt("x", AppointmentStatus::Cancelled),
            ],
        );

        assert_eq!(state.advance_target("s"), Some(AppointmentStatus::Confirmed));
        assert_eq!(state.advance_target("co"), Some(AppointmentStatus::Completed));
        assert_eq!(state.advance_target("d"), Some(AppointmentStatus::Confirmed));
        assert_eq!(state.advance_target("x"), Some(AppointmentStatus::Confirmed));
        assert_eq!(state.advance_target("ghost"), None);
    }

    #[test]
    fn unapplied_update_leaves_the_record_unchanged() {
        let today = date(2024, 6, 10);
        let mut state = ScheduleState::new(today);
        let (generation, _) = state.issue(today);
        state.apply_fetch(generation, vec![apt("d", AppointmentStatus::Completed)]);

        // The remote call failed: apply_status_update is never invoked.
        assert_eq!(
            state.roster().get("d").unwrap().status,
            AppointmentStatus::Completed
        );
    }

    #[test]
    fn status_update_does_not_touch_the_generation() {
        let today = date(2024, 6, 10);
        let mut state = ScheduleState::new(today);
        let (generation, _) = state.issue(today);
        state.apply_fetch(generation, vec![apt("s", AppointmentStatus::Scheduled)]);

        state.apply_status_update("s", AppointmentStatus::Confirmed);

        // A status patch is not a filter change; the same query generation
        // remains valid.
        assert!(state.apply_fetch(generation, vec![]));
    }
}
