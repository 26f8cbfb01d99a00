//! Event-driven shell around `ScheduleState`.
//!
//! One task owns the state; view events arrive on a channel; a single
//! debounce timer coalesces filter changes; fetches and status updates
//! run as spawned tasks whose completions come back through an internal
//! channel stamped with the generation they were issued under. The
//! rendering layer holds a cheap `ScheduleHandle` and reads published
//! `ScheduleSnapshot`s — it never touches the state directly.
//!
//! Teardown is channel closure: dropping every handle ends the loop,
//! which cancels the pending debounce timer and guarantees no completion
//! is applied afterwards.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Duration, Instant};

use crate::api::ScheduleApi;
use crate::config;
use crate::filters::{DateTab, FilterState};
use crate::models::{Appointment, AppointmentStatus};
use crate::roster::DayStats;
use crate::schedule::ScheduleState;

// ─── Events & snapshots ───────────────────────────────────────────────────────

/// User interactions the view forwards to the controller.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    SelectTab(DateTab),
    /// Calendar click — pins the date and enters `Custom`.
    SelectDate(NaiveDate),
    SetSearch(String),
    SetStatusFilter(Option<AppointmentStatus>),
    SetDoctorFilter(Option<String>),
    /// Advance one appointment along the status lifecycle.
    AdvanceStatus(String),
    /// Cancel one appointment — the one transition `AdvanceStatus` never
    /// produces.
    CancelAppointment(String),
}

/// Completions delivered back into the event loop by spawned requests.
enum Completion {
    Fetch {
        generation: u64,
        records: Vec<Appointment>,
    },
    StatusUpdated {
        id: String,
        status: AppointmentStatus,
    },
}

/// Rendered state, published after every accepted change.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    pub filters: FilterState,
    pub appointments: Vec<Appointment>,
    pub stats: DayStats,
    /// Distinct provider names in the held set — doctor dropdown options.
    pub doctors: Vec<String>,
    pub is_loading: bool,
}

// ─── Handle ───────────────────────────────────────────────────────────────────

/// Cloneable handle held by the rendering layer. Dropping every clone
/// tears the controller down.
#[derive(Clone)]
pub struct ScheduleHandle {
    events: mpsc::UnboundedSender<ViewEvent>,
    snapshots: watch::Receiver<ScheduleSnapshot>,
}

impl ScheduleHandle {
    pub fn select_tab(&self, tab: DateTab) {
        self.send(ViewEvent::SelectTab(tab));
    }

    pub fn select_date(&self, date: NaiveDate) {
        self.send(ViewEvent::SelectDate(date));
    }

    pub fn set_search(&self, query: impl Into<String>) {
        self.send(ViewEvent::SetSearch(query.into()));
    }

    pub fn set_status_filter(&self, status: Option<AppointmentStatus>) {
        self.send(ViewEvent::SetStatusFilter(status));
    }

    pub fn set_doctor_filter(&self, doctor: Option<String>) {
        self.send(ViewEvent::SetDoctorFilter(doctor));
    }

    pub fn advance_status(&self, id: impl Into<String>) {
        self.send(ViewEvent::AdvanceStatus(id.into()));
    }

    pub fn cancel_appointment(&self, id: impl Into<String>) {
        self.send(ViewEvent::CancelAppointment(id.into()));
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> ScheduleSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait for the next snapshot publication.
    pub async fn changed(&mut self) {
        // An error means the controller is gone; the caller will see the
        // final snapshot and stop.
        let _ = self.snapshots.changed().await;
    }

    fn send(&self, event: ViewEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!("Schedule controller is gone; event dropped");
        }
    }
}

// ─── Controller ───────────────────────────────────────────────────────────────

/// The event loop. Owns the state; everything reaches it via channels.
pub struct ScheduleController<A> {
    api: Arc<A>,
    state: ScheduleState,
    debounce: Duration,
    today: fn() -> NaiveDate,
    events: mpsc::UnboundedReceiver<ViewEvent>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    snapshot_tx: watch::Sender<ScheduleSnapshot>,
    /// Armed by every filter change; firing issues one fetch.
    deadline: Option<Instant>,
    /// Generation of the most recently issued, still-unresolved fetch.
    in_flight: Option<u64>,
}

impl<A: ScheduleApi + 'static> ScheduleController<A> {
    /// Spawn a controller with the production clock and debounce window.
    pub fn spawn(api: A) -> ScheduleHandle {
        Self::spawn_with(api, config::debounce_window(), || Local::now().date_naive())
    }

    /// Spawn with an explicit debounce window and date source — the seam
    /// deterministic tests drive.
    pub fn spawn_with(api: A, debounce: Duration, today: fn() -> NaiveDate) -> ScheduleHandle {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let state = ScheduleState::new(today());
        let initial = ScheduleSnapshot {
            filters: state.filters().clone(),
            appointments: Vec::new(),
            stats: DayStats::default(),
            doctors: Vec::new(),
            is_loading: false,
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let controller = Self {
            api: Arc::new(api),
            state,
            debounce,
            today,
            events: event_rx,
            completion_tx,
            completions: completion_rx,
            snapshot_tx,
            // Initial load goes through the same debounce path as any
            // filter change.
            deadline: Some(Instant::now() + debounce),
            in_flight: None,
        };
        tokio::spawn(controller.run());

        ScheduleHandle {
            events: event_tx,
            snapshots: snapshot_rx,
        }
    }

    async fn run(mut self) {
        tracing::info!("Schedule controller started");
        loop {
            tokio::select! {
                maybe_event = self.events.recv() => match maybe_event {
                    Some(event) => self.on_event(event),
                    // Every handle dropped: the view is gone. The pending
                    // debounce dies with the loop, and in-flight
                    // completions are never applied.
                    None => break,
                },
                _ = Self::at(self.deadline), if self.deadline.is_some() => {
                    self.deadline = None;
                    self.issue_fetch();
                }
                Some(completion) = self.completions.recv() => {
                    self.on_completion(completion);
                }
            }
        }
        tracing::info!("Schedule controller stopped");
    }

    async fn at(deadline: Option<Instant>) {
        // The select! guard keeps this arm disabled while `None`.
        if let Some(deadline) = deadline {
            sleep_until(deadline).await;
        }
    }

    fn on_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SelectTab(tab) => {
                self.state.select_tab(tab);
                self.arm_debounce();
            }
            ViewEvent::SelectDate(date) => {
                self.state.select_date(date);
                self.arm_debounce();
            }
            ViewEvent::SetSearch(query) => {
                self.state.set_search(query);
                self.arm_debounce();
            }
            ViewEvent::SetStatusFilter(status) => {
                self.state.set_status_filter(status);
                self.arm_debounce();
            }
            ViewEvent::SetDoctorFilter(doctor) => {
                self.state.set_doctor_filter(doctor);
                self.arm_debounce();
            }
            ViewEvent::AdvanceStatus(id) => self.request_status(id, None),
            ViewEvent::CancelAppointment(id) => {
                self.request_status(id, Some(AppointmentStatus::Cancelled));
            }
        }
        self.publish();
    }

    /// One shared window, re-armed by every filter change: N changes
    /// inside the window collapse into a single fetch.
    fn arm_debounce(&mut self) {
        self.deadline = Some(Instant::now() + self.debounce);
    }

    fn issue_fetch(&mut self) {
        let (generation, query) = self.state.issue((self.today)());
        tracing::debug!("Issuing appointment fetch (generation {generation})");
        self.in_flight = Some(generation);
        self.publish();

        let api = Arc::clone(&self.api);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let records = match api.fetch_appointments(&query).await {
                Ok(records) => records,
                Err(e) => {
                    // Read-path failures degrade to an empty result set.
                    tracing::warn!("Appointment fetch failed: {e}");
                    Vec::new()
                }
            };
            let _ = tx.send(Completion::Fetch {
                generation,
                records,
            });
        });
    }

    fn request_status(&mut self, id: String, forced: Option<AppointmentStatus>) {
        let target = match forced {
            Some(status) if self.state.roster().get(&id).is_some() => Some(status),
            Some(_) => None,
            None => self.state.advance_target(&id),
        };
        let Some(status) = target else {
            tracing::warn!("Status change requested for unknown appointment {id}");
            return;
        };

        tracing::debug!("Requesting status {status} for appointment {id}");
        let api = Arc::clone(&self.api);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            match api.update_status(&id, status).await {
                Ok(updated) => {
                    let _ = tx.send(Completion::StatusUpdated {
                        id,
                        status: updated.status,
                    });
                }
                Err(e) => {
                    // Write-path failure: the record keeps its prior status.
                    tracing::warn!("Status update for appointment {id} failed: {e}");
                }
            }
        });
    }

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Fetch {
                generation,
                records,
            } => {
                if self.in_flight == Some(generation) {
                    self.in_flight = None;
                }
                if self.state.apply_fetch(generation, records) {
                    self.publish();
                } else {
                    tracing::debug!("Discarding stale fetch response (generation {generation})");
                }
            }
            Completion::StatusUpdated { id, status } => {
                if self.state.apply_status_update(&id, status) {
                    self.publish();
                }
            }
        }
    }

    fn publish(&self) {
        let snapshot = ScheduleSnapshot {
            filters: self.state.filters().clone(),
            appointments: self.state.roster().records().to_vec(),
            // Recomputed on every publish — never cached across replaces.
            stats: self.state.stats((self.today)()),
            doctors: self.state.roster().doctor_names(),
            is_loading: self.in_flight.is_some(),
        };
        let _ = self.snapshot_tx.send(snapshot);
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
