//! Frontdesk — headless core of a clinic appointment console.
//!
//! Composes filter criteria from view interactions, fetches matching
//! appointments from the remote service, derives summary statistics, and
//! moves appointments through their status lifecycle. Rendering, the
//! remote store, and authentication are collaborators, not residents.

pub mod api;
pub mod calendar;
pub mod config;
pub mod controller;
pub mod filters;
pub mod models;
pub mod roster;
pub mod schedule;

pub use api::{ApiError, HttpScheduleApi, MockScheduleApi, ScheduleApi};
pub use calendar::MonthGrid;
pub use controller::{ScheduleController, ScheduleHandle, ScheduleSnapshot, ViewEvent};
pub use filters::{AppointmentQuery, DateTab, FilterState};
pub use models::{Appointment, AppointmentStatus};
pub use roster::{AppointmentRoster, DayStats};
pub use schedule::ScheduleState;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for host binaries that don't install their own
/// subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
