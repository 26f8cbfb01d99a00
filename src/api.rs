//! Remote appointment service interface.
//!
//! `ScheduleApi` is the seam between the view core and the remote store:
//! `HttpScheduleApi` talks to the real service, `MockScheduleApi` is an
//! in-memory stand-in with scriptable responses for tests. Failures are
//! typed here and recovered by the controller — neither path lets an
//! error escape to the rendering layer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config;
use crate::filters::AppointmentQuery;
use crate::models::{Appointment, AppointmentStatus};

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Errors from the remote appointment service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Cannot reach appointment service at {0}")]
    Connection(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Appointment service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response: {0}")]
    ResponseParsing(String),
    #[error("HTTP error: {0}")]
    Http(String),
}

// ─── Trait ────────────────────────────────────────────────────────────────────

/// Async interface to the appointment store.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// Fetch appointments matching `query`, in the service's order.
    async fn fetch_appointments(
        &self,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, ApiError>;

    /// Set one appointment's status; the service echoes the updated record.
    async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError>;
}

#[async_trait]
impl<T: ScheduleApi + ?Sized> ScheduleApi for Arc<T> {
    async fn fetch_appointments(
        &self,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, ApiError> {
        (**self).fetch_appointments(query).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        (**self).update_status(id, status).await
    }
}

// ─── HTTP client ──────────────────────────────────────────────────────────────

/// Body for `PATCH /appointments/{id}/status`.
#[derive(Serialize)]
struct StatusPatch {
    status: AppointmentStatus,
}

/// HTTP client for the appointment service.
pub struct HttpScheduleApi {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpScheduleApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        }
    }

    /// Service location from the environment (`FRONTDESK_API_URL`),
    /// falling back to the local dev backend.
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url(), config::http_timeout())
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn fetch_appointments(
        &self,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, ApiError> {
        let url = format!("{}/appointments", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ResponseParsing(e.to_string()))
    }

    async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        let url = format!("{}/appointments/{}/status", self.base_url, id);

        let response = self
            .client
            .patch(&url)
            .json(&StatusPatch { status })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: http_status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ResponseParsing(e.to_string()))
    }
}

// ─── Mock ─────────────────────────────────────────────────────────────────────

/// In-memory stand-in for the appointment service.
///
/// Behaves like the service's own mock backend: fetches return the seeded
/// roster (or the next scripted result), status updates patch the seeded
/// roster and echo the record. Scripted delays make out-of-order
/// resolution reproducible under a paused tokio clock, and every request
/// is recorded for assertions.
#[derive(Default)]
pub struct MockScheduleApi {
    roster: Mutex<Vec<Appointment>>,
    fetch_script: Mutex<VecDeque<Result<Vec<Appointment>, ApiError>>>,
    fetch_delays: Mutex<VecDeque<Duration>>,
    fail_next_update: AtomicBool,
    queries: Mutex<Vec<AppointmentQuery>>,
    updates: Mutex<Vec<(String, AppointmentStatus)>>,
}

impl MockScheduleApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the roster that un-scripted fetches return.
    pub fn with_roster(records: Vec<Appointment>) -> Self {
        let mock = Self::new();
        *mock.roster.lock().expect("mock lock") = records;
        mock
    }

    /// Queue an explicit result for the next fetch (overrides the roster).
    pub fn push_fetch(&self, records: Vec<Appointment>) {
        self.fetch_script
            .lock()
            .expect("mock lock")
            .push_back(Ok(records));
    }

    /// Queue a failure for the next fetch.
    pub fn push_fetch_error(&self, error: ApiError) {
        self.fetch_script
            .lock()
            .expect("mock lock")
            .push_back(Err(error));
    }

    /// Queue a latency for the next fetch, consumed in call order.
    pub fn push_fetch_delay(&self, delay: Duration) {
        self.fetch_delays
            .lock()
            .expect("mock lock")
            .push_back(delay);
    }

    /// Make the next status update fail with a server error.
    pub fn fail_next_update(&self) {
        self.fail_next_update.store(true, Ordering::SeqCst);
    }

    /// Every fetch query received, in order.
    pub fn queries(&self) -> Vec<AppointmentQuery> {
        self.queries.lock().expect("mock lock").clone()
    }

    /// Every status update received, in order.
    pub fn updates(&self) -> Vec<(String, AppointmentStatus)> {
        self.updates.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl ScheduleApi for MockScheduleApi {
    async fn fetch_appointments(
        &self,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.queries.lock().expect("mock lock").push(query.clone());

        let delay = self
            .fetch_delays
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or(Duration::ZERO);
        let scripted = self.fetch_script.lock().expect("mock lock").pop_front();

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match scripted {
            Some(result) => result,
            None => Ok(self.roster.lock().expect("mock lock").clone()),
        }
    }

    async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        self.updates
            .lock()
            .expect("mock lock")
            .push((id.to_string(), status));

        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "update rejected".into(),
            });
        }

        let mut roster = self.roster.lock().expect("mock lock");
        match roster.iter_mut().find(|apt| apt.id == id) {
            Some(apt) => {
                apt.status = status;
                Ok(apt.clone())
            }
            None => Err(ApiError::Status {
                status: 404,
                body: "Appointment not found".into(),
            }),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
