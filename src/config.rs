use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Frontdesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quiescence window between the last filter change and the next fetch.
/// Rapid changes inside the window collapse into a single request.
pub const DEBOUNCE_MS: u64 = 300;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Appointment service base URL. `FRONTDESK_API_URL` overrides the
/// local dev backend default.
pub fn api_base_url() -> String {
    std::env::var("FRONTDESK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Per-request HTTP timeout. `FRONTDESK_HTTP_TIMEOUT_SECS` overrides.
pub fn http_timeout() -> Duration {
    let secs = std::env::var("FRONTDESK_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// The debounce window as a `Duration`.
pub fn debounce_window() -> Duration {
    Duration::from_millis(DEBOUNCE_MS)
}

/// Fallback tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}
