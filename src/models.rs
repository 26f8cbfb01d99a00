//! Appointment records and the status lifecycle.
//!
//! The remote store owns every record; this crate holds them read-mostly
//! and patches a single `status` field after a confirmed remote update.
//! Field names mirror the service's wire format (camelCase).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Status lifecycle ─────────────────────────────────────────────────────────

/// Lifecycle state of an appointment. Closed set — the remote store never
/// returns anything outside these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// The status a user-triggered advance should request next.
    ///
    /// Forward-biased with one explicit cycle back to `Confirmed`: a
    /// completed or cancelled appointment re-activates as confirmed.
    /// There is no path into `Cancelled` here — cancellation is a
    /// separately-triggered action.
    pub fn advance(self) -> Self {
        match self {
            Self::Scheduled => Self::Confirmed,
            Self::Confirmed => Self::Completed,
            Self::Completed => Self::Confirmed,
            Self::Cancelled => Self::Confirmed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Appointment record ───────────────────────────────────────────────────────

/// A single appointment as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Opaque server-assigned identifier.
    pub id: String,
    /// Patient display name.
    pub name: String,
    pub date: NaiveDate,
    /// Display string, e.g. "09:00 AM".
    pub time: String,
    /// Display string, e.g. "30 min".
    pub duration: String,
    pub doctor_name: String,
    /// Encounter mode — open set ("In-Person", "Video", "Video Call", ...).
    pub mode: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Appointment {
    /// Telemedicine classification: any mode naming "Video" counts as a
    /// virtual encounter ("Video", "Video Call", ...).
    pub fn is_telemedicine(&self) -> bool {
        self.mode.contains("Video")
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_follows_transition_table() {
        assert_eq!(
            AppointmentStatus::Scheduled.advance(),
            AppointmentStatus::Confirmed
        );
        assert_eq!(
            AppointmentStatus::Confirmed.advance(),
            AppointmentStatus::Completed
        );
        assert_eq!(
            AppointmentStatus::Completed.advance(),
            AppointmentStatus::Confirmed
        );
        assert_eq!(
            AppointmentStatus::Cancelled.advance(),
            AppointmentStatus::Confirmed
        );
    }

    #[test]
    fn advance_never_produces_cancelled() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_ne!(status.advance(), AppointmentStatus::Cancelled);
        }
    }

    #[test]
    fn status_display_matches_wire_form() {
        assert_eq!(AppointmentStatus::Scheduled.to_string(), "Scheduled");
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Confirmed).unwrap(),
            "\"Confirmed\""
        );
    }

    #[test]
    fn telemedicine_covers_video_modes() {
        let mut apt = sample();
        for (mode, expected) in [
            ("Video", true),
            ("Video Call", true),
            ("In-Person", false),
            ("Phone", false),
        ] {
            apt.mode = mode.to_string();
            assert_eq!(apt.is_telemedicine(), expected, "mode {mode}");
        }
    }

    #[test]
    fn deserializes_service_record() {
        let json = r#"{
            "id": "2",
            "name": "Jane Roe",
            "date": "2024-06-10",
            "time": "10:00 AM",
            "duration": "45 min",
            "doctorName": "Dr. Jones",
            "mode": "Video",
            "status": "Confirmed"
        }"#;
        let apt: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(apt.id, "2");
        assert_eq!(apt.doctor_name, "Dr. Jones");
        assert_eq!(apt.date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(apt.status, AppointmentStatus::Confirmed);
        // Absent optional fields deserialize as None.
        assert!(apt.reason.is_none());
        assert!(apt.phone.is_none());
    }

    #[test]
    fn serializes_doctor_name_as_camel_case() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"doctorName\""));
        assert!(!json.contains("\"doctor_name\""));
        // None optionals are omitted, not null.
        assert!(!json.contains("\"note\""));
    }

    fn sample() -> Appointment {
        Appointment {
            id: "1".into(),
            name: "John Doe".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            time: "09:00 AM".into(),
            duration: "30 min".into(),
            doctor_name: "Dr. Smith".into(),
            mode: "In-Person".into(),
            status: AppointmentStatus::Scheduled,
            reason: None,
            note: None,
            phone: None,
            email: None,
        }
    }
}
