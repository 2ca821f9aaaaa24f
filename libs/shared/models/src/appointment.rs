use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE AGENDA MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub provider_id: Uuid,
    /// None for internal admin blocks that occupy agenda time without a patient.
    pub patient_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    /// Back-reference to the recurring series this appointment was created
    /// from. Set once at creation, never changed afterwards.
    pub series_id: Option<Uuid>,
    pub session_index: Option<i32>,
    pub total_sessions: Option<i32>,
    pub is_alert: bool,
    /// Display title for admin blocks; unused for patient appointments.
    pub admin_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes as i64)
    }
}

/// Stored status values keep the wire names the practice has always used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    #[serde(rename = "TE_BEVESTIGEN")]
    Pending,
    #[serde(rename = "BEVESTIGD")]
    Confirmed,
    #[serde(rename = "IN_WACHTZAAL")]
    WaitingRoom,
    #[serde(rename = "BINNEN")]
    InSession,
    #[serde(rename = "AFGEWERKT")]
    Completed,
    #[serde(rename = "NO_SHOW")]
    NoShow,
    #[serde(rename = "GEANNULEERD")]
    Cancelled,
}

impl AppointmentStatus {
    /// Conventionally terminal. Nothing in the system prevents staff from
    /// reverting a terminal status; this only drives display derivations.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::NoShow | AppointmentStatus::Cancelled
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wire = match self {
            AppointmentStatus::Pending => "TE_BEVESTIGEN",
            AppointmentStatus::Confirmed => "BEVESTIGD",
            AppointmentStatus::WaitingRoom => "IN_WACHTZAAL",
            AppointmentStatus::InSession => "BINNEN",
            AppointmentStatus::Completed => "AFGEWERKT",
            AppointmentStatus::NoShow => "NO_SHOW",
            AppointmentStatus::Cancelled => "GEANNULEERD",
        };
        write!(f, "{}", wire)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentType {
    Intake,
    Consultation,
    HomeVisit,
    /// Internal block (meeting, admin time); carries no patient.
    Admin,
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentType::Intake => write!(f, "INTAKE"),
            AppointmentType::Consultation => write!(f, "CONSULTATION"),
            AppointmentType::HomeVisit => write!(f, "HOME_VISIT"),
            AppointmentType::Admin => write!(f, "ADMIN"),
        }
    }
}

// ==============================================================================
// RECURRING SERIES MODELS
// ==============================================================================

/// Grouping record for appointments created from one recurring-booking
/// request. Deleting a series does not cascade to its appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringSeries {
    pub id: Uuid,
    pub total_sessions: i32,
    pub frequency: RecurrenceFrequency,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceFrequency {
    Weekly,
    /// Approximated as a fixed 3-day step, not a true twice-per-week pattern.
    TwiceWeekly,
    Monthly,
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceFrequency::Weekly => write!(f, "WEEKLY"),
            RecurrenceFrequency::TwiceWeekly => write!(f, "TWICE_WEEKLY"),
            RecurrenceFrequency::Monthly => write!(f, "MONTHLY"),
        }
    }
}
