// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{Appointment, AppointmentType, RecurrenceFrequency};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub provider_id: Uuid,
    /// Required unless the appointment is an internal admin block.
    pub patient_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub appointment_type: AppointmentType,
    pub notes: Option<String>,
    pub is_alert: bool,
    pub admin_title: Option<String>,
}

/// Partial update; only the fields that are set are written. A provider
/// change comes from the agenda when an appointment is dragged into another
/// column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub provider_id: Option<Uuid>,
    pub appointment_type: Option<AppointmentType>,
    pub notes: Option<String>,
    pub is_alert: Option<bool>,
    pub admin_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSeriesRequest {
    pub provider_id: Uuid,
    pub patient_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub appointment_type: AppointmentType,
    pub frequency: RecurrenceFrequency,
    pub total_sessions: i32,
    pub notes: Option<String>,
}

// ==============================================================================
// CONFLICT MODELS
// ==============================================================================

/// One overlapping booking, carrying what the agenda needs to present it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub appointment_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub patient_name: String,
}

// ==============================================================================
// OUTCOME MODELS
// ==============================================================================
// Public scheduling operations report through these instead of raising
// across the caller boundary; internal failures surface as a generic
// message with the detail kept in the logs.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingOutcome {
    pub success: bool,
    pub appointment: Option<Appointment>,
    pub error: Option<String>,
    pub conflicts: Vec<ConflictInfo>,
}

impl SchedulingOutcome {
    pub fn booked(appointment: Appointment) -> Self {
        Self {
            success: true,
            appointment: Some(appointment),
            error: None,
            conflicts: vec![],
        }
    }

    pub fn done() -> Self {
        Self {
            success: true,
            appointment: None,
            error: None,
            conflicts: vec![],
        }
    }

    pub fn rejected(conflicts: Vec<ConflictInfo>) -> Self {
        Self {
            success: false,
            appointment: None,
            error: Some("Appointment overlaps existing bookings".to_string()),
            conflicts,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            appointment: None,
            error: Some(message.into()),
            conflicts: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesOutcome {
    pub success: bool,
    pub series_id: Option<Uuid>,
    pub created_ids: Vec<Uuid>,
    pub planned_dates: Vec<DateTime<Utc>>,
    pub error: Option<String>,
    pub conflicts: Vec<ConflictInfo>,
}

impl SeriesOutcome {
    pub fn booked(
        series_id: Uuid,
        created_ids: Vec<Uuid>,
        planned_dates: Vec<DateTime<Utc>>,
    ) -> Self {
        Self {
            success: true,
            series_id: Some(series_id),
            created_ids,
            planned_dates,
            error: None,
            conflicts: vec![],
        }
    }

    pub fn rejected(conflicts: Vec<ConflictInfo>, planned_dates: Vec<DateTime<Utc>>) -> Self {
        Self {
            success: false,
            series_id: None,
            created_ids: vec![],
            planned_dates,
            error: Some("One or more planned dates overlap existing bookings".to_string()),
            conflicts,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            series_id: None,
            created_ids: vec![],
            planned_dates: vec![],
            error: Some(message.into()),
            conflicts: vec![],
        }
    }
}
