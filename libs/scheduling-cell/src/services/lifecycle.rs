// libs/scheduling-cell/src/services/lifecycle.rs
use chrono::{DateTime, Utc};
use tracing::debug;

use shared_models::{Appointment, AppointmentStatus};

/// Status handling for the agenda.
///
/// The status set is an open enumeration, not a guarded state machine: any
/// authorized staff member may set any status from any other, including
/// reverting the conventionally terminal ones. Staff use this to correct
/// mistakes; the service layer writes the new value unconditionally.
pub struct AppointmentLifecycleService;

/// What the agenda should display for an appointment, derived at read time.
/// The stored status is never rewritten by this derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveStatus {
    Stored(AppointmentStatus),
    /// End time has passed while the patient never progressed beyond
    /// Pending/Confirmed.
    Missed,
}

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// The full status menu, in workflow order, for status pickers.
    pub fn all_statuses(&self) -> [AppointmentStatus; 7] {
        [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::WaitingRoom,
            AppointmentStatus::InSession,
            AppointmentStatus::Completed,
            AppointmentStatus::NoShow,
            AppointmentStatus::Cancelled,
        ]
    }

    pub fn effective_status(&self, appointment: &Appointment, now: DateTime<Utc>) -> EffectiveStatus {
        let overdue = appointment.end_time() < now;
        let awaiting_patient = matches!(
            appointment.status,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        );

        if overdue && awaiting_patient {
            debug!(
                "Appointment {} displays as missed (stored status {})",
                appointment.id, appointment.status
            );
            EffectiveStatus::Missed
        } else {
            EffectiveStatus::Stored(appointment.status)
        }
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn appointment_with_status(status: AppointmentStatus) -> Appointment {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        Appointment {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            patient_id: Some(Uuid::new_v4()),
            start_time: start,
            duration_minutes: 45,
            appointment_type: shared_models::AppointmentType::Consultation,
            status,
            notes: None,
            series_id: None,
            session_index: None,
            total_sessions: None,
            is_alert: false,
            admin_title: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn overdue_confirmed_appointment_displays_as_missed() {
        let lifecycle = AppointmentLifecycleService::new();
        let appointment = appointment_with_status(AppointmentStatus::Confirmed);
        let later = appointment.end_time() + Duration::hours(1);

        assert_eq!(
            lifecycle.effective_status(&appointment, later),
            EffectiveStatus::Missed
        );
        // Derivation only; the stored value is untouched.
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn overdue_in_session_appointment_keeps_stored_status() {
        let lifecycle = AppointmentLifecycleService::new();
        let appointment = appointment_with_status(AppointmentStatus::InSession);
        let later = appointment.end_time() + Duration::hours(1);

        assert_eq!(
            lifecycle.effective_status(&appointment, later),
            EffectiveStatus::Stored(AppointmentStatus::InSession)
        );
    }

    #[test]
    fn upcoming_appointment_keeps_stored_status() {
        let lifecycle = AppointmentLifecycleService::new();
        let appointment = appointment_with_status(AppointmentStatus::Pending);
        let before = appointment.start_time - Duration::hours(1);

        assert_eq!(
            lifecycle.effective_status(&appointment, before),
            EffectiveStatus::Stored(AppointmentStatus::Pending)
        );
    }
}
