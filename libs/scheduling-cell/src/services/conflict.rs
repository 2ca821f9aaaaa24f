// libs/scheduling-cell/src/services/conflict.rs
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::{Appointment, PatientDirectory};
use shared_store::AppointmentStore;

use crate::error::SchedulingError;
use crate::models::ConflictInfo;

pub struct ConflictDetectionService {
    store: Arc<dyn AppointmentStore>,
    patients: Arc<dyn PatientDirectory>,
}

impl ConflictDetectionService {
    pub fn new(store: Arc<dyn AppointmentStore>, patients: Arc<dyn PatientDirectory>) -> Self {
        Self { store, patients }
    }

    /// Every active booking of the provider that overlaps the candidate
    /// range. Read-only; callers run this before any write that changes
    /// time or duration.
    pub async fn find_conflicts(
        &self,
        provider_id: Uuid,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<ConflictInfo>, SchedulingError> {
        let end_time = start_time + Duration::minutes(duration_minutes as i64);
        debug!(
            "Checking conflicts for provider {} from {} to {}",
            provider_id, start_time, end_time
        );

        // Cancelled rows are filtered out at the store; the strict boundary
        // test below decides actual overlap.
        let existing = self
            .store
            .appointments_for_provider(provider_id, start_time, end_time, true)
            .await?;

        let mut conflicts = Vec::new();
        for appointment in existing {
            if exclude_appointment_id == Some(appointment.id) {
                continue;
            }
            if ranges_overlap(start_time, end_time, appointment.start_time, appointment.end_time())
            {
                let patient_name = self.appointment_label(&appointment).await;
                conflicts.push(ConflictInfo {
                    appointment_id: appointment.id,
                    start_time: appointment.start_time,
                    duration_minutes: appointment.duration_minutes,
                    patient_name,
                });
            }
        }

        if !conflicts.is_empty() {
            warn!(
                "Conflict detected for provider {} - {} overlapping appointments",
                provider_id,
                conflicts.len()
            );
        }

        Ok(conflicts)
    }

    /// Display label for an appointment: the patient's name, or the block
    /// title for admin time.
    pub async fn appointment_label(&self, appointment: &Appointment) -> String {
        match appointment.patient_id {
            Some(patient_id) => self
                .patients
                .display_name(patient_id)
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| "Unknown patient".to_string()),
            None => appointment
                .admin_title
                .clone()
                .unwrap_or_else(|| "Internal block".to_string()),
        }
    }
}

/// Exclusive-boundary overlap: an appointment ending exactly when another
/// starts is not a conflict.
fn ranges_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        assert!(!ranges_overlap(at(9, 45), at(10, 15), at(9, 0), at(9, 45)));
        assert!(!ranges_overlap(at(9, 0), at(9, 45), at(9, 45), at(10, 15)));
    }

    #[test]
    fn contained_range_overlaps() {
        assert!(ranges_overlap(at(9, 30), at(10, 0), at(9, 0), at(9, 45)));
        assert!(ranges_overlap(at(9, 0), at(11, 0), at(9, 30), at(10, 0)));
    }
}
