// libs/scheduling-cell/src/services/recurring.rs
use chrono::{DateTime, Duration, Months, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{Appointment, AppointmentStatus, RecurrenceFrequency, RecurringSeries};
use shared_store::AppointmentStore;

use crate::error::SchedulingError;
use crate::models::{ConflictInfo, CreateSeriesRequest};
use crate::services::conflict::ConflictDetectionService;

pub struct RecurringSeriesService {
    store: Arc<dyn AppointmentStore>,
    conflict_service: ConflictDetectionService,
    config: SchedulingConfig,
}

/// Result of a series request after planning and validation.
#[derive(Debug)]
pub enum SeriesCreation {
    Booked {
        series: RecurringSeries,
        appointments: Vec<Appointment>,
    },
    /// At least one planned date overlapped an active booking; nothing was
    /// persisted. Carries everything the caller needs to present the
    /// rejection: all conflicts and the complete planned schedule.
    Rejected {
        conflicts: Vec<ConflictInfo>,
        planned_dates: Vec<DateTime<Utc>>,
    },
}

impl RecurringSeriesService {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        conflict_service: ConflictDetectionService,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            store,
            conflict_service,
            config,
        }
    }

    /// Project the dates of a series from its first session.
    ///
    /// Weekly steps 7 days, twice-weekly steps a fixed 3 days (the
    /// practice's long-standing approximation, not a true 2x/week pattern),
    /// monthly advances a calendar month clamping to the last day where the
    /// target month is shorter.
    pub fn plan_dates(
        &self,
        start_time: DateTime<Utc>,
        total_sessions: i32,
        frequency: RecurrenceFrequency,
    ) -> Result<Vec<DateTime<Utc>>, SchedulingError> {
        if total_sessions < self.config.min_series_sessions
            || total_sessions > self.config.max_series_sessions
        {
            return Err(SchedulingError::Validation(format!(
                "Session count must be between {} and {}",
                self.config.min_series_sessions, self.config.max_series_sessions
            )));
        }

        let mut dates = Vec::with_capacity(total_sessions as usize);
        let mut current = start_time;
        for _ in 0..total_sessions {
            dates.push(current);
            current = match frequency {
                RecurrenceFrequency::Weekly => current + Duration::days(7),
                RecurrenceFrequency::TwiceWeekly => current + Duration::days(3),
                RecurrenceFrequency::Monthly => current
                    .checked_add_months(Months::new(1))
                    .ok_or_else(|| {
                        SchedulingError::Validation("Series extends beyond supported dates".into())
                    })?,
            };
        }

        debug!(
            "Planned {} session dates at {} frequency starting {}",
            dates.len(),
            frequency,
            start_time
        );
        Ok(dates)
    }

    /// Validate and book a complete series, all-or-nothing.
    ///
    /// Every planned date is checked against the provider's agenda before
    /// anything is written; a single overlap rejects the whole request.
    pub async fn create_series(
        &self,
        request: CreateSeriesRequest,
    ) -> Result<SeriesCreation, SchedulingError> {
        info!(
            "Creating {} series of {} sessions for provider {}",
            request.frequency, request.total_sessions, request.provider_id
        );

        if !self
            .config
            .accepted_durations
            .contains(&request.duration_minutes)
        {
            return Err(SchedulingError::Validation(format!(
                "Duration {} minutes is not offered for bookings",
                request.duration_minutes
            )));
        }

        let planned_dates =
            self.plan_dates(request.start_time, request.total_sessions, request.frequency)?;

        let mut conflicts = Vec::new();
        for date in &planned_dates {
            let mut found = self
                .conflict_service
                .find_conflicts(request.provider_id, *date, request.duration_minutes, None)
                .await?;
            conflicts.append(&mut found);
        }

        if !conflicts.is_empty() {
            warn!(
                "Series rejected: {} conflicts across {} planned dates",
                conflicts.len(),
                planned_dates.len()
            );
            return Ok(SeriesCreation::Rejected {
                conflicts,
                planned_dates,
            });
        }

        let now = Utc::now();
        let series = RecurringSeries {
            id: Uuid::new_v4(),
            total_sessions: request.total_sessions,
            frequency: request.frequency,
            patient_id: request.patient_id,
            provider_id: request.provider_id,
            created_at: now,
        };

        let appointments: Vec<Appointment> = planned_dates
            .iter()
            .enumerate()
            .map(|(index, date)| Appointment {
                id: Uuid::new_v4(),
                provider_id: request.provider_id,
                patient_id: Some(request.patient_id),
                start_time: *date,
                duration_minutes: request.duration_minutes,
                appointment_type: request.appointment_type,
                status: AppointmentStatus::Pending,
                notes: request.notes.clone(),
                series_id: Some(series.id),
                session_index: Some(index as i32 + 1),
                total_sessions: Some(request.total_sessions),
                is_alert: false,
                admin_title: None,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let series = self.store.insert_series(series).await?;
        let appointments = self.store.insert_appointments(appointments).await?;

        info!(
            "Series {} booked with {} appointments",
            series.id,
            appointments.len()
        );
        Ok(SeriesCreation::Booked {
            series,
            appointments,
        })
    }
}
