// libs/scheduling-cell/src/services/scheduling.rs
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{
    Appointment, AppointmentStatus, AppointmentType, AuditAction, AuditEntity, AuditSink,
    AuthContext, PatientDirectory,
};
use shared_store::AppointmentStore;

use crate::error::SchedulingError;
use crate::models::{
    CreateAppointmentRequest, CreateSeriesRequest, SchedulingOutcome, SeriesOutcome,
    UpdateAppointmentRequest,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::recurring::{RecurringSeriesService, SeriesCreation};

/// Orchestrator for every agenda mutation.
///
/// Each operation runs one synchronous sequence of authorize, validate,
/// conflict-check, persist. The conflict-check-then-write window is held
/// under a per-provider lock so two simultaneous bookings for the same
/// provider cannot both pass the check.
pub struct SchedulingService {
    store: Arc<dyn AppointmentStore>,
    audit: Arc<dyn AuditSink>,
    conflict_service: ConflictDetectionService,
    recurring_service: RecurringSeriesService,
    lifecycle_service: AppointmentLifecycleService,
    config: SchedulingConfig,
    provider_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SchedulingService {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        patients: Arc<dyn PatientDirectory>,
        audit: Arc<dyn AuditSink>,
        config: SchedulingConfig,
    ) -> Self {
        let conflict_service =
            ConflictDetectionService::new(Arc::clone(&store), Arc::clone(&patients));
        let recurring_service = RecurringSeriesService::new(
            Arc::clone(&store),
            ConflictDetectionService::new(Arc::clone(&store), Arc::clone(&patients)),
            config.clone(),
        );

        Self {
            store,
            audit,
            conflict_service,
            recurring_service,
            lifecycle_service: AppointmentLifecycleService::new(),
            config,
            provider_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn lifecycle(&self) -> &AppointmentLifecycleService {
        &self.lifecycle_service
    }

    // ==========================================================================
    // PUBLIC OPERATIONS
    // ==========================================================================

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
        ctx: &AuthContext,
    ) -> SchedulingOutcome {
        match self.try_create(request, ctx).await {
            Ok(outcome) => outcome,
            Err(err) => self.failure_outcome(err),
        }
    }

    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
        ctx: &AuthContext,
    ) -> SchedulingOutcome {
        match self.try_update(appointment_id, request, ctx).await {
            Ok(outcome) => outcome,
            Err(err) => self.failure_outcome(err),
        }
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        ctx: &AuthContext,
    ) -> SchedulingOutcome {
        match self.try_cancel(appointment_id, ctx).await {
            Ok(outcome) => outcome,
            Err(err) => self.failure_outcome(err),
        }
    }

    pub async fn delete_appointment(
        &self,
        appointment_id: Uuid,
        ctx: &AuthContext,
    ) -> SchedulingOutcome {
        match self.try_delete(appointment_id, ctx).await {
            Ok(outcome) => outcome,
            Err(err) => self.failure_outcome(err),
        }
    }

    /// Write a status unconditionally. The status set is deliberately an
    /// open enumeration (see the lifecycle service); there is no transition
    /// table to consult.
    pub async fn set_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        ctx: &AuthContext,
    ) -> SchedulingOutcome {
        match self.try_set_status(appointment_id, status, ctx).await {
            Ok(outcome) => outcome,
            Err(err) => self.failure_outcome(err),
        }
    }

    pub async fn create_series(
        &self,
        request: CreateSeriesRequest,
        ctx: &AuthContext,
    ) -> SeriesOutcome {
        match self.try_create_series(request, ctx).await {
            Ok(outcome) => outcome,
            Err(err) => self.series_failure_outcome(err),
        }
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        self.store
            .fetch_appointment(appointment_id)
            .await?
            .ok_or(SchedulingError::NotFound)
    }

    // ==========================================================================
    // OPERATION BODIES
    // ==========================================================================

    async fn try_create(
        &self,
        request: CreateAppointmentRequest,
        ctx: &AuthContext,
    ) -> Result<SchedulingOutcome, SchedulingError> {
        info!(
            "Creating {} appointment for provider {} at {}",
            request.appointment_type, request.provider_id, request.start_time
        );

        self.validate_create(&request)?;
        self.authorize(ctx, request.provider_id)?;

        let lock = self.provider_lock(request.provider_id).await;
        let _guard = lock.lock().await;

        let conflicts = self
            .conflict_service
            .find_conflicts(
                request.provider_id,
                request.start_time,
                request.duration_minutes,
                None,
            )
            .await?;
        if !conflicts.is_empty() {
            return Ok(SchedulingOutcome::rejected(conflicts));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            provider_id: request.provider_id,
            patient_id: request.patient_id,
            start_time: request.start_time,
            duration_minutes: request.duration_minutes,
            appointment_type: request.appointment_type,
            status: AppointmentStatus::Pending,
            notes: request.notes,
            series_id: None,
            session_index: None,
            total_sessions: None,
            is_alert: request.is_alert,
            admin_title: request.admin_title,
            created_at: now,
            updated_at: now,
        };
        let appointment = self.store.insert_appointment(appointment).await?;

        let label = self.conflict_service.appointment_label(&appointment).await;
        self.emit_audit(
            AuditAction::Create,
            AuditEntity::Appointment,
            appointment.id,
            format!(
                "Created {} for {} at {}",
                appointment.appointment_type, label, appointment.start_time
            ),
        )
        .await;

        Ok(SchedulingOutcome::booked(appointment))
    }

    async fn try_update(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
        ctx: &AuthContext,
    ) -> Result<SchedulingOutcome, SchedulingError> {
        debug!("Updating appointment {}", appointment_id);

        let existing = self.get_appointment(appointment_id).await?;
        self.authorize(ctx, existing.provider_id)?;

        let target_provider = request.provider_id.unwrap_or(existing.provider_id);
        if target_provider != existing.provider_id {
            // Dragging into another column also needs rights on that agenda.
            self.authorize(ctx, target_provider)?;
        }

        let new_start = request.start_time.unwrap_or(existing.start_time);
        let new_duration = request.duration_minutes.unwrap_or(existing.duration_minutes);
        if let Some(duration) = request.duration_minutes {
            // Interactive resize may produce any multiple of the slot width,
            // not just the booking-form durations.
            if duration <= 0 || duration % self.config.slot_minutes != 0 {
                return Err(SchedulingError::Validation(format!(
                    "Duration must be a positive multiple of {} minutes",
                    self.config.slot_minutes
                )));
            }
        }

        let schedule_changed = new_start != existing.start_time
            || new_duration != existing.duration_minutes
            || target_provider != existing.provider_id;

        if schedule_changed {
            let lock = self.provider_lock(target_provider).await;
            let _guard = lock.lock().await;

            let conflicts = self
                .conflict_service
                .find_conflicts(target_provider, new_start, new_duration, Some(existing.id))
                .await?;
            if !conflicts.is_empty() {
                return Ok(SchedulingOutcome::rejected(conflicts));
            }

            let updated = self.persist_update(existing, request).await?;
            return Ok(SchedulingOutcome::booked(updated));
        }

        let updated = self.persist_update(existing, request).await?;
        Ok(SchedulingOutcome::booked(updated))
    }

    async fn persist_update(
        &self,
        mut appointment: Appointment,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        if let Some(start_time) = request.start_time {
            appointment.start_time = start_time;
        }
        if let Some(duration) = request.duration_minutes {
            appointment.duration_minutes = duration;
        }
        if let Some(provider_id) = request.provider_id {
            appointment.provider_id = provider_id;
        }
        if let Some(appointment_type) = request.appointment_type {
            appointment.appointment_type = appointment_type;
        }
        if let Some(notes) = request.notes {
            appointment.notes = Some(notes);
        }
        if let Some(is_alert) = request.is_alert {
            appointment.is_alert = is_alert;
        }
        if let Some(admin_title) = request.admin_title {
            appointment.admin_title = Some(admin_title);
        }
        appointment.updated_at = Utc::now();

        let updated = self.store.update_appointment(appointment).await?;

        self.emit_audit(
            AuditAction::Update,
            AuditEntity::Appointment,
            updated.id,
            format!(
                "Updated appointment to {} ({} min) with provider {}",
                updated.start_time, updated.duration_minutes, updated.provider_id
            ),
        )
        .await;

        info!("Appointment {} updated", updated.id);
        Ok(updated)
    }

    async fn try_cancel(
        &self,
        appointment_id: Uuid,
        ctx: &AuthContext,
    ) -> Result<SchedulingOutcome, SchedulingError> {
        debug!("Cancelling appointment {}", appointment_id);

        let mut appointment = self.get_appointment(appointment_id).await?;
        self.authorize(ctx, appointment.provider_id)?;

        appointment.status = AppointmentStatus::Cancelled;
        appointment.updated_at = Utc::now();
        let cancelled = self.store.update_appointment(appointment).await?;

        let label = self.conflict_service.appointment_label(&cancelled).await;
        self.emit_audit(
            AuditAction::Cancel,
            AuditEntity::Appointment,
            cancelled.id,
            format!("Cancelled appointment of {} at {}", label, cancelled.start_time),
        )
        .await;

        info!("Appointment {} cancelled", cancelled.id);
        Ok(SchedulingOutcome::booked(cancelled))
    }

    async fn try_delete(
        &self,
        appointment_id: Uuid,
        ctx: &AuthContext,
    ) -> Result<SchedulingOutcome, SchedulingError> {
        debug!("Deleting appointment {}", appointment_id);

        let appointment = self.get_appointment(appointment_id).await?;
        self.authorize(ctx, appointment.provider_id)?;

        // The audit description is built and emitted while the row still
        // exists; after the hard delete the identifying details are gone.
        let label = self.conflict_service.appointment_label(&appointment).await;
        self.emit_audit(
            AuditAction::Delete,
            AuditEntity::Appointment,
            appointment.id,
            format!(
                "Deleted {} of {} at {} (provider {})",
                appointment.appointment_type, label, appointment.start_time, appointment.provider_id
            ),
        )
        .await;

        self.store.delete_appointment(appointment_id).await?;

        info!("Appointment {} deleted", appointment_id);
        Ok(SchedulingOutcome::done())
    }

    async fn try_set_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        ctx: &AuthContext,
    ) -> Result<SchedulingOutcome, SchedulingError> {
        let mut appointment = self.get_appointment(appointment_id).await?;
        self.authorize(ctx, appointment.provider_id)?;

        let previous = appointment.status;
        appointment.status = status;
        appointment.updated_at = Utc::now();
        let updated = self.store.update_appointment(appointment).await?;

        self.emit_audit(
            AuditAction::StatusChange,
            AuditEntity::Appointment,
            updated.id,
            format!("Status changed from {} to {}", previous, status),
        )
        .await;

        info!(
            "Appointment {} status {} -> {}",
            updated.id, previous, status
        );
        Ok(SchedulingOutcome::booked(updated))
    }

    async fn try_create_series(
        &self,
        request: CreateSeriesRequest,
        ctx: &AuthContext,
    ) -> Result<SeriesOutcome, SchedulingError> {
        self.authorize(ctx, request.provider_id)?;

        let lock = self.provider_lock(request.provider_id).await;
        let _guard = lock.lock().await;

        match self.recurring_service.create_series(request).await? {
            SeriesCreation::Booked {
                series,
                appointments,
            } => {
                self.emit_audit(
                    AuditAction::Create,
                    AuditEntity::RecurringSeries,
                    series.id,
                    format!(
                        "Created {} series of {} sessions for provider {}",
                        series.frequency, series.total_sessions, series.provider_id
                    ),
                )
                .await;

                let planned_dates = appointments.iter().map(|apt| apt.start_time).collect();
                let created_ids = appointments.iter().map(|apt| apt.id).collect();
                Ok(SeriesOutcome::booked(series.id, created_ids, planned_dates))
            }
            SeriesCreation::Rejected {
                conflicts,
                planned_dates,
            } => Ok(SeriesOutcome::rejected(conflicts, planned_dates)),
        }
    }

    // ==========================================================================
    // SHARED HELPERS
    // ==========================================================================

    fn validate_create(&self, request: &CreateAppointmentRequest) -> Result<(), SchedulingError> {
        if request.patient_id.is_none() && request.appointment_type != AppointmentType::Admin {
            return Err(SchedulingError::Validation(
                "A patient is required for non-admin appointments".into(),
            ));
        }
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
        Ok(())
    }

    fn authorize(&self, ctx: &AuthContext, provider_id: Uuid) -> Result<(), SchedulingError> {
        if ctx.may_manage(provider_id) {
            Ok(())
        } else {
            warn!(
                "Actor {} denied on agenda of provider {}",
                ctx.actor_id, provider_id
            );
            Err(SchedulingError::Unauthorized)
        }
    }

    async fn provider_lock(&self, provider_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.provider_locks.lock().await;
        locks
            .entry(provider_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Audit failures never fail the primary operation.
    async fn emit_audit(
        &self,
        action: AuditAction,
        entity: AuditEntity,
        entity_id: Uuid,
        description: String,
    ) {
        if let Err(err) = self
            .audit
            .record(action, entity, entity_id, &description)
            .await
        {
            warn!("Audit sink failed for {} {}: {}", action, entity_id, err);
        }
    }

    fn failure_outcome(&self, err: SchedulingError) -> SchedulingOutcome {
        match err {
            SchedulingError::Validation(message) => SchedulingOutcome::failed(message),
            SchedulingError::Unauthorized => {
                SchedulingOutcome::failed("Not authorized to manage this appointment")
            }
            SchedulingError::NotFound => SchedulingOutcome::failed("Appointment not found"),
            SchedulingError::Store(detail) | SchedulingError::Directory(detail) => {
                error!("Internal scheduling failure: {}", detail);
                SchedulingOutcome::failed("An internal error occurred")
            }
        }
    }

    fn series_failure_outcome(&self, err: SchedulingError) -> SeriesOutcome {
        match err {
            SchedulingError::Validation(message) => SeriesOutcome::failed(message),
            SchedulingError::Unauthorized => {
                SeriesOutcome::failed("Not authorized to manage this appointment")
            }
            SchedulingError::NotFound => SeriesOutcome::failed("Appointment not found"),
            SchedulingError::Store(detail) | SchedulingError::Directory(detail) => {
                error!("Internal scheduling failure: {}", detail);
                SeriesOutcome::failed("An internal error occurred")
            }
        }
    }
}
