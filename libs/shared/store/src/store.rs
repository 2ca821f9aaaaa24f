use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use shared_models::{Appointment, RecurringSeries};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Series not found: {0}")]
    SeriesNotFound(Uuid),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Persistence port for the agenda core.
///
/// The production backend lives outside this workspace; [`crate::InMemoryStore`]
/// implements the same contract for tests and embedded use.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    /// Insert a batch as one logical operation. Used for series creation so a
    /// validated series lands completely or not at all.
    async fn insert_appointments(
        &self,
        batch: Vec<Appointment>,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn fetch_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;

    /// Full-row update keyed on `appointment.id`.
    async fn update_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    /// Hard delete. Returns false when the row was already gone.
    async fn delete_appointment(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Appointments of one provider whose [start, end] range touches the
    /// window, ordered by start time ascending.
    async fn appointments_for_provider(
        &self,
        provider_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        exclude_cancelled: bool,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn insert_series(&self, series: RecurringSeries) -> Result<RecurringSeries, StoreError>;

    async fn fetch_series(&self, id: Uuid) -> Result<Option<RecurringSeries>, StoreError>;

    async fn delete_series(&self, id: Uuid) -> Result<bool, StoreError>;
}
