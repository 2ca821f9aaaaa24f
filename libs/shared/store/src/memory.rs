use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::{Appointment, AppointmentStatus, RecurringSeries};

use crate::store::{AppointmentStore, StoreError};

/// In-memory implementation of the persistence port.
///
/// Backs the integration tests and small embedded deployments; the range
/// query matches the production backend's inclusive window semantics, with
/// the conflict detector applying the strict boundary test on top.
#[derive(Default)]
pub struct InMemoryStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
    series: RwLock<HashMap<Uuid, RecurringSeries>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        debug!("Inserting appointment {}", appointment.id);
        let mut appointments = self.appointments.write().await;
        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn insert_appointments(
        &self,
        batch: Vec<Appointment>,
    ) -> Result<Vec<Appointment>, StoreError> {
        debug!("Inserting batch of {} appointments", batch.len());
        let mut appointments = self.appointments.write().await;
        for appointment in &batch {
            appointments.insert(appointment.id, appointment.clone());
        }
        Ok(batch)
    }

    async fn fetch_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let appointments = self.appointments.read().await;
        Ok(appointments.get(&id).cloned())
    }

    async fn update_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;
        if !appointments.contains_key(&appointment.id) {
            return Err(StoreError::AppointmentNotFound(appointment.id));
        }
        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut appointments = self.appointments.write().await;
        Ok(appointments.remove(&id).is_some())
    }

    async fn appointments_for_provider(
        &self,
        provider_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        exclude_cancelled: bool,
    ) -> Result<Vec<Appointment>, StoreError> {
        let appointments = self.appointments.read().await;
        let mut matches: Vec<Appointment> = appointments
            .values()
            .filter(|apt| apt.provider_id == provider_id)
            .filter(|apt| apt.start_time <= until && apt.end_time() >= from)
            .filter(|apt| !exclude_cancelled || apt.status != AppointmentStatus::Cancelled)
            .cloned()
            .collect();
        matches.sort_by_key(|apt| apt.start_time);
        Ok(matches)
    }

    async fn insert_series(&self, series: RecurringSeries) -> Result<RecurringSeries, StoreError> {
        debug!("Inserting recurring series {}", series.id);
        let mut all = self.series.write().await;
        all.insert(series.id, series.clone());
        Ok(series)
    }

    async fn fetch_series(&self, id: Uuid) -> Result<Option<RecurringSeries>, StoreError> {
        let all = self.series.read().await;
        Ok(all.get(&id).cloned())
    }

    async fn delete_series(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut all = self.series.write().await;
        Ok(all.remove(&id).is_some())
    }
}
