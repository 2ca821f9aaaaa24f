//! Fixtures shared by the cell test suites.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{
    Appointment, AppointmentStatus, AppointmentType, AuditAction, AuditEntity, AuditSink,
    AuthContext, PatientDirectory, PatientSummary, ProviderDirectory, ProviderSummary,
};

static TRACING: Once = Once::new();

/// Install a test subscriber once per process; honors RUST_LOG like the
/// production bootstrap.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
            ))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// Deterministic configuration for tests; the env-driven loader is only
/// exercised by the config crate's own tests.
pub fn test_config() -> SchedulingConfig {
    SchedulingConfig::default()
}

pub fn test_time(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
}

pub struct AppointmentFixture {
    pub provider_id: Uuid,
    pub patient_id: Uuid,
}

impl Default for AppointmentFixture {
    fn default() -> Self {
        Self {
            provider_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
        }
    }
}

impl AppointmentFixture {
    pub fn appointment_at(&self, start_time: DateTime<Utc>, duration_minutes: i32) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            provider_id: self.provider_id,
            patient_id: Some(self.patient_id),
            start_time,
            duration_minutes,
            appointment_type: AppointmentType::Consultation,
            status: AppointmentStatus::Confirmed,
            notes: None,
            series_id: None,
            session_index: None,
            total_sessions: None,
            is_alert: false,
            admin_title: None,
            created_at: start_time,
            updated_at: start_time,
        }
    }

    pub fn owning_context(&self) -> AuthContext {
        AuthContext::staff(self.provider_id)
    }

    pub fn admin_context(&self) -> AuthContext {
        AuthContext::admin(Uuid::new_v4())
    }

    pub fn stranger_context(&self) -> AuthContext {
        AuthContext::staff(Uuid::new_v4())
    }
}

/// Directory stub that answers every lookup with one fixed patient.
pub struct StubPatientDirectory {
    pub patient: PatientSummary,
}

impl StubPatientDirectory {
    pub fn named(id: Uuid, display_name: &str) -> Self {
        Self {
            patient: PatientSummary {
                id,
                display_name: display_name.to_string(),
                birth_date: None,
            },
        }
    }
}

#[async_trait]
impl PatientDirectory for StubPatientDirectory {
    async fn search_patients(&self, query: &str) -> anyhow::Result<Vec<PatientSummary>> {
        if self
            .patient
            .display_name
            .to_lowercase()
            .contains(&query.to_lowercase())
        {
            Ok(vec![self.patient.clone()])
        } else {
            Ok(vec![])
        }
    }

    async fn display_name(&self, patient_id: Uuid) -> anyhow::Result<Option<String>> {
        if patient_id == self.patient.id {
            Ok(Some(self.patient.display_name.clone()))
        } else {
            Ok(None)
        }
    }
}

pub struct StubProviderDirectory {
    pub providers: Vec<ProviderSummary>,
}

#[async_trait]
impl ProviderDirectory for StubProviderDirectory {
    async fn list_active_providers(&self) -> anyhow::Result<Vec<ProviderSummary>> {
        Ok(self.providers.clone())
    }
}

/// Sink that fails every record; mutations must still succeed against it.
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn record(
        &self,
        _action: AuditAction,
        _entity: AuditEntity,
        _entity_id: Uuid,
        _description: &str,
    ) -> anyhow::Result<()> {
        anyhow::bail!("audit backend unavailable")
    }
}
