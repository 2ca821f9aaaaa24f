use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// DIRECTORY PORTS
// ==============================================================================
// Patient and provider administration live in their own cells; the agenda
// core only consumes these narrow read views.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub display_name: String,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: Uuid,
    pub display_name: String,
    pub discipline: String,
    /// Hex color the agenda uses for this provider's column.
    pub display_color: String,
}

#[async_trait]
pub trait PatientDirectory: Send + Sync {
    /// Free-text search used to resolve a patient before booking.
    async fn search_patients(&self, query: &str) -> anyhow::Result<Vec<PatientSummary>>;

    /// Display name for a known patient id, used to label conflicts.
    async fn display_name(&self, patient_id: Uuid) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    /// Active providers, in the column order the agenda renders them.
    async fn list_active_providers(&self) -> anyhow::Result<Vec<ProviderSummary>>;
}
