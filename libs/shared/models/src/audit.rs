use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;
use uuid::Uuid;

// ==============================================================================
// AUDIT PORT
// ==============================================================================
// Audit storage is owned elsewhere; the agenda core emits fire-and-forget
// records around every mutation and never depends on the sink succeeding.

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Cancel,
    Delete,
    StatusChange,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Cancel => write!(f, "CANCEL"),
            AuditAction::Delete => write!(f, "DELETE"),
            AuditAction::StatusChange => write!(f, "STATUS_CHANGE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEntity {
    Appointment,
    RecurringSeries,
}

impl fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEntity::Appointment => write!(f, "APPOINTMENT"),
            AuditEntity::RecurringSeries => write!(f, "RECURRING_SERIES"),
        }
    }
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(
        &self,
        action: AuditAction,
        entity: AuditEntity,
        entity_id: Uuid,
        description: &str,
    ) -> anyhow::Result<()>;
}

/// Default sink that writes audit records to structured logging only.
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(
        &self,
        action: AuditAction,
        entity: AuditEntity,
        entity_id: Uuid,
        description: &str,
    ) -> anyhow::Result<()> {
        info!(
            action = %action,
            entity = %entity,
            entity_id = %entity_id,
            "AUDIT: {}",
            description
        );
        Ok(())
    }
}
