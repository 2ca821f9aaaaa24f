use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resolved identity of the staff member performing a request.
///
/// Every mutating agenda operation requires one; resolution itself (session,
/// token validation) happens outside the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub actor_id: Uuid,
    pub is_admin: bool,
}

impl AuthContext {
    pub fn staff(actor_id: Uuid) -> Self {
        Self {
            actor_id,
            is_admin: false,
        }
    }

    pub fn admin(actor_id: Uuid) -> Self {
        Self {
            actor_id,
            is_admin: true,
        }
    }

    /// Owning provider or admin role; the authorization rule used by every
    /// mutating scheduling operation.
    pub fn may_manage(&self, provider_id: Uuid) -> bool {
        self.is_admin || self.actor_id == provider_id
    }
}
