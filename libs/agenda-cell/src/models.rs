// libs/agenda-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::ProviderSummary;

// ==============================================================================
// GRID GEOMETRY MODELS
// ==============================================================================

/// Where an appointment sits on the agenda grid, in discrete slot units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPlacement {
    pub provider_id: Uuid,
    pub day: NaiveDate,
    pub start_slot: i32,
    pub duration_slots: i32,
}

/// Horizontal extent of one provider column, in screen coordinates. The
/// boundaries are live: the agenda recomputes them on every layout pass and
/// the gesture engine resolves the hovered column against the current set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderColumn {
    pub provider_id: Uuid,
    pub x_min: f32,
    pub x_max: f32,
}

impl ProviderColumn {
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x_min && x < self.x_max
    }
}

/// Equal-width columns for the active providers, in directory order.
pub fn columns_for(
    providers: &[ProviderSummary],
    origin_x: f32,
    column_width: f32,
) -> Vec<ProviderColumn> {
    providers
        .iter()
        .enumerate()
        .map(|(index, provider)| {
            let x_min = origin_x + index as f32 * column_width;
            ProviderColumn {
                provider_id: provider.id,
                x_min,
                x_max: x_min + column_width,
            }
        })
        .collect()
}

// ==============================================================================
// GESTURE MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureMode {
    /// Reposition: start slot and provider column may change.
    Move,
    /// Duration change from the bottom edge: start slot is fixed.
    Resize,
}

/// Explicit gesture state, threaded through the handlers instead of ambient
/// mutable component fields so the move/resize math tests deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging {
        mode: GestureMode,
        appointment_id: Uuid,
        original: GridPlacement,
        preview: GridPlacement,
    },
    /// The gesture ended with a change and its single round-trip to the
    /// scheduling service is outstanding. No new gesture may begin until the
    /// verdict lands.
    AwaitingVerdict {
        appointment_id: Uuid,
        original: GridPlacement,
        submitted: GridPlacement,
    },
}

/// What the agenda should do when a gesture ends.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Final placement equals the pre-gesture snapshot; no network call.
    Unchanged,
    /// Placement changed; send the recomputed wall-clock schedule to the
    /// scheduling service.
    Submit {
        appointment_id: Uuid,
        request: scheduling_cell::UpdateAppointmentRequest,
    },
}
