// libs/agenda-cell/src/services/gesture.rs
use tracing::{debug, warn};
use uuid::Uuid;

use scheduling_cell::UpdateAppointmentRequest;

use crate::error::AgendaError;
use crate::models::{GestureMode, GestureOutcome, GestureState, GridPlacement, ProviderColumn};
use crate::services::grid::{pixels_to_slot_delta, SlotGrid};

/// Drives one drag or resize gesture over the agenda grid.
///
/// Pointer moves only mutate the in-memory preview; the single network
/// round-trip happens at gesture end, and a rejected update rolls the
/// rendered placement back to the pre-gesture snapshot.
pub struct GestureEngine {
    grid: SlotGrid,
    columns: Vec<ProviderColumn>,
    slot_height: f32,
    state: GestureState,
}

impl GestureEngine {
    pub fn new(grid: SlotGrid, columns: Vec<ProviderColumn>, slot_height: f32) -> Self {
        Self {
            grid,
            columns,
            slot_height,
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Column boundaries move with the layout; the agenda pushes the fresh
    /// set before routing pointer events.
    pub fn set_columns(&mut self, columns: Vec<ProviderColumn>) {
        self.columns = columns;
    }

    pub fn begin_move(
        &mut self,
        appointment_id: Uuid,
        placement: GridPlacement,
    ) -> Result<(), AgendaError> {
        self.begin(GestureMode::Move, appointment_id, placement)
    }

    pub fn begin_resize(
        &mut self,
        appointment_id: Uuid,
        placement: GridPlacement,
    ) -> Result<(), AgendaError> {
        self.begin(GestureMode::Resize, appointment_id, placement)
    }

    fn begin(
        &mut self,
        mode: GestureMode,
        appointment_id: Uuid,
        placement: GridPlacement,
    ) -> Result<(), AgendaError> {
        match self.state {
            GestureState::Idle => {
                debug!("Gesture {:?} started on appointment {}", mode, appointment_id);
                self.state = GestureState::Dragging {
                    mode,
                    appointment_id,
                    original: placement,
                    preview: placement,
                };
                Ok(())
            }
            // A gesture in progress, or one whose update is still in
            // flight, blocks the next one until committed or reverted.
            _ => Err(AgendaError::GestureInFlight),
        }
    }

    /// Recompute the preview from the pointer's total vertical delta and
    /// its current horizontal position.
    pub fn pointer_moved(&mut self, delta_y: f32, pointer_x: f32) {
        let GestureState::Dragging {
            mode,
            appointment_id,
            original,
            ..
        } = self.state
        else {
            return;
        };

        let slot_delta = pixels_to_slot_delta(delta_y, self.slot_height);
        let preview = match mode {
            GestureMode::Move => {
                let start_slot = (original.start_slot + slot_delta)
                    .clamp(0, self.grid.max_start_slot(original.duration_slots));
                let provider_id = self
                    .columns
                    .iter()
                    .find(|column| column.contains(pointer_x))
                    .map(|column| column.provider_id)
                    .unwrap_or(original.provider_id);
                GridPlacement {
                    provider_id,
                    start_slot,
                    ..original
                }
            }
            GestureMode::Resize => {
                // A start slot close to the window end can leave less room
                // than the minimum; the minimum wins in that case.
                let max_slots = (self.grid.total_slots() - original.start_slot)
                    .max(self.grid.min_duration_slots());
                let duration_slots = (original.duration_slots + slot_delta)
                    .clamp(self.grid.min_duration_slots(), max_slots);
                GridPlacement {
                    duration_slots,
                    ..original
                }
            }
        };

        self.state = GestureState::Dragging {
            mode,
            appointment_id,
            original,
            preview,
        };
    }

    /// End the gesture. An unchanged placement goes straight back to idle
    /// with no network call; a changed one produces the update request and
    /// parks the engine until [`Self::apply_server_verdict`].
    pub fn finish(&mut self) -> GestureOutcome {
        let GestureState::Dragging {
            appointment_id,
            original,
            preview,
            ..
        } = self.state
        else {
            return GestureOutcome::Unchanged;
        };

        if preview == original {
            debug!("Gesture on {} ended without a change", appointment_id);
            self.state = GestureState::Idle;
            return GestureOutcome::Unchanged;
        }

        let (start_time, duration_minutes) = self.grid.schedule_for(&preview);
        self.state = GestureState::AwaitingVerdict {
            appointment_id,
            original,
            submitted: preview,
        };

        GestureOutcome::Submit {
            appointment_id,
            request: UpdateAppointmentRequest {
                start_time: Some(start_time),
                duration_minutes: Some(duration_minutes),
                provider_id: Some(preview.provider_id),
                ..Default::default()
            },
        }
    }

    /// Resolve the outstanding round-trip: the placement to render is the
    /// submitted one on success, the pre-gesture snapshot on rejection.
    pub fn apply_server_verdict(&mut self, accepted: bool) -> Result<GridPlacement, AgendaError> {
        let GestureState::AwaitingVerdict {
            appointment_id,
            original,
            submitted,
        } = self.state
        else {
            return Err(AgendaError::NoGestureInFlight);
        };

        self.state = GestureState::Idle;
        if accepted {
            Ok(submitted)
        } else {
            warn!(
                "Update for appointment {} rejected - reverting to original slot",
                appointment_id
            );
            Ok(original)
        }
    }

    /// Placement the agenda should currently render for the gestured
    /// appointment, if a gesture is active.
    pub fn preview(&self) -> Option<GridPlacement> {
        match self.state {
            GestureState::Dragging { preview, .. } => Some(preview),
            GestureState::AwaitingVerdict { submitted, .. } => Some(submitted),
            GestureState::Idle => None,
        }
    }
}
