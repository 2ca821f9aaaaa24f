// libs/agenda-cell/tests/gesture_test.rs
use assert_matches::assert_matches;
use chrono::NaiveDate;
use uuid::Uuid;

use agenda_cell::{
    columns_for, AgendaError, GestureEngine, GestureOutcome, GestureState, GridPlacement,
    ProviderColumn, SlotGrid,
};
use shared_models::ProviderSummary;
use shared_utils::{init_test_tracing, test_config};

const SLOT_HEIGHT: f32 = 20.0;

struct TestSetup {
    engine: GestureEngine,
    provider_a: Uuid,
    provider_b: Uuid,
    appointment_id: Uuid,
}

impl TestSetup {
    fn new() -> Self {
        init_test_tracing();
        let provider_a = Uuid::new_v4();
        let provider_b = Uuid::new_v4();
        let columns = vec![
            ProviderColumn {
                provider_id: provider_a,
                x_min: 0.0,
                x_max: 120.0,
            },
            ProviderColumn {
                provider_id: provider_b,
                x_min: 120.0,
                x_max: 240.0,
            },
        ];
        let engine = GestureEngine::new(SlotGrid::new(&test_config()), columns, SLOT_HEIGHT);

        Self {
            engine,
            provider_a,
            provider_b,
            appointment_id: Uuid::new_v4(),
        }
    }

    fn placement(&self, start_slot: i32, duration_slots: i32) -> GridPlacement {
        GridPlacement {
            provider_id: self.provider_a,
            day: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            start_slot,
            duration_slots,
        }
    }
}

// ==============================================================================
// MOVE
// ==============================================================================

#[test]
fn move_rounds_the_pointer_delta_to_the_nearest_slot() {
    let mut setup = TestSetup::new();
    let placement = setup.placement(4, 3);
    setup
        .engine
        .begin_move(setup.appointment_id, placement)
        .unwrap();

    // 31px at 20px per slot rounds to 2 slots.
    setup.engine.pointer_moved(31.0, 10.0);
    assert_eq!(setup.engine.preview().unwrap().start_slot, 6);

    // 9px rounds back to zero.
    setup.engine.pointer_moved(9.0, 10.0);
    assert_eq!(setup.engine.preview().unwrap().start_slot, 4);
}

#[test]
fn move_clamps_to_the_day_window() {
    let mut setup = TestSetup::new();
    let total = 44; // 08:00-19:00 in 15-minute slots
    setup
        .engine
        .begin_move(setup.appointment_id, setup.placement(4, 3))
        .unwrap();

    setup.engine.pointer_moved(-10_000.0, 10.0);
    assert_eq!(setup.engine.preview().unwrap().start_slot, 0);

    setup.engine.pointer_moved(10_000.0, 10.0);
    assert_eq!(setup.engine.preview().unwrap().start_slot, total - 3);
}

#[test]
fn move_resolves_the_provider_from_the_pointer_column() {
    let mut setup = TestSetup::new();
    setup
        .engine
        .begin_move(setup.appointment_id, setup.placement(4, 3))
        .unwrap();

    setup.engine.pointer_moved(0.0, 150.0);
    assert_eq!(setup.engine.preview().unwrap().provider_id, setup.provider_b);

    // Outside every column the provider sticks to the original.
    setup.engine.pointer_moved(0.0, 900.0);
    assert_eq!(setup.engine.preview().unwrap().provider_id, setup.provider_a);
}

// ==============================================================================
// RESIZE
// ==============================================================================

#[test]
fn resize_changes_only_the_duration() {
    let mut setup = TestSetup::new();
    setup
        .engine
        .begin_resize(setup.appointment_id, setup.placement(4, 3))
        .unwrap();

    setup.engine.pointer_moved(40.0, 500.0);
    let preview = setup.engine.preview().unwrap();
    assert_eq!(preview.start_slot, 4);
    assert_eq!(preview.duration_slots, 5);
    assert_eq!(preview.provider_id, setup.provider_a);
}

#[test]
fn resize_clamps_between_minimum_and_window_end() {
    let mut setup = TestSetup::new();
    setup
        .engine
        .begin_resize(setup.appointment_id, setup.placement(40, 3))
        .unwrap();

    setup.engine.pointer_moved(-10_000.0, 10.0);
    assert_eq!(setup.engine.preview().unwrap().duration_slots, 2);

    setup.engine.pointer_moved(10_000.0, 10.0);
    // Slot 40 leaves room for 4 slots in a 44-slot day.
    assert_eq!(setup.engine.preview().unwrap().duration_slots, 4);
}

// ==============================================================================
// FINISH AND VERDICT
// ==============================================================================

#[test]
fn sub_slot_jiggle_ends_without_a_network_call() {
    let mut setup = TestSetup::new();
    setup
        .engine
        .begin_move(setup.appointment_id, setup.placement(4, 3))
        .unwrap();

    setup.engine.pointer_moved(5.0, 10.0);
    assert_eq!(setup.engine.finish(), GestureOutcome::Unchanged);
    assert_eq!(setup.engine.state(), GestureState::Idle);
}

#[test]
fn changed_gesture_submits_the_recomputed_schedule() {
    let mut setup = TestSetup::new();
    // Slot 4 in the default window is 09:00.
    setup
        .engine
        .begin_move(setup.appointment_id, setup.placement(4, 3))
        .unwrap();
    setup.engine.pointer_moved(2.0 * SLOT_HEIGHT, 10.0);

    let outcome = setup.engine.finish();
    let GestureOutcome::Submit {
        appointment_id,
        request,
    } = outcome
    else {
        panic!("expected a submit outcome");
    };

    assert_eq!(appointment_id, setup.appointment_id);
    let start = request.start_time.unwrap();
    assert_eq!(start.format("%H:%M").to_string(), "09:30");
    assert_eq!(request.duration_minutes, Some(45));
    assert_eq!(request.provider_id, Some(setup.provider_a));
}

#[test]
fn a_second_gesture_waits_for_the_verdict() {
    let mut setup = TestSetup::new();
    setup
        .engine
        .begin_move(setup.appointment_id, setup.placement(4, 3))
        .unwrap();
    setup.engine.pointer_moved(2.0 * SLOT_HEIGHT, 10.0);
    assert_matches!(setup.engine.finish(), GestureOutcome::Submit { .. });

    let blocked = setup.engine.begin_move(Uuid::new_v4(), setup.placement(10, 2));
    assert_eq!(blocked, Err(AgendaError::GestureInFlight));

    let rendered = setup.engine.apply_server_verdict(true).unwrap();
    assert_eq!(rendered.start_slot, 6);

    // Committed; the engine accepts the next gesture.
    assert!(setup
        .engine
        .begin_move(Uuid::new_v4(), setup.placement(10, 2))
        .is_ok());
}

#[test]
fn rejection_reverts_to_the_pre_gesture_snapshot() {
    let mut setup = TestSetup::new();
    let original = setup.placement(4, 3);
    setup
        .engine
        .begin_move(setup.appointment_id, original)
        .unwrap();
    setup.engine.pointer_moved(3.0 * SLOT_HEIGHT, 150.0);
    assert_matches!(setup.engine.finish(), GestureOutcome::Submit { .. });

    let rendered = setup.engine.apply_server_verdict(false).unwrap();
    assert_eq!(rendered, original);
    assert_eq!(setup.engine.state(), GestureState::Idle);
}

#[test]
fn verdict_without_an_outstanding_gesture_is_an_error() {
    let mut setup = TestSetup::new();
    assert_eq!(
        setup.engine.apply_server_verdict(true),
        Err(AgendaError::NoGestureInFlight)
    );
}

// ==============================================================================
// COLUMNS
// ==============================================================================

#[test]
fn columns_follow_directory_order_with_equal_widths() {
    let providers: Vec<ProviderSummary> = (0..3)
        .map(|index| ProviderSummary {
            id: Uuid::new_v4(),
            display_name: format!("Provider {}", index),
            discipline: "Kinesitherapie".to_string(),
            display_color: "#4A7DBF".to_string(),
        })
        .collect();

    let columns = columns_for(&providers, 60.0, 120.0);
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].x_min, 60.0);
    assert_eq!(columns[1].x_min, 180.0);
    assert!(columns[2].contains(300.0));
    assert!(!columns[2].contains(420.0));
    assert_eq!(columns[1].provider_id, providers[1].id);
}
