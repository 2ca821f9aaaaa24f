// libs/scheduling-cell/tests/conflict_test.rs
use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::eq;
use std::sync::Arc;
use uuid::Uuid;

use scheduling_cell::ConflictDetectionService;
use shared_models::{PatientDirectory, PatientSummary};
use shared_store::{AppointmentStore, InMemoryStore};
use shared_utils::{init_test_tracing, test_time, AppointmentFixture};

mock! {
    Patients {}

    #[async_trait]
    impl PatientDirectory for Patients {
        async fn search_patients(&self, query: &str) -> anyhow::Result<Vec<PatientSummary>>;
        async fn display_name(&self, patient_id: Uuid) -> anyhow::Result<Option<String>>;
    }
}

fn detector_with(store: Arc<InMemoryStore>, patients: MockPatients) -> ConflictDetectionService {
    init_test_tracing();
    ConflictDetectionService::new(
        store as Arc<dyn AppointmentStore>,
        Arc::new(patients) as Arc<dyn PatientDirectory>,
    )
}

#[tokio::test]
async fn conflicts_carry_the_patient_display_name() {
    let fixture = AppointmentFixture::default();
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_appointment(fixture.appointment_at(test_time(9, 0), 45))
        .await
        .unwrap();

    let mut patients = MockPatients::new();
    patients
        .expect_display_name()
        .with(eq(fixture.patient_id))
        .returning(|_| Ok(Some("Jos Vermeulen".to_string())));

    let detector = detector_with(Arc::clone(&store), patients);
    let conflicts = detector
        .find_conflicts(fixture.provider_id, test_time(9, 30), 30, None)
        .await
        .unwrap();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].patient_name, "Jos Vermeulen");
    assert_eq!(conflicts[0].duration_minutes, 45);
}

#[tokio::test]
async fn unknown_patient_falls_back_to_a_neutral_label() {
    let fixture = AppointmentFixture::default();
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_appointment(fixture.appointment_at(test_time(9, 0), 45))
        .await
        .unwrap();

    let mut patients = MockPatients::new();
    patients.expect_display_name().returning(|_| Ok(None));

    let detector = detector_with(Arc::clone(&store), patients);
    let conflicts = detector
        .find_conflicts(fixture.provider_id, test_time(9, 0), 30, None)
        .await
        .unwrap();

    assert_eq!(conflicts[0].patient_name, "Unknown patient");
}

#[tokio::test]
async fn admin_blocks_are_labelled_by_their_title() {
    let fixture = AppointmentFixture::default();
    let store = Arc::new(InMemoryStore::new());
    let mut block = fixture.appointment_at(test_time(12, 0), 60);
    block.patient_id = None;
    block.admin_title = Some("Teamvergadering".to_string());
    store.insert_appointment(block).await.unwrap();

    // The directory must not be consulted for a block without a patient.
    let mut patients = MockPatients::new();
    patients.expect_display_name().never();

    let detector = detector_with(Arc::clone(&store), patients);
    let conflicts = detector
        .find_conflicts(fixture.provider_id, test_time(12, 30), 30, None)
        .await
        .unwrap();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].patient_name, "Teamvergadering");
}

#[tokio::test]
async fn excluded_appointment_is_skipped() {
    let fixture = AppointmentFixture::default();
    let store = Arc::new(InMemoryStore::new());
    let own = fixture.appointment_at(test_time(9, 0), 45);
    let own_id = own.id;
    store.insert_appointment(own).await.unwrap();

    let mut patients = MockPatients::new();
    patients.expect_display_name().never();

    let detector = detector_with(Arc::clone(&store), patients);
    let conflicts = detector
        .find_conflicts(fixture.provider_id, test_time(9, 15), 45, Some(own_id))
        .await
        .unwrap();

    assert!(conflicts.is_empty());
}
