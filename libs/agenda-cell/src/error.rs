use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AgendaError {
    #[error("A gesture is already active or awaiting its server verdict")]
    GestureInFlight,

    #[error("No gesture is awaiting a server verdict")]
    NoGestureInFlight,
}
