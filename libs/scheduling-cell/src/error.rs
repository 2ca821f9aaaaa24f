use thiserror::Error;

use shared_store::StoreError;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authorized to manage this appointment")]
    Unauthorized,

    #[error("Appointment not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Directory error: {0}")]
    Directory(String),
}

impl From<StoreError> for SchedulingError {
    fn from(err: StoreError) -> Self {
        SchedulingError::Store(err.to_string())
    }
}
