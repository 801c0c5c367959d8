use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, RemitError>;

#[derive(Error, Debug)]
pub enum RemitError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("order {id} is locked in status {status}")]
    LockedOrder { id: Uuid, status: String },
    #[error("collaborator failure: {0}")]
    Collaborator(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemitError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}
