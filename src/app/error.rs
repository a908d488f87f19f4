use crate::board::ValidationError;
use crate::store::StoreError;

/// Everything the engine can surface to the user. None of these end the
/// session; each becomes an error notification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("column {column} is at its WIP limit ({limit})")]
    Capacity { column: String, limit: u32 },
    #[error("{0}")]
    AlreadyTerminal(String),
    #[error("{0}")]
    Adapter(String),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e.to_string()),
            StoreError::NotFound(what) => Self::NotFound(what.to_string()),
            StoreError::AlreadyArchived | StoreError::AlreadyDeleted => {
                Self::AlreadyTerminal(err.to_string())
            }
            StoreError::Duplicate(_) => Self::Validation(err.to_string()),
            StoreError::Sqlite(_) | StoreError::Io(_) => Self::Adapter(err.to_string()),
        }
    }
}
