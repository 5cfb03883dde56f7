use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    /// The backend does not implement the requested endpoint.
    #[error("Endpoint not supported: {0}")]
    Unsupported(String),

    #[error("Backend error: {0}")]
    Backend(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StudyError {
    /// Whether the error means "the backend has no such capability" rather than a failure.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, StudyError::Unsupported(_))
    }
}

pub type StudyResult<T> = Result<T, StudyError>;
