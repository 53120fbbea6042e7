use thiserror::Error;

/// Errors surfaced by the orchestration layer.
///
/// Stage failures inside a running pipeline are never returned to callers;
/// they are recorded on the job record and observed by polling. The variants
/// here cover the synchronous surface plus internal invariant violations.
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job already exists: {0}")]
    DuplicateId(String),

    #[error("Stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ReelError {
    fn from(err: anyhow::Error) -> Self {
        ReelError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReelError>;
