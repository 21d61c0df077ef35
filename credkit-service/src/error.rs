/// Error handling for the credential service
///
/// Wraps [`CredentialError`] from the core with the failure modes the
/// blocking executor adds. Messages never include passwords or token
/// secrets.

use std::time::Duration;

use credkit_core::CredentialError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Unified service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Error from the credential core
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Executor has been shut down
    #[error("Credential executor is closed")]
    Closed,

    /// Caller stopped waiting; the computation still runs to completion
    #[error("Credential operation timed out after {0:?}")]
    TimedOut(Duration),

    /// Blocking worker panicked or was cancelled
    #[error("Credential worker failed: {0}")]
    WorkerFailed(String),
}

impl ServiceError {
    /// Returns the core error, if this wraps one
    pub fn as_credential(&self) -> Option<&CredentialError> {
        match self {
            ServiceError::Credential(err) => Some(err),
            _ => None,
        }
    }
}
