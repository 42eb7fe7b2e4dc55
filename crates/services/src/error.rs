//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;

/// Errors emitted while setting up an exam session.
///
/// Rejected transitions on a running session are not errors; they come back
/// as [`crate::Transition::Rejected`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamError {
    #[error("candidate name is required")]
    NameRequired,
    #[error("no valid questions available for the exam")]
    NoQuestions,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
