//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::BankError;
use storage::StorageError;

use crate::sessions::SessionState;

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("option {index} is out of range for a question with {options} options")]
    OutOfRange { index: usize, options: usize },

    #[error("session already finished")]
    SessionFinished,
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
