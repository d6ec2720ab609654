#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{QuizServiceError, SessionError};
pub use quiz_service::QuizService;
pub use sessions::{
    AnswerOutcome, DEFAULT_PASS_MARK, QuizResult, QuizSession, SessionProgress, SessionState,
};
