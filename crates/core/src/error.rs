use thiserror::Error;

use crate::model::QuestionId;

/// Structural problems in a module payload or its question records.
///
/// A bank carrying any of these is rejected outright; nothing is clamped or
/// skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedBank {
    #[error("question bank has no questions")]
    Empty,

    #[error("question {question} has an empty prompt")]
    EmptyPrompt { question: QuestionId },

    #[error("question {question} has {len} options, at least 2 are required")]
    TooFewOptions { question: QuestionId, len: usize },

    #[error("question {question} has an empty option at index {index}")]
    EmptyOption { question: QuestionId, index: usize },

    #[error("question {question} marks option {index} as correct but has {len} options")]
    CorrectIndexOutOfBounds {
        question: QuestionId,
        index: usize,
        len: usize,
    },

    #[error("required question count must be > 0")]
    ZeroRequiredCount,

    #[error("invalid module payload: {0}")]
    Payload(String),
}

/// Errors emitted by `QuestionBank`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error(transparent)]
    Malformed(#[from] MalformedBank),

    #[error("{required} questions required but the bank only holds {available}")]
    InsufficientQuestions { required: usize, available: usize },

    #[error("a quiz run needs at least one question")]
    EmptySample,
}

impl From<serde_json::Error> for MalformedBank {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}
