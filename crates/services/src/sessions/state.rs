use chrono::{DateTime, Duration, Utc};
use quiz_core::model::QuestionId;
use serde::Serialize;
use std::fmt;

/// Pass mark used by EASA Part-66 module exams.
pub const DEFAULT_PASS_MARK: f64 = 75.0;

/// Where a session is in its linear lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    /// The current question is shown and waits for an answer.
    AwaitingAnswer,
    /// The current question has been scored; waiting for `advance`.
    Answered,
    /// Every sampled question has been consumed.
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::AwaitingAnswer => "awaiting an answer",
            SessionState::Answered => "answered",
            SessionState::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Scored answer to a single question.
///
/// Carries both the chosen and the correct index so a renderer can highlight
/// each without asking the session again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    pub selected_index: usize,
    pub correct_option_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// Final tally of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn new(
        score: usize,
        total: usize,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };
        Self {
            score,
            total,
            percentage,
            started_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.completed_at - self.started_at
    }

    /// True when the percentage reaches `pass_mark` (inclusive).
    #[must_use]
    pub fn passed(&self, pass_mark: f64) -> bool {
        self.percentage >= pass_mark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn result_computes_percentage() {
        let result = QuizResult::new(1, 2, fixed_now(), fixed_now());
        assert!((result.percentage - 50.0).abs() < f64::EPSILON);
        assert!(!result.passed(DEFAULT_PASS_MARK));
    }

    #[test]
    fn pass_mark_is_inclusive() {
        let result = QuizResult::new(3, 4, fixed_now(), fixed_now());
        assert!(result.passed(DEFAULT_PASS_MARK));
    }

    #[test]
    fn elapsed_spans_start_to_completion() {
        let started = fixed_now();
        let result = QuizResult::new(0, 1, started, started + Duration::minutes(4));
        assert_eq!(result.elapsed(), Duration::minutes(4));
    }

    #[test]
    fn state_display_reads_naturally() {
        assert_eq!(SessionState::AwaitingAnswer.to_string(), "awaiting an answer");
        assert_eq!(SessionState::Finished.to_string(), "finished");
    }
}
