use chrono::{DateTime, Utc};
use log::{debug, warn};
use quiz_core::Clock;
use quiz_core::model::{ModuleId, QuestionBank, QuestionRecord, QuestionView};
use rand::Rng;
use std::fmt;

use super::progress::SessionProgress;
use super::state::{AnswerOutcome, QuizResult, SessionState};
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a module quiz.
///
/// Holds `required_count` questions sampled from a `QuestionBank` and walks
/// them strictly in order: answer the current question once, advance, repeat
/// until `Finished`. The session owns its sample, so the bank can be shared by
/// any number of sessions.
pub struct QuizSession {
    module_id: ModuleId,
    questions: Vec<QuestionRecord>,
    position: usize,
    score: usize,
    state: SessionState,
    answers: Vec<AnswerOutcome>,
    clock: Clock,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Sample a fresh run from `bank` using the system clock and thread RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` if the bank cannot supply its required count.
    pub fn start(bank: &QuestionBank) -> Result<Self, SessionError> {
        Self::start_with(bank, Clock::system(), &mut rand::rng())
    }

    /// Sample a fresh run with an explicit clock and RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` if the bank cannot supply its required count.
    pub fn start_with<R: Rng + ?Sized>(
        bank: &QuestionBank,
        clock: Clock,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let questions = bank.sample_with(rng, bank.required_count())?;
        debug!(
            "session started for {} with {} questions",
            bank.module_id(),
            questions.len()
        );

        Ok(Self {
            module_id: bank.module_id(),
            answers: Vec::with_capacity(questions.len()),
            questions,
            position: 0,
            score: 0,
            state: SessionState::AwaitingAnswer,
            clock,
            started_at: clock.now(),
            completed_at: None,
        })
    }

    /// Throw away progress and resample from `bank`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` if sampling fails; the session is then left
    /// exactly as it was.
    pub fn reset(&mut self, bank: &QuestionBank) -> Result<(), SessionError> {
        self.reset_with(bank, &mut rand::rng())
    }

    /// Like [`QuizSession::reset`] with an explicit RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` if sampling fails.
    pub fn reset_with<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        *self = Self::start_with(bank, self.clock, rng)?;
        Ok(())
    }

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of questions in this run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// True between a successful `submit_answer` and the following `advance`.
    #[must_use]
    pub fn answered_current(&self) -> bool {
        self.state == SessionState::Answered
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// True while the last question of the run is on screen.
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        !self.is_finished() && self.position + 1 == self.questions.len()
    }

    /// Answers submitted so far, in question order.
    #[must_use]
    pub fn answers(&self) -> &[AnswerOutcome] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let question_number = (self.position + 1).min(total);
        let percent = if total == 0 {
            0.0
        } else {
            question_number as f64 / total as f64 * 100.0
        };

        SessionProgress {
            question_number,
            total,
            answered: self.answers.len(),
            score: self.score,
            percent,
            is_complete: self.is_finished(),
        }
    }

    /// The question at the current position, without its answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionFinished` once the run is over.
    pub fn current_question(&self) -> Result<QuestionView<'_>, SessionError> {
        self.current_record().map(QuestionRecord::view)
    }

    /// Score `selected_index` against the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is awaiting an
    /// answer, and `SessionError::OutOfRange` if the index is not an option of
    /// the current question. Neither error changes the session.
    pub fn submit_answer(&mut self, selected_index: usize) -> Result<AnswerOutcome, SessionError> {
        self.require(SessionState::AwaitingAnswer, "submit an answer")?;
        let question = self.current_record()?;
        let options = question.options().len();
        if selected_index >= options {
            debug!("answer {selected_index} rejected, question has {options} options");
            return Err(SessionError::OutOfRange {
                index: selected_index,
                options,
            });
        }

        let outcome = AnswerOutcome {
            question_id: question.id(),
            selected_index,
            correct_option_index: question.correct_option_index(),
            is_correct: question.is_correct(selected_index),
            explanation: question.explanation().to_owned(),
        };

        if outcome.is_correct {
            self.score += 1;
        }
        self.state = SessionState::Answered;
        self.answers.push(outcome.clone());
        debug!(
            "question {} answered ({}), score {}/{}",
            self.position + 1,
            if outcome.is_correct { "correct" } else { "wrong" },
            self.score,
            self.questions.len()
        );

        Ok(outcome)
    }

    /// Move past an answered question, finishing the run after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the current question has
    /// been answered.
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        self.require(SessionState::Answered, "advance")?;

        if self.position + 1 < self.questions.len() {
            self.position += 1;
            self.state = SessionState::AwaitingAnswer;
        } else {
            self.position = self.questions.len();
            self.state = SessionState::Finished;
            self.completed_at = Some(self.clock.now());
            debug!(
                "session for {} finished with {}/{}",
                self.module_id,
                self.score,
                self.questions.len()
            );
        }

        Ok(self.state)
    }

    /// Final score of a finished run.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` before the session has finished.
    pub fn result(&self) -> Result<QuizResult, SessionError> {
        self.require(SessionState::Finished, "read the result")?;
        let completed_at = self.completed_at.unwrap_or(self.started_at);
        Ok(QuizResult::new(
            self.score,
            self.questions.len(),
            self.started_at,
            completed_at,
        ))
    }

    fn current_record(&self) -> Result<&QuestionRecord, SessionError> {
        if self.is_finished() {
            return Err(SessionError::SessionFinished);
        }
        self.questions
            .get(self.position)
            .ok_or(SessionError::SessionFinished)
    }

    fn require(&self, expected: SessionState, operation: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            return Ok(());
        }
        warn!("cannot {operation} while the session is {}", self.state);
        Err(SessionError::InvalidState {
            operation,
            state: self.state,
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("module_id", &self.module_id)
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("score", &self.score)
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::BankError;
    use quiz_core::model::{QuestionId, RequiredCount};
    use quiz_core::time::{fixed_clock, fixed_now};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn build_bank(len: usize, required: RequiredCount) -> QuestionBank {
        let records = (0..len)
            .map(|i| {
                QuestionRecord::new(
                    QuestionId::new(i),
                    format!("Q{i}"),
                    ["a", "b", "c", "d"],
                    i % 4,
                    format!("E{i}"),
                )
                .unwrap()
            })
            .collect();
        QuestionBank::new(ModuleId::new(1), records, required).unwrap()
    }

    fn start(bank: &QuestionBank, seed: u64) -> QuizSession {
        QuizSession::start_with(bank, fixed_clock(), &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn correct_index(session: &QuizSession) -> usize {
        session.questions[session.position].correct_option_index()
    }

    fn wrong_index(session: &QuizSession) -> usize {
        (correct_index(session) + 1) % 4
    }

    #[test]
    fn scored_walkthrough_of_two_questions() {
        let bank = build_bank(5, RequiredCount::Exactly(2));
        let mut session = start(&bank, 1);
        assert_eq!(session.total(), 2);
        assert_eq!(session.state(), SessionState::AwaitingAnswer);

        let outcome = session.submit_answer(correct_index(&session)).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(session.score(), 1);
        assert_eq!(session.state(), SessionState::Answered);

        assert_eq!(session.advance().unwrap(), SessionState::AwaitingAnswer);
        assert_eq!(session.position(), 1);

        let wrong = wrong_index(&session);
        let outcome = session.submit_answer(wrong).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.selected_index, wrong);
        assert_eq!(outcome.correct_option_index, correct_index(&session));
        assert_eq!(session.score(), 1);

        assert_eq!(session.advance().unwrap(), SessionState::Finished);
        let result = session.result().unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.total, 2);
        assert!((result.percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(result.completed_at, fixed_now());
    }

    #[test]
    fn second_submission_is_rejected() {
        let bank = build_bank(3, RequiredCount::AllQuestions);
        let mut session = start(&bank, 2);

        session.submit_answer(correct_index(&session)).unwrap();
        let err = session.submit_answer(correct_index(&session)).unwrap_err();

        assert_eq!(
            err,
            SessionError::InvalidState {
                operation: "submit an answer",
                state: SessionState::Answered,
            }
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn out_of_range_answer_leaves_question_open() {
        let bank = build_bank(3, RequiredCount::AllQuestions);
        let mut session = start(&bank, 3);

        let err = session.submit_answer(4).unwrap_err();
        assert_eq!(err, SessionError::OutOfRange { index: 4, options: 4 });
        assert_eq!(session.state(), SessionState::AwaitingAnswer);

        assert!(session.submit_answer(0).is_ok());
    }

    #[test]
    fn advance_requires_an_answer() {
        let bank = build_bank(2, RequiredCount::AllQuestions);
        let mut session = start(&bank, 4);

        let err = session.advance().unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState {
                state: SessionState::AwaitingAnswer,
                ..
            }
        ));
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn finished_session_rejects_question_operations() {
        let bank = build_bank(1, RequiredCount::AllQuestions);
        let mut session = start(&bank, 5);
        session.submit_answer(0).unwrap();
        session.advance().unwrap();

        assert_eq!(session.position(), 1);
        assert_eq!(
            session.current_question().unwrap_err(),
            SessionError::SessionFinished
        );
        assert!(matches!(
            session.submit_answer(0).unwrap_err(),
            SessionError::InvalidState {
                state: SessionState::Finished,
                ..
            }
        ));
        assert!(matches!(
            session.advance().unwrap_err(),
            SessionError::InvalidState { .. }
        ));
    }

    #[test]
    fn result_is_unavailable_before_finishing() {
        let bank = build_bank(2, RequiredCount::AllQuestions);
        let mut session = start(&bank, 6);
        assert!(session.result().is_err());

        session.submit_answer(0).unwrap();
        assert!(matches!(
            session.result().unwrap_err(),
            SessionError::InvalidState {
                operation: "read the result",
                state: SessionState::Answered,
            }
        ));
    }

    #[test]
    fn oversized_requirement_prevents_start() {
        let bank = build_bank(5, RequiredCount::Exactly(6));
        let err =
            QuizSession::start_with(&bank, fixed_clock(), &mut StdRng::seed_from_u64(7)).unwrap_err();
        assert_eq!(
            err,
            SessionError::Bank(BankError::InsufficientQuestions {
                required: 6,
                available: 5,
            })
        );
    }

    #[test]
    fn reset_resamples_and_clears_progress() {
        let bank = build_bank(8, RequiredCount::Exactly(3));
        let mut session = start(&bank, 8);
        session.submit_answer(correct_index(&session)).unwrap();
        session.advance().unwrap();

        session
            .reset_with(&bank, &mut StdRng::seed_from_u64(9))
            .unwrap();

        assert_eq!(session.state(), SessionState::AwaitingAnswer);
        assert_eq!(session.position(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.total(), 3);
    }

    #[test]
    fn failed_reset_keeps_the_running_session() {
        let bank = build_bank(4, RequiredCount::AllQuestions);
        let too_small = build_bank(2, RequiredCount::Exactly(3));
        let mut session = start(&bank, 10);
        session.submit_answer(correct_index(&session)).unwrap();

        assert!(session.reset(&too_small).is_err());
        assert_eq!(session.state(), SessionState::Answered);
        assert_eq!(session.score(), 1);
        assert_eq!(session.total(), 4);
    }

    #[test]
    fn answered_question_stays_current_until_advance() {
        let bank = build_bank(5, RequiredCount::Exactly(3));
        let mut session = start(&bank, 16);
        let before = session.current_question().unwrap().id;

        session.submit_answer(correct_index(&session)).unwrap();

        assert_eq!(session.state(), SessionState::Answered);
        let view = session.current_question().unwrap();
        assert_eq!(view.id, before);
        assert_eq!(session.position(), 0);

        session.advance().unwrap();
        assert_ne!(session.current_question().unwrap().id, before);
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn current_question_matches_sample_order() {
        let bank = build_bank(6, RequiredCount::Exactly(4));
        let mut session = start(&bank, 11);
        let mut seen = HashSet::new();

        while !session.is_finished() {
            let view = session.current_question().unwrap();
            assert_eq!(view.id, session.questions[session.position].id());
            assert!(seen.insert(view.id));
            session.submit_answer(0).unwrap();
            session.advance().unwrap();
        }

        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn progress_tracks_position_and_last_question() {
        let bank = build_bank(4, RequiredCount::Exactly(2));
        let mut session = start(&bank, 12);

        let progress = session.progress();
        assert_eq!(progress.question_number, 1);
        assert!((progress.percent - 50.0).abs() < f64::EPSILON);
        assert!(!session.is_last_question());

        session.submit_answer(0).unwrap();
        session.advance().unwrap();
        assert!(session.is_last_question());

        session.submit_answer(0).unwrap();
        session.advance().unwrap();
        let progress = session.progress();
        assert_eq!(progress.question_number, 2);
        assert_eq!(progress.answered, 2);
        assert!(progress.is_complete);
        assert!(!session.is_last_question());
    }

    #[test]
    fn counters_stay_consistent_under_random_play() {
        let bank = build_bank(12, RequiredCount::Exactly(7));
        let mut rng = StdRng::seed_from_u64(13);

        for seed in 0..50 {
            let mut session = start(&bank, seed);
            let mut correct = 0;

            loop {
                let total = session.total();
                assert!(session.position() <= total);
                assert!(session.score() <= session.answers().len());
                assert!(session.answers().len() <= total);

                match session.state() {
                    SessionState::AwaitingAnswer => {
                        assert_eq!(session.answers().len(), session.position());
                        let pick = rng.random_range(0..4);
                        if session.submit_answer(pick).unwrap().is_correct {
                            correct += 1;
                        }
                    }
                    SessionState::Answered => {
                        assert_eq!(session.answers().len(), session.position() + 1);
                        assert!(session.submit_answer(0).is_err());
                        session.advance().unwrap();
                    }
                    SessionState::Finished => break,
                }
            }

            let result = session.result().unwrap();
            assert_eq!(result.total, 7);
            assert_eq!(result.score, correct);
            assert_eq!(session.position(), 7);
        }
    }

    #[test]
    fn sessions_from_one_bank_are_independent() {
        let bank = build_bank(5, RequiredCount::Exactly(3));
        let mut first = start(&bank, 14);
        let second = start(&bank, 15);

        first.submit_answer(0).unwrap();

        assert_eq!(first.state(), SessionState::Answered);
        assert_eq!(second.state(), SessionState::AwaitingAnswer);
        assert!(second.answers().is_empty());
    }
}
