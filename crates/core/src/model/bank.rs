use log::debug;
use rand::Rng;

use crate::error::{BankError, MalformedBank};
use crate::model::ids::{ModuleId, QuestionId};
use crate::model::payload::ModulePayload;
use crate::model::question::QuestionRecord;
use crate::sampling::sample_indices;

/// How many questions make up one quiz run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequiredCount {
    /// Every question in the bank. Used when a module does not declare a count.
    #[default]
    AllQuestions,
    Exactly(usize),
}

impl From<Option<usize>> for RequiredCount {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::AllQuestions, Self::Exactly)
    }
}

/// Validated, immutable pool of questions for one module.
///
/// Built once per module and shared by every session started from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    module_id: ModuleId,
    title: Option<String>,
    records: Vec<QuestionRecord>,
    required_count: usize,
}

impl QuestionBank {
    /// Build a bank from already constructed records.
    ///
    /// A required count larger than the bank is kept as-is; it surfaces as
    /// `BankError::InsufficientQuestions` when a run is sampled.
    ///
    /// # Errors
    ///
    /// Returns `MalformedBank` if `records` is empty, any record is invalid, or
    /// the required count is zero.
    pub fn new(
        module_id: ModuleId,
        records: Vec<QuestionRecord>,
        required: RequiredCount,
    ) -> Result<Self, MalformedBank> {
        Self::validate(&records)?;
        let required_count = match required {
            RequiredCount::AllQuestions => records.len(),
            RequiredCount::Exactly(0) => return Err(MalformedBank::ZeroRequiredCount),
            RequiredCount::Exactly(n) => n,
        };

        Ok(Self {
            module_id,
            title: None,
            records,
            required_count,
        })
    }

    /// Map a source payload onto a bank; record ids are their payload positions.
    ///
    /// # Errors
    ///
    /// Returns `MalformedBank` for the same reasons as [`QuestionBank::new`].
    pub fn from_payload(module_id: ModuleId, payload: ModulePayload) -> Result<Self, MalformedBank> {
        let records = payload
            .questions
            .into_iter()
            .enumerate()
            .map(|(position, q)| {
                QuestionRecord::new(
                    QuestionId::new(position),
                    q.question,
                    q.options,
                    q.correct_answer,
                    q.explanation,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut bank = Self::new(
            module_id,
            records,
            payload.module_info.required_questions.into(),
        )?;
        bank.title = payload.module_info.title;
        Ok(bank)
    }

    /// Check a record set against the bank invariants.
    ///
    /// # Errors
    ///
    /// Returns `MalformedBank::Empty` for an empty set, otherwise the first
    /// record-level violation found.
    pub fn validate(records: &[QuestionRecord]) -> Result<(), MalformedBank> {
        if records.is_empty() {
            return Err(MalformedBank::Empty);
        }
        records.iter().try_for_each(QuestionRecord::check)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed bank; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn required_count(&self) -> usize {
        self.required_count
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&QuestionRecord> {
        self.records.get(id.value())
    }

    /// Draw `count` distinct questions in random order using the thread RNG.
    ///
    /// # Errors
    ///
    /// See [`QuestionBank::sample_with`].
    pub fn sample(&self, count: usize) -> Result<Vec<QuestionRecord>, BankError> {
        self.sample_with(&mut rand::rng(), count)
    }

    /// Draw `count` distinct questions in random order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptySample` if `count` is zero and
    /// `BankError::InsufficientQuestions` if it exceeds the bank size.
    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<QuestionRecord>, BankError> {
        if count == 0 {
            return Err(BankError::EmptySample);
        }
        if count > self.records.len() {
            return Err(BankError::InsufficientQuestions {
                required: count,
                available: self.records.len(),
            });
        }

        let picked = sample_indices(rng, self.records.len(), count);
        debug!(
            "sampled {count} of {} questions from {}",
            self.records.len(),
            self.module_id
        );
        Ok(picked
            .into_iter()
            .map(|index| self.records[index].clone())
            .collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
