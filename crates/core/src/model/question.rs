use crate::error::MalformedBank;
use crate::model::ids::QuestionId;

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

/// A single multiple-choice question from a bank.
///
/// Construction validates the record, so every `QuestionRecord` in circulation
/// has at least two non-empty options and a correct index inside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option_index: usize,
    explanation: String,
}

impl QuestionRecord {
    /// Build and validate a question record.
    ///
    /// # Errors
    ///
    /// Returns `MalformedBank` if the prompt or an option is blank, fewer than
    /// two options are given, or `correct_option_index` is not a valid option.
    pub fn new<I, S>(
        id: QuestionId,
        prompt: impl Into<String>,
        options: I,
        correct_option_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, MalformedBank>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let record = Self {
            id,
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_option_index,
            explanation: explanation.into(),
        };
        record.check()?;
        Ok(record)
    }

    pub(crate) fn check(&self) -> Result<(), MalformedBank> {
        let question = self.id;
        if self.prompt.trim().is_empty() {
            return Err(MalformedBank::EmptyPrompt { question });
        }
        if self.options.len() < 2 {
            return Err(MalformedBank::TooFewOptions {
                question,
                len: self.options.len(),
            });
        }
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(MalformedBank::EmptyOption { question, index });
        }
        if self.correct_option_index >= self.options.len() {
            return Err(MalformedBank::CorrectIndexOutOfBounds {
                question,
                index: self.correct_option_index,
                len: self.options.len(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, selected_index: usize) -> bool {
        selected_index == self.correct_option_index
    }

    /// Answer-free view of this question.
    #[must_use]
    pub fn view(&self) -> QuestionView<'_> {
        QuestionView {
            id: self.id,
            prompt: &self.prompt,
            options: &self.options,
        }
    }
}

//
// ─── QUESTION VIEW ─────────────────────────────────────────────────────────────
//

/// What a rendering layer may see before an answer has been submitted.
///
/// The correct index and explanation are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub id: QuestionId,
    pub prompt: &'a str,
    pub options: &'a [String],
}

impl QuestionView<'_> {
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_record_builds() {
        let record = QuestionRecord::new(
            QuestionId::new(0),
            "What is the unit of pressure?",
            ["Pascal", "Newton", "Joule"],
            0,
            "1 Pa = 1 N/m².",
        )
        .unwrap();

        assert_eq!(record.options().len(), 3);
        assert!(record.is_correct(0));
        assert!(!record.is_correct(2));
    }

    #[test]
    fn record_rejects_correct_index_out_of_bounds() {
        let err = QuestionRecord::new(QuestionId::new(3), "Q", ["a", "b"], 2, "").unwrap_err();
        assert_eq!(
            err,
            MalformedBank::CorrectIndexOutOfBounds {
                question: QuestionId::new(3),
                index: 2,
                len: 2,
            }
        );
    }

    #[test]
    fn record_rejects_single_option() {
        let err = QuestionRecord::new(QuestionId::new(1), "Q", ["only"], 0, "").unwrap_err();
        assert!(matches!(err, MalformedBank::TooFewOptions { len: 1, .. }));
    }

    #[test]
    fn record_rejects_blank_text() {
        let err = QuestionRecord::new(QuestionId::new(0), "  ", ["a", "b"], 0, "").unwrap_err();
        assert!(matches!(err, MalformedBank::EmptyPrompt { .. }));

        let err = QuestionRecord::new(QuestionId::new(0), "Q", ["a", " "], 0, "").unwrap_err();
        assert!(matches!(err, MalformedBank::EmptyOption { index: 1, .. }));
    }

    #[test]
    fn view_hides_answer_details() {
        let record =
            QuestionRecord::new(QuestionId::new(2), "Q", ["a", "b"], 1, "because").unwrap();
        let view = record.view();
        assert_eq!(view.id, QuestionId::new(2));
        assert_eq!(view.prompt, "Q");
        assert_eq!(view.option_count(), 2);
    }
}
