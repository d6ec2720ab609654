use serde::{Deserialize, Serialize};

use crate::error::MalformedBank;

/// Raw module document as served by a data source.
///
/// ```json
/// { "moduleInfo": { "requiredQuestions": 2 },
///   "questions": [ { "question": "...", "options": ["..."], "correctAnswer": 0, "explanation": "..." } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulePayload {
    #[serde(default)]
    pub module_info: ModuleInfo,
    pub questions: Vec<QuestionPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_questions: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

impl ModulePayload {
    /// Decode a payload from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns `MalformedBank::Payload` if fields are missing or mistyped.
    pub fn from_value(value: serde_json::Value) -> Result<Self, MalformedBank> {
        Ok(serde_json::from_value(value)?)
    }

    /// Decode a payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `MalformedBank::Payload` if the text is not a valid module document.
    pub fn from_json_str(raw: &str) -> Result<Self, MalformedBank> {
        Ok(serde_json::from_str(raw)?)
    }
}
