use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProgress {
    /// 1-based number of the question on screen; equals `total` once finished.
    pub question_number: usize,
    pub total: usize,
    pub answered: usize,
    pub score: usize,
    /// Share of the run reached, counting the question on screen.
    pub percent: f64,
    pub is_complete: bool,
}
