//! Plain-text presentation of questions, outcomes and results.

use std::fmt::Write as _;

use quiz_core::model::QuestionView;
use services::{AnswerOutcome, QuizResult, SessionProgress};

const BAR_WIDTH: usize = 20;

#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[must_use]
pub fn render_question(view: &QuestionView<'_>, progress: &SessionProgress) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", progress_bar(progress.percent, BAR_WIDTH));
    let _ = writeln!(
        out,
        "Question {}/{}",
        progress.question_number, progress.total
    );
    let _ = writeln!(out, "{}", view.prompt);
    for (index, option) in view.options.iter().enumerate() {
        let _ = writeln!(out, "  {}) {option}", index + 1);
    }
    out
}

#[must_use]
pub fn render_outcome(outcome: &AnswerOutcome, options: &[String], is_last: bool) -> String {
    let mut out = String::new();
    if outcome.is_correct {
        let _ = writeln!(out, "✓ Correct!");
    } else {
        let correct = options
            .get(outcome.correct_option_index)
            .map_or("", String::as_str);
        let _ = writeln!(
            out,
            "✗ Incorrect. The correct answer was {}) {correct}",
            outcome.correct_option_index + 1
        );
    }
    if !outcome.explanation.trim().is_empty() {
        let _ = writeln!(out, "{}", outcome.explanation);
    }
    let prompt = if is_last {
        "Press Enter to see your results..."
    } else {
        "Press Enter for the next question..."
    };
    let _ = write!(out, "{prompt}");
    out
}

#[must_use]
pub fn render_result(result: &QuizResult, pass_mark: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Quiz finished!");
    let _ = writeln!(out, "Your score: {}/{}", result.score, result.total);
    let _ = writeln!(out, "Percentage: {:.1}%", result.percentage);
    let verdict = if result.passed(pass_mark) { "PASS" } else { "FAIL" };
    let _ = writeln!(out, "Result: {verdict} (pass mark {pass_mark}%)");
    let secs = result.elapsed().num_seconds().max(0);
    let _ = writeln!(out, "Time: {}m {:02}s", secs / 60, secs % 60);
    out
}
