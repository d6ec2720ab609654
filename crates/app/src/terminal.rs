//! Line-oriented driver that turns terminal input into session calls.

use std::io::{self, BufRead, Write};

use log::debug;
use quiz_core::model::ModuleId;
use services::{QuizResult, QuizService, SessionError};

use crate::render::{render_outcome, render_question, render_result};

type RunError = Box<dyn std::error::Error>;

enum Choice {
    Option(usize),
    Quit,
}

/// Read one line; `None` on end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    options: usize,
) -> io::Result<Choice> {
    loop {
        write!(output, "Your answer (1-{options}, q to quit): ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(Choice::Quit);
        };
        if line.eq_ignore_ascii_case("q") {
            return Ok(Choice::Quit);
        }
        match line.parse::<usize>() {
            Ok(n) if n >= 1 => return Ok(Choice::Option(n - 1)),
            _ => writeln!(output, "Please choose an option between 1 and {options}.")?,
        }
    }
}

/// Play `module_id` until the user quits; returns the result of every finished run.
///
/// # Errors
///
/// Returns an error if the module cannot be loaded, a session call is
/// rejected unexpectedly, or the terminal cannot be read or written.
pub async fn run_quiz<R: BufRead, W: Write>(
    service: &QuizService,
    module_id: ModuleId,
    pass_mark: f64,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<QuizResult>, RunError> {
    let bank = service.bank(module_id).await?;
    let mut session = service.start_session(module_id).await?;
    let mut results = Vec::new();

    if let Some(title) = bank.title() {
        writeln!(output, "{title}")?;
    }
    writeln!(
        output,
        "{} questions drawn from a bank of {}.",
        session.total(),
        bank.len()
    )?;

    loop {
        while !session.is_finished() {
            let view = session.current_question()?;
            let options = view.options.to_vec();
            writeln!(output)?;
            write!(output, "{}", render_question(&view, &session.progress()))?;

            let outcome = loop {
                let selected = match ask_choice(input, output, options.len())? {
                    Choice::Option(index) => index,
                    Choice::Quit => return Ok(results),
                };
                match session.submit_answer(selected) {
                    Ok(outcome) => break outcome,
                    Err(SessionError::OutOfRange { options: count, .. }) => {
                        writeln!(output, "Please choose an option between 1 and {count}.")?;
                    }
                    Err(err) => return Err(err.into()),
                }
            };

            write!(
                output,
                "{}",
                render_outcome(&outcome, &options, session.is_last_question())
            )?;
            output.flush()?;
            if read_line(input)?.is_none() {
                writeln!(output)?;
            }
            session.advance()?;
        }

        let result = session.result()?;
        writeln!(output)?;
        write!(output, "{}", render_result(&result, pass_mark))?;
        results.push(result);

        write!(output, "[r] restart, [q] quit: ")?;
        output.flush()?;
        match read_line(input)? {
            Some(line) if line.eq_ignore_ascii_case("r") => {
                debug!("restarting {module_id}");
                service.restart(&mut session).await?;
            }
            _ => return Ok(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Arc;
    use storage::InMemorySource;

    // Every question's correct answer is option 1, whatever the sample order.
    fn service() -> QuizService {
        let source = InMemorySource::new();
        source
            .insert_module(
                ModuleId::new(1),
                json!({
                    "moduleInfo": { "title": "Module 1 - Mathematics", "requiredQuestions": 2 },
                    "questions": [
                        { "question": "2 + 2?", "options": ["4", "5", "6"], "correctAnswer": 0, "explanation": "Basic sum." },
                        { "question": "3 x 3?", "options": ["9", "6", "3"], "correctAnswer": 0, "explanation": "Basic product." },
                        { "question": "10 / 2?", "options": ["5", "2", "20"], "correctAnswer": 0, "explanation": "Basic quotient." }
                    ]
                }),
            )
            .unwrap();
        QuizService::new(Arc::new(source)).with_clock(fixed_clock())
    }

    async fn play(script: &str) -> (Vec<QuizResult>, String) {
        let service = service();
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let results = run_quiz(&service, ModuleId::new(1), 75.0, &mut input, &mut output)
            .await
            .unwrap();
        (results, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn plays_a_run_to_the_result_screen() {
        let (results, text) = play("1\n\n2\n\nq\n").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 1);
        assert!(text.contains("Module 1 - Mathematics"));
        assert!(text.contains("Question 1/2"));
        assert!(text.contains("Question 2/2"));
        assert!(text.contains("✓ Correct!"));
        assert!(text.contains("✗ Incorrect."));
        assert!(text.contains("Your score: 1/2"));
        assert!(text.contains("Percentage: 50.0%"));
        assert!(text.contains("Result: FAIL"));
    }

    #[tokio::test]
    async fn invalid_input_reprompts() {
        let (results, text) = play("abc\n0\n7\n1\n\n1\n\n").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 2);
        assert_eq!(
            text.matches("Please choose an option between 1 and 3.").count(),
            3
        );
    }

    #[tokio::test]
    async fn restart_runs_a_fresh_session() {
        let (results, text) = play("1\n\n1\n\nr\n2\n\n2\n\nq\n").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, 2);
        assert_eq!(results[1].score, 0);
        assert_eq!(text.matches("Quiz finished!").count(), 2);
    }

    #[tokio::test]
    async fn quitting_mid_run_reports_nothing() {
        let (results, text) = play("q\n").await;

        assert!(results.is_empty());
        assert!(!text.contains("Quiz finished!"));
    }
}
