mod progress;
mod session;
mod state;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use session::QuizSession;
pub use state::{AnswerOutcome, DEFAULT_PASS_MARK, QuizResult, SessionState};
