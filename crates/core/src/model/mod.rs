mod bank;
mod ids;
mod payload;
mod question;

pub use bank::{QuestionBank, RequiredCount};
pub use ids::{ModuleId, ParseModuleIdError, QuestionId};
pub use payload::{ModuleInfo, ModulePayload, QuestionPayload};
pub use question::{QuestionRecord, QuestionView};
