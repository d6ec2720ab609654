use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of an exam module (one question bank per module).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(u32);

impl ModuleId {
    /// Creates a new `ModuleId`
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying module number
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Directory name used by file-backed sources, e.g. `module3`.
    #[must_use]
    pub fn dir_name(&self) -> String {
        format!("module{}", self.0)
    }
}

/// Position of a question in its source bank.
///
/// Records never move inside a bank, so the position doubles as identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(usize);

impl QuestionId {
    #[must_use]
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error type for parsing a module id from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModuleIdError {
    raw: String,
}

impl fmt::Display for ParseModuleIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse module id from {:?}", self.raw)
    }
}

impl std::error::Error for ParseModuleIdError {}

impl FromStr for ModuleId {
    type Err = ParseModuleIdError;

    /// Accepts both `3` and `module3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("module").unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(ModuleId::new)
            .map_err(|_| ParseModuleIdError { raw: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_id_parses_bare_number() {
        let id: ModuleId = "7".parse().unwrap();
        assert_eq!(id, ModuleId::new(7));
    }

    #[test]
    fn module_id_parses_directory_form() {
        let id: ModuleId = "module12".parse().unwrap();
        assert_eq!(id, ModuleId::new(12));
        assert_eq!(id.dir_name(), "module12");
    }

    #[test]
    fn module_id_rejects_garbage() {
        assert!("module".parse::<ModuleId>().is_err());
        assert!("-1".parse::<ModuleId>().is_err());
        assert!("three".parse::<ModuleId>().is_err());
    }

    #[test]
    fn module_id_display_matches_directory_name() {
        let id = ModuleId::new(3);
        assert_eq!(id.to_string(), "module3");
        assert_eq!(id.to_string(), id.dir_name());
    }

    #[test]
    fn question_id_display() {
        assert_eq!(QuestionId::new(4).to_string(), "#4");
    }
}
