use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::info;
use quiz_core::model::{ModuleId, ModulePayload, QuestionBank};
use quiz_core::{BankError, Clock};
use storage::ModuleSource;

use crate::error::QuizServiceError;
use crate::sessions::QuizSession;

/// Loads each module's question bank once and starts sessions from it.
///
/// Banks are cached behind `Arc`, so restarting a quiz resamples from memory
/// instead of hitting the source again.
pub struct QuizService {
    source: Arc<dyn ModuleSource>,
    banks: Mutex<HashMap<ModuleId, Arc<QuestionBank>>>,
    clock: Clock,
}

impl QuizService {
    #[must_use]
    pub fn new(source: Arc<dyn ModuleSource>) -> Self {
        Self {
            source,
            banks: Mutex::new(HashMap::new()),
            clock: Clock::system(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Modules the underlying source can serve.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the source cannot list modules.
    pub async fn modules(&self) -> Result<Vec<ModuleId>, QuizServiceError> {
        Ok(self.source.list_modules().await?)
    }

    /// Question bank for `module_id`, loading and validating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the document cannot be fetched and
    /// `QuizServiceError::Bank` if it is malformed.
    pub async fn bank(&self, module_id: ModuleId) -> Result<Arc<QuestionBank>, QuizServiceError> {
        if let Some(bank) = self.cached(module_id) {
            return Ok(bank);
        }

        let document = self.source.load_module(module_id).await?;
        let payload = ModulePayload::from_value(document).map_err(BankError::from)?;
        let bank = QuestionBank::from_payload(module_id, payload).map_err(BankError::from)?;
        info!(
            "{module_id}: {} questions, {} per run",
            bank.len(),
            bank.required_count()
        );

        let mut guard = self.banks.lock().unwrap_or_else(PoisonError::into_inner);
        let cached = guard.entry(module_id).or_insert_with(|| Arc::new(bank));
        Ok(Arc::clone(cached))
    }

    /// Start a new session for `module_id`.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError` if the bank cannot be loaded or cannot supply
    /// its required question count.
    pub async fn start_session(&self, module_id: ModuleId) -> Result<QuizSession, QuizServiceError> {
        let bank = self.bank(module_id).await?;
        Ok(QuizSession::start_with(&bank, self.clock, &mut rand::rng())?)
    }

    /// Reset `session` from the cached bank of its module.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError` if the bank cannot be loaded or resampled;
    /// the session is unchanged in that case.
    pub async fn restart(&self, session: &mut QuizSession) -> Result<(), QuizServiceError> {
        let bank = self.bank(session.module_id()).await?;
        session.reset(&bank)?;
        Ok(())
    }

    /// Drop the cached bank so the next request reloads it from the source.
    ///
    /// Returns true if a bank was cached.
    pub fn evict(&self, module_id: ModuleId) -> bool {
        let mut guard = self.banks.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(&module_id).is_some()
    }

    #[must_use]
    pub fn is_cached(&self, module_id: ModuleId) -> bool {
        self.cached(module_id).is_some()
    }

    fn cached(&self, module_id: ModuleId) -> Option<Arc<QuestionBank>> {
        let guard = self.banks.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(&module_id).map(Arc::clone)
    }
}
