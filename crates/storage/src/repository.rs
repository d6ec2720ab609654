use async_trait::async_trait;
use quiz_core::model::ModuleId;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by module sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(ModuleId),

    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Source of raw module documents.
///
/// Implementations only fetch and parse JSON; mapping the document onto a
/// `QuestionBank` happens in the services layer.
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// Fetch the module document for `id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the module is unknown, or other
    /// storage errors if it cannot be read.
    async fn load_module(&self, id: ModuleId) -> Result<Value, StorageError>;

    /// List the modules this source can serve, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing cannot be produced.
    async fn list_modules(&self) -> Result<Vec<ModuleId>, StorageError>;
}

/// Simple in-memory source for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySource {
    modules: Arc<Mutex<HashMap<ModuleId, Value>>>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the document served for `id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_module(&self, id: ModuleId, document: Value) -> Result<(), StorageError> {
        let mut guard = self
            .modules
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(id, document);
        Ok(())
    }
}

#[async_trait]
impl ModuleSource for InMemorySource {
    async fn load_module(&self, id: ModuleId) -> Result<Value, StorageError> {
        let guard = self
            .modules
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound(id))
    }

    async fn list_modules(&self) -> Result<Vec<ModuleId>, StorageError> {
        let guard = self
            .modules
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut ids: Vec<_> = guard.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
