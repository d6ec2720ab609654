//! Module documents stored as `<root>/module<N>/<file>` JSON files.

use async_trait::async_trait;
use log::{debug, info};
use quiz_core::model::ModuleId;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::repository::{ModuleSource, StorageError};

pub const DEFAULT_FILE_NAME: &str = "questions.json";

/// Reads module documents from a data directory.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    root: PathBuf,
    file_name: String,
}

impl JsonDirSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Use a different document name inside each module directory.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, id: ModuleId) -> PathBuf {
        self.root.join(id.dir_name()).join(&self.file_name)
    }
}

fn io_error(id: Option<ModuleId>, err: &std::io::Error) -> StorageError {
    match (err.kind(), id) {
        (ErrorKind::NotFound, Some(id)) => StorageError::NotFound(id),
        _ => StorageError::Io(err.to_string()),
    }
}

#[async_trait]
impl ModuleSource for JsonDirSource {
    async fn load_module(&self, id: ModuleId) -> Result<Value, StorageError> {
        let path = self.path_for(id);
        debug!("reading {}", path.display());
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(Some(id), &e))?;
        let document = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))?;
        info!("loaded {id} from {}", path.display());
        Ok(document)
    }

    async fn list_modules(&self) -> Result<Vec<ModuleId>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| io_error(None, &e))?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(None, &e))? {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !name.starts_with("module") {
                continue;
            }
            let Ok(id) = name.parse::<ModuleId>() else {
                continue;
            };
            // `module03` parses as module 3 but is not where module 3 is read from.
            if id.dir_name() != name {
                continue;
            }
            let exists = tokio::fs::try_exists(self.path_for(id))
                .await
                .map_err(|e| io_error(None, &e))?;
            if exists {
                ids.push(id);
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
