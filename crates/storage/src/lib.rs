#![forbid(unsafe_code)]

pub mod json_dir;
pub mod repository;

pub use json_dir::JsonDirSource;
pub use repository::{InMemorySource, ModuleSource, StorageError};
