mod config;
mod json_file;
pub mod local;
mod memory;
pub mod models;
mod sqlite;

pub use config::{ChatConfig, Config, StorageBackend, StorageConfig};
pub use json_file::JsonFileStore;
pub use local::{LocalStore, SESSIONS_KEY, TASKS_KEY};
pub use memory::MemoryStore;
pub use models::{Task, TaskPatch, TimerSession};
pub use sqlite::SqliteStore;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ConfigError, Result};

/// Flat key-value storage for named collections.
///
/// Values are opaque strings (JSON in practice). Implementations may be
/// backed by memory, files, or SQLite; none of them coordinate across
/// processes.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

macro_rules! forward_store {
    ($ptr:ident) => {
        impl<S: Store + ?Sized> Store for $ptr<S> {
            fn get(&self, key: &str) -> Result<Option<String>> {
                (**self).get(key)
            }

            fn set(&self, key: &str, value: &str) -> Result<()> {
                (**self).set(key, value)
            }

            fn remove(&self, key: &str) -> Result<()> {
                (**self).remove(key)
            }
        }
    };
}

forward_store!(Arc);
forward_store!(Box);

/// Returns the StudyNook data directory, creating it if needed.
///
/// `STUDYNOOK_DATA_DIR` wins when set. Otherwise `~/.config/studynook`, or
/// `~/.config/studynook-dev` with `STUDYNOOK_ENV=dev`.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYNOOK_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYNOOK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studynook-dev")
            } else {
                base_dir.join("studynook")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
