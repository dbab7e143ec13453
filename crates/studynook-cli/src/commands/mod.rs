pub mod chat;
pub mod config;
pub mod prefs;
pub mod stats;
pub mod task;
pub mod timer;

use studynook_core::storage::{data_dir, StorageBackend};
use studynook_core::{Config, JsonFileStore, LocalStore, SqliteStore, Store, StudyTimer};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Store selected by `[storage]` in the config.
pub type AppStore = LocalStore<Box<dyn Store>>;

pub type AppTimer = StudyTimer<Box<dyn Store>>;

pub fn open_store(config: &Config) -> Result<AppStore, Box<dyn std::error::Error>> {
    let store: Box<dyn Store> = match config.storage.backend {
        StorageBackend::Sqlite => match &config.storage.path {
            Some(path) => Box::new(SqliteStore::open_at(path)?),
            None => Box::new(SqliteStore::open()?),
        },
        StorageBackend::Json => {
            let dir = match &config.storage.path {
                Some(path) => path.clone(),
                None => data_dir()?.join("data"),
            };
            Box::new(JsonFileStore::open(dir)?)
        }
    };
    tracing::debug!(backend = ?config.storage.backend, "store opened");
    Ok(LocalStore::new(store))
}

/// Read a JSON value the CLI keeps next to the collections.
pub fn load_json<T: serde::de::DeserializeOwned>(store: &AppStore, key: &str) -> Option<T> {
    let raw = store.inner().get(key).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unreadable state");
            None
        }
    }
}

pub fn save_json<T: serde::Serialize>(
    store: &AppStore,
    key: &str,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    store.inner().set(key, &serde_json::to_string(value)?)?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
