//! Profile-backed preference storage.

use std::path::{Path, PathBuf};

use super::{PreferencesPatch, TimerPreferences};
use crate::error::Result;
use crate::storage::Config;

/// Source of truth for a user's timer preferences.
///
/// Readers take a synchronous snapshot; writers send a partial patch. An
/// implementation must only change its snapshot once the backing write has
/// succeeded, so a failed update leaves callers looking at the old values.
pub trait PreferencesStore {
    fn snapshot(&self) -> TimerPreferences;

    fn update(&mut self, patch: &PreferencesPatch) -> Result<TimerPreferences>;
}

/// Preferences held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferencesStore {
    preferences: TimerPreferences,
}

impl MemoryPreferencesStore {
    pub fn new(preferences: TimerPreferences) -> Self {
        Self { preferences }
    }
}

impl PreferencesStore for MemoryPreferencesStore {
    fn snapshot(&self) -> TimerPreferences {
        self.preferences.clone()
    }

    fn update(&mut self, patch: &PreferencesPatch) -> Result<TimerPreferences> {
        self.preferences.apply(patch);
        Ok(self.preferences.clone())
    }
}

/// Preferences persisted in the `[preferences]` table of the config file.
#[derive(Debug, Clone)]
pub struct ConfigPreferencesStore {
    path: PathBuf,
    config: Config,
}

impl ConfigPreferencesStore {
    /// Load the config at `path`, writing defaults if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = Config::load_from(&path)?;
        Ok(Self { path, config })
    }
}

impl PreferencesStore for ConfigPreferencesStore {
    fn snapshot(&self) -> TimerPreferences {
        self.config.preferences.clone()
    }

    fn update(&mut self, patch: &PreferencesPatch) -> Result<TimerPreferences> {
        let mut next = self.config.clone();
        next.preferences.apply(patch);
        next.save_to(&self.path)?;
        tracing::info!(path = %self.path.display(), "preferences updated");
        self.config = next;
        Ok(self.config.preferences.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerMode;

    #[test]
    fn config_store_persists_patch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut store = ConfigPreferencesStore::open(&path).unwrap();
        assert_eq!(store.snapshot(), TimerPreferences::default());

        let patch = PreferencesPatch {
            work_duration: Some(50.0),
            ..PreferencesPatch::default()
        };
        store.update(&patch).unwrap();

        let reopened = ConfigPreferencesStore::open(&path).unwrap();
        assert_eq!(reopened.snapshot().duration_minutes(TimerMode::Work), 50);
    }

    #[test]
    fn failed_write_keeps_old_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut store = ConfigPreferencesStore::open(&path).unwrap();

        // Replace the file with a directory so the next save fails.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let patch = PreferencesPatch {
            break_duration: Some(9.0),
            ..PreferencesPatch::default()
        };
        assert!(store.update(&patch).is_err());
        assert_eq!(store.snapshot().duration_minutes(TimerMode::Break), 5);
    }
}
