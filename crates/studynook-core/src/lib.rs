//! # StudyNook Core Library
//!
//! Core logic for the StudyNook study timer. The `studynook` CLI is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pomodoro state machine driven by explicit ticks.
//!   Every command returns the [`Event`]s it produced.
//! - **Storage**: a key/value [`Store`] (memory, JSON files, SQLite) with the
//!   task and session collections layered on top by [`LocalStore`].
//! - **Preferences**: lenient timer settings kept in the TOML [`Config`].
//! - **Stats**: pure aggregations over recorded sessions.
//! - **Chat**: the StudyBot assistant over a [`ChatBackend`].

pub mod chat;
pub mod error;
pub mod events;
pub mod preferences;
pub mod stats;
pub mod storage;
pub mod timer;

pub use chat::{ChatBackend, ChatMessage, ChatRole, CohereClient, StudyBot};
pub use error::{ChatError, ConfigError, CoreError, StoreError, ValidationError};
pub use events::{Cue, Event};
pub use preferences::{
    ConfigPreferencesStore, MemoryPreferencesStore, PreferencesPatch, PreferencesStore,
    TimerPreferences,
};
pub use stats::{calculate_stats, StudyStats};
pub use storage::{
    Config, JsonFileStore, LocalStore, MemoryStore, SqliteStore, Store, Task, TaskPatch,
    TimerSession,
};
pub use timer::{format_time, StudyTimer, TickSource, TimerEngine, TimerMode};
