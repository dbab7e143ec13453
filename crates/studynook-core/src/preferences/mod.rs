//! Timer preferences and their resolution rules.
//!
//! Preferences come from an external profile store and may hold anything:
//! numbers, numeric strings, `null`, garbage. Duration fields are therefore
//! read leniently into `Option<f64>` and only turned into concrete durations
//! through [`TimerPreferences::duration_secs`], which substitutes the built-in
//! default for every value that is missing, non-finite, or not positive.

mod store;

pub use store::{ConfigPreferencesStore, MemoryPreferencesStore, PreferencesStore};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::timer::TimerMode;

/// Fallback for a missing or non-positive long break threshold.
pub const DEFAULT_SESSIONS_BEFORE_LONG_BREAK: u32 = 4;

/// Per-user timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPreferences {
    /// Minutes.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub work_duration: Option<f64>,
    /// Minutes.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<f64>,
    /// Minutes.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub long_break_duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub sessions_before_long_break: Option<f64>,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_pomodoros: bool,
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TimerPreferences {
    fn default() -> Self {
        Self {
            work_duration: Some(TimerMode::Work.default_minutes() as f64),
            break_duration: Some(TimerMode::Break.default_minutes() as f64),
            long_break_duration: Some(TimerMode::LongBreak.default_minutes() as f64),
            sessions_before_long_break: Some(DEFAULT_SESSIONS_BEFORE_LONG_BREAK as f64),
            sound_enabled: true,
            auto_start_breaks: true,
            auto_start_pomodoros: false,
            dark_mode: false,
        }
    }
}

impl TimerPreferences {
    /// Raw configured minutes for a mode, before any fallback.
    pub fn raw_minutes(&self, mode: TimerMode) -> Option<f64> {
        match mode {
            TimerMode::Work => self.work_duration,
            TimerMode::Break => self.break_duration,
            TimerMode::LongBreak => self.long_break_duration,
        }
    }

    /// Authoritative phase length in seconds. Never zero.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        positive_secs(self.raw_minutes(mode)).unwrap_or(mode.default_minutes() * 60)
    }

    /// Resolved phase length in whole minutes, for display.
    pub fn duration_minutes(&self, mode: TimerMode) -> u64 {
        self.duration_secs(mode) / 60
    }

    /// Work sessions per long break. Never zero.
    pub fn sessions_before_long_break(&self) -> u32 {
        self.sessions_before_long_break
            .filter(|n| n.is_finite() && *n >= 1.0)
            .map(|n| n.min(u32::MAX as f64) as u32)
            .unwrap_or(DEFAULT_SESSIONS_BEFORE_LONG_BREAK)
    }

    /// Merge a partial update; fields absent from the patch are kept.
    pub fn apply(&mut self, patch: &PreferencesPatch) {
        if let Some(v) = patch.work_duration {
            self.work_duration = Some(v);
        }
        if let Some(v) = patch.break_duration {
            self.break_duration = Some(v);
        }
        if let Some(v) = patch.long_break_duration {
            self.long_break_duration = Some(v);
        }
        if let Some(v) = patch.sessions_before_long_break {
            self.sessions_before_long_break = Some(v);
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.auto_start_breaks {
            self.auto_start_breaks = v;
        }
        if let Some(v) = patch.auto_start_pomodoros {
            self.auto_start_pomodoros = v;
        }
        if let Some(v) = patch.dark_mode {
            self.dark_mode = v;
        }
    }

    pub fn merged(&self, patch: &PreferencesPatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

/// Partial preferences update. Only present fields are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PreferencesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_before_long_break: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_breaks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_pomodoros: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
}

impl PreferencesPatch {
    /// Build a single-field patch from a `key value` pair as typed on the
    /// command line. Keys use the camelCase wire names.
    pub fn from_pair(key: &str, value: &str) -> Result<Self, ValidationError> {
        let parsed = match value.parse::<serde_json::Value>() {
            Ok(v @ (serde_json::Value::Bool(_) | serde_json::Value::Number(_))) => v,
            _ => serde_json::Value::String(value.to_string()),
        };
        let mut obj = serde_json::Map::new();
        obj.insert(key.to_string(), parsed);
        serde_json::from_value(serde_json::Value::Object(obj)).map_err(|e| {
            ValidationError::InvalidValue {
                field: key.to_string(),
                message: e.to_string(),
            }
        })
    }
}

fn positive_secs(minutes: Option<f64>) -> Option<u64> {
    let minutes = minutes.filter(|m| m.is_finite() && *m > 0.0)?;
    let secs = (minutes * 60.0).round();
    (secs >= 1.0).then_some(secs as u64)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}
