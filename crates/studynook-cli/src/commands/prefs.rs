use clap::Subcommand;
use serde_json::json;
use studynook_core::{
    Config, ConfigPreferencesStore, PreferencesPatch, PreferencesStore, TimerMode,
};

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print stored preferences and the durations they resolve to
    Show,
    /// Update one preference (e.g. `workDuration 50`, `soundEnabled false`)
    Set { key: String, value: String },
}

pub fn run(action: PrefsAction) -> CmdResult {
    let mut store = ConfigPreferencesStore::open(Config::path()?)?;

    match action {
        PrefsAction::Show => {
            let prefs = store.snapshot();
            let effective: serde_json::Map<String, serde_json::Value> = TimerMode::ALL
                .iter()
                .map(|&mode| (mode.as_str().to_string(), json!(prefs.duration_secs(mode))))
                .collect();
            print_json(&json!({
                "stored": prefs,
                "effectiveSecs": effective,
                "sessionsBeforeLongBreak": prefs.sessions_before_long_break(),
            }))?;
        }
        PrefsAction::Set { key, value } => {
            let patch = PreferencesPatch::from_pair(&key, &value)?;
            let updated = store.update(&patch)?;
            print_json(&updated)?;
        }
    }
    Ok(())
}
