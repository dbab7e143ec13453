use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::TimerSession;
use crate::timer::TimerMode;

/// Audible cue requested by the timer. Only emitted with sound enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Start,
    Finish,
}

/// Every state change of the timer produces an Event.
/// The host turns them into notifications and persisted sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// User skipped ahead. Never produces a session.
    TimerSkipped {
        from: TimerMode,
        to: TimerMode,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. `session` must be persisted by the host.
    PhaseCompleted {
        session: TimerSession,
        next_mode: TimerMode,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    Sound {
        cue: Cue,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        label: String,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        remaining_display: String,
        progress: f64,
        completed_work_sessions: u32,
        current_task: Option<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short user-facing notice for events worth surfacing.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Event::PhaseCompleted { next_mode, .. } => Some(match next_mode {
                TimerMode::LongBreak => "Long break time! Take a good rest.",
                TimerMode::Break => "Break time! Take a short rest.",
                TimerMode::Work => "Break complete! Ready to focus again?",
            }),
            Event::Sound {
                cue: Cue::Finish, ..
            } => Some("Time's up! Your session has completed."),
            _ => None,
        }
    }
}
