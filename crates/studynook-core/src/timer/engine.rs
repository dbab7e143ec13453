//! Timer engine implementation.
//!
//! The engine is a countdown state machine over three modes. It has no clock
//! of its own: the caller feeds elapsed time through `tick()` or
//! `advance(delta_secs)`, which makes the engine usable with a wall-clock
//! interval, a test clock, or a simulated clock alike.
//!
//! ## Cycle
//!
//! ```text
//! work -> break -> work -> break -> ... -> work -> longBreak -> work ...
//! ```
//!
//! Every `sessions_before_long_break`-th completed work phase is followed by
//! a long break. Skipping and resetting never count as completions.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(preferences);
//! engine.start();
//! // Once per second:
//! for event in engine.tick() { /* persist Event::PhaseCompleted */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{format_time, TimerMode};
use crate::events::{Cue, Event};
use crate::preferences::TimerPreferences;
use crate::storage::TimerSession;

/// Core timer engine.
///
/// Every command returns the events it produced; an empty vector means the
/// command was a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    preferences: TimerPreferences,
    mode: TimerMode,
    running: bool,
    remaining_secs: u64,
    /// Full length of the current phase.
    total_secs: u64,
    completed_work_sessions: u32,
    #[serde(default)]
    current_task: Option<String>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerPreferences::default())
    }
}

impl TimerEngine {
    /// Create a paused engine in work mode with a full countdown.
    pub fn new(preferences: TimerPreferences) -> Self {
        let total_secs = preferences.duration_secs(TimerMode::Work);
        Self {
            preferences,
            mode: TimerMode::Work,
            running: false,
            remaining_secs: total_secs,
            total_secs,
            completed_work_sessions: 0,
            current_task: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn current_task(&self) -> Option<&str> {
        self.current_task.as_deref()
    }

    pub fn preferences(&self) -> &TimerPreferences {
        &self.preferences
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        let elapsed = self.total_secs.saturating_sub(self.remaining_secs);
        elapsed as f64 / self.total_secs as f64
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            label: self.mode.label().to_string(),
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            remaining_display: format_time(self.remaining_secs),
            progress: self.progress(),
            completed_work_sessions: self.completed_work_sessions,
            current_task: self.current_task.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if self.running {
            return Vec::new();
        }
        let mut events = vec![self.begin_running()];
        self.push_cue(&mut events, Cue::Start);
        events
    }

    /// Stop the countdown, keeping the remaining time.
    pub fn pause(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.running = false;
        vec![Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }]
    }

    /// Rewind the current phase to its full length and stop.
    pub fn reset(&mut self) -> Vec<Event> {
        self.running = false;
        self.remaining_secs = self.total_secs;
        vec![Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }]
    }

    /// Jump to `mode` with a full countdown. The run flag is left as is.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Vec<Event> {
        let from = self.mode;
        self.mode = mode;
        self.total_secs = self.preferences.duration_secs(mode);
        self.remaining_secs = self.total_secs;

        let mut events = vec![Event::ModeSwitched {
            from,
            to: mode,
            duration_secs: self.total_secs,
            at: Utc::now(),
        }];
        self.push_cue(&mut events, Cue::Start);
        events
    }

    /// Move to the phase that would follow a completion, without recording
    /// anything and without counting the current phase as done.
    pub fn skip_to_next(&mut self) -> Vec<Event> {
        self.running = false;
        let from = self.mode;
        let next = match from {
            TimerMode::Work => self.break_after(self.completed_work_sessions.saturating_add(1)),
            TimerMode::Break | TimerMode::LongBreak => TimerMode::Work,
        };

        let mut events = vec![Event::TimerSkipped {
            from,
            to: next,
            at: Utc::now(),
        }];
        events.extend(self.switch_mode(next));
        events
    }

    /// Call once per elapsed second while running.
    pub fn tick(&mut self) -> Vec<Event> {
        self.advance(1)
    }

    /// Count down by `delta_secs`. Reaching zero completes the phase;
    /// seconds left over after a completion are dropped.
    pub fn advance(&mut self, delta_secs: u64) -> Vec<Event> {
        if !self.running || delta_secs == 0 {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(delta_secs);
        tracing::debug!(mode = %self.mode, remaining = self.remaining_secs, "tick");
        if self.remaining_secs == 0 {
            return self.complete();
        }
        Vec::new()
    }

    /// Replace the preferences. The current phase length is re-resolved; the
    /// countdown itself is only rewound when the timer is not running.
    pub fn set_preferences(&mut self, preferences: TimerPreferences) {
        self.preferences = preferences;
        self.total_secs = self.preferences.duration_secs(self.mode);
        if !self.running {
            self.remaining_secs = self.total_secs;
        }
    }

    /// Task credited with sessions completed from now on.
    pub fn set_current_task(&mut self, task_id: Option<String>) {
        self.current_task = task_id;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Vec<Event> {
        self.running = false;
        let finished = self.mode;

        let mut events = Vec::new();
        self.push_cue(&mut events, Cue::Finish);

        let session = TimerSession::new(
            finished,
            self.total_secs,
            self.current_task.clone(),
            Utc::now(),
        );

        let (next, auto_start) = match finished {
            TimerMode::Work => {
                self.completed_work_sessions = self.completed_work_sessions.saturating_add(1);
                (
                    self.break_after(self.completed_work_sessions),
                    self.preferences.auto_start_breaks,
                )
            }
            TimerMode::Break | TimerMode::LongBreak => {
                (TimerMode::Work, self.preferences.auto_start_pomodoros)
            }
        };

        tracing::info!(
            mode = %finished,
            duration = session.duration,
            next = %next,
            auto_start,
            "phase completed"
        );

        events.extend(self.switch_mode(next));
        if auto_start {
            events.push(self.begin_running());
        }
        events.push(Event::PhaseCompleted {
            session,
            next_mode: next,
            auto_started: auto_start,
            at: Utc::now(),
        });
        events
    }

    fn break_after(&self, work_sessions: u32) -> TimerMode {
        if work_sessions % self.preferences.sessions_before_long_break() == 0 {
            TimerMode::LongBreak
        } else {
            TimerMode::Break
        }
    }

    fn begin_running(&mut self) -> Event {
        self.running = true;
        Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    fn push_cue(&self, events: &mut Vec<Event>, cue: Cue) {
        if self.preferences.sound_enabled {
            events.push(Event::Sound { cue, at: Utc::now() });
        }
    }
}
