use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named countdown interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    Break,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Work, TimerMode::Break, TimerMode::LongBreak];

    /// Built-in duration in minutes used when preferences carry no usable value.
    pub fn default_minutes(self) -> u64 {
        match self {
            TimerMode::Work => 25,
            TimerMode::Break => 5,
            TimerMode::LongBreak => 15,
        }
    }

    /// Wire name, as stored in session records.
    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::Break => "break",
            TimerMode::LongBreak => "longBreak",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Focus Time",
            TimerMode::Break => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" | "focus" => Ok(TimerMode::Work),
            "break" | "short-break" | "shortbreak" => Ok(TimerMode::Break),
            "longbreak" | "long-break" | "long_break" => Ok(TimerMode::LongBreak),
            other => Err(format!("unknown timer mode: {other}")),
        }
    }
}

/// `MM:SS` rendering of a second count. Minutes are not wrapped into hours.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
