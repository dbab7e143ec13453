//! Session statistics.
//!
//! Everything here is a pure function over a slice of sessions; nothing
//! touches storage.

mod charts;

pub use charts::{
    activity_heatmap, category_minutes, daily_focus_minutes, format_minutes, mode_breakdown,
    weekday_breakdown, window_start, CategoryMinutes, DayMinutes, HeatmapCell, ModeCount, WeekdayTotals,
};

use std::collections::HashSet;

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::storage::TimerSession;
use crate::timer::TimerMode;

/// Summary figures shown on the statistics page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    /// Seconds across every mode, breaks included.
    pub total_time: u64,
    /// Completed work sessions only.
    pub total_sessions: u64,
    /// Distinct calendar days with at least one session. Days need not be
    /// consecutive.
    pub streak_days: u64,
    /// `total_time / total_sessions`, rounded; 0 without work sessions.
    pub average_session_time: u64,
}

/// Aggregate sessions, bucketing days in the local time zone.
pub fn calculate_stats(sessions: &[TimerSession]) -> StudyStats {
    calculate_stats_in(sessions, &Local)
}

pub fn calculate_stats_in<Tz: TimeZone>(sessions: &[TimerSession], tz: &Tz) -> StudyStats {
    if sessions.is_empty() {
        return StudyStats::default();
    }

    let total_time: u64 = sessions.iter().map(|s| s.duration).sum();
    let total_sessions = sessions
        .iter()
        .filter(|s| s.mode == TimerMode::Work)
        .count() as u64;
    let streak_days = sessions
        .iter()
        .map(|s| s.date.with_timezone(tz).date_naive())
        .collect::<HashSet<_>>()
        .len() as u64;
    let average_session_time = if total_sessions == 0 {
        0
    } else {
        (total_time as f64 / total_sessions as f64).round() as u64
    };

    StudyStats {
        total_time,
        total_sessions,
        streak_days,
        average_session_time,
    }
}
