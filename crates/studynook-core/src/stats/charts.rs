//! Chart-shaped aggregations: per-day, per-weekday, per-mode, per-category.

use chrono::{Datelike, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::{Task, TimerSession};
use crate::timer::TimerMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMinutes {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub day: String,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayTotals {
    pub name: String,
    pub sessions: u64,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeCount {
    pub mode: TimerMode,
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMinutes {
    pub name: String,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u64,
}

fn local_date<Tz: TimeZone>(session: &TimerSession, tz: &Tz) -> NaiveDate {
    session.date.with_timezone(tz).date_naive()
}

fn rounded_minutes(secs: u64) -> u64 {
    (secs as f64 / 60.0).round() as u64
}

/// First date of a `days`-long window ending at `today`.
///
/// Fails when the window would start before the earliest representable
/// date.
pub fn window_start(today: NaiveDate, days: u32) -> Result<NaiveDate, ValidationError> {
    today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "days".into(),
            message: format!("a {days}-day window ending {today} is out of range"),
        })
}

/// Work minutes for each of the `days` days ending at `today`, oldest first.
pub fn daily_focus_minutes<Tz: TimeZone>(
    sessions: &[TimerSession],
    today: NaiveDate,
    days: u32,
    tz: &Tz,
) -> Result<Vec<DayMinutes>, ValidationError> {
    if days == 0 {
        return Ok(Vec::new());
    }
    let from = window_start(today, days)?;
    Ok(from
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| {
            let secs: u64 = sessions
                .iter()
                .filter(|s| s.mode == TimerMode::Work && local_date(s, tz) == date)
                .map(|s| s.duration)
                .sum();
            DayMinutes {
                date,
                day: date.format("%a").to_string(),
                minutes: rounded_minutes(secs),
            }
        })
        .collect())
}

/// Sessions and minutes per weekday over all modes, Sunday first.
pub fn weekday_breakdown<Tz: TimeZone>(sessions: &[TimerSession], tz: &Tz) -> Vec<WeekdayTotals> {
    const NAMES: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    let mut totals: Vec<WeekdayTotals> = NAMES
        .iter()
        .map(|name| WeekdayTotals {
            name: (*name).to_string(),
            sessions: 0,
            minutes: 0,
        })
        .collect();

    for session in sessions {
        let idx = local_date(session, tz).weekday().num_days_from_sunday() as usize;
        totals[idx].sessions += 1;
        totals[idx].minutes += rounded_minutes(session.duration);
    }
    totals
}

/// Session count per mode; modes without sessions are left out.
pub fn mode_breakdown(sessions: &[TimerSession]) -> Vec<ModeCount> {
    TimerMode::ALL
        .iter()
        .map(|&mode| ModeCount {
            mode,
            name: match mode {
                TimerMode::Work => "Focus",
                TimerMode::Break => "Break",
                TimerMode::LongBreak => "Long Break",
            }
            .to_string(),
            count: sessions.iter().filter(|s| s.mode == mode).count() as u64,
        })
        .filter(|m| m.count > 0)
        .collect()
}

/// Minutes per category, where a session's category is the first tag of
/// its task. Sessions without a tagged task are ignored. Categories appear
/// in first-seen order.
pub fn category_minutes(sessions: &[TimerSession], tasks: &[Task]) -> Vec<CategoryMinutes> {
    let mut out: Vec<CategoryMinutes> = Vec::new();
    for session in sessions {
        let Some(category) = session
            .task_id
            .as_deref()
            .and_then(|id| tasks.iter().find(|t| t.id == id))
            .and_then(Task::category)
        else {
            continue;
        };
        let minutes = rounded_minutes(session.duration);
        match out.iter_mut().find(|c| c.name == category) {
            Some(entry) => entry.minutes += minutes,
            None => out.push(CategoryMinutes {
                name: category.to_string(),
                minutes,
            }),
        }
    }
    out
}

/// Minutes per day for every date in `from..=to`, zero-filled.
pub fn activity_heatmap<Tz: TimeZone>(
    sessions: &[TimerSession],
    from: NaiveDate,
    to: NaiveDate,
    tz: &Tz,
) -> Vec<HeatmapCell> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|date| HeatmapCell {
            date,
            count: sessions
                .iter()
                .filter(|s| local_date(s, tz) == date)
                .map(|s| rounded_minutes(s.duration))
                .sum(),
        })
        .collect()
}

/// `"45 min"` below an hour, `"2h 5m"` from an hour up.
pub fn format_minutes(minutes: u64) -> String {
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn session(mode: TimerMode, duration: u64, date: &str, task: Option<&str>) -> TimerSession {
        let date: DateTime<Utc> = date.parse().unwrap();
        TimerSession::new(mode, duration, task.map(str::to_string), date)
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn daily_minutes_cover_window_and_skip_breaks() {
        let sessions = vec![
            session(TimerMode::Work, 1500, "2024-03-07T09:00:00Z", None),
            session(TimerMode::Break, 300, "2024-03-07T09:30:00Z", None),
            session(TimerMode::Work, 1500, "2024-03-05T09:00:00Z", None),
            session(TimerMode::Work, 1500, "2024-02-01T09:00:00Z", None),
        ];
        let days = daily_focus_minutes(&sessions, day("2024-03-07"), 7, &Utc).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, day("2024-03-01"));
        assert_eq!(days[6].date, day("2024-03-07"));
        assert_eq!(days[6].day, "Thu");
        assert_eq!(days[6].minutes, 25);
        assert_eq!(days[4].minutes, 25);
        assert_eq!(days.iter().map(|d| d.minutes).sum::<u64>(), 50);
    }

    #[test]
    fn oversized_window_is_rejected() {
        let err = daily_focus_minutes(&[], day("2024-03-07"), u32::MAX, &Utc).unwrap_err();
        assert!(err.to_string().contains("'days'"));
        assert!(window_start(day("2024-03-07"), u32::MAX).is_err());
        assert_eq!(window_start(day("2024-03-07"), 1).unwrap(), day("2024-03-07"));
        assert_eq!(window_start(day("2024-03-07"), 0).unwrap(), day("2024-03-07"));
        assert!(daily_focus_minutes(&[], day("2024-03-07"), 0, &Utc).unwrap().is_empty());
    }

    #[test]
    fn weekday_breakdown_is_sunday_first() {
        let sessions = vec![
            // 2024-03-03 is a Sunday.
            session(TimerMode::Work, 1500, "2024-03-03T09:00:00Z", None),
            session(TimerMode::Break, 300, "2024-03-03T09:30:00Z", None),
            session(TimerMode::Work, 1500, "2024-03-04T09:00:00Z", None),
        ];
        let week = weekday_breakdown(&sessions, &Utc);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].name, "Sunday");
        assert_eq!(week[0].sessions, 2);
        assert_eq!(week[0].minutes, 30);
        assert_eq!(week[1].sessions, 1);
        assert_eq!(week[6].sessions, 0);
    }

    #[test]
    fn mode_breakdown_omits_empty_modes() {
        let sessions = vec![
            session(TimerMode::Work, 1500, "2024-03-03T09:00:00Z", None),
            session(TimerMode::Work, 1500, "2024-03-03T10:00:00Z", None),
            session(TimerMode::LongBreak, 900, "2024-03-03T11:00:00Z", None),
        ];
        let modes = mode_breakdown(&sessions);
        assert_eq!(modes.len(), 2);
        assert_eq!((modes[0].name.as_str(), modes[0].count), ("Focus", 2));
        assert_eq!((modes[1].name.as_str(), modes[1].count), ("Long Break", 1));
    }

    #[test]
    fn categories_use_first_tag_of_linked_task() {
        let mut bio = Task::new("Cells", 2).unwrap().with_tags(vec!["biology".into(), "exam".into()]);
        bio.id = "bio".into();
        let mut untagged = Task::new("Misc", 1).unwrap();
        untagged.id = "misc".into();
        let tasks = vec![bio, untagged];

        let sessions = vec![
            session(TimerMode::Work, 1500, "2024-03-03T09:00:00Z", Some("bio")),
            session(TimerMode::Break, 300, "2024-03-03T09:30:00Z", Some("bio")),
            session(TimerMode::Work, 1500, "2024-03-03T10:00:00Z", Some("misc")),
            session(TimerMode::Work, 1500, "2024-03-03T11:00:00Z", Some("deleted")),
            session(TimerMode::Work, 1500, "2024-03-03T12:00:00Z", None),
        ];
        assert_eq!(
            category_minutes(&sessions, &tasks),
            vec![CategoryMinutes {
                name: "biology".into(),
                minutes: 30
            }]
        );
    }

    #[test]
    fn heatmap_is_continuous_and_zero_filled() {
        let sessions = vec![session(TimerMode::Work, 1500, "2024-03-02T09:00:00Z", None)];
        let cells = activity_heatmap(&sessions, day("2024-03-01"), day("2024-03-03"), &Utc);
        let counts: Vec<u64> = cells.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![0, 25, 0]);
        assert!(activity_heatmap(&sessions, day("2024-03-03"), day("2024-03-01"), &Utc).is_empty());
    }

    #[test]
    fn format_minutes_switches_to_hours() {
        assert_eq!(format_minutes(0), "0 min");
        assert_eq!(format_minutes(59), "59 min");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(125), "2h 5m");
    }
}
