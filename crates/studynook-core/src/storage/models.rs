//! Persisted record types. Field names follow the camelCase JSON layout of
//! the stored collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::TimerMode;

/// One fully completed timer phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Seconds; always the configured length of the completed phase.
    pub duration: u64,
    pub mode: TimerMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl TimerSession {
    pub fn new(mode: TimerMode, duration: u64, task_id: Option<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: format!("session-{}", uuid::Uuid::new_v4()),
            date,
            duration,
            mode,
            task_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub estimated_pomodoros: u32,
    #[serde(default)]
    pub completed_pomodoros: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Task {
    /// Create a task with a fresh id. The title is trimmed and must not be
    /// empty; the estimate must be at least one pomodoro.
    pub fn new(title: &str, estimated_pomodoros: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: validate_title(title)?,
            completed: false,
            created_at: Utc::now(),
            estimated_pomodoros: validate_estimate(estimated_pomodoros)?,
            completed_pomodoros: 0,
            tags: None,
        })
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = normalize_tags(tags);
        self
    }

    /// First tag, used as the task's category in statistics.
    pub fn category(&self) -> Option<&str> {
        self.tags.as_ref()?.first().map(String::as_str)
    }

    /// Apply an edit, validating the same way as [`Task::new`].
    pub fn apply(&mut self, patch: &TaskPatch) -> Result<(), ValidationError> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        let estimate = patch.estimated_pomodoros.map(validate_estimate).transpose()?;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(estimate) = estimate {
            self.estimated_pomodoros = estimate;
        }
        if let Some(tags) = &patch.tags {
            self.tags = normalize_tags(tags.clone());
        }
        Ok(())
    }
}

/// Edit to an existing task. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub estimated_pomodoros: Option<u32>,
    /// `Some(vec![])` clears the tags.
    pub tags: Option<Vec<String>>,
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::Empty("title".into()));
    }
    Ok(title.to_string())
}

fn validate_estimate(estimate: u32) -> Result<u32, ValidationError> {
    if estimate == 0 {
        return Err(ValidationError::InvalidValue {
            field: "estimatedPomodoros".into(),
            message: "must be at least 1".into(),
        });
    }
    Ok(estimate)
}

fn normalize_tags(tags: Vec<String>) -> Option<Vec<String>> {
    let tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    (!tags.is_empty()).then_some(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_new_trims_and_validates() {
        let task = Task::new("  Read chapter 3 ", 2).unwrap();
        assert_eq!(task.title, "Read chapter 3");
        assert_eq!(task.completed_pomodoros, 0);
        assert!(!task.completed);
        assert!(Task::new("   ", 1).is_err());
        assert!(Task::new("x", 0).is_err());
    }

    #[test]
    fn patch_is_all_or_nothing() {
        let mut task = Task::new("Essay", 3).unwrap();
        let bad = TaskPatch {
            title: Some("Essay v2".into()),
            estimated_pomodoros: Some(0),
            tags: None,
        };
        assert!(task.apply(&bad).is_err());
        assert_eq!(task.title, "Essay");
    }

    #[test]
    fn category_is_first_tag() {
        let task = Task::new("Flashcards", 1)
            .unwrap()
            .with_tags(vec![" biology ".into(), "exam".into(), "".into()]);
        assert_eq!(task.category(), Some("biology"));
        assert_eq!(task.tags.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn session_json_layout() {
        let date = "2024-03-01T10:00:00Z".parse().unwrap();
        let session = TimerSession::new(TimerMode::LongBreak, 900, None, date);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["mode"], "longBreak");
        assert_eq!(json["duration"], 900);
        assert!(json.get("taskId").is_none());
        assert!(session.id.starts_with("session-"));
    }
}
