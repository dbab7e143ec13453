//! Task and session collections on top of a [`Store`].
//!
//! Each collection is one JSON array under a fixed key. Every mutating call
//! reads the whole array, changes it, and writes the whole array back. The
//! read-modify-write runs under a per-instance lock, so calls through the
//! same `LocalStore` never lose each other's updates. Two instances sharing
//! one backing store (two processes, two windows) are not coordinated and
//! the later snapshot wins.

use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::models::{Task, TaskPatch, TimerSession};
use super::Store;
use crate::error::Result;
use crate::stats::{calculate_stats, StudyStats};

pub const TASKS_KEY: &str = "tasks";
pub const SESSIONS_KEY: &str = "study_sessions";

pub struct LocalStore<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: Store> LocalStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn get_tasks(&self) -> Result<Vec<Task>> {
        self.read_collection(TASKS_KEY)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.get_tasks()?.into_iter().find(|t| t.id == id))
    }

    /// Upsert by id: replace in place, or append when new.
    pub fn save_task(&self, task: Task) -> Result<()> {
        let _guard = self.lock();
        let mut tasks: Vec<Task> = self.read_collection(TASKS_KEY)?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => tasks.push(task),
        }
        self.write_collection(TASKS_KEY, &tasks)
    }

    /// Remove a task. Unknown ids are ignored.
    pub fn delete_task(&self, id: &str) -> Result<()> {
        let _guard = self.lock();
        let mut tasks: Vec<Task> = self.read_collection(TASKS_KEY)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(());
        }
        self.write_collection(TASKS_KEY, &tasks)
    }

    pub fn update_task_completion(&self, id: &str, completed: bool) -> Result<bool> {
        self.modify_task(id, |task| {
            task.completed = completed;
            Ok(())
        })
    }

    pub fn increment_task_pomodoros(&self, id: &str) -> Result<bool> {
        self.modify_task(id, |task| {
            task.completed_pomodoros = task.completed_pomodoros.saturating_add(1);
            Ok(())
        })
    }

    /// Edit title, estimate, or tags. Returns `false` when the id is unknown.
    pub fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<bool> {
        self.modify_task(id, |task| task.apply(patch).map_err(Into::into))
    }

    // ── Sessions ─────────────────────────────────────────────────────

    pub fn get_sessions(&self) -> Result<Vec<TimerSession>> {
        self.read_collection(SESSIONS_KEY)
    }

    /// Append a completed session. Sessions are never edited or removed.
    pub fn save_session(&self, session: TimerSession) -> Result<()> {
        let _guard = self.lock();
        let mut sessions: Vec<TimerSession> = self.read_collection(SESSIONS_KEY)?;
        tracing::info!(id = %session.id, mode = %session.mode, duration = session.duration, "session recorded");
        sessions.push(session);
        self.write_collection(SESSIONS_KEY, &sessions)
    }

    pub fn calculate_stats(&self) -> Result<StudyStats> {
        Ok(calculate_stats(&self.get_sessions()?))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn modify_task(&self, id: &str, f: impl FnOnce(&mut Task) -> Result<()>) -> Result<bool> {
        let _guard = self.lock();
        let mut tasks: Vec<Task> = self.read_collection(TASKS_KEY)?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        f(task)?;
        self.write_collection(TASKS_KEY, &tasks)?;
        Ok(true)
    }

    /// Missing or unparseable collections read as empty.
    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored collection is not valid JSON, using empty");
                Ok(Vec::new())
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(key, &json)
    }
}
