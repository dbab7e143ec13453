//! Host wiring between the timer engine and the local store.

use super::{TimerEngine, TimerMode};
use crate::error::Result;
use crate::events::Event;
use crate::preferences::TimerPreferences;
use crate::storage::{LocalStore, Store};

/// A timer whose completed phases land in a [`LocalStore`].
///
/// Every command forwards to the engine and then persists each
/// `PhaseCompleted` session. A completed work phase with a selected task
/// also bumps that task's pomodoro counter.
pub struct StudyTimer<S> {
    engine: TimerEngine,
    store: LocalStore<S>,
}

impl<S: Store> StudyTimer<S> {
    pub fn new(engine: TimerEngine, store: LocalStore<S>) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn store(&self) -> &LocalStore<S> {
        &self.store
    }

    pub fn start(&mut self) -> Result<Vec<Event>> {
        let events = self.engine.start();
        self.persist(events)
    }

    pub fn pause(&mut self) -> Result<Vec<Event>> {
        let events = self.engine.pause();
        self.persist(events)
    }

    pub fn reset(&mut self) -> Result<Vec<Event>> {
        let events = self.engine.reset();
        self.persist(events)
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Result<Vec<Event>> {
        let events = self.engine.switch_mode(mode);
        self.persist(events)
    }

    pub fn skip_to_next(&mut self) -> Result<Vec<Event>> {
        let events = self.engine.skip_to_next();
        self.persist(events)
    }

    pub fn tick(&mut self) -> Result<Vec<Event>> {
        self.advance(1)
    }

    pub fn advance(&mut self, delta_secs: u64) -> Result<Vec<Event>> {
        let events = self.engine.advance(delta_secs);
        self.persist(events)
    }

    /// Swap in an engine saved by another host. Completed sessions already
    /// persisted are not replayed.
    pub fn replace_engine(&mut self, engine: TimerEngine) {
        self.engine = engine;
    }

    pub fn set_preferences(&mut self, preferences: TimerPreferences) {
        self.engine.set_preferences(preferences);
    }

    pub fn select_task(&mut self, task_id: Option<String>) {
        self.engine.set_current_task(task_id);
    }

    fn persist(&self, events: Vec<Event>) -> Result<Vec<Event>> {
        for event in &events {
            if let Event::PhaseCompleted { session, .. } = event {
                self.store.save_session(session.clone())?;
                if session.mode == TimerMode::Work {
                    if let Some(task_id) = &session.task_id {
                        if !self.store.increment_task_pomodoros(task_id)? {
                            tracing::warn!(task_id = %task_id, "completed session names an unknown task");
                        }
                    }
                }
            }
        }
        Ok(events)
    }
}
