//! Task and session collections over every store backend.

use std::sync::Arc;

use chrono::Utc;
use studynook_core::storage::TASKS_KEY;
use studynook_core::{
    JsonFileStore, LocalStore, MemoryStore, SqliteStore, Store, Task, TimerMode, TimerSession,
};

fn exercise<S: Store>(store: &LocalStore<S>) -> String {
    let task = Task::new("Read chapter 4", 2).unwrap();
    let id = task.id.clone();
    store.save_task(task).unwrap();
    assert!(store.increment_task_pomodoros(&id).unwrap());
    assert!(store.update_task_completion(&id, true).unwrap());
    store
        .save_session(TimerSession::new(
            TimerMode::Work,
            1500,
            Some(id.clone()),
            Utc::now(),
        ))
        .unwrap();
    id
}

#[test]
fn sqlite_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studynook.db");

    let id = exercise(&LocalStore::new(SqliteStore::open_at(&path).unwrap()));

    let reopened = LocalStore::new(SqliteStore::open_at(&path).unwrap());
    let task = reopened.get_task(&id).unwrap().unwrap();
    assert!(task.completed);
    assert_eq!(task.completed_pomodoros, 1);
    assert_eq!(reopened.get_sessions().unwrap().len(), 1);
}

#[test]
fn json_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let id = exercise(&LocalStore::new(JsonFileStore::open(dir.path()).unwrap()));
    assert!(dir.path().join("tasks.json").exists());

    let reopened = LocalStore::new(JsonFileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.get_task(&id).unwrap().unwrap().completed_pomodoros, 1);
    assert_eq!(reopened.get_sessions().unwrap().len(), 1);
}

#[test]
fn stale_collection_write_drops_concurrent_update() {
    // Two handles over one backing store share no lock; whole-collection
    // writes mean the last writer wins.
    let shared = Arc::new(MemoryStore::new());
    let a = LocalStore::new(Arc::clone(&shared));
    let b = LocalStore::new(Arc::clone(&shared));

    a.save_task(Task::new("first", 1).unwrap()).unwrap();
    let stale = shared.get(TASKS_KEY).unwrap().unwrap();

    b.save_task(Task::new("second", 1).unwrap()).unwrap();
    assert_eq!(a.get_tasks().unwrap().len(), 2);

    shared.set(TASKS_KEY, &stale).unwrap();
    let titles: Vec<String> = b.get_tasks().unwrap().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["first".to_string()]);
}

#[test]
fn corrupt_collection_reads_as_empty() {
    let store = LocalStore::new(MemoryStore::new());
    store.inner().set(TASKS_KEY, "{not json").unwrap();
    assert!(store.get_tasks().unwrap().is_empty());

    // The next write replaces the corrupt value.
    store.save_task(Task::new("fresh", 1).unwrap()).unwrap();
    assert_eq!(store.get_tasks().unwrap().len(), 1);
}
