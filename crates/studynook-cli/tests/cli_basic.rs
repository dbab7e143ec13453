//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data dir.

use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

fn cli(data_dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_studynook"));
    cmd.args(args)
        .env("STUDYNOOK_DATA_DIR", data_dir)
        .env_remove("STUDYNOOK_LOG")
        .env_remove("COHERE_API_KEY");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = cli(data_dir, args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let stdout = run_ok(data_dir, args);
    serde_json::from_str(&stdout).expect("CLI output was not JSON")
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let task = run_json(dir.path(), &["task", "add", "Revise algebra", "--estimate", "3", "--tag", "math"]);
    assert_eq!(task["title"], "Revise algebra");
    assert_eq!(task["estimatedPomodoros"], 3);

    let tasks = run_json(dir.path(), &["task", "list", "--json"]);
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    let text = run_ok(dir.path(), &["task", "list"]);
    assert!(text.contains("Revise algebra"));
    assert!(text.contains("#math"));
}

#[test]
fn test_task_add_rejects_blank_title() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_task_done_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "done", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("task not found: missing"));
}

#[test]
fn test_timer_pause_keeps_remaining() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["timer", "start"]);
    run_ok(dir.path(), &["timer", "tick", "3"]);
    run_ok(dir.path(), &["timer", "pause"]);

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["type"], "state_snapshot");
    assert_eq!(status["remaining_secs"], 1497);
    assert_eq!(status["running"], false);

    run_ok(dir.path(), &["timer", "reset"]);
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["remaining_secs"], 1500);
}

#[test]
fn test_pause_from_another_process_stops_run() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["prefs", "set", "workDuration", "1"]);

    let mut runner = cli(dir.path(), &["timer", "run"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn timer run");
    sleep(Duration::from_millis(2500));

    let events = run_json(dir.path(), &["timer", "pause"]);
    let paused = events
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["type"] == "timer_paused")
        .expect("pause emitted no timer_paused event")
        .clone();
    let remaining = paused["remaining_secs"].as_u64().unwrap();
    assert!(remaining < 60, "run never ticked: {remaining}");

    let deadline = Instant::now() + Duration::from_secs(10);
    while runner.try_wait().unwrap().is_none() {
        if Instant::now() > deadline {
            runner.kill().unwrap();
            panic!("timer run kept going after pause");
        }
        sleep(Duration::from_millis(100));
    }
    let output = runner.wait_with_output().unwrap();
    assert!(output.status.success());
    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["running"], false);

    sleep(Duration::from_millis(1500));
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["running"], false);
    assert_eq!(status["remaining_secs"], remaining);
}

#[test]
fn test_completed_focus_session_shows_in_stats() {
    let dir = tempfile::tempdir().unwrap();
    let task = run_json(dir.path(), &["task", "add", "Essay"]);
    let id = task["id"].as_str().unwrap().to_string();
    run_ok(dir.path(), &["task", "select", &id]);

    run_ok(dir.path(), &["timer", "start"]);
    let events = run_json(dir.path(), &["timer", "tick", "1500"]);
    assert!(events
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["type"] == "phase_completed"));

    let stats = run_json(dir.path(), &["stats", "summary"]);
    assert_eq!(stats["totalSessions"], 1);
    assert_eq!(stats["totalTime"], 1500);
    assert_eq!(stats["streakDays"], 1);

    let tasks = run_json(dir.path(), &["task", "list", "--json"]);
    assert_eq!(tasks[0]["completedPomodoros"], 1);

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["mode"], "break");
}

#[test]
fn test_skip_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["timer", "start"]);
    run_ok(dir.path(), &["timer", "skip"]);
    let stats = run_json(dir.path(), &["stats", "summary"]);
    assert_eq!(stats["totalTime"], 0);
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["mode"], "break");
}

#[test]
fn test_stats_window_out_of_range_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    for cmd in ["heatmap", "week"] {
        let (_, stderr, code) = run_cli(dir.path(), &["stats", cmd, "--days", "4000000000"]);
        assert_eq!(code, 1, "{cmd}: {stderr}");
        assert!(stderr.contains("error:"));
        assert!(stderr.contains("'days'"));
    }
    let cells = run_json(dir.path(), &["stats", "heatmap", "--days", "3"]);
    assert_eq!(cells.as_array().unwrap().len(), 3);
}

#[test]
fn test_prefs_set_changes_timer_duration() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = run_json(dir.path(), &["prefs", "set", "workDuration", "50"]);
    assert_eq!(prefs["workDuration"], 50.0);

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["total_secs"], 3000);

    let (_, _, code) = run_cli(dir.path(), &["prefs", "set", "noSuchPref", "1"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["config", "get", "chat.model"]).trim(), "command");
    run_ok(dir.path(), &["config", "set", "chat.model", "command-light"]);
    assert_eq!(
        run_ok(dir.path(), &["config", "get", "chat.model"]).trim(),
        "command-light"
    );

    let path = run_ok(dir.path(), &["config", "path"]);
    assert!(path.trim().ends_with("config.toml"));

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope.nothing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_json_backend() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["config", "set", "storage.backend", "json"]);
    run_json(dir.path(), &["task", "add", "Flashcards"]);
    assert!(dir.path().join("data").join("tasks.json").exists());
}

#[test]
fn test_chat_without_api_key_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["chat", "send", "hello"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("COHERE_API_KEY"));

    let history = run_json(dir.path(), &["chat", "history", "--json"]);
    assert!(history.as_array().unwrap().is_empty());
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let script = run_ok(dir.path(), &["completions", "bash"]);
    assert!(script.contains("studynook"));
}
