use clap::Subcommand;
use studynook_core::{
    format_time, Config, Event, Store, StudyTimer, TickSource, TimerEngine, TimerMode,
};

use super::{load_json, open_store, print_json, AppStore, AppTimer, CmdResult};

pub const ENGINE_KEY: &str = "timer_engine";
pub const CURRENT_TASK_KEY: &str = "current_task";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause, keeping the remaining time
    Pause,
    /// Rewind the current phase
    Reset,
    /// Jump to the next phase without recording a session
    Skip,
    /// Switch to a mode (work, break, longBreak)
    Mode {
        mode: TimerMode,
    },
    /// Advance a running timer by some seconds
    Tick {
        #[arg(default_value_t = 1)]
        seconds: u64,
    },
    /// Print current timer state as JSON
    Status,
    /// Run in the foreground until the timer stops
    Run,
}

fn load_timer(config: &Config, store: AppStore) -> AppTimer {
    let engine = load_json::<TimerEngine>(&store, ENGINE_KEY)
        .unwrap_or_else(|| TimerEngine::new(config.preferences.clone()));
    let mut timer = StudyTimer::new(engine, store);
    apply_selection(&mut timer, config);
    timer
}

/// Bring preferences and the selected task in line with what other
/// commands stored.
fn apply_selection(timer: &mut AppTimer, config: &Config) {
    if timer.engine().preferences() != &config.preferences {
        timer.set_preferences(config.preferences.clone());
    }
    let task = load_json::<String>(timer.store(), CURRENT_TASK_KEY);
    timer.select_task(task);
}

/// Persist the engine and return exactly what was written.
fn save_engine(timer: &AppTimer) -> Result<String, Box<dyn std::error::Error>> {
    let raw = serde_json::to_string(timer.engine())?;
    timer.store().inner().set(ENGINE_KEY, &raw)?;
    Ok(raw)
}

/// Adopt whatever another invocation stored since `written`. Returns
/// whether the timer should keep running.
fn sync_from_store(
    timer: &mut AppTimer,
    written: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    if let Some(raw) = timer.store().inner().get(ENGINE_KEY)? {
        if raw != written {
            match serde_json::from_str::<TimerEngine>(&raw) {
                Ok(engine) => {
                    tracing::info!(
                        running = engine.is_running(),
                        "timer changed by another command"
                    );
                    timer.replace_engine(engine);
                }
                Err(e) => tracing::warn!(error = %e, "ignoring unreadable timer state"),
            }
        }
    }
    let config = Config::load()?;
    apply_selection(timer, &config);
    Ok(timer.engine().is_running())
}

fn announce(events: &[Event]) {
    for event in events {
        if let Some(notice) = event.notice() {
            eprintln!("{notice}");
        }
    }
}

pub fn run(action: TimerAction) -> CmdResult {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let mut timer = load_timer(&config, store);

    let events = match action {
        TimerAction::Start => timer.start()?,
        TimerAction::Pause => timer.pause()?,
        TimerAction::Reset => timer.reset()?,
        TimerAction::Skip => timer.skip_to_next()?,
        TimerAction::Mode { mode } => timer.switch_mode(mode)?,
        TimerAction::Tick { seconds } => timer.advance(seconds)?,
        TimerAction::Status => {
            print_json(&timer.engine().snapshot())?;
            return Ok(());
        }
        TimerAction::Run => return run_foreground(timer),
    };

    save_engine(&timer)?;
    announce(&events);
    print_json(&events)
}

fn run_foreground(mut timer: AppTimer) -> CmdResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let started = timer.start()?;
    let mut written = save_engine(&timer)?;
    announce(&started);

    runtime.block_on(async {
        let mut ticks = TickSource::every_second();
        let mut rx = ticks.start();
        while rx.recv().await.is_some() {
            // A pause or reset from another invocation stops this loop
            // without overwriting what it stored.
            if !sync_from_store(&mut timer, &written)? {
                ticks.cancel();
                break;
            }
            let events = timer.tick()?;
            written = save_engine(&timer)?;
            announce(&events);
            // A completion without auto-start leaves the engine paused.
            if !timer.engine().is_running() {
                ticks.cancel();
                break;
            }
            let remaining = timer.engine().remaining_secs();
            if remaining % 60 == 0 {
                eprintln!(
                    "{} {}",
                    timer.engine().mode().label(),
                    format_time(remaining)
                );
            }
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    })?;

    print_json(&timer.engine().snapshot())
}
