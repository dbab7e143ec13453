use chrono::Local;
use clap::Subcommand;
use studynook_core::stats::{
    activity_heatmap, category_minutes, daily_focus_minutes, format_minutes, mode_breakdown,
    weekday_breakdown, window_start,
};
use studynook_core::Config;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals, session count, active days and average
    Summary {
        /// Human-readable output instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Focus minutes per day, ending today
    Week {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Sessions and minutes per weekday
    Weekdays,
    /// Session count per mode
    Modes,
    /// Minutes per task category
    Categories,
    /// Minutes per day over a trailing window
    Heatmap {
        #[arg(long, default_value_t = 90)]
        days: u32,
    },
}

pub fn run(action: StatsAction) -> CmdResult {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let sessions = store.get_sessions()?;
    let today = Local::now().date_naive();

    match action {
        StatsAction::Summary { text } => {
            let stats = store.calculate_stats()?;
            if text {
                println!("Total time:       {}", format_minutes(stats.total_time / 60));
                println!("Focus sessions:   {}", stats.total_sessions);
                println!("Active days:      {}", stats.streak_days);
                println!(
                    "Average session:  {}",
                    format_minutes(stats.average_session_time / 60)
                );
            } else {
                print_json(&stats)?;
            }
        }
        StatsAction::Week { days } => {
            print_json(&daily_focus_minutes(&sessions, today, days, &Local)?)?;
        }
        StatsAction::Weekdays => print_json(&weekday_breakdown(&sessions, &Local))?,
        StatsAction::Modes => print_json(&mode_breakdown(&sessions))?,
        StatsAction::Categories => {
            let tasks = store.get_tasks()?;
            print_json(&category_minutes(&sessions, &tasks))?;
        }
        StatsAction::Heatmap { days } => {
            let from = window_start(today, days)?;
            print_json(&activity_heatmap(&sessions, from, today, &Local))?;
        }
    }
    Ok(())
}
