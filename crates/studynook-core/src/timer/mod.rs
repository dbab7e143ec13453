mod engine;
mod mode;
mod runner;
mod ticker;

pub use engine::TimerEngine;
pub use mode::{format_time, TimerMode};
pub use runner::StudyTimer;
pub use ticker::TickSource;
