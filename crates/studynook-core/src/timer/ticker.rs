//! One-second tick source for driving a [`TimerEngine`](super::TimerEngine)
//! from wall-clock time.
//!
//! At most one tick task is alive per `TickSource`. Starting it again aborts
//! the previous task first, and dropping the source aborts it too, so a
//! stale interval can never keep decrementing a timer in the background.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug)]
pub struct TickSource {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl TickSource {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Begin ticking. Any earlier tick task is cancelled and its receiver
    /// closes. The first tick arrives one period after the call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> mpsc::Receiver<()> {
        self.cancel();
        let (tx, rx) = mpsc::channel(1);
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        }));
        rx
    }

    /// Stop ticking. No-op when idle.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::every_second()
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.cancel();
    }
}
