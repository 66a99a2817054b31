//! Scheduled countdown for a timed attempt.
//!
//! The timer is an owned resource: the task runs from `start` until it
//! expires, `stop` is called, or the timer is dropped. Dropping the event
//! receiver does not end it.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use assess_core::{Countdown, Tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u32 },
    Expired,
}

/// Receiving end of a timer's events.
pub type TimerEvents = mpsc::UnboundedReceiver<TimerEvent>;

pub struct CountdownTimer {
    handle: Option<JoinHandle<()>>,
    remaining: watch::Receiver<u32>,
}

impl CountdownTimer {
    /// Spawn the countdown on the current tokio runtime.
    ///
    /// Emits one `Tick` per `period` and a single `Expired` when the budget
    /// runs out. Late ticks are delayed rather than replayed.
    #[must_use]
    pub fn start(budget_secs: u32, period: Duration) -> (Self, TimerEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (remaining_tx, remaining_rx) = watch::channel(budget_secs);

        let handle = tokio::spawn(async move {
            let mut countdown = Countdown::new(budget_secs);
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                match countdown.tick() {
                    Tick::Running(remaining) => {
                        let _ = remaining_tx.send(remaining);
                        // A dropped receiver does not stop the countdown.
                        let _ = events_tx.send(TimerEvent::Tick { remaining });
                    }
                    Tick::Expired => {
                        let _ = remaining_tx.send(0);
                        tracing::info!("countdown expired");
                        let _ = events_tx.send(TimerEvent::Expired);
                        break;
                    }
                    Tick::Idle => break,
                }
            }
        });

        (
            Self {
                handle: Some(handle),
                remaining: remaining_rx,
            },
            events_rx,
        )
    }

    /// Last remaining value published by the task.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
