//! Periodic tick source backed by a tokio interval task.
//!
//! Each started tick runs until its guard is dropped; cancellation goes
//! through a [`CancellationToken`] so the task exits at its next await.

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::{
    deps::{TickGuard, TickSource},
    driver::{self, Event, EventSender},
};

/// Starts tick tasks on the ambient tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTicks;

/// Cancels its tick task when dropped.
struct TickTask {
    token: CancellationToken,
}

impl TickGuard for TickTask {}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl TickSource for TokioTicks {
    fn start(&self, period: Duration, events: EventSender) -> Box<dyn TickGuard> {
        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            trace!(period_ms = period.as_millis(), "tick_start");
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        trace!("tick_cancelled");
                        return;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = driver::post(&events, Event::Tick) {
                            trace!(error = %e, "tick_receiver_gone");
                            return;
                        }
                    }
                }
            }
        });
        Box::new(TickTask { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut driver::EventReceiver) -> usize {
        let mut n = 0;
        while let Ok(ev) = rx.try_recv() {
            assert!(matches!(ev, Event::Tick));
            n += 1;
        }
        n
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_until_guard_dropped() {
        let (tx, mut rx) = driver::channel();
        let guard = TokioTicks.start(Duration::from_secs(1), tx);
        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(drain(&mut rx), 3);

        drop(guard);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(drain(&mut rx), 0);
    }
}
