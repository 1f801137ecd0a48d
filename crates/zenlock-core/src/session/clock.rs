//! Countdown tick driver.
//!
//! Emits exactly one tick per second of wall-clock time while running.
//! Missed ticks are skipped, never coalesced -- if the host throttles
//! timers, the countdown lags real time rather than jumping.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const TICK_BUFFER: usize = 8;

/// 1 Hz tick source for a running focus session.
///
/// The clock does not know about session state -- the run loop forwards
/// ticks to [`super::SessionController::tick`]. Guarantees:
///
/// - `start()` while already running is a no-op (single ticker task).
/// - `stop()` while stopped is a no-op.
/// - The ticker task is released exactly once; no tick is delivered after
///   `stop()` returns, and dropping the clock also releases it.
pub struct SessionClock {
    tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl SessionClock {
    /// Create a clock and the receiving end of its tick channel.
    pub fn new() -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(TICK_BUFFER);
        (Self { tx, handle: None }, rx)
    }

    /// Start ticking. Returns `false` (and does nothing) if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // An interval's first tick completes immediately; swallow it so
            // the first delivered tick lands one full period after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        }));
        true
    }

    /// Stop ticking. Returns `false` (and does nothing) if already stopped.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_one_tick_per_second() {
        let (mut clock, mut rx) = SessionClock::new();
        assert!(clock.start());
        let before = tokio::time::Instant::now();
        for _ in 0..3 {
            rx.recv().await.expect("tick");
        }
        assert_eq!(before.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_running_is_noop() {
        let (mut clock, mut rx) = SessionClock::new();
        assert!(clock.start());
        assert!(!clock.start());
        rx.recv().await.expect("tick");
        assert!(clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_tick_delivery() {
        let (mut clock, mut rx) = SessionClock::new();
        clock.start();
        rx.recv().await.expect("tick");
        assert!(clock.stop());
        assert!(!clock.is_running());
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_stopped_is_noop() {
        let (mut clock, _rx) = SessionClock::new();
        assert!(!clock.stop());
        clock.start();
        clock.stop();
        assert!(!clock.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop_ticks_again() {
        let (mut clock, mut rx) = SessionClock::new();
        clock.start();
        rx.recv().await.expect("tick");
        clock.stop();
        assert!(clock.start());
        rx.recv().await.expect("tick after restart");
    }
}
