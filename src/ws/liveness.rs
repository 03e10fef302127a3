//! Per-session heartbeat bookkeeping.
//!
//! A [`LivenessClock`] is created when a session connects and records when the peer last sent a
//! heartbeat. The dispatcher is its only writer. The watchdog reads it through a
//! [`LivenessMonitor`]. Both halves share a `watch` channel, so every read observes the latest
//! completed write and nothing outlives the session that created it.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval};

/// `tokio::time::interval` panics on a zero period.
const MIN_TICK: Duration = Duration::from_millis(1);

/// Write half: timestamp of the most recently received heartbeat.
#[derive(Debug)]
pub struct LivenessClock {
    last_beat: watch::Sender<Instant>,
}

impl LivenessClock {
    /// Start the clock at the current instant so a fresh connection is not immediately stale.
    #[must_use]
    pub fn start() -> Self {
        let (last_beat, _) = watch::channel(Instant::now());
        Self { last_beat }
    }

    /// Record a heartbeat received now.
    pub fn beat(&self) {
        self.last_beat.send_replace(Instant::now());
    }

    #[must_use]
    pub fn last_beat(&self) -> Instant {
        *self.last_beat.borrow()
    }

    /// Read half for the watchdog.
    #[must_use]
    pub fn monitor(&self) -> LivenessMonitor {
        LivenessMonitor {
            last_beat: self.last_beat.subscribe(),
        }
    }
}

/// Read half of a [`LivenessClock`].
#[derive(Debug, Clone)]
pub struct LivenessMonitor {
    last_beat: watch::Receiver<Instant>,
}

impl LivenessMonitor {
    /// Time elapsed between the last heartbeat and `now`.
    #[must_use]
    pub fn silence(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_beat.borrow())
    }

    /// Poll every `tick` until the peer has been silent for longer than `timeout`.
    ///
    /// Returns the observed silence. Never returns while heartbeats keep arriving.
    pub async fn stale(&self, timeout: Duration, tick: Duration) -> Duration {
        let mut ticker = interval(tick.max(MIN_TICK));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let silence = self.silence(Instant::now());
            if silence > timeout {
                return silence;
            }
        }
    }
}
