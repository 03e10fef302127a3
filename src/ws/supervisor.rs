use std::sync::Arc;
use std::time::Instant;

use backoff::backoff::{Backoff, Constant};
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::config::Config;
use super::session::{Session, SessionEnd};
use super::traits::Handler;

/// Connection state tracking.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,
    /// Attempting to connect
    Connecting,
    /// Successfully connected
    Connected {
        /// When the connection was established
        since: Instant,
    },
    /// Waiting out the backoff after a failed connect or a terminated session
    Reconnecting {
        /// Consecutive failures since the last successful connect
        attempt: u32,
    },
}

impl ConnectionState {
    /// Check if the connection is currently active.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

/// Keeps one [`Session`] alive at a time, forever.
///
/// Every connect failure and every session termination is logged and followed by exactly one
/// backoff delay before the next attempt. By default the delay is a constant
/// [`Config::heartbeat_timeout`], which is also used whenever a custom policy returns `None`.
/// There is no attempt cap: the loop only stops when the shutdown token passed to
/// [`Supervisor::run`] is cancelled.
///
/// # Example
///
/// ```ignore
/// let shutdown = CancellationToken::new();
/// let supervisor = Supervisor::new("wss://example.com", Config::default(), converter);
///
/// supervisor.run(shutdown).await;
/// ```
pub struct Supervisor<H: Handler, B = Constant> {
    endpoint: String,
    config: Config,
    handler: Arc<H>,
    backoff: B,
    state_tx: watch::Sender<ConnectionState>,
}

impl<H: Handler> Supervisor<H> {
    #[must_use]
    pub fn new(endpoint: &str, config: Config, handler: H) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            endpoint: endpoint.to_owned(),
            backoff: Constant::from(&config),
            config,
            handler: Arc::new(handler),
            state_tx,
        }
    }
}

impl<H: Handler, B: Backoff + Send> Supervisor<H, B> {
    /// Replace the reconnect delay policy.
    #[must_use]
    pub fn with_backoff<B2: Backoff + Send>(self, backoff: B2) -> Supervisor<H, B2> {
        Supervisor {
            endpoint: self.endpoint,
            config: self.config,
            handler: self.handler,
            backoff,
            state_tx: self.state_tx,
        }
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Subscribe to connection state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Connect, run the session, back off, repeat until `shutdown` is cancelled.
    ///
    /// Cancellation reaches an in-flight connect, a running session (whose tasks are stopped and
    /// socket closed), or a backoff sleep.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut attempt = 0_u32;

        loop {
            _ = self.state_tx.send(ConnectionState::Connecting);

            let opened = tokio::select! {
                () = shutdown.cancelled() => break,
                opened = Session::open(&self.endpoint, &self.config) => opened,
            };

            match opened {
                Ok(session) => {
                    attempt = 0;
                    self.backoff.reset();
                    _ = self.state_tx.send(ConnectionState::Connected {
                        since: Instant::now(),
                    });
                    tracing::info!(endpoint = %self.endpoint, "Connected to WebSocket");

                    match session
                        .run(&self.config, Arc::clone(&self.handler), &shutdown)
                        .await
                    {
                        SessionEnd::Terminated(termination) => {
                            tracing::error!(
                                activity = %termination.activity,
                                error = %termination.error,
                                "Connection error. Reconnecting..."
                            );
                        }
                        SessionEnd::Interrupted => break,
                    }
                }
                Err(e) => {
                    tracing::warn!(endpoint = %self.endpoint, error = %e, "Unable to connect");
                }
            }

            attempt = attempt.saturating_add(1);
            _ = self
                .state_tx
                .send(ConnectionState::Reconnecting { attempt });

            // Never reconnect without a delay, even once a custom policy is exhausted
            let delay = self
                .backoff
                .next_backoff()
                .unwrap_or(self.config.heartbeat_timeout);
            tracing::debug!(attempt, ?delay, "Waiting before reconnecting");
            tokio::select! {
                () = shutdown.cancelled() => break,
                () = sleep(delay) => {}
            }
        }

        _ = self.state_tx.send(ConnectionState::Disconnected);
        tracing::info!(endpoint = %self.endpoint, "Supervisor stopped");
    }
}
