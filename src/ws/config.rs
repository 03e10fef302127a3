use std::time::Duration;

use backoff::backoff::Constant;
use bon::Builder;

const DEFAULT_HEARTBEAT_INTERVAL_DURATION: Duration = Duration::from_secs(1);
const DEFAULT_HEARTBEAT_TIMEOUT_DURATION: Duration = Duration::from_secs(2);
const DEFAULT_WATCHDOG_TICK_DURATION: Duration = Duration::from_secs(1);
const DEFAULT_CONNECT_TIMEOUT_DURATION: Duration = Duration::from_secs(10);

/// Configuration for WebSocket session and reconnection behavior.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// Interval between heartbeat frames sent to the peer
    #[builder(default = DEFAULT_HEARTBEAT_INTERVAL_DURATION)]
    pub heartbeat_interval: Duration,
    /// Maximum silence from the peer before the connection is considered stale.
    /// Also used as the fixed delay before every reconnect attempt.
    #[builder(default = DEFAULT_HEARTBEAT_TIMEOUT_DURATION)]
    pub heartbeat_timeout: Duration,
    /// How often the watchdog checks for staleness
    #[builder(default = DEFAULT_WATCHDOG_TICK_DURATION)]
    pub watchdog_tick: Duration,
    /// Upper bound on the WebSocket handshake, and on every individual frame write
    #[builder(default = DEFAULT_CONNECT_TIMEOUT_DURATION)]
    pub connect_timeout: Duration,
    /// Log every request/response pair handled by the session
    #[builder(default)]
    pub show_messages: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&Config> for Constant {
    fn from(config: &Config) -> Self {
        Constant::new(config.heartbeat_timeout)
    }
}
