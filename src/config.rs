//! Service configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via `dotenvy`):
//!
//! | Variable                  | Default                                 |
//! |---------------------------|-----------------------------------------|
//! | `CURRENCY_ASSIGNMENT_WS`  | `wss://currency-assignment.ematiq.com`  |
//! | `EXCHANGE_RATE_API_URL`   | `https://api.exchangerate.host/convert` |
//! | `EXCHANGE_ACCESS_KEY`     | unset                                   |
//! | `CACHE_TTL_SECS`          | `7200`                                  |
//! | `HEARTBEAT_INTERVAL_SECS` | `1`                                     |
//! | `HEARTBEAT_TIMEOUT_SECS`  | `2`                                     |

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::Result;
use crate::error::Error;
use crate::{rates, ws};

pub const DEFAULT_FEED_URL: &str = "wss://currency-assignment.ematiq.com";
pub const DEFAULT_RATE_API_URL: &str = "https://api.exchangerate.host/convert";

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WebSocket URL of the currency assignment feed.
    pub feed_url: String,
    /// URL of the rate service's `convert` endpoint.
    pub rate_api_url: String,
    pub ws: ws::Config,
    pub rates: rates::Config,
}

impl AppConfig {
    /// Loads configuration from the process environment, after reading `.env` if present.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a URL does not parse or a duration is not a positive
    /// whole number of seconds.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_url = lookup("CURRENCY_ASSIGNMENT_WS").unwrap_or_else(|| DEFAULT_FEED_URL.to_owned());
        let feed = Url::parse(&feed_url)?;
        if !matches!(feed.scheme(), "ws" | "wss") {
            return Err(Error::validation(format!(
                "CURRENCY_ASSIGNMENT_WS must be a ws:// or wss:// URL, got {feed_url}"
            )));
        }

        let rate_api_url =
            lookup("EXCHANGE_RATE_API_URL").unwrap_or_else(|| DEFAULT_RATE_API_URL.to_owned());
        Url::parse(&rate_api_url)?;

        let access_key = lookup("EXCHANGE_ACCESS_KEY")
            .filter(|key| !key.is_empty())
            .map(SecretString::from);

        let rates = rates::Config::builder()
            .maybe_cache_ttl(parse_secs(&lookup, "CACHE_TTL_SECS")?)
            .maybe_access_key(access_key)
            .build();

        let ws = ws::Config::builder()
            .maybe_heartbeat_interval(parse_secs(&lookup, "HEARTBEAT_INTERVAL_SECS")?)
            .maybe_heartbeat_timeout(parse_secs(&lookup, "HEARTBEAT_TIMEOUT_SECS")?)
            .build();

        Ok(Self {
            feed_url,
            rate_api_url,
            ws,
            rates,
        })
    }
}

/// Parses a positive number of seconds. Missing keys yield `None` so the default applies.
fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(Error::validation(format!(
            "{key} must be a positive number of seconds, got {raw:?}"
        ))),
    }
}
