use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use reqwest::{
    Client as ReqwestClient, Method,
    header::{HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret as _, SecretString};
use url::Url;

use super::RateProvider;
use super::cache::{CacheKey, RateCache};
use super::types::{ConvertRequest, ConvertResponse};
use crate::error::Error;
use crate::types::{DateTime, Decimal, NaiveDate, Utc};
use crate::{Result, ToQueryParams as _};

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);
const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Configuration for [`Client`]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// How long a fetched rate is reused. The default is two (2) hours.
    #[builder(default = DEFAULT_CACHE_TTL)]
    cache_ttl: Duration,
    /// Maximum number of cached (pair, day) entries.
    #[builder(default = DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,
    /// Credential sent as the `access_key` query parameter, if the service requires one.
    #[builder(into)]
    access_key: Option<SecretString>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }
}

/// HTTP client for the exchange rate service, with a shared rate cache.
///
/// # Example
///
/// ```no_run
/// use stake_converter::rates::{Client, Config, RateProvider as _};
/// use stake_converter::types::Utc;
///
/// # async fn example() -> stake_converter::Result<()> {
/// let client = Client::new("https://api.exchangerate.host/convert", Config::default())?;
/// let rate = client.rate("USD", "EUR", Utc::now()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    endpoint: Url,
    client: ReqwestClient,
    access_key: Option<SecretString>,
    cache: Arc<RateCache>,
}

impl Client {
    /// Creates a client for the `convert` endpoint at `endpoint`, with its own cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(endpoint: &str, config: Config) -> Result<Self> {
        let cache = Arc::new(RateCache::new(config.cache_ttl, config.cache_capacity));
        Self::with_cache(endpoint, config, cache)
    }

    /// Creates a client that reads and fills an existing cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn with_cache(endpoint: &str, config: Config, cache: Arc<RateCache>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_static("stake_converter"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client,
            access_key: config.access_key,
            cache,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Calls the `convert` endpoint without consulting the cache.
    ///
    /// # Errors
    ///
    /// Returns a status error for a non-success HTTP response, or an internal error if the body
    /// is not a valid [`ConvertResponse`].
    pub async fn convert(&self, request: &ConvertRequest) -> Result<ConvertResponse> {
        let access_key = self
            .access_key
            .as_ref()
            .map(|key| ("access_key", key.expose_secret()));
        let query = request.query_params(access_key);

        let request = self
            .client
            .request(Method::GET, format!("{}{query}", self.endpoint))
            .build()?;

        crate::request(&self.client, request).await
    }

    async fn fetch(&self, from: &str, to: &str, date: NaiveDate) -> Result<Decimal> {
        let request = ConvertRequest::builder()
            .from(from)
            .to(to)
            .date(date)
            .build();
        let response = self.convert(&request).await?;

        if !response.success {
            let reason = response
                .error
                .map_or_else(|| "no error details".to_owned(), |e| e.to_string());
            return Err(Error::lookup(from, to, date, reason));
        }

        response
            .result
            .ok_or_else(|| Error::lookup(from, to, date, "response carried no result"))
    }
}

#[async_trait]
impl RateProvider for Client {
    #[tracing::instrument(level = "debug", skip(self, timestamp), fields(date))]
    async fn rate(&self, from: &str, to: &str, timestamp: DateTime<Utc>) -> Result<Decimal> {
        let date = timestamp.date_naive();
        tracing::Span::current().record("date", tracing::field::display(date));

        let key = CacheKey::new(from, to, date);
        if let Some(rate) = self.cache.get(&key) {
            tracing::info!(%from, %to, %date, "Using cached exchange rate");
            return Ok(rate);
        }

        let rate = self.fetch(from, to, date).await.inspect_err(|e| {
            tracing::warn!(%from, %to, %date, error = %e, "Unable to fetch exchange rate");
        })?;

        self.cache.insert(key, rate);
        tracing::info!(%from, %to, %date, %rate, "Fetched new exchange rate");

        Ok(rate)
    }
}
