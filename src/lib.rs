#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod config;
pub mod conversion;
pub mod error;
pub mod rates;
pub(crate) mod serde_helpers;
pub mod types;
pub mod ws;

use reqwest::{Request, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Currency every stake is converted into.
pub const TARGET_CURRENCY: &str = "EUR";

/// Trait for converting request types to URL query parameters.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields into a query string.
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL query string.
    ///
    /// Returns an empty string if no parameters are set, otherwise returns
    /// a string starting with `?` followed by URL-encoded key-value pairs.
    /// Also appends an optional extra `key=value` pair, URL-encoded the same way, if provided.
    fn query_params(&self, extra: Option<(&str, &str)>) -> String {
        let mut params = serde_html_form::to_string(self)
            .inspect_err(|e| {
                tracing::error!("Unable to convert to URL-encoded string {e:?}");
            })
            .unwrap_or_default();

        if let Some(pair) = extra {
            let encoded = serde_html_form::to_string([pair].as_slice())
                .inspect_err(|e| {
                    tracing::error!("Unable to convert to URL-encoded string {e:?}");
                })
                .unwrap_or_default();

            if !params.is_empty() && !encoded.is_empty() {
                params.push('&');
            }
            params.push_str(&encoded);
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{params}")
        }
    }
}

impl<T: Serialize> ToQueryParams for T {}

#[tracing::instrument(
    level = "debug",
    skip(client, request),
    fields(
        method = %request.method(),
        path = request.url().path(),
        status_code
    )
)]
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    request: Request,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await?;
    let status_code = response.status();

    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let json_value = response.json::<serde_json::Value>().await?;
    if json_value.is_null() {
        tracing::warn!(method = %method, path = %path, "API returned an empty body");
        return Err(Error::status(
            StatusCode::NOT_FOUND,
            method,
            path,
            "Unable to find requested resource",
        ));
    }

    serde_helpers::deserialize_logged(json_value)
}
