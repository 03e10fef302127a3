//! Serde helpers for the wire formats spoken by this crate.

use serde::Serializer;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{DateTime, Utc};

/// Wire format for timestamps stamped onto outbound responses, e.g. `2021-05-18T21:32:42.324Z`.
pub(crate) const TIMESTAMP_MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Serializes a UTC timestamp with exactly three fractional digits and a literal `Z`.
///
/// Use with `#[serde(serialize_with = "crate::serde_helpers::timestamp_millis")]`.
pub(crate) fn timestamp_millis<S>(
    value: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(TIMESTAMP_MILLIS_FORMAT))
}

/// Deserialize an HTTP response body, logging the offending document on failure.
pub(crate) fn deserialize_logged<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    use std::any::type_name;

    tracing::trace!(
        type_name = %type_name::<T>(),
        json = %value,
        "deserializing JSON"
    );

    let json = value.to_string();
    serde_json::from_value(value)
        .inspect_err(|e| {
            tracing::error!(
                type_name = %type_name::<T>(),
                json = %json,
                error = %e,
                "deserialization failed"
            );
        })
        .map_err(Into::into)
}
