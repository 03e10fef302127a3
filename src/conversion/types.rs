use serde::{Deserialize, Serialize};

use crate::types::{DateTime, Decimal, Utc};

/// Payload of a conversion request, e.g.
///
/// ```json
/// {"marketId": 123456, "selectionId": 987654, "odds": 2.2, "stake": 253.67,
///  "currency": "USD", "date": "2021-05-18T21:32:42.324Z"}
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub market_id: u64,
    pub selection_id: u64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub odds: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub stake: Decimal,
    pub currency: String,
    pub date: DateTime<Utc>,
}

/// Payload of a successful conversion, with the stake expressed in EUR.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub market_id: u64,
    pub selection_id: u64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub odds: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub stake: Decimal,
    pub currency: String,
    /// When the conversion was performed
    #[serde(serialize_with = "crate::serde_helpers::timestamp_millis")]
    pub date: DateTime<Utc>,
}
