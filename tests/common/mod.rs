#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests"
)]
#![allow(
    unused,
    reason = "Not every test binary uses every helper"
)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use stake_converter::Result;
use stake_converter::error::Error;
use stake_converter::rates::RateProvider;
use stake_converter::types::{DateTime, Decimal, Utc, dec};

pub const REQUEST_ID: u64 = 456;
pub const MARKET_ID: u64 = 123_456;
pub const SELECTION_ID: u64 = 987_654;
pub const REQUEST_DATE: &str = "2021-05-18T21:32:42.324Z";

/// Rate used throughout the conversion scenarios (USD to EUR on 2021-05-18).
pub const USD_EUR: Decimal = dec!(0.818185);

/// Always answers with the same rate, and counts lookups.
#[derive(Debug, Default)]
pub struct FixedRate {
    pub rate: Decimal,
    pub calls: AtomicUsize,
}

impl FixedRate {
    #[must_use]
    pub fn new(rate: Decimal) -> Arc<Self> {
        Arc::new(Self {
            rate,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for FixedRate {
    async fn rate(&self, _from: &str, _to: &str, _timestamp: DateTime<Utc>) -> Result<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rate)
    }
}

/// Rejects every lookup the way the rate service rejects an unknown currency.
#[derive(Debug, Default)]
pub struct FailingRate;

#[async_trait]
impl RateProvider for FailingRate {
    async fn rate(&self, from: &str, to: &str, timestamp: DateTime<Utc>) -> Result<Decimal> {
        Err(Error::lookup(from, to, timestamp.date_naive(), "Invalid currency"))
    }
}

/// Wire payload of the reference conversion request, in `currency`.
#[must_use]
pub fn payload(currency: &str) -> Value {
    json!({
        "marketId": MARKET_ID,
        "selectionId": SELECTION_ID,
        "odds": 2.2,
        "stake": 253.67,
        "currency": currency,
        "date": REQUEST_DATE
    })
}

/// Full inbound frame of the reference conversion request.
#[must_use]
pub fn request_frame(id: u64, currency: &str) -> Value {
    json!({
        "type": "message",
        "id": id,
        "payload": payload(currency)
    })
}
