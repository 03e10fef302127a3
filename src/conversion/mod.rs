//! Stake conversion.
//!
//! [`Converter`] turns a [`RequestFrame`] into the frame sent back to the feed: a
//! [`ConversionResponse`] with the stake in EUR, or an error frame. It never fails the session.

pub mod types;

use async_trait::async_trait;
use rust_decimal::RoundingStrategy;

pub use types::{ConversionRequest, ConversionResponse};

use crate::error::Error;
use crate::rates::RateProvider;
use crate::types::{Decimal, Utc};
use crate::ws::{Handler, OutboundMessage, RequestFrame};
use crate::{Result, TARGET_CURRENCY};

/// Number of decimal places kept in a converted stake.
pub const STAKE_DECIMAL_PLACES: u32 = 5;

/// Converts stakes to EUR using rates from `P`.
#[derive(Debug, Clone)]
pub struct Converter<P> {
    rates: P,
}

impl<P: RateProvider> Converter<P> {
    #[must_use]
    pub fn new(rates: P) -> Self {
        Self { rates }
    }

    #[must_use]
    pub fn rates(&self) -> &P {
        &self.rates
    }

    /// Convert one request payload.
    ///
    /// Fails with [`crate::error::Kind::Conversion`] when the payload is malformed, or with the
    /// rate provider's error when the lookup fails.
    pub async fn convert(&self, frame: &RequestFrame) -> Result<ConversionResponse> {
        let request: ConversionRequest = serde_json::from_value(frame.payload.clone())
            .map_err(|e| Error::conversion(e.to_string()))?;

        let rate = self
            .rates
            .rate(&request.currency, TARGET_CURRENCY, request.date)
            .await?;

        Ok(ConversionResponse {
            market_id: request.market_id,
            selection_id: request.selection_id,
            odds: request.odds,
            stake: convert_stake(request.stake, rate)?,
            currency: TARGET_CURRENCY.to_owned(),
            date: Utc::now(),
        })
    }

    /// Convert one request, reporting any failure as an error frame for the same id.
    pub async fn respond(&self, frame: RequestFrame) -> OutboundMessage {
        match self.convert(&frame).await {
            Ok(payload) => OutboundMessage::ConversionResponse {
                id: frame.id,
                payload,
            },
            Err(e) => {
                tracing::error!(id = frame.id, error = %e, "Error handling conversion request");
                OutboundMessage::ErrorResponse {
                    id: frame.id,
                    message: format!("Unable to convert stake. Error: {e}"),
                }
            }
        }
    }
}

#[async_trait]
impl<P: RateProvider> Handler for Converter<P> {
    async fn handle(&self, request: RequestFrame) -> OutboundMessage {
        self.respond(request).await
    }
}

/// `stake * rate`, rounded half away from zero to [`STAKE_DECIMAL_PLACES`].
pub fn convert_stake(stake: Decimal, rate: Decimal) -> Result<Decimal> {
    stake
        .checked_mul(rate)
        .map(|eur| {
            eur.round_dp_with_strategy(STAKE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        })
        .ok_or_else(|| Error::conversion(format!("stake {stake} times rate {rate} overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dec;

    #[test]
    fn convert_stake_rounds_to_five_places() {
        assert_eq!(
            convert_stake(dec!(253.67), dec!(0.818185)).unwrap(),
            dec!(207.54899)
        );
    }

    #[test]
    fn convert_stake_rounds_midpoint_away_from_zero() {
        assert_eq!(
            convert_stake(dec!(1.000005), dec!(1)).unwrap(),
            dec!(1.00001)
        );
    }

    #[test]
    fn convert_stake_keeps_short_results_exact() {
        assert_eq!(convert_stake(dec!(100), dec!(0.82)).unwrap(), dec!(82));
    }

    #[test]
    fn convert_stake_reports_overflow() {
        let err = convert_stake(Decimal::MAX, dec!(2)).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::Conversion);
    }
}
