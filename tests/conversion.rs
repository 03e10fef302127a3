#![allow(
    clippy::unwrap_used,
    reason = "Do not need additional syntax for setting up tests"
)]

//! Conversion of request frames into response frames, with stubbed rate providers.

mod common;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};
use stake_converter::conversion::Converter;
use stake_converter::error::Kind;
use stake_converter::types::dec;
use stake_converter::ws::{OutboundMessage, RequestFrame};

use crate::common::{
    FailingRate, FixedRate, MARKET_ID, REQUEST_ID, SELECTION_ID, USD_EUR, payload,
};

#[tokio::test]
async fn conversion_should_multiply_and_round_stake() -> anyhow::Result<()> {
    let rates = FixedRate::new(USD_EUR);
    let converter = Converter::new(rates.clone());
    let frame = RequestFrame::new(REQUEST_ID, payload("USD"));

    let response = converter.convert(&frame).await?;

    assert_eq!(response.stake, dec!(207.54899));
    assert_eq!(response.currency, "EUR");
    assert_eq!(response.market_id, MARKET_ID);
    assert_eq!(response.selection_id, SELECTION_ID);
    assert_eq!(response.odds, dec!(2.2));
    assert_eq!(rates.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn respond_should_build_message_frame() -> anyhow::Result<()> {
    let converter = Converter::new(FixedRate::new(USD_EUR));
    let before = Utc::now();

    let response = converter
        .respond(RequestFrame::new(REQUEST_ID, payload("USD")))
        .await;

    let wire: Value = serde_json::from_str(&response.encode()?)?;
    assert_eq!(wire["type"], "message");
    assert_eq!(wire["id"], REQUEST_ID);
    assert_eq!(
        wire["payload"],
        json!({
            "marketId": MARKET_ID,
            "selectionId": SELECTION_ID,
            "odds": 2.2,
            "stake": 207.54899,
            "currency": "EUR",
            "date": wire["payload"]["date"]
        })
    );

    let date = wire["payload"]["date"].as_str().unwrap();
    assert_eq!(date.len(), "2021-05-18T21:32:42.324Z".len());
    assert!(date.ends_with('Z'));
    let stamped: DateTime<Utc> = date.parse()?;
    assert!(stamped >= before - TimeDelta::milliseconds(1));
    assert!(stamped <= Utc::now());

    Ok(())
}

#[tokio::test]
async fn lookup_failure_should_become_error_frame() -> anyhow::Result<()> {
    let converter = Converter::new(FailingRate);

    let response = converter
        .respond(RequestFrame::new(REQUEST_ID, payload("INVALID")))
        .await;

    let OutboundMessage::ErrorResponse { id, message } = response else {
        panic!("expected an error frame, got {response:?}");
    };
    assert_eq!(id, REQUEST_ID);
    assert!(message.contains("Unable to convert stake"));
    assert!(message.contains("Invalid currency"));

    Ok(())
}

#[tokio::test]
async fn lookup_failure_should_surface_from_convert() {
    let converter = Converter::new(FailingRate);

    let err = converter
        .convert(&RequestFrame::new(REQUEST_ID, payload("INVALID")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Kind::Lookup);
}

#[tokio::test]
async fn missing_field_should_become_error_frame_without_lookup() -> anyhow::Result<()> {
    let rates = FixedRate::new(USD_EUR);
    let converter = Converter::new(rates.clone());
    let mut payload = payload("USD");
    payload.as_object_mut().unwrap().remove("currency");

    let response = converter
        .respond(RequestFrame::new(REQUEST_ID, payload))
        .await;

    let wire: Value = serde_json::from_str(&response.encode()?)?;
    assert_eq!(wire["type"], "error");
    assert_eq!(wire["id"], REQUEST_ID);
    let message = wire["message"].as_str().unwrap();
    assert!(message.contains("Unable to convert stake"));
    assert!(message.contains("currency"));
    assert_eq!(rates.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn malformed_date_should_be_a_conversion_error() {
    let converter = Converter::new(FixedRate::new(USD_EUR));
    let mut payload = payload("USD");
    payload["date"] = json!("18/05/2021");

    let err = converter
        .convert(&RequestFrame::new(REQUEST_ID, payload))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Kind::Conversion);
}

#[tokio::test]
async fn identical_requests_should_convert_identically() -> anyhow::Result<()> {
    let converter = Converter::new(FixedRate::new(dec!(1.1)));

    for stake in [json!(0.01), json!(10), json!(99_999.99999)] {
        let mut payload = payload("GBP");
        payload["stake"] = stake;
        let frame = RequestFrame::new(REQUEST_ID, payload);

        let first = converter.convert(&frame).await?;
        let second = converter.convert(&frame).await?;

        assert_eq!(first.stake, second.stake);
        assert!(first.stake.scale() <= 5);
    }

    Ok(())
}
