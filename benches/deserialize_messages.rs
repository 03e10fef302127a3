/// Benchmarks for decoding feed frames and parsing conversion payloads.
///
/// Heartbeats arrive every second on every connection, conversion requests are the frames that
/// carry actual work.
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use serde_json::Value;
use stake_converter::conversion::ConversionRequest;
use stake_converter::ws::InboundMessage;

fn bench_inbound_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("websocket/inbound_message");

    let heartbeat_msg = r#"{"type": "heartbeat"}"#;
    group.throughput(Throughput::Bytes(heartbeat_msg.len() as u64));
    group.bench_function("InboundMessage::Heartbeat", |b| {
        b.iter(|| {
            InboundMessage::decode(std::hint::black_box(heartbeat_msg))
                .expect("Decoding should succeed")
        });
    });

    let request_msg = r#"{
        "type": "message",
        "id": 456,
        "payload": {
            "marketId": 123456,
            "selectionId": 987654,
            "odds": 2.2,
            "stake": 253.67,
            "currency": "USD",
            "date": "2021-05-18T21:32:42.324Z"
        }
    }"#;
    group.throughput(Throughput::Bytes(request_msg.len() as u64));
    group.bench_function("InboundMessage::ConversionRequest", |b| {
        b.iter(|| {
            InboundMessage::decode(std::hint::black_box(request_msg))
                .expect("Decoding should succeed")
        });
    });

    let malformed_msg = r#"{"type": "message", "payload": {}}"#;
    group.throughput(Throughput::Bytes(malformed_msg.len() as u64));
    group.bench_function("InboundMessage::Malformed", |b| {
        b.iter(|| InboundMessage::decode(std::hint::black_box(malformed_msg)).is_err());
    });

    group.finish();
}

fn bench_conversion_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion/request");

    let payload: Value = serde_json::from_str(
        r#"{
            "marketId": 123456,
            "selectionId": 987654,
            "odds": 2.2,
            "stake": 253.67,
            "currency": "USD",
            "date": "2021-05-18T21:32:42.324Z"
        }"#,
    )
    .expect("Payload should be valid JSON");

    group.bench_function("ConversionRequest::from_value", |b| {
        b.iter(|| {
            let _: ConversionRequest =
                serde_json::from_value(std::hint::black_box(payload.clone()))
                    .expect("Deserialization should succeed");
        });
    });

    group.finish();
}

criterion_group!(benches, bench_inbound_message, bench_conversion_request);
criterion_main!(benches);
