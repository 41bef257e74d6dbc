//! Benchmarks for ticker decoding and metric derivation

use btc_tracker::feed::{decode_ticker, PriceObservation};
use btc_tracker::portfolio::{DerivedMetrics, InvestmentPosition};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;

const TICKER: &[u8] = br#"{"e":"24hrTicker","E":1700000000000,"s":"BTCBRL","p":"15853.00","P":"2.50","w":"641230.11","c":"650000.00","Q":"0.00120000","o":"634147.00","h":"652000.00","l":"630000.00","v":"41.25","q":"26451234.50","O":1699913600000,"C":1700000000000,"F":1,"L":2,"n":2}"#;

fn benchmark_decode_ticker(c: &mut Criterion) {
    c.bench_function("decode_ticker", |b| {
        b.iter(|| decode_ticker(black_box(TICKER)))
    });
}

fn benchmark_derived_metrics(c: &mut Criterion) {
    let observation = PriceObservation::new(dec!(650000.00), dec!(2.50));
    let position = InvestmentPosition::new(dec!(0.1), dec!(20000));

    c.bench_function("derived_metrics", |b| {
        b.iter(|| DerivedMetrics::compute(black_box(&observation), black_box(&position)))
    });
}

criterion_group!(benches, benchmark_decode_ticker, benchmark_derived_metrics);
criterion_main!(benches);
