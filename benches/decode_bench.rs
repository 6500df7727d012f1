//! Benchmarks for poll decoding and rendering
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use stellar_poll::contract::decode_poll_state;
use stellar_poll::view::{render_screen, SCREEN_WIDTH};
use stellar_poll::xdr::{decode_scval, encode_scval, string_to_scval, string_vec_to_scval};
use stellar_poll::UiState;
use stellar_xdr::curr::{ScMap, ScMapEntry, ScSymbol, ScVal};

fn symbol(name: &str) -> ScVal {
    ScVal::Symbol(ScSymbol(name.try_into().unwrap()))
}

fn poll_value(option_count: u32) -> ScVal {
    let options: Vec<String> = (0..option_count).map(|i| format!("Option {}", i)).collect();
    let votes: Vec<ScMapEntry> = (0..option_count)
        .map(|i| ScMapEntry {
            key: ScVal::U32(i),
            val: ScVal::U32(i * 7 + 1),
        })
        .collect();

    ScVal::Map(Some(ScMap(
        vec![
            ScMapEntry {
                key: symbol("options"),
                val: string_vec_to_scval(&options).unwrap(),
            },
            ScMapEntry {
                key: symbol("question"),
                val: string_to_scval("Which option?").unwrap(),
            },
            ScMapEntry {
                key: symbol("votes"),
                val: ScVal::Map(Some(ScMap(votes.try_into().unwrap()))),
            },
        ]
        .try_into()
        .unwrap(),
    )))
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [2, 10, 100] {
        let value = poll_value(size);
        let encoded = encode_scval(&value).unwrap();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("poll_state_{}", size), |b| {
            b.iter(|| decode_poll_state(black_box(&value)).unwrap())
        });

        group.bench_function(format!("base64_poll_state_{}", size), |b| {
            b.iter(|| {
                let value = decode_scval(black_box(&encoded)).unwrap();
                decode_poll_state(&value).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in [2, 10] {
        let mut state = UiState::default();
        state.poll_fetched(Some(decode_poll_state(&poll_value(size)).unwrap()));
        state.wallet_connected("GAAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQDZ7H".to_string());
        state.choice_fetched(Some(1));

        group.bench_function(format!("screen_{}", size), |b| {
            b.iter(|| render_screen(black_box(&state), SCREEN_WIDTH))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_render);
criterion_main!(benches);
