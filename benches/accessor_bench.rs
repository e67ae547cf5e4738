use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dashmap::DashMap;
use nonblocking_view::{NonBlockingExt, Selector};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn filled(n: usize) -> DashMap<u64, u64> {
    let m = DashMap::new();
    for (i, x) in lcg(7).take(n).enumerate() {
        m.insert(x, i as u64);
    }
    m
}

fn bench_count(c: &mut Criterion) {
    let m = filled(10_000);
    c.bench_function("native_len_10k", |b| b.iter(|| black_box(m.len())));
    c.bench_function("lazy_count_10k", |b| {
        b.iter(|| black_box(m.non_blocking().count()))
    });
}

fn bench_is_empty(c: &mut Criterion) {
    let m = filled(10_000);
    c.bench_function("native_is_empty_10k", |b| b.iter(|| black_box(m.is_empty())));
    c.bench_function("lazy_is_empty_10k", |b| {
        b.iter(|| black_box(m.non_blocking().is_empty()))
    });
}

fn bench_keys_values(c: &mut Criterion) {
    let m = filled(10_000);
    c.bench_function("lazy_keys_10k", |b| b.iter(|| black_box(m.non_blocking().keys())));
    c.bench_function("lazy_values_10k", |b| {
        b.iter(|| black_box(m.non_blocking().values()))
    });
    c.bench_function("resolve_keys_10k", |b| {
        b.iter(|| black_box(m.non_blocking().resolve(Selector::keys())))
    });
}

// Polling the count while a writer churns the map.
fn bench_count_under_writer(c: &mut Criterion) {
    let m = filled(10_000);
    let stop = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            let mut it = lcg(99);
            while !stop.load(Ordering::Relaxed) {
                let k = it.next().unwrap_or(0) % 20_000;
                if m.remove(&k).is_none() {
                    m.insert(k, k);
                }
            }
        });
        c.bench_function("lazy_count_10k_with_writer", |b| {
            b.iter(|| black_box(m.non_blocking().count()))
        });
        c.bench_function("native_len_10k_with_writer", |b| b.iter(|| black_box(m.len())));
        stop.store(true, Ordering::Relaxed);
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_count, bench_is_empty, bench_keys_values, bench_count_under_writer
}
criterion_main!(benches);
