//! Benchmarks for scrypt hashing and verification at several costs

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cryypt_scrypt::{codec, HashOptions, Scrypt};
use tokio::runtime::Runtime;

const PASSWORD: &str = "r9(yaV@L";

/// Room for cost 20 at block size 8 (about 1 GiB)
const BENCH_MAX_MEMORY: u64 = 2 << 30;

fn hash_once(rt: &Runtime, options: HashOptions) {
    rt.block_on(async {
        let encoded = Scrypt::hash()
            .with_options(options)
            .compute(PASSWORD)
            .await
            .expect("hash should succeed");
        std::hint::black_box(encoded);
    });
}

/// Hash and verify at the default cost and a few custom costs
fn benchmark_hash_verify(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("scrypt_hash_verify");
    group.sample_size(10);

    for cost in [10i64, 14, 15] {
        let options = HashOptions {
            cost,
            ..HashOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("hash", cost), &options, |b, &options| {
            b.iter(|| hash_once(&rt, options));
        });

        let encoded = rt
            .block_on(Scrypt::hash().with_options(options).compute(PASSWORD))
            .expect("hash should succeed");
        group.bench_with_input(BenchmarkId::new("verify", cost), &encoded, |b, encoded| {
            b.iter(|| {
                rt.block_on(async {
                    let ok = Scrypt::verify()
                        .verify(encoded, PASSWORD)
                        .await
                        .expect("verify should succeed");
                    std::hint::black_box(ok);
                });
            });
        });
    }
    group.finish();
}

/// Hashing at high costs, with the memory ceiling raised to fit them
fn benchmark_high_cost(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("scrypt_high_cost");
    group.sample_size(10);

    for cost in [16i64, 18, 20] {
        let options = HashOptions {
            cost,
            max_memory: BENCH_MAX_MEMORY,
            ..HashOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("hash", cost), &options, |b, &options| {
            b.iter(|| hash_once(&rt, options));
        });
    }
    group.finish();
}

/// Hashing at the default cost with larger block sizes
fn benchmark_block_size(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("scrypt_block_size");
    group.sample_size(10);

    for block_size in 9i64..=12 {
        let options = HashOptions {
            block_size,
            ..HashOptions::default()
        };
        group.bench_with_input(
            BenchmarkId::new("hash", block_size),
            &options,
            |b, &options| {
                b.iter(|| hash_once(&rt, options));
            },
        );
    }
    group.finish();
}

/// PHC string encoding without any derivation
fn benchmark_codec(c: &mut Criterion) {
    let encoded =
        "$scrypt$n=16,r=8,p=1$aM15713r3Xsvxbi31lqr1Q$nFNh2CVHVjNldFVKDHDlm4CbdRSCdEBsjjJxD+iCs5E";
    let record = codec::deserialize(encoded).expect("valid PHC string");

    c.bench_function("phc_deserialize", |b| {
        b.iter(|| std::hint::black_box(codec::deserialize(std::hint::black_box(encoded))));
    });
    c.bench_function("phc_serialize", |b| {
        b.iter(|| std::hint::black_box(codec::serialize(std::hint::black_box(&record))));
    });
}

criterion_group!(
    benches,
    benchmark_hash_verify,
    benchmark_high_cost,
    benchmark_block_size,
    benchmark_codec
);
criterion_main!(benches);
