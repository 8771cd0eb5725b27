// Secret sharing benchmarks for the wallet core.
//
// Covers GF(256) multiply/inverse, splitting a 32-byte key under a few
// policies, reconstruction, and the share text codec.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use veriskill_wallet::crypto::gf256;
use veriskill_wallet::recovery::{decode_share, encode_share, recover_secret, split_secret};

const KEY: [u8; 32] = [0x5A; 32];

fn bench_field_ops(c: &mut Criterion) {
    c.bench_function("gf256/mul", |b| {
        b.iter(|| gf256::mul(black_box(0x57), black_box(0x83)));
    });
    c.bench_function("gf256/inverse", |b| {
        b.iter(|| gf256::inverse(black_box(0x53)).unwrap());
    });
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("shamir/split_32b");
    for (threshold, total) in [(2u8, 3u8), (3, 5), (5, 10), (10, 20)] {
        group.throughput(Throughput::Bytes(KEY.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{threshold}-of-{total}")),
            &(threshold, total),
            |b, &(t, n)| b.iter(|| split_secret(&KEY, t, n).unwrap()),
        );
    }
    group.finish();
}

fn bench_recover(c: &mut Criterion) {
    let mut group = c.benchmark_group("shamir/recover_32b");
    for (threshold, total) in [(2u8, 3u8), (3, 5), (5, 10), (10, 20)] {
        let shares = split_secret(&KEY, threshold, total).unwrap();
        let subset = shares[..threshold as usize].to_vec();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{threshold}-of-{total}")),
            &subset,
            |b, subset| b.iter(|| recover_secret(subset).unwrap()),
        );
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let share = split_secret(&KEY, 3, 5).unwrap().remove(0);
    let encoded = encode_share(&share).unwrap();

    c.bench_function("codec/encode", |b| {
        b.iter(|| encode_share(&share).unwrap());
    });
    c.bench_function("codec/decode", |b| {
        b.iter(|| decode_share(&encoded).unwrap());
    });
}

criterion_group!(
    benches,
    bench_field_ops,
    bench_split,
    bench_recover,
    bench_codec,
);
criterion_main!(benches);
