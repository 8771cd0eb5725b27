// Private key sealing benchmarks.
//
// Argon2id dominates, so these run with a handful of cost settings to show
// how unlock latency scales with memory cost.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use veriskill_wallet::crypto::{KdfParams, KeyEncryptionService};

fn bench_seal_unseal(c: &mut Criterion) {
    let mut group = c.benchmark_group("sealing/unseal");
    group.sample_size(10);

    for memory_kib in [1024u32, 8 * 1024, 19 * 1024] {
        let sealer = KeyEncryptionService::new(KdfParams::new(memory_kib, 2, 1));
        let blob = sealer.encrypt(&[7u8; 32], "correct horse").unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{memory_kib}KiB")),
            &blob,
            |b, blob| b.iter(|| sealer.decrypt(blob, "correct horse").unwrap()),
        );
    }
    group.finish();
}

fn bench_seal(c: &mut Criterion) {
    let sealer = KeyEncryptionService::new(KdfParams::low_memory());
    c.bench_function("sealing/seal_low_memory", |b| {
        b.iter(|| sealer.encrypt(&[7u8; 32], "correct horse").unwrap());
    });
}

criterion_group!(benches, bench_seal_unseal, bench_seal);
criterion_main!(benches);
