use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| qcat_crypto::blake2b_256(black_box(&data)))
    });
}

fn blake2b_256_multi_bench(c: &mut Criterion) {
    let source = [0x11u8; 32];
    let entropy = [0x22u8; 32];
    let payload = [0x33u8; 256];
    let account = [0x44u8; 20];
    let height = 1_000u64.to_be_bytes();
    let parts: [&[u8]; 5] = [&source, &entropy, &payload, &account, &height];

    c.bench_function("blake2b_256_multi_outcome_mix", |b| {
        b.iter(|| qcat_crypto::blake2b_256_multi(black_box(&parts)))
    });
}

fn commitment_bench(c: &mut Criterion) {
    let data = [0x5Au8; 256];

    c.bench_function("commitment_256B", |b| {
        b.iter(|| qcat_crypto::commitment(black_box(&data)))
    });
}

criterion_group!(
    benches,
    blake2b_256_bench,
    blake2b_256_multi_bench,
    commitment_bench
);
criterion_main!(benches);
