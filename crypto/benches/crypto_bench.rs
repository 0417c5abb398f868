use calyx_crypto::{blake2b_256, generate_keypair, sign, verify};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_blake2b(c: &mut Criterion) {
    let data = vec![0u8; 256];
    c.bench_function("blake2b_256_256b", |b| {
        b.iter(|| blake2b_256(black_box(&data)))
    });
}

fn bench_sign_verify(c: &mut Criterion) {
    let keypair = generate_keypair();
    let msg = b"benchmark message payload";

    c.bench_function("ed25519_sign", |b| {
        b.iter(|| sign(black_box(msg), black_box(&keypair.private)))
    });

    let sig = sign(msg, &keypair.private);
    c.bench_function("ed25519_verify", |b| {
        b.iter(|| verify(black_box(msg), black_box(&sig), black_box(&keypair.public)))
    });
}

criterion_group!(benches, bench_blake2b, bench_sign_verify);
criterion_main!(benches);
