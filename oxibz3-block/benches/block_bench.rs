//! Benchmarks for single-block encode and decode.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxibz3_block::{Bz3BlockCodec, bound, bwt};
use oxibz3_core::BlockCodec;
use std::hint::black_box;

fn generate_text(size: usize) -> Vec<u8> {
    let words: &[&[u8]] = &[
        b"the", b"quick", b"brown", b"fox", b"jumps", b"over", b"lazy", b"dog", b"and", b"runs",
        b"through", b"forest", b"near", b"river",
    ];
    let mut data = Vec::with_capacity(size);
    let mut seed = 42u32;
    while data.len() < size {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        data.extend_from_slice(words[(seed as usize >> 8) % words.len()]);
        data.push(b' ');
    }
    data.truncate(size);
    data
}

fn generate_repeated(size: usize) -> Vec<u8> {
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
        .iter()
        .copied()
        .cycle()
        .take(size)
        .collect()
}

fn bench_bwt(c: &mut Criterion) {
    let mut group = c.benchmark_group("bwt");
    for size in [16 * 1024usize, 256 * 1024] {
        let data = generate_repeated(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("repeated", size), &data, |b, data| {
            b.iter(|| bwt::transform(black_box(data)));
        });
    }
    group.finish();
}

fn bench_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("block");
    let mut codec = Bz3BlockCodec::default();

    for size in [64 * 1024usize, 1024 * 1024] {
        let data = generate_text(size);
        let mut encoded = vec![0u8; bound(size)];
        let n = codec.encode_block(&data, &mut encoded).unwrap();
        encoded.truncate(n);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            let mut out = vec![0u8; bound(data.len())];
            b.iter(|| codec.clone().encode_block(black_box(data), &mut out).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            let mut out = vec![0u8; size];
            b.iter(|| codec.clone().decode_block(black_box(encoded), &mut out).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bwt, bench_block);
criterion_main!(benches);
