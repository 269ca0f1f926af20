//! CRC-32C throughput across block-sized inputs.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxibz3_core::crc::Crc32c;
use std::hint::black_box;

fn pseudo_random(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

fn bench_crc32c(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc32c");

    for size in [64usize, 4 * 1024, 64 * 1024, 1024 * 1024] {
        let data = pseudo_random(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| Crc32c::compute(black_box(data)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_crc32c);
criterion_main!(benches);
