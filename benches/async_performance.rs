//! Async batch benchmarks for RetroLZ
//!
//! Compares converting many buffers one after another against spreading them
//! over the blocking pool with the async API.

#![cfg(feature = "async")]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::future::try_join_all;
use retrolz::async_batch::Direction;
use retrolz::{compress_bytes, compress_bytes_async, AsyncBatchProcessor, ByteOrder, Format};
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Runtime;

fn generate_assets(count: usize, size: usize) -> Vec<Vec<u8>> {
    let pattern = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
    (0..count)
        .map(|asset| {
            let mut data = Vec::with_capacity(size);
            while data.len() < size {
                data.extend_from_slice(pattern);
                data.push(asset as u8);
            }
            data.truncate(size);
            data
        })
        .collect()
}

fn batch_compression_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("async_batch_compression");
    group.measurement_time(Duration::from_secs(10));

    let assets = generate_assets(16, 256 * 1024);
    let total: usize = assets.iter().map(Vec::len).sum();

    for format in [
        Format::Lz40,
        Format::TaikoLz80,
        Format::BackwardLz77(ByteOrder::LittleEndian),
    ] {
        group.throughput(Throughput::Bytes(total as u64));

        group.bench_with_input(BenchmarkId::new("sequential", format), &assets, |b, assets| {
            b.iter(|| {
                for data in assets {
                    black_box(compress_bytes(format, data).expect("Compression failed"));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("batch", format), &assets, |b, assets| {
            let processor = AsyncBatchProcessor::new(format);
            b.iter(|| {
                rt.block_on(async {
                    processor
                        .convert_buffers(Direction::Compress, assets.clone())
                        .await
                        .expect("Batch compression failed")
                })
            });
        });

        group.bench_with_input(BenchmarkId::new("join_all", format), &assets, |b, assets| {
            b.iter(|| {
                rt.block_on(async {
                    try_join_all(
                        assets
                            .iter()
                            .map(|data| compress_bytes_async(format, data.clone())),
                    )
                    .await
                    .expect("Async compression failed")
                })
            });
        });
    }

    group.finish();
}

fn concurrency_limit_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("async_concurrency_limit");
    group.measurement_time(Duration::from_secs(10));

    let assets = generate_assets(32, 64 * 1024);
    let total: usize = assets.iter().map(Vec::len).sum();
    group.throughput(Throughput::Bytes(total as u64));

    for limit in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(limit), &assets, |b, assets| {
            let processor = AsyncBatchProcessor::new(Format::Lz40).with_concurrency(limit);
            b.iter(|| {
                rt.block_on(async {
                    processor
                        .convert_buffers(Direction::Compress, assets.clone())
                        .await
                        .expect("Batch compression failed")
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, batch_compression_benchmark, concurrency_limit_benchmark);
criterion_main!(benches);
