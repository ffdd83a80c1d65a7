//! Block chain benchmarks.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use ledgerlink_core::{Block, BlockChain, BlockId, Link};
use rand::seq::SliceRandom;

fn chain_of(len: usize) -> BlockChain {
    BlockChain::from_ids(0..len as BlockId).unwrap()
}

/// Benchmark appending blocks to an empty chain.
fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push");

    for len in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| {
                let mut chain = BlockChain::new();
                for id in 0..len as BlockId {
                    chain.push(Block::new(id)).unwrap();
                }
                black_box(chain);
            });
        });
    }

    group.finish();
}

/// Benchmark removing every block in random order, cursor tracking included.
fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for len in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter_batched(
                || {
                    let chain = chain_of(len);
                    let mut links: Vec<Link> = chain.iter().map(|(link, _)| link).collect();
                    links.shuffle(&mut rand::thread_rng());
                    let cursor = chain.tail();
                    (chain, links, cursor)
                },
                |(mut chain, links, mut cursor)| {
                    for link in links {
                        black_box(chain.remove(link, &mut cursor));
                    }
                    black_box(cursor);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark the deep copy used to broadcast a sync buffer.
fn bench_clone(c: &mut Criterion) {
    let chain = chain_of(4096);
    c.bench_function("try_clone_4096", |b| {
        b.iter(|| black_box(chain.try_clone().unwrap()));
    });
}

criterion_group!(benches, bench_push, bench_remove, bench_clone);
criterion_main!(benches);
