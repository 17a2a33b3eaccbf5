//! Scoring benchmarks for the three modes.
//!
//! Sizes loosely follow common link-prediction datasets:
//! - small: N=300 entities, 10 relations
//! - medium: N=2000 entities, 50 relations
//! - fb15k-like: N=14541 entities, 237 relations

use candle_core::{Device, Tensor};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kge_nn::{
    hr_batch, hrt_batch, rt_batch, ComplExLiteral, KgSize, KgeModel, LiteralConfig, ModelConfig,
    SimplE, Triple,
};

const SIZES: [(&str, usize, usize); 3] = [
    ("small", 300, 10),
    ("medium", 2000, 50),
    ("fb15k", 14541, 237),
];

/// Deterministic pseudo-random triples.
fn make_triples(size: KgSize, n: usize, seed: usize) -> Vec<Triple> {
    let mut x = seed;
    let mut next = |bound: usize| {
        x = x.wrapping_mul(1103515245).wrapping_add(12345);
        ((x >> 8) % bound) as u32
    };
    (0..n)
        .map(|_| {
            let h = next(size.num_entities);
            let r = next(size.num_relations);
            let t = next(size.num_entities);
            Triple::new(h, r, t)
        })
        .collect()
}

/// Benchmark: score explicit triples
fn bench_owa(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_owa");
    let device = Device::Cpu;

    for (name, entities, relations) in SIZES {
        let size = KgSize::new(entities, relations);
        let model = SimplE::new(size, &ModelConfig::new(64, 1), &device).unwrap();
        let batch = hrt_batch(&make_triples(size, 1024, 7), &device).unwrap();

        group.bench_with_input(BenchmarkId::new("batch1024", name), &batch, |b, batch| {
            b.iter(|| model.score_owa(batch).unwrap());
        });
    }

    group.finish();
}

/// Benchmark: score (h, r) against every tail and (r, t) against every head
fn bench_cwa(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_cwa");
    let device = Device::Cpu;

    for (name, entities, relations) in SIZES {
        let size = KgSize::new(entities, relations);
        let model = SimplE::new(size, &ModelConfig::new(64, 1), &device).unwrap();
        let triples = make_triples(size, 32, 11);
        let hr: Vec<(u32, u32)> = triples.iter().map(|t| (t.head, t.relation)).collect();
        let rt: Vec<(u32, u32)> = triples.iter().map(|t| (t.relation, t.tail)).collect();
        let hr = hr_batch(&hr, &device).unwrap();
        let rt = rt_batch(&rt, &device).unwrap();

        group.bench_with_input(BenchmarkId::new("tails", name), &hr, |b, batch| {
            b.iter(|| model.score_cwa(batch).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("heads", name), &rt, |b, batch| {
            b.iter(|| model.score_inverse_cwa(batch).unwrap());
        });
    }

    group.finish();
}

/// Benchmark: literal combination cost on top of ComplEx scoring
fn bench_literal(c: &mut Criterion) {
    let mut group = c.benchmark_group("complex_literal_cwa");
    let device = Device::Cpu;

    for (name, entities, relations) in SIZES.iter().take(2).copied() {
        let size = KgSize::new(entities, relations);
        let literals = Tensor::randn(0f32, 1.0, (entities, 16), &device).unwrap();
        let config = LiteralConfig {
            model: ModelConfig::new(32, 1),
            input_dropout: 0.0,
        };
        let mut model = ComplExLiteral::new(size, &literals, &config, &device).unwrap();
        model.eval();

        let triples = make_triples(size, 32, 5);
        let hr: Vec<(u32, u32)> = triples.iter().map(|t| (t.head, t.relation)).collect();
        let hr = hr_batch(&hr, &device).unwrap();

        group.bench_with_input(BenchmarkId::new("tails", name), &hr, |b, batch| {
            b.iter(|| model.score_cwa(batch).unwrap());
        });
    }

    group.finish();
}

/// Benchmark: embedding dimension scaling
fn bench_dim_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("dim_scaling");
    let device = Device::Cpu;
    let size = KgSize::new(1000, 20);
    let triples = make_triples(size, 32, 3);
    let hr: Vec<(u32, u32)> = triples.iter().map(|t| (t.head, t.relation)).collect();
    let hr = hr_batch(&hr, &device).unwrap();

    for dim in [32, 64, 128, 256] {
        let model = SimplE::new(size, &ModelConfig::new(dim, 1), &device).unwrap();
        group.bench_with_input(BenchmarkId::new("cwa", dim), &hr, |b, batch| {
            b.iter(|| model.score_cwa(batch).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_owa, bench_cwa, bench_literal, bench_dim_scaling);
criterion_main!(benches);
