//! Benchmarks for record decoding and sample access
//!
//! Tests performance for:
//! - Typed field extraction (scalars and CarIdx arrays)
//! - Full-record decode into name/value/unit maps
//! - Sequential, bulk and random access over an in-memory recording
//! - Session metadata normalization
//!
//! Platform: Cross-platform (synthetic recordings, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pitwall_ibt::test_utils::{
    MALFORMED_SESSION_YAML, RECORD_LENGTH, SyntheticSample, standard_catalog, standard_header,
    synthetic_file,
};
use pitwall_ibt::{MetadataNormalizer, RecordDecoder, SampleAccessor, VarData};
use std::hint::black_box;
use std::sync::Arc;

fn bench_field_extraction(c: &mut Criterion) {
    let catalog = standard_catalog();
    let record = SyntheticSample::at(42).encode();
    let decoder = RecordDecoder::new(Arc::new(standard_catalog()));

    let mut group = c.benchmark_group("field_extraction");

    if let Some(speed_info) = catalog.lookup("Speed") {
        group.bench_function("f32_speed", |b| {
            b.iter(|| black_box(f32::from_bytes(black_box(&record), speed_info).unwrap()))
        });
    }

    if let Some(gear_info) = catalog.lookup("Gear") {
        group.bench_function("i32_gear", |b| {
            b.iter(|| black_box(i32::from_bytes(black_box(&record), gear_info).unwrap()))
        });
    }

    if let Some(lap_dist_pct_info) = catalog.lookup("CarIdxLapDistPct") {
        group.bench_function(BenchmarkId::new("f32_array", lap_dist_pct_info.count), |b| {
            b.iter(|| {
                let value: Vec<f32> = Vec::from_bytes(black_box(&record), lap_dist_pct_info).unwrap();
                black_box(value)
            })
        });
    }

    group.bench_function("decode_named_case_insensitive", |b| {
        b.iter(|| black_box(decoder.decode_named(black_box(&record), "carIDXlapdistpct").unwrap()))
    });

    group.bench_function("decode_all", |b| {
        b.iter(|| black_box(decoder.decode_all(black_box(&record))))
    });

    group.finish();
}

fn bench_sample_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_access");

    for samples in [60usize, 3600] {
        let file = synthetic_file(samples, 17);
        let decoder = RecordDecoder::new(Arc::new(standard_catalog()));
        group.throughput(Throughput::Bytes((samples * RECORD_LENGTH) as u64));

        group.bench_function(BenchmarkId::new("sequential", samples), |b| {
            b.iter(|| {
                let accessor = SampleAccessor::new(&file, standard_header(), decoder.clone());
                black_box(accessor.sequential().filter_map(Result::ok).count())
            })
        });

        group.bench_function(BenchmarkId::new("bulk", samples), |b| {
            b.iter(|| {
                let accessor = SampleAccessor::new(&file, standard_header(), decoder.clone());
                black_box(accessor.samples().unwrap().len())
            })
        });

        let accessor = SampleAccessor::new(&file, standard_header(), decoder.clone());
        group.bench_function(BenchmarkId::new("random", samples), |b| {
            b.iter(|| black_box(accessor.sample_at(black_box(samples / 2)).unwrap()))
        });
    }

    group.finish();
}

fn bench_metadata_normalization(c: &mut Criterion) {
    let normalizer = MetadataNormalizer::default();
    let repaired = normalizer.normalize(MALFORMED_SESSION_YAML).unwrap().text;

    let mut group = c.benchmark_group("metadata_normalization");
    group.throughput(Throughput::Bytes(MALFORMED_SESSION_YAML.len() as u64));

    group.bench_function("malformed_driver_info", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(MALFORMED_SESSION_YAML)).unwrap()))
    });

    group.bench_function("already_normalized", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&repaired)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_field_extraction, bench_sample_access, bench_metadata_normalization);
criterion_main!(benches);
