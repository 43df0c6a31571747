//! Stream reconstruction benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glad_bench::{generate_records, packet_stream, random_data};
use glad_stream::{ReconstructorConfig, RecordReconstructor};

/// Benchmark reconstruction with varying read sizes.
fn bench_read_size(c: &mut Criterion) {
    let stream = packet_stream(&generate_records(1000));
    let mut group = c.benchmark_group("reconstruct_read_size");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    for read_size in [16, 256, 4096, 65536].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(read_size),
            read_size,
            |b, &read_size| {
                let config = ReconstructorConfig::raw().with_read_size(read_size);
                b.iter(|| {
                    let source = black_box(stream.as_slice());
                    let mut reader = RecordReconstructor::new(source, config.clone());
                    let collected = reader.collect_all();
                    assert_eq!(collected.records.len(), 1000);
                    black_box(collected);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark resynchronisation over garbage.
fn bench_resync(c: &mut Criterion) {
    let mut group = c.benchmark_group("resync");

    for garbage in [64, 1024, 16384].iter() {
        let mut stream = random_data(*garbage)
            .into_iter()
            .map(|b| if b == 0x1A { 0x00 } else { b })
            .collect::<Vec<_>>();
        stream.extend(packet_stream(&generate_records(10)));

        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(garbage), &stream, |b, stream| {
            b.iter(|| {
                let mut reader = RecordReconstructor::raw(black_box(stream.as_slice()));
                let collected = reader.collect_all();
                black_box(collected);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_read_size, bench_resync);

criterion_main!(benches);
