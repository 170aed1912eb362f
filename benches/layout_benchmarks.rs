//! Layout Performance Benchmarks for roomkit
//!
//! Run with: cargo bench --bench layout_benchmarks
//!
//! Grid packing runs on every resize and participant change, so these track
//! how the search scales with tile count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use roomkit::layout::{
    calculate_layout_sizes, chunk_elements, largest_rect, AspectRatio, LayoutConstraint,
    LayoutRequest,
};

fn bench_largest_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("largest_rect");
    for count in [1usize, 9, 49, 100, 500] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                largest_rect(
                    black_box(1920.0),
                    black_box(1080.0),
                    black_box(count as f64),
                    Some(16.0),
                    Some(9.0),
                )
            })
        });
    }
    group.finish();
}

fn bench_layout_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_layout_sizes");
    let strategies = [
        ("unconstrained", LayoutConstraint::Unconstrained),
        ("max_tiles", LayoutConstraint::MaxTiles(9)),
        ("max_rows", LayoutConstraint::MaxRows(3)),
        ("max_cols", LayoutConstraint::MaxCols(4)),
    ];
    for (name, constraint) in strategies {
        let request = LayoutRequest {
            count: 50,
            parent_width: 1920.0,
            parent_height: 1080.0,
            aspect_ratio: AspectRatio::default(),
            constraint,
        };
        group.bench_function(name, |b| b.iter(|| calculate_layout_sizes(black_box(&request))));
    }
    group.finish();
}

fn bench_pagination(c: &mut Criterion) {
    let peers: Vec<String> = (0..200).map(|i| format!("peer-{}", i)).collect();
    let sizes = calculate_layout_sizes(&LayoutRequest {
        count: peers.len(),
        parent_width: 1920.0,
        parent_height: 1080.0,
        aspect_ratio: AspectRatio::default(),
        constraint: LayoutConstraint::MaxTiles(16),
    })
    .unwrap();

    c.bench_function("chunk_elements_200", |b| {
        b.iter(|| chunk_elements(black_box(&peers), &sizes, false))
    });
}

criterion_group!(
    benches,
    bench_largest_rect,
    bench_layout_strategies,
    bench_pagination
);
criterion_main!(benches);
