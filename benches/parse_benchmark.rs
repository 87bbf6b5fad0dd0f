use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use igesrust::{IgesReader, IgesReaderConfiguration};

#[path = "../tests/common/mod.rs"]
mod common;

use common::IgesBuilder;

/// A file of `loops` closed composites, each a square of scrambled lines
/// followed by a B-spline
fn generate_iges(loops: usize) -> String {
    let mut builder = IgesBuilder::new();
    for i in 0..loops {
        let x = 3.0 * i as f64;
        let a = builder.line([x, 0.0, 0.0], [x + 1.0, 0.0, 0.0]);
        let b = builder.line([x + 1.0, 1.0, 0.0], [x + 1.0, 0.0, 0.0]);
        let c = builder.line([x, 1.0, 0.0], [x, 0.0, 0.0]);
        let d = builder.line([x + 1.0, 1.0, 0.0], [x, 1.0, 0.0]);
        builder.composite(&[a, c, b, d]);
        builder.bspline(
            3,
            &[
                [x, 2.0, 0.0],
                [x + 0.5, 3.0, 0.0],
                [x + 1.0, 2.0, 0.0],
                [x + 1.5, 3.0, 0.0],
                [x + 2.0, 2.0, 0.0],
            ],
            &[1.0; 5],
        );
    }
    builder.build()
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    for loops in [10, 100, 1000] {
        let text = generate_iges(loops);
        group.bench_with_input(BenchmarkId::new("serial", loops), &text, |b, text| {
            b.iter(|| IgesReader::from_text(black_box(text)).read().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("parallel", loops), &text, |b, text| {
            let config = IgesReaderConfiguration {
                parallel_parameters: true,
                ..Default::default()
            };
            b.iter(|| {
                IgesReader::from_text(black_box(text))
                    .with_configuration(config.clone())
                    .read()
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let doc = IgesReader::from_text(&generate_iges(100)).read().unwrap();
    c.bench_function("arange_all_curves", |b| {
        b.iter(|| {
            doc.curves()
                .map(|curve| curve.arange(black_box(0.01), true).len())
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_read, bench_sampling);
criterion_main!(benches);
