use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sinusoidal::{
    query::{self, QuerySpec},
    sample::{Sampler, TimeRange},
    Catalog,
};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parse", |b| {
        b.iter(|| {
            black_box(query::parse(black_box(
                "derivative(sum({metric:'sin',group:'all',scale:'medium'}[5m]))",
            )))
        });
    });

    c.bench_function("select", |b| {
        let catalog = Catalog::predefined().unwrap();
        let spec = QuerySpec::parse_lenient("{metric:'sin',scale:'medium'}");
        b.iter(|| black_box(catalog.select(&spec.filter)));
    });

    c.bench_function("generate", |b| {
        let catalog = Catalog::predefined().unwrap();
        let spec = QuerySpec::parse_lenient("{metric:'sin',period:'40'}");
        let matches = catalog.select(&spec.filter);
        let sampler = Sampler::new(11_000);
        let range = TimeRange {
            start: 0,
            stop: 10_000_000,
            step: 1_000,
        };
        b.iter(|| black_box(sampler.generate(&matches, range).unwrap()));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
