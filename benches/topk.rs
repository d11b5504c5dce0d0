use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use aggregate_topk::{
    generate::{generate_phones, GeneratorOptions},
    normalize::NormalizeOptions,
    score::AggregationMode,
    search::Strategy,
    session::{Session, TopKQuery},
};

fn criterion_benchmark(c: &mut Criterion) {
    const NUM_PHONES: usize = 20_000;

    let phones = generate_phones(&GeneratorOptions {
        count: NUM_PHONES,
        seed: Some(1),
        progress: false,
    });
    let columns = ["display_freq_norm", "battery_norm", "price_norm"];

    let mut session = Session::new(phones, &NormalizeOptions::default())
        .expect("Error while normalizing the dataset");
    session
        .prepare(&columns)
        .expect("Error while building the sorted lists");

    let mut group = c.benchmark_group("top-k");
    for mode in [AggregationMode::Avg, AggregationMode::Min] {
        let query = TopKQuery::new(&columns, mode, 10);
        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), mode),
                &query,
                |b, query| b.iter(|| session.top_k(strategy, query)),
            );
        }
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(100);
    targets = criterion_benchmark
}
criterion_main!(benches);
