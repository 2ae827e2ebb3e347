// Retrieval benchmarks for the weighted and vector engines
use casebase_core::{AttributeValue, Case, CaseBase};
use casebase_similarity::{CaseEngine, KnnClassifier, WeightMap};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use std::sync::Arc;

const GENRES: [&str; 8] = ["Action", "Adventure", "Animation", "Comedy", "Crime", "Drama", "Horror", "Sci-Fi"];
const CERTIFICATES: [&str; 4] = ["U", "UA", "A", "PG-13"];

fn generate_random_case(rng: &mut impl Rng, id: usize) -> Case {
    let rating: f64 = rng.random_range(1.0..10.0);
    let meta: f64 = rng.random_range(20.0..100.0);
    let genres: Vec<&str> = GENRES.iter().copied().filter(|_| rng.random_bool(0.3)).collect();
    let certificate = CERTIFICATES[rng.random_range(0..CERTIFICATES.len())];

    Case::new(id as u64)
        .with_display_key(format!("movie {}", id % 5000))
        .with_attribute("IMDB_Rating", rating)
        .with_attribute("Meta_score", meta)
        .with_attribute("Runtime", rng.random_range(70.0f64..200.0))
        .with_attribute("Genre", AttributeValue::multi(genres.iter().copied()))
        .with_attribute("Certificate", certificate)
        .with_features(vec![rating, meta / 10.0])
        .with_label(genres.first().copied().unwrap_or("Unknown"))
}

fn generate_case_base(size: usize) -> Arc<CaseBase> {
    let mut rng = StdRng::seed_from_u64(42);
    let cases = (0..size).map(|i| generate_random_case(&mut rng, i)).collect();
    Arc::new(CaseBase::build(cases).unwrap())
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [1000, 10000].iter() {
        let mut rng = StdRng::seed_from_u64(7);
        let cases: Vec<Case> = (0..*size).map(|i| generate_random_case(&mut rng, i)).collect();

        group.bench_with_input(BenchmarkId::new("case_base", size), size, |b, _| {
            b.iter(|| black_box(CaseBase::build(cases.clone()).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_weighted_retrieval(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_retrieval");

    for size in [1000, 10000].iter() {
        let engine = CaseEngine::new(generate_case_base(*size), WeightMap::parse("Genre=2;Certificate=0.5"));
        let query = engine.base().get(0).unwrap().clone();

        group.bench_with_input(BenchmarkId::new("retrieve_k10", size), size, |b, _| {
            b.iter(|| black_box(engine.retrieve_neighbors(black_box(&query), 10, None).unwrap().len()));
        });

        group.bench_with_input(BenchmarkId::new("retrieve_and_predict", size), size, |b, _| {
            b.iter(|| {
                let (_, prediction) = engine.retrieve_and_predict(black_box(&query), 10, "Certificate").unwrap();
                black_box(prediction)
            });
        });

        group.bench_with_input(BenchmarkId::new("recommend_top5", size), size, |b, _| {
            b.iter(|| black_box(engine.recommend_similar(black_box(&query), 5).unwrap().len()));
        });
    }

    group.finish();
}

fn benchmark_knn(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn");

    for size in [1000, 10000].iter() {
        let mut knn = KnnClassifier::new(5).unwrap();
        knn.fit_base(generate_case_base(*size)).unwrap();
        let query = Case::transient().with_features(vec![7.5, 6.8]);

        group.bench_with_input(BenchmarkId::new("predict_label_k5", size), size, |b, _| {
            b.iter(|| black_box(knn.predict_label(black_box(&query)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_weighted_retrieval, benchmark_knn);
criterion_main!(benches);
