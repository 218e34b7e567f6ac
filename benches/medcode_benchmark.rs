use criterion::{black_box, criterion_group, criterion_main, Criterion};
use medcode::prelude::*;
use std::sync::OnceLock;

// Static storage for the dataset to avoid rebuilding for each benchmark
static DATASET: OnceLock<CodingDataset> = OnceLock::new();

fn get_dataset() -> &'static CodingDataset {
    DATASET.get_or_init(CodingDataset::builtin)
}

fn benchmark_cpt_validation(c: &mut Criterion) {
    c.bench_function("cpt_validation_valid", |b| {
        b.iter(|| {
            let result = CptCode::new(black_box("11719"));
            assert!(result.is_ok());
        })
    });

    c.bench_function("cpt_validation_invalid", |b| {
        b.iter(|| {
            let result = CptCode::new(black_box("117"));
            assert!(result.is_err());
        })
    });
}

fn benchmark_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher");
    let dataset = get_dataset();

    group.bench_function("search_synonym_hit", |b| {
        b.iter(|| search_icd10(dataset, black_box("knee pain right"), 5));
    });

    group.bench_function("search_no_overlap", |b| {
        b.iter(|| search_icd10(dataset, black_box("0000"), 5));
    });

    group.bench_function("similarity_ratio", |b| {
        b.iter(|| {
            similarity_ratio(
                black_box("knee pain right"),
                black_box("pain in right knee"),
            )
        });
    });

    group.finish();
}

fn benchmark_advisor(c: &mut Criterion) {
    let mut group = c.benchmark_group("advisor");
    let dataset = get_dataset();

    group.bench_function("suggest_single_rule", |b| {
        b.iter(|| suggest_modifiers(dataset, black_box("bilateral procedure")).unwrap());
    });

    group.bench_function("suggest_multiple_rules", |b| {
        b.iter(|| {
            suggest_modifiers(
                dataset,
                black_box("repeat evaluation of distinct left and right sites"),
            )
            .unwrap()
        });
    });

    group.finish();
}

fn benchmark_ncci(c: &mut Criterion) {
    let mut group = c.benchmark_group("ncci");
    let dataset = get_dataset();
    let known_a = CptCode::new("11719").unwrap();
    let known_b = CptCode::new("11720").unwrap();
    let unknown_a = CptCode::new("99999").unwrap();
    let unknown_b = CptCode::new("88888").unwrap();

    group.bench_function("pair_lookup_hit", |b| {
        b.iter(|| check_ncci_pair(dataset, black_box(&known_a), black_box(&known_b)));
    });

    group.bench_function("pair_lookup_miss", |b| {
        b.iter(|| check_ncci_pair(dataset, black_box(&unknown_a), black_box(&unknown_b)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_cpt_validation,
    benchmark_matcher,
    benchmark_advisor,
    benchmark_ncci
);

criterion_main!(benches);
