use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use go_enrich::pipeline::{go_enrichment, EnrichmentInput};
use go_enrich::stats::{fdr, score_terms};
use go_enrich::{EnrichmentConfig, EnrichmentMethod};

/// A layered DAG where every term has up to two parents in the layer above
fn synthetic_input(layers: usize, width: usize, genes: usize) -> EnrichmentInput {
    let name = |layer: usize, idx: usize| format!("GO:{layer:03}{idx:04}");

    let mut input = EnrichmentInput {
        background: (0..genes).map(|i| format!("gene{i}")).collect(),
        ..Default::default()
    };
    input.target = input.background.iter().step_by(7).cloned().collect();

    input.terms.push(name(0, 0));
    for layer in 1..layers {
        for idx in 0..width {
            input.terms.push(name(layer, idx));
            let parent_width = if layer == 1 { 1 } else { width };
            input
                .edges
                .push((name(layer, idx), name(layer - 1, idx % parent_width)));
            input
                .edges
                .push((name(layer, idx), name(layer - 1, (idx * 3 + 1) % parent_width)));
        }
    }

    for (i, gene) in input.background.iter().enumerate() {
        let leaf = name(layers - 1, i % width);
        input.annotations.push((gene.clone(), leaf));
        let inner = name(1 + i % (layers - 1), (i / 3) % width);
        input.annotations.push((gene.clone(), inner));
    }
    input
}

fn build_ontology(c: &mut Criterion) {
    let input = synthetic_input(8, 200, 5_000);
    c.bench_function("build ontology", |b| {
        b.iter(|| input.ontology(black_box(5)).expect("synthetic input is a DAG").len())
    });
}

fn score(c: &mut Criterion) {
    let input = synthetic_input(8, 200, 5_000);
    let ontology = input.ontology(5).expect("synthetic input is a DAG");
    let study = ontology.study_set(&input.target);

    let mut group = c.benchmark_group("score terms");
    for method in EnrichmentMethod::all() {
        group.bench_function(method.to_string(), |b| {
            b.iter(|| {
                score_terms(&ontology, &study, black_box(method))
                    .expect("valid tables")
                    .len()
            })
        });
    }
    group.finish();

    let scores = score_terms(&ontology, &study, EnrichmentMethod::Independent)
        .expect("valid tables");
    c.bench_function("fdr correction", |b| {
        b.iter(|| fdr::correct(black_box(&scores), 0.5).map_or(0, |res| res.len()))
    });
}

fn full_run(c: &mut Criterion) {
    let input = synthetic_input(8, 200, 5_000);
    let config = EnrichmentConfig::default().with_base_fdr(0.5);
    c.bench_function("go enrichment", |b| {
        b.iter(|| go_enrichment(black_box(&input), &config).map_or(0, |res| res.len()))
    });
}

criterion_group! {
    name = enrichment;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = build_ontology, score, full_run
}
criterion_main!(enrichment);
