use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use goenrich::annotations::{AnnotationRecord, AnnotationTable};
use goenrich::{BaseOntology, GeneSetIndex, Ontology, TermMeta};

/// 20,000 genes with 10 annotations each, spread over 5,000 terms
fn synthetic_table() -> AnnotationTable {
    let mut records = Vec::new();
    for gene in 0..20_000u32 {
        let id = gene.to_string();
        for i in 0..10u32 {
            let term = (gene * 7 + i * 131) % 5_000;
            let ontology = BaseOntology::ALL[(term % 3) as usize];
            records.push(AnnotationRecord::new(
                id.as_str(),
                format!("GO:{term:07}"),
                ontology,
            ));
        }
    }
    let terms = (0..5_000u32)
        .map(|term| TermMeta::new(format!("GO:{term:07}"), "term"))
        .collect();
    AnnotationTable::new(records, terms)
}

fn build_index_benchmark(c: &mut Criterion) {
    let table = synthetic_table();
    c.bench_function("build BP index", |b| {
        b.iter(|| GeneSetIndex::build(black_box(&table), Ontology::Bp).len())
    });
    c.bench_function("build ALL index", |b| {
        b.iter(|| GeneSetIndex::build(black_box(&table), Ontology::All).len())
    });
}

criterion_group! {
    name = index;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = build_index_benchmark
}
criterion_main!(index);
