//! Benchmarks for prefix normalization and IRI resolution
//!
//! Compares lookups on the sample registry against a synthetic registry where
//! many namespaces share one OBO PURL root.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use bioregistry_core::{Dataset, RegistryIndex, Resource};

fn sample_dataset() -> Dataset {
    Dataset::from_json_str(include_str!("../tests/data/registry.json")).unwrap()
}

/// `count` ontologies, all published under the OBO PURL root
fn obo_dataset(count: usize) -> Dataset {
    let resources = (0..count)
        .map(|i| {
            serde_json::from_value::<Resource>(json!({
                "prefix": format!("onto{}", i),
                "pattern": "^\\d{7}$",
                "banana": format!("ONTO{}", i),
                "mappings": {"obofoundry": format!("ONTO{}", i)}
            }))
            .unwrap()
        })
        .collect();
    Dataset::new(resources)
}

fn bench_index_build(c: &mut Criterion) {
    c.bench_function("index_build_sample", |b| {
        b.iter(|| {
            let index = RegistryIndex::from_dataset(sample_dataset()).unwrap();
            black_box(index)
        })
    });

    c.bench_function("index_build_obo_1000", |b| {
        let dataset = obo_dataset(1000);
        b.iter(|| {
            let index = RegistryIndex::from_dataset(dataset.clone()).unwrap();
            black_box(index)
        })
    });
}

fn bench_normalize(c: &mut Criterion) {
    let index = RegistryIndex::from_dataset(sample_dataset()).unwrap();

    c.bench_function("normalize_prefix_synonym", |b| {
        b.iter(|| black_box(index.normalize_prefix(black_box("NCBI_Taxon_ID"))))
    });

    c.bench_function("normalize_curie_banana", |b| {
        b.iter(|| black_box(index.normalize_curie(black_box("GO:GO:0006915"))))
    });
}

fn bench_iri(c: &mut Criterion) {
    let index = RegistryIndex::from_dataset(sample_dataset()).unwrap();

    c.bench_function("parse_iri_obo_purl", |b| {
        b.iter(|| {
            black_box(index.parse_iri(black_box("http://purl.obolibrary.org/obo/CHEBI_24867"), None))
        })
    });

    c.bench_function("get_iri_default_priority", |b| {
        b.iter(|| black_box(index.get_iri(black_box("chebi"), black_box("24867"), None, None)))
    });

    c.bench_function("get_providers_collect", |b| {
        b.iter(|| black_box(index.get_providers("ncbitaxon", "9606").collect::<Vec<_>>()))
    });
}

fn bench_shared_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_iri_shared_root");

    for count in [10usize, 100, 1000] {
        let index = RegistryIndex::from_dataset(obo_dataset(count)).unwrap();
        let iri = format!("http://purl.obolibrary.org/obo/ONTO{}_0000001", count - 1);

        group.bench_with_input(BenchmarkId::from_parameter(count), &iri, |b, iri| {
            b.iter(|| black_box(index.parse_iri(iri, None)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_index_build,
    bench_normalize,
    bench_iri,
    bench_shared_root,
);
criterion_main!(benches);
