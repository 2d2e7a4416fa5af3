//! Atomic reload and concurrent readers

use std::sync::Arc;
use std::thread;

use bioregistry_core::{Dataset, Reference, RegistryHandle, RegistryIndex, ResolverConfig, Resource};

fn sample_dataset() -> Dataset {
    Dataset::from_json_str(include_str!("data/registry.json")).expect("Failed to parse registry.json")
}

#[test]
fn reload_skips_unchanged_fingerprint() {
    let handle = RegistryHandle::new(RegistryIndex::from_dataset(sample_dataset()).unwrap());
    let before = handle.current();

    // same records in a different order
    let mut shuffled = sample_dataset();
    shuffled.resources.reverse();

    assert!(!handle.reload(shuffled).unwrap());
    assert!(Arc::ptr_eq(&before, &handle.current()));
}

#[test]
fn reload_keeps_configuration() {
    let config = ResolverConfig::builder().priority_tokens("obofoundry").build();
    let handle = RegistryHandle::new(RegistryIndex::build(sample_dataset(), config.clone()).unwrap());

    let mut dataset = sample_dataset();
    dataset
        .resources
        .push(Resource::new("cl").with_pattern(r"^\d{7}$").with_mapping("obofoundry", "CL"));
    assert!(handle.reload(dataset).unwrap());

    let current = handle.current();
    assert_eq!(current.config(), &config);
    assert_eq!(
        current.get_iri("cl", "0000000", None, None).as_deref(),
        Some("http://purl.obolibrary.org/obo/CL_0000000")
    );
}

#[test]
fn readers_keep_their_snapshot_across_reload() {
    let handle = RegistryHandle::new(RegistryIndex::from_dataset(sample_dataset()).unwrap());
    let old = handle.current();

    let mut dataset = sample_dataset();
    dataset.resources.retain(|r| r.prefix != "pubmed");
    assert!(handle.reload(dataset).unwrap());

    assert_eq!(old.normalize_prefix("pmid"), Some("pubmed"));
    assert_eq!(handle.current().normalize_prefix("pmid"), None);
}

#[test]
fn concurrent_readers_during_reload() {
    let handle = RegistryHandle::new(RegistryIndex::from_dataset(sample_dataset()).unwrap());
    let expected = Reference::new("chebi", "24867");

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200 {
                    let index = handle.current();
                    assert_eq!(
                        index.parse_iri("http://purl.obolibrary.org/obo/CHEBI_24867", None),
                        Some(expected.clone())
                    );
                    assert_eq!(index.normalize_prefix("taxonomy"), Some("ncbitaxon"));
                }
            });
        }

        s.spawn(|| {
            for i in 0..20 {
                let mut dataset = sample_dataset();
                dataset
                    .resources
                    .push(Resource::new(format!("extra{}", i)).with_uri_format(format!(
                        "https://extra{}.example/$1",
                        i
                    )));
                assert!(handle.reload(dataset).unwrap());
            }
        });
    });

    assert_eq!(handle.current().normalize_prefix("extra19"), Some("extra19"));
}

#[test]
fn shared_index_across_threads() {
    let index = Arc::new(RegistryIndex::from_dataset(sample_dataset()).unwrap());

    thread::scope(|s| {
        let handles: Vec<_> = ["GO:GO:0006915", "taxonomy:9606", "pmid:16333295", "CHEBI:24867"]
            .into_iter()
            .map(|curie| {
                let index = Arc::clone(&index);
                s.spawn(move || index.normalize_curie(curie))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            results,
            vec![
                Some("go:0006915".to_string()),
                Some("ncbitaxon:9606".to_string()),
                Some("pubmed:16333295".to_string()),
                Some("chebi:24867".to_string()),
            ]
        );
    });

    // every pattern compiled at most once, however many threads raced
    assert!(index.pattern_stats().compiled <= index.pattern_stats().registered as u64);
}
