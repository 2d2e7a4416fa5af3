//! Shared fixtures for unit tests

use crate::snapshot::Dataset;

const SAMPLE_JSON: &str = include_str!("../tests/data/registry.json");

/// The sample registry used across unit and integration tests
pub(crate) fn sample_dataset() -> Dataset {
    Dataset::from_json_str(SAMPLE_JSON).expect("sample dataset parses")
}
