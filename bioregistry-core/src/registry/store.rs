//! Registry Store implementation

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::error::{RegistryError, Result};
use crate::snapshot::{Dataset, Resource};

use super::synonyms::{fold, SynonymIndex};

/// Immutable records keyed by canonical prefix, plus their synonym index
#[derive(Debug, Clone, Default)]
pub struct RegistryStore {
    /// Records in canonical order
    resources: BTreeMap<String, Resource>,

    /// Alias lookup
    synonyms: SynonymIndex,
}

impl RegistryStore {
    /// Build the store from a dataset
    ///
    /// Fails on an invalid or duplicate canonical prefix and on any synonym
    /// shared by two records.
    pub fn load(dataset: Dataset) -> Result<Self> {
        let mut resources = BTreeMap::new();

        for resource in dataset.resources {
            check_canonical(&resource.prefix)?;
            if resources.contains_key(&resource.prefix) {
                return Err(RegistryError::DuplicatePrefix {
                    prefix: resource.prefix,
                });
            }
            resources.insert(resource.prefix.clone(), resource);
        }

        let synonyms = SynonymIndex::build(resources.values())?;

        Ok(Self {
            resources,
            synonyms,
        })
    }

    /// Map any known prefix, synonym or casing variant to its canonical prefix
    pub fn normalize_prefix(&self, input: &str) -> Option<&str> {
        let folded = fold(input);
        if let Some((canonical, _)) = self.resources.get_key_value(folded.as_str()) {
            return Some(canonical.as_str());
        }
        self.synonyms.get_folded(&folded)
    }

    /// Get a record by any known prefix
    pub fn get(&self, prefix: &str) -> Option<&Resource> {
        let canonical = self.normalize_prefix(prefix)?;
        self.resources.get(canonical)
    }

    /// Get a record by its exact canonical prefix
    pub fn get_canonical(&self, prefix: &str) -> Option<&Resource> {
        self.resources.get(prefix)
    }

    /// All records in canonical order
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn synonyms(&self) -> &SynonymIndex {
        &self.synonyms
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// SHA-256 over the records in canonical order
    ///
    /// Two stores built from the same records have the same fingerprint,
    /// regardless of input order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for resource in self.resources.values() {
            let json = serde_json::to_string(resource).unwrap_or_default();
            hasher.update(json.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

fn check_canonical(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(RegistryError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "prefix cannot be empty".to_string(),
        });
    }
    if fold(prefix) != prefix {
        return Err(RegistryError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "canonical prefixes must be lowercase without surrounding whitespace"
                .to_string(),
        });
    }
    if prefix.contains(':') {
        return Err(RegistryError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "prefix cannot contain ':'".to_string(),
        });
    }
    Ok(())
}
