//! Synonym Index - alias and casing variants to canonical prefixes

use std::collections::HashMap;

use crate::error::{RegistryError, Result};
use crate::snapshot::Resource;

/// Case-fold and trim a prefix for lookup
pub fn fold(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Two records claiming the same folded alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The folded alias
    pub synonym: String,
    /// Canonical prefix that claimed it first
    pub existing: String,
    /// Canonical prefix that claimed it second
    pub conflicting: String,
}

impl From<Collision> for RegistryError {
    fn from(c: Collision) -> Self {
        RegistryError::SynonymCollision {
            synonym: c.synonym,
            existing: c.existing,
            conflicting: c.conflicting,
        }
    }
}

/// Folded alias -> canonical prefix
///
/// Every canonical prefix, preferred prefix and synonym is registered under
/// its folded form. Each key maps to exactly one canonical prefix.
#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    map: HashMap<String, String>,
}

impl SynonymIndex {
    /// Build the index, failing on the first cross-record collision
    pub fn build<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Result<Self> {
        let mut first = None;
        let map = Self::scan(resources, |collision| {
            if first.is_none() {
                first = Some(collision);
            }
        });

        match first {
            Some(collision) => Err(collision.into()),
            None => Ok(Self { map }),
        }
    }

    /// Report every collision without building an index
    pub fn collisions<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Vec<Collision> {
        let mut found = Vec::new();
        Self::scan(resources, |collision| found.push(collision));
        found
    }

    fn scan<'a>(
        resources: impl IntoIterator<Item = &'a Resource>,
        mut on_collision: impl FnMut(Collision),
    ) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = HashMap::new();

        for resource in resources {
            let aliases = std::iter::once(resource.prefix.as_str())
                .chain(resource.preferred_prefix.as_deref())
                .chain(resource.synonyms.iter().map(|s| s.as_str()));

            for alias in aliases {
                let key = fold(alias);
                if key.is_empty() {
                    continue;
                }
                match map.get(&key) {
                    Some(existing) if *existing != resource.prefix => on_collision(Collision {
                        synonym: key,
                        existing: existing.clone(),
                        conflicting: resource.prefix.clone(),
                    }),
                    Some(_) => {}
                    None => {
                        map.insert(key, resource.prefix.clone());
                    }
                }
            }
        }

        map
    }

    /// Look up the canonical prefix for a raw alias
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.map.get(&fold(alias)).map(|s| s.as_str())
    }

    /// Look up an alias that is already folded
    pub(crate) fn get_folded(&self, folded: &str) -> Option<&str> {
        self.map.get(folded).map(|s| s.as_str())
    }

    /// All folded aliases registered for a canonical prefix
    pub fn aliases_of(&self, prefix: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .map
            .iter()
            .filter(|(_, canonical)| canonical.as_str() == prefix)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> Resource {
        Resource::new("ncbitaxon")
            .with_preferred_prefix("NCBITaxon")
            .with_synonym("taxonomy")
            .with_synonym("NCBI_Taxon_ID")
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("  NCBITaxon "), "ncbitaxon");
        assert_eq!(fold("GO"), "go");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let resources = vec![taxonomy()];
        let index = SynonymIndex::build(&resources).unwrap();

        assert_eq!(index.get("taxonomy"), Some("ncbitaxon"));
        assert_eq!(index.get("TAXONOMY"), Some("ncbitaxon"));
        assert_eq!(index.get("ncbi_taxon_id"), Some("ncbitaxon"));
        assert_eq!(index.get("NCBITaxon"), Some("ncbitaxon"));
        assert_eq!(index.get("unknown"), None);
    }

    #[test]
    fn test_self_overlap_is_not_a_collision() {
        // preferred prefix folds to the canonical prefix
        let resources = vec![Resource::new("go").with_preferred_prefix("GO").with_synonym("Go")];
        let index = SynonymIndex::build(&resources).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_cross_record_collision() {
        let resources = vec![
            taxonomy(),
            Resource::new("taxrank").with_synonym("Taxonomy"),
        ];

        let err = SynonymIndex::build(&resources).unwrap_err();
        match err {
            RegistryError::SynonymCollision {
                synonym,
                existing,
                conflicting,
            } => {
                assert_eq!(synonym, "taxonomy");
                assert_eq!(existing, "ncbitaxon");
                assert_eq!(conflicting, "taxrank");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_synonym_shadowing_canonical() {
        let resources = vec![Resource::new("pubmed"), Resource::new("pmid").with_synonym("PubMed")];
        assert_eq!(SynonymIndex::collisions(&resources).len(), 1);
    }

    #[test]
    fn test_aliases_of() {
        let resources = vec![taxonomy()];
        let index = SynonymIndex::build(&resources).unwrap();
        assert_eq!(
            index.aliases_of("ncbitaxon"),
            vec!["ncbi_taxon_id", "ncbitaxon", "taxonomy"]
        );
    }
}
