//! Registry Index - the immutable bundle every query runs against
//!
//! Built once from a dataset: the record store, the synonym index, the
//! pattern cache and the provider trie, plus the resolver configuration
//! they were built for. Shared read-only between threads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::curie::{CurieCodec, CurieStyle, Reference};
use crate::error::{LookupError, Result};
use crate::pattern::{PatternStats, PatternValidator};
use crate::registry::RegistryStore;
use crate::resolve::{IriResolution, IriResolver, LinkSource, PrefixOverrides, ProviderLinks, ResolverConfig};
use crate::snapshot::{Dataset, Resource, SnapshotValidator};
use crate::uri::ProviderIndex;

/// Facts about the snapshot an index was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    /// SHA-256 over the records in canonical order
    pub fingerprint: String,
    /// Number of records
    pub resource_count: usize,
    /// Number of folded aliases
    pub synonym_count: usize,
    /// Number of URI templates in the provider index
    pub template_count: usize,
    /// When the index was built
    pub built_at: DateTime<Utc>,
}

/// Immutable index bundle
#[derive(Debug)]
pub struct RegistryIndex {
    store: RegistryStore,
    patterns: PatternValidator,
    providers: ProviderIndex,
    config: ResolverConfig,
    info: SnapshotInfo,
}

impl RegistryIndex {
    /// Build with the default configuration
    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        Self::build(dataset, ResolverConfig::default())
    }

    /// Build every derived index from a dataset
    pub fn build(dataset: Dataset, config: ResolverConfig) -> Result<Self> {
        // patterns are compiled lazily by the index, not here
        let report = SnapshotValidator::new()
            .skip_recommendations()
            .skip_patterns()
            .validate(&dataset);
        if !report.warnings.is_empty() {
            tracing::warn!("Dataset has {} warnings", report.warnings.len());
        }

        let store = RegistryStore::load(dataset)?;
        let patterns = PatternValidator::from_resources(store.resources());
        let providers = ProviderIndex::build(&store);

        let info = SnapshotInfo {
            fingerprint: store.fingerprint(),
            resource_count: store.len(),
            synonym_count: store.synonyms().len(),
            template_count: providers.len(),
            built_at: Utc::now(),
        };

        tracing::info!(
            "Registry index built: {} resources, {} synonyms, {} URI templates",
            info.resource_count,
            info.synonym_count,
            info.template_count
        );

        Ok(Self {
            store,
            patterns,
            providers,
            config,
            info,
        })
    }

    pub fn info(&self) -> &SnapshotInfo {
        &self.info
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// All records in canonical order
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.store.resources()
    }

    /// Pattern cache statistics
    pub fn pattern_stats(&self) -> PatternStats {
        self.patterns.stats()
    }

    /// CURIE codec over this index
    pub fn codec(&self) -> CurieCodec<'_> {
        CurieCodec::new(&self.store)
    }

    /// IRI resolver over this index
    pub fn resolver(&self) -> IriResolver<'_> {
        IriResolver::new(&self.store, &self.providers, &self.patterns, &self.config)
    }

    // Prefixes

    /// Map any known prefix, synonym or casing variant to its canonical prefix
    pub fn normalize_prefix(&self, prefix: &str) -> Option<&str> {
        self.store.normalize_prefix(prefix)
    }

    pub fn get_resource(&self, prefix: &str) -> Option<&Resource> {
        self.store.get(prefix)
    }

    pub fn get_preferred_prefix(&self, prefix: &str) -> Option<&str> {
        self.get_resource(prefix)?.preferred_prefix.as_deref()
    }

    pub fn get_name(&self, prefix: &str) -> Option<&str> {
        self.get_resource(prefix)?.name.as_deref()
    }

    pub fn get_example(&self, prefix: &str) -> Option<&str> {
        self.get_resource(prefix)?.example.as_deref()
    }

    pub fn get_pattern(&self, prefix: &str) -> Option<&str> {
        self.get_resource(prefix)?.pattern.as_deref()
    }

    pub fn get_banana(&self, prefix: &str) -> Option<&str> {
        self.get_resource(prefix)?.banana.as_deref()
    }

    /// `None` for an unknown prefix
    pub fn is_deprecated(&self, prefix: &str) -> Option<bool> {
        self.get_resource(prefix).map(|r| r.deprecated)
    }

    // Identifiers

    /// Check an identifier against the pattern of a (normalized) prefix
    pub fn validate(&self, prefix: &str, identifier: &str) -> Option<bool> {
        let canonical = self.normalize_prefix(prefix)?;
        self.patterns.validate(canonical, identifier)
    }

    /// Like [`validate`](Self::validate), after stripping one banana
    pub fn is_valid_identifier(&self, prefix: &str, identifier: &str) -> Option<bool> {
        let resource = self.get_resource(prefix)?;
        let identifier = crate::curie::strip_banana(resource, identifier);
        self.patterns.validate(&resource.prefix, identifier)
    }

    // CURIEs

    pub fn parse_curie(&self, curie: &str) -> Option<Reference> {
        self.codec().parse(curie)
    }

    pub fn try_parse_curie(&self, curie: &str) -> std::result::Result<Reference, LookupError> {
        self.codec().try_parse(curie)
    }

    pub fn normalize_curie(&self, curie: &str) -> Option<String> {
        self.codec().normalize(curie)
    }

    pub fn standardize_curie(&self, curie: &str) -> Option<String> {
        self.codec().standardize(curie)
    }

    pub fn render_curie(&self, prefix: &str, identifier: &str, style: CurieStyle) -> Option<String> {
        self.codec().render(prefix, identifier, style)
    }

    // IRIs

    pub fn resolve_iri(&self, iri: &str, overrides: Option<&PrefixOverrides>) -> IriResolution {
        self.resolver().resolve(iri, overrides)
    }

    pub fn parse_iri(&self, iri: &str, overrides: Option<&PrefixOverrides>) -> Option<Reference> {
        self.resolver().parse(iri, overrides)
    }

    pub fn curie_from_iri(&self, iri: &str, overrides: Option<&PrefixOverrides>) -> Option<String> {
        self.resolver().curie_from_iri(iri, overrides)
    }

    pub fn get_iri(
        &self,
        prefix: &str,
        identifier: &str,
        priority: Option<&[LinkSource]>,
        overrides: Option<&PrefixOverrides>,
    ) -> Option<String> {
        self.resolver().get_iri(prefix, identifier, priority, overrides)
    }

    pub fn try_get_iri(
        &self,
        prefix: &str,
        identifier: &str,
        priority: Option<&[LinkSource]>,
        overrides: Option<&PrefixOverrides>,
    ) -> std::result::Result<String, LookupError> {
        self.resolver().try_get_iri(prefix, identifier, priority, overrides)
    }

    pub fn get_providers(&self, prefix: &str, identifier: &str) -> ProviderLinks<'_> {
        self.resolver().get_providers(prefix, identifier)
    }

    pub fn get_prefix_map(&self, priority: Option<&[LinkSource]>) -> BTreeMap<String, String> {
        self.resolver().get_prefix_map(priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_dataset;

    #[test]
    fn test_build_info() {
        let index = RegistryIndex::from_dataset(sample_dataset()).unwrap();
        let info = index.info();
        assert_eq!(info.resource_count, index.len());
        assert_eq!(info.fingerprint.len(), 64);
        assert!(info.synonym_count >= info.resource_count);
        assert!(info.template_count > 0);
    }

    #[test]
    fn test_accessors() {
        let index = RegistryIndex::from_dataset(sample_dataset()).unwrap();
        assert_eq!(index.get_preferred_prefix("taxonomy"), Some("NCBITaxon"));
        assert_eq!(index.get_name("GO"), Some("Gene Ontology"));
        assert_eq!(index.get_example("chebi"), Some("24867"));
        assert_eq!(index.get_banana("go"), Some("GO"));
        assert_eq!(index.get_pattern("pmid"), Some(r"^\d+$"));
        assert_eq!(index.is_deprecated("go"), Some(false));
        assert_eq!(index.is_deprecated("nope"), None);
    }

    #[test]
    fn test_validate_identifiers() {
        let index = RegistryIndex::from_dataset(sample_dataset()).unwrap();
        assert_eq!(index.validate("GO", "0006915"), Some(true));
        assert_eq!(index.validate("GO", "GO:0006915"), Some(false));
        assert_eq!(index.is_valid_identifier("GO", "GO:0006915"), Some(true));
        assert_eq!(index.validate("uniprot", "P12345"), None);
        assert_eq!(index.validate("nope", "1"), None);
        assert_eq!(index.pattern_stats().compiled, 1);
    }

    #[test]
    fn test_build_compiles_no_patterns() {
        let mut dataset = sample_dataset();
        dataset
            .resources
            .push(Resource::new("broken").with_pattern("^(\\d+$"));
        let index = RegistryIndex::from_dataset(dataset).unwrap();

        let stats = index.pattern_stats();
        assert!(stats.registered > 0);
        assert_eq!(stats.compiled, 0);
        assert_eq!(stats.failed, 0);

        assert_eq!(index.validate("broken", "1"), None);
        assert_eq!(index.pattern_stats().failed, 1);
    }

    #[test]
    fn test_index_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RegistryIndex>();
    }
}
