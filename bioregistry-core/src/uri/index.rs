//! URI Provider Index implementation

use crate::pattern::PatternValidator;
use crate::registry::RegistryStore;
use crate::resolve::{LinkSource, BUILTIN_SOURCES};
use crate::snapshot::Resource;

use super::template::{normalize_scheme, UriTemplate};
use super::trie::UriTrie;

/// A URI template attached to the trie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    /// Canonical prefix of the owning record
    pub prefix: String,
    /// Source of the template
    pub source: LinkSource,
    /// Literal text before the placeholder, as written
    pub uri_prefix: String,
    /// Literal text after the placeholder
    pub uri_suffix: String,
    /// Banana token to peel from the remainder (e.g. "GO:")
    pub banana: Option<String>,
}

/// An IRI interpretation that survived pattern validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Canonical prefix
    pub prefix: String,
    /// Local identifier, banana removed
    pub identifier: String,
    /// Source whose template matched
    pub source: LinkSource,
    /// Literal prefix that matched
    pub uri_prefix: String,
    /// Character length of the scheme-normalized literal prefix
    pub literal_len: usize,
    /// `Some(true)` when the pattern matched, `None` when there is no pattern
    pub validation: Option<bool>,
}

impl Candidate {
    pub fn curie(&self) -> String {
        format!("{}:{}", self.prefix, self.identifier)
    }
}

/// Reverse index from URI literal prefixes to namespaces
#[derive(Debug, Clone, Default)]
pub struct ProviderIndex {
    trie: UriTrie<ProviderEntry>,
    skipped: usize,
}

impl ProviderIndex {
    /// Insert every template of every record
    pub fn build(store: &RegistryStore) -> Self {
        let mut index = Self::default();

        for resource in store.resources() {
            for source in BUILTIN_SOURCES {
                index.insert(resource, source.clone());
            }
            for provider in &resource.providers {
                let source = LinkSource::from_token(&provider.code);
                if source.is_reserved() {
                    // shadowed by a builtin metaprefix of the same name
                    index.skipped += 1;
                    continue;
                }
                index.insert(resource, source);
            }
        }

        tracing::debug!(
            "Provider index built: {} templates, {} skipped",
            index.trie.len(),
            index.skipped
        );
        index
    }

    fn insert(&mut self, resource: &Resource, source: LinkSource) {
        let Some(format) = source.uri_format(resource) else {
            return;
        };
        let Some(template) = UriTemplate::parse(&format) else {
            tracing::debug!(
                "Skipping {} template for '{}': expected exactly one $1 in {}",
                source,
                resource.prefix,
                format
            );
            self.skipped += 1;
            return;
        };
        if template.prefix.is_empty() {
            tracing::debug!(
                "Skipping {} template for '{}': no literal prefix",
                source,
                resource.prefix
            );
            self.skipped += 1;
            return;
        }

        let key = normalize_scheme(&template.prefix).into_owned();
        self.trie.insert(
            &key,
            ProviderEntry {
                prefix: resource.prefix.clone(),
                source,
                uri_prefix: template.prefix,
                uri_suffix: template.suffix,
                banana: resource.banana_token(),
            },
        );
    }

    /// Every interpretation of `uri` whose identifier is not rejected by its pattern
    ///
    /// Candidates come back ordered from the shortest literal prefix to the
    /// longest, in insertion order within one prefix.
    pub fn lookup(&self, uri: &str, patterns: &PatternValidator) -> Vec<Candidate> {
        let normalized = normalize_scheme(uri.trim());
        let mut candidates = Vec::new();

        for found in self.trie.prefixes_of(&normalized) {
            let remainder = &normalized[found.end..];
            let literal_len = normalized[..found.end].chars().count();

            for entry in found.values {
                let Some(identifier) = peel(remainder, entry) else {
                    continue;
                };
                let validation = patterns.validate(&entry.prefix, identifier);
                if validation == Some(false) {
                    continue;
                }
                candidates.push(Candidate {
                    prefix: entry.prefix.clone(),
                    identifier: identifier.to_string(),
                    source: entry.source.clone(),
                    uri_prefix: entry.uri_prefix.clone(),
                    literal_len,
                    validation,
                });
            }
        }

        candidates
    }

    /// Number of indexed templates
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Number of templates left out of the index
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Entries stored under an exact literal prefix
    pub fn entries_for(&self, uri_prefix: &str) -> &[ProviderEntry] {
        self.trie.get(&normalize_scheme(uri_prefix))
    }
}

/// Strip the trailing literal and one banana; `None` if nothing is left
fn peel<'a>(remainder: &'a str, entry: &ProviderEntry) -> Option<&'a str> {
    let mut identifier = remainder.strip_suffix(entry.uri_suffix.as_str())?;
    if let Some(token) = &entry.banana {
        if let Some(stripped) = identifier.strip_prefix(token.as_str()) {
            identifier = stripped;
        }
    }
    (!identifier.is_empty()).then_some(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Dataset, Provider};

    fn build(resources: Vec<Resource>) -> (ProviderIndex, PatternValidator) {
        let store = RegistryStore::load(Dataset::new(resources)).unwrap();
        let patterns = PatternValidator::from_resources(store.resources());
        (ProviderIndex::build(&store), patterns)
    }

    #[test]
    fn test_shared_root_disambiguated_by_pattern() {
        let (index, patterns) = build(vec![
            Resource::new("alpha")
                .with_pattern(r"^A\d+$")
                .with_uri_format("http://example.org/$1"),
            Resource::new("beta")
                .with_pattern(r"^B\d+$")
                .with_uri_format("http://example.org/$1"),
        ]);

        assert_eq!(index.entries_for("http://example.org/").len(), 2);

        let a = index.lookup("http://example.org/A123", &patterns);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].prefix, "alpha");
        assert_eq!(a[0].identifier, "A123");

        let b = index.lookup("http://example.org/B123", &patterns);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].prefix, "beta");

        assert!(index.lookup("http://example.org/C123", &patterns).is_empty());
    }

    #[test]
    fn test_obo_purl_lookup() {
        let (index, patterns) = build(vec![
            Resource::new("chebi")
                .with_pattern(r"^\d+$")
                .with_banana("CHEBI")
                .with_mapping("obofoundry", "CHEBI"),
            Resource::new("go")
                .with_pattern(r"^\d{7}$")
                .with_banana("GO")
                .with_mapping("obofoundry", "GO"),
        ]);

        let found = index.lookup("http://purl.obolibrary.org/obo/CHEBI_24867", &patterns);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].prefix, "chebi");
        assert_eq!(found[0].identifier, "24867");
        assert_eq!(found[0].source, LinkSource::OboFoundry);
        assert_eq!(found[0].validation, Some(true));
    }

    #[test]
    fn test_banana_peeled_from_remainder() {
        let (index, patterns) = build(vec![Resource::new("go")
            .with_pattern(r"^\d{7}$")
            .with_banana("GO")
            .with_uri_format("http://amigo.geneontology.org/amigo/term/$1")]);

        let found = index.lookup(
            "http://amigo.geneontology.org/amigo/term/GO:0006915",
            &patterns,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].identifier, "0006915");
    }

    #[test]
    fn test_scheme_equivalence() {
        let (index, patterns) = build(vec![Resource::new("pubmed")
            .with_pattern(r"^\d+$")
            .with_uri_format("https://www.ncbi.nlm.nih.gov/pubmed/$1")]);

        assert_eq!(
            index
                .lookup("http://www.ncbi.nlm.nih.gov/pubmed/123", &patterns)
                .len(),
            1
        );
        assert_eq!(
            index
                .lookup("https://www.ncbi.nlm.nih.gov/pubmed/123", &patterns)
                .len(),
            1
        );
    }

    #[test]
    fn test_weak_candidate_without_pattern() {
        let (index, patterns) =
            build(vec![Resource::new("free").with_uri_format("https://free.org/id/$1")]);
        let found = index.lookup("https://free.org/id/anything", &patterns);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].validation, None);
    }

    #[test]
    fn test_infix_template() {
        let (index, patterns) = build(vec![Resource::new("viewer")
            .with_pattern(r"^\d+$")
            .with_uri_format("https://viewer.org/$1/view")]);

        let found = index.lookup("https://viewer.org/42/view", &patterns);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].identifier, "42");
        assert!(index.lookup("https://viewer.org/42", &patterns).is_empty());
    }

    #[test]
    fn test_bad_templates_skipped() {
        let (index, _) = build(vec![Resource::new("bad")
            .with_uri_format("https://bad.org/")
            .with_rdf_uri_format("$1")
            .with_provider(Provider::new("twice", "https://bad.org/$1/$1"))
            .with_provider(Provider::new("miriam", "https://shadow.org/$1"))]);

        // only the bioregistry.io template survives
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 4);
    }

    #[test]
    fn test_empty_identifier_dropped() {
        let (index, patterns) =
            build(vec![Resource::new("free").with_uri_format("https://free.org/id/$1")]);
        assert!(index.lookup("https://free.org/id/", &patterns).is_empty());
    }
}
