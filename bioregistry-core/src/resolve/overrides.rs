//! Caller-supplied prefix overrides

use crate::registry::{fold, RegistryStore};
use crate::uri::{normalize_scheme, placeholder_count, UriTemplate};

/// Ordered `prefix -> URI prefix` pairs that take precedence over registry data
///
/// A value may also be a full template containing `$1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixOverrides {
    entries: Vec<(String, String)>,
}

/// An override that matched an IRI
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OverrideMatch<'a> {
    pub key: &'a str,
    pub identifier: String,
}

impl PrefixOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override, replacing any earlier one for the same prefix
    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        let uri = uri.into();
        let folded = fold(&prefix);
        match self.entries.iter_mut().find(|(k, _)| fold(k) == folded) {
            Some(entry) => entry.1 = uri,
            None => self.entries.push((prefix, uri)),
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.insert(prefix, uri);
        self
    }

    /// Parse a `prefix=uri` pair
    pub fn parse_pair(pair: &str) -> Option<(String, String)> {
        let (prefix, uri) = pair.split_once('=')?;
        let (prefix, uri) = (prefix.trim(), uri.trim());
        if prefix.is_empty() || uri.is_empty() {
            return None;
        }
        Some((prefix.to_string(), uri.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Template for a canonical prefix
    pub(crate) fn template_for(&self, canonical: &str, store: &RegistryStore) -> Option<UriTemplate> {
        self.entries
            .iter()
            .filter(|(key, _)| resolve_key(key, store) == canonical)
            .find_map(|(_, uri)| as_template(uri))
    }

    /// Longest override whose literal prefix starts the scheme-normalized IRI
    pub(crate) fn match_iri(&self, iri: &str) -> Option<OverrideMatch<'_>> {
        let iri = normalize_scheme(iri.trim());
        let mut best: Option<(usize, OverrideMatch<'_>)> = None;

        for (key, uri) in &self.entries {
            let Some(template) = as_template(uri) else {
                continue;
            };
            let literal = normalize_scheme(&template.prefix);
            if literal.is_empty() {
                continue;
            }
            let Some(rest) = iri.strip_prefix(&*literal) else {
                continue;
            };
            let Some(identifier) = rest.strip_suffix(template.suffix.as_str()) else {
                continue;
            };
            if identifier.is_empty() {
                continue;
            }

            let length = literal.chars().count();
            if best.as_ref().map_or(true, |(len, _)| length > *len) {
                best = Some((
                    length,
                    OverrideMatch {
                        key,
                        identifier: identifier.to_string(),
                    },
                ));
            }
        }

        best.map(|(_, found)| found)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PrefixOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (prefix, uri) in iter {
            overrides.insert(prefix, uri);
        }
        overrides
    }
}

/// Registry-normalized form of an override key, or its folded form
pub(crate) fn resolve_key(key: &str, store: &RegistryStore) -> String {
    store
        .normalize_prefix(key)
        .map(str::to_string)
        .unwrap_or_else(|| fold(key))
}

fn as_template(uri: &str) -> Option<UriTemplate> {
    match placeholder_count(uri) {
        0 => Some(UriTemplate::from_uri_prefix(uri)),
        _ => UriTemplate::parse(uri),
    }
}
