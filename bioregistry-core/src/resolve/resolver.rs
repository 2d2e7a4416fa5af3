//! IRI Resolver & Priority Engine
//!
//! Reverse direction (IRI -> reference):
//! 1. Caller overrides, longest literal prefix first
//! 2. Provider index lookup with pattern validation
//! 3. Configured tie-break rules, then dedup on `(prefix, identifier)`
//!
//! Forward direction (reference -> IRI) walks the priority list and expands
//! the first template a source offers.

use std::collections::BTreeMap;
use std::slice;

use crate::curie::{strip_banana, Reference};
use crate::error::LookupError;
use crate::pattern::PatternValidator;
use crate::registry::RegistryStore;
use crate::snapshot::{Provider, Resource};
use crate::uri::{Candidate, ProviderIndex, UriTemplate};

use super::config::ResolverConfig;
use super::overrides::{resolve_key, PrefixOverrides};
use super::source::{LinkSource, TieBreak, BUILTIN_SOURCES};

/// Outcome of reverse-resolving an IRI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IriResolution {
    /// Exactly one interpretation survived
    Resolved(Reference),
    /// Nothing matched
    Unresolved,
    /// Several distinct interpretations survived every tie-break
    Ambiguous(Vec<Candidate>),
}

impl IriResolution {
    /// The resolved reference, if any
    pub fn reference(&self) -> Option<&Reference> {
        match self {
            IriResolution::Resolved(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn into_reference(self) -> Option<Reference> {
        match self {
            IriResolution::Resolved(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, IriResolution::Ambiguous(_))
    }

    /// Describe an ambiguous result as a lookup error
    pub fn ambiguity(&self, iri: &str) -> Option<LookupError> {
        match self {
            IriResolution::Ambiguous(candidates) => Some(LookupError::AmbiguousIri {
                iri: iri.to_string(),
                candidates: candidates.iter().map(Candidate::curie).collect(),
            }),
            _ => None,
        }
    }
}

/// Query-time view over the indices of one snapshot
#[derive(Debug, Clone, Copy)]
pub struct IriResolver<'a> {
    store: &'a RegistryStore,
    providers: &'a ProviderIndex,
    patterns: &'a PatternValidator,
    config: &'a ResolverConfig,
}

impl<'a> IriResolver<'a> {
    pub fn new(
        store: &'a RegistryStore,
        providers: &'a ProviderIndex,
        patterns: &'a PatternValidator,
        config: &'a ResolverConfig,
    ) -> Self {
        Self {
            store,
            providers,
            patterns,
            config,
        }
    }

    /// Resolve an IRI, keeping ambiguity visible
    pub fn resolve(&self, iri: &str, overrides: Option<&PrefixOverrides>) -> IriResolution {
        if let Some(found) = overrides.and_then(|o| o.match_iri(iri)) {
            return IriResolution::Resolved(Reference::new(
                resolve_key(found.key, self.store),
                found.identifier,
            ));
        }

        let candidates = self.providers.lookup(iri, self.patterns);
        let mut survivors = break_ties(candidates, self.config);

        match survivors.len() {
            0 => IriResolution::Unresolved,
            1 => {
                let winner = survivors.remove(0);
                IriResolution::Resolved(Reference::new(winner.prefix, winner.identifier))
            }
            _ => IriResolution::Ambiguous(survivors),
        }
    }

    /// Parse an IRI into a reference; ambiguity is logged and yields `None`
    pub fn parse(&self, iri: &str, overrides: Option<&PrefixOverrides>) -> Option<Reference> {
        let resolution = self.resolve(iri, overrides);
        if let Some(error) = resolution.ambiguity(iri) {
            tracing::error!("{}", error);
        }
        resolution.into_reference()
    }

    /// Parse an IRI and render it as a CURIE
    pub fn curie_from_iri(&self, iri: &str, overrides: Option<&PrefixOverrides>) -> Option<String> {
        self.parse(iri, overrides).map(|reference| reference.to_string())
    }

    /// Render a reference as an IRI using the first source that has a template
    pub fn get_iri(
        &self,
        prefix: &str,
        identifier: &str,
        priority: Option<&[LinkSource]>,
        overrides: Option<&PrefixOverrides>,
    ) -> Option<String> {
        self.try_get_iri(prefix, identifier, priority, overrides).ok()
    }

    /// [`get_iri`](Self::get_iri), reporting why nothing was produced
    pub fn try_get_iri(
        &self,
        prefix: &str,
        identifier: &str,
        priority: Option<&[LinkSource]>,
        overrides: Option<&PrefixOverrides>,
    ) -> Result<String, LookupError> {
        let resource = self
            .store
            .get(prefix)
            .ok_or_else(|| LookupError::UnknownPrefix {
                prefix: prefix.to_string(),
            })?;
        let identifier = strip_banana(resource, identifier);
        if identifier.is_empty() {
            return Err(LookupError::MalformedCurie {
                curie: format!("{}:", prefix),
            });
        }

        let priority = priority.unwrap_or(&self.config.priority);
        let overrides = overrides.filter(|o| !o.is_empty());

        // without an explicit slot, overrides go first
        if !priority.contains(&LinkSource::Custom) {
            if let Some(template) = overrides.and_then(|o| o.template_for(&resource.prefix, self.store)) {
                return Ok(template.expand(identifier));
            }
        }

        for source in priority {
            let template = match source {
                LinkSource::Custom => {
                    overrides.and_then(|o| o.template_for(&resource.prefix, self.store))
                }
                _ => source.template(resource),
            };
            if let Some(template) = template {
                return Ok(template.expand(identifier));
            }
        }

        Err(LookupError::NoProviderAvailable {
            prefix: resource.prefix.clone(),
        })
    }

    /// Every resolvable endpoint for a reference, regardless of priority
    pub fn get_providers(&self, prefix: &str, identifier: &str) -> ProviderLinks<'a> {
        let resource = self.store.get(prefix);
        let identifier = resource
            .map(|r| strip_banana(r, identifier))
            .unwrap_or(identifier)
            .to_string();

        ProviderLinks {
            resource,
            identifier,
            builtin: BUILTIN_SOURCES.iter(),
            providers: resource.map(|r| r.providers.iter()).unwrap_or_default(),
        }
    }

    /// Canonical prefix -> URI prefix for every record that has one
    pub fn get_prefix_map(&self, priority: Option<&[LinkSource]>) -> BTreeMap<String, String> {
        let priority = priority.unwrap_or(&self.config.priority);

        self.store
            .resources()
            .filter_map(|resource| {
                priority
                    .iter()
                    .filter_map(|source| source.template(resource))
                    .find(UriTemplate::is_prefix_only)
                    .map(|template| (resource.prefix.clone(), template.prefix))
            })
            .collect()
    }
}

/// Narrow candidates with each tie-break rule, then drop duplicates
fn break_ties(mut candidates: Vec<Candidate>, config: &ResolverConfig) -> Vec<Candidate> {
    for rule in &config.tie_breaks {
        if distinct(&candidates) <= 1 {
            break;
        }
        let rank = |c: &Candidate| -> usize {
            match rule {
                TieBreak::ResourceLevel => usize::from(!c.source.is_resource_level()),
                TieBreak::LongestPrefix => usize::MAX - c.literal_len,
                TieBreak::ValidatedPattern => usize::from(c.validation != Some(true)),
                TieBreak::MetaprefixPriority => config.rank(&c.source),
            }
        };
        if let Some(best) = candidates.iter().map(rank).min() {
            candidates.retain(|c| rank(c) == best);
        }
    }

    let mut seen = Vec::new();
    candidates.retain(|c| {
        let key = (c.prefix.clone(), c.identifier.clone());
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
    candidates
}

fn distinct(candidates: &[Candidate]) -> usize {
    let mut keys: Vec<(&str, &str)> = candidates
        .iter()
        .map(|c| (c.prefix.as_str(), c.identifier.as_str()))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

/// Lazy `(metaprefix, url)` listing for one reference
///
/// Builtin sources come first in a fixed order, then the record's own
/// providers. Cloning restarts from the clone point.
#[derive(Debug, Clone)]
pub struct ProviderLinks<'a> {
    resource: Option<&'a Resource>,
    identifier: String,
    builtin: slice::Iter<'static, LinkSource>,
    providers: slice::Iter<'a, Provider>,
}

impl Iterator for ProviderLinks<'_> {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        let resource = self.resource?;

        for source in self.builtin.by_ref() {
            if let Some(template) = source.template(resource) {
                return Some((source.metaprefix().to_string(), template.expand(&self.identifier)));
            }
        }

        for provider in self.providers.by_ref() {
            if LinkSource::from_token(&provider.code).is_reserved() {
                continue;
            }
            if let Some(template) = UriTemplate::parse(&provider.uri_format) {
                return Some((provider.code.clone(), template.expand(&self.identifier)));
            }
        }

        None
    }
}
