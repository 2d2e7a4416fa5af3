//! Resolver configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::source::{LinkSource, TieBreak, DEFAULT_PRIORITY, DEFAULT_TIE_BREAKS};

/// Ordering rules for IRI generation and disambiguation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Source order used by `get_iri` and as the last tie-break
    #[serde(default = "default_priority")]
    pub priority: Vec<LinkSource>,
    /// Tie-break rules applied in order when several IRI candidates survive
    #[serde(default = "default_tie_breaks")]
    pub tie_breaks: Vec<TieBreak>,
}

fn default_priority() -> Vec<LinkSource> {
    DEFAULT_PRIORITY.to_vec()
}

fn default_tie_breaks() -> Vec<TieBreak> {
    DEFAULT_TIE_BREAKS.to_vec()
}

impl ResolverConfig {
    /// Create a new configuration builder
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rank of a source in the priority list (lower is better)
    pub fn rank(&self, source: &LinkSource) -> usize {
        self.priority
            .iter()
            .position(|s| s == source)
            .unwrap_or(self.priority.len())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            tie_breaks: default_tie_breaks(),
        }
    }
}

/// Builder for ResolverConfig
#[derive(Debug, Default)]
pub struct ResolverConfigBuilder {
    priority: Option<Vec<LinkSource>>,
    tie_breaks: Option<Vec<TieBreak>>,
}

impl ResolverConfigBuilder {
    /// Set the source priority
    pub fn priority(mut self, priority: Vec<LinkSource>) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the priority from a comma-separated token list
    pub fn priority_tokens(self, tokens: &str) -> Self {
        self.priority(LinkSource::parse_list(tokens))
    }

    /// Set the tie-break order
    pub fn tie_breaks(mut self, tie_breaks: Vec<TieBreak>) -> Self {
        self.tie_breaks = Some(tie_breaks);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ResolverConfig {
        ResolverConfig {
            priority: self.priority.unwrap_or_else(default_priority),
            tie_breaks: self.tie_breaks.unwrap_or_else(default_tie_breaks),
        }
    }
}
