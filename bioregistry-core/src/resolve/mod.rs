//! Resolve module - IRI parsing and generation
//!
//! [`LinkSource`] enumerates where URI templates come from. [`IriResolver`]
//! uses them in both directions: reverse lookup through the provider index
//! with tie-breaking, and forward rendering along a priority list.

mod config;
mod overrides;
mod resolver;
mod source;

pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use overrides::PrefixOverrides;
pub use resolver::{IriResolution, IriResolver, ProviderLinks};
pub use source::{
    LinkSource, TieBreak, BUILTIN_SOURCES, DEFAULT_PRIORITY, DEFAULT_TIE_BREAKS, OBO_PURL_BASE,
};
