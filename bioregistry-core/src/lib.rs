//! # Bioregistry Core - identifier normalization and URI resolution
//!
//! A registry of namespace metadata for life-science identifiers, and the
//! lookup engine built on top of it:
//!
//! - **Prefixes**: synonyms and casing variants collapse to one canonical prefix
//! - **CURIEs**: `prefix:identifier` parsing and rendering, including redundant
//!   namespace tokens embedded in identifiers ("bananas", as in `GO:GO:0006915`)
//! - **IRIs**: reverse lookup of arbitrary URIs through a prefix trie of every
//!   known URI template, with pattern validation and deterministic tie-breaking;
//!   forward rendering along a configurable provider priority list
//!
//! ## Example
//!
//! ```rust
//! use bioregistry_core::{Dataset, RegistryIndex, Reference};
//! use serde_json::json;
//!
//! let dataset = Dataset::from_value(json!({
//!     "chebi": {
//!         "preferred_prefix": "CHEBI",
//!         "pattern": "^\\d+$",
//!         "banana": "CHEBI",
//!         "uri_format": "https://www.ebi.ac.uk/chebi/searchId.do?chebiId=CHEBI:$1",
//!         "mappings": {"obofoundry": "CHEBI"}
//!     }
//! }))
//! .unwrap();
//! let index = RegistryIndex::from_dataset(dataset).unwrap();
//!
//! assert_eq!(index.normalize_prefix("ChEBI"), Some("chebi"));
//! assert_eq!(index.normalize_curie("CHEBI:CHEBI:24867").as_deref(), Some("chebi:24867"));
//!
//! let reference = index.parse_iri("http://purl.obolibrary.org/obo/CHEBI_24867", None);
//! assert_eq!(reference, Some(Reference::new("chebi", "24867")));
//!
//! assert_eq!(
//!     index.get_iri("chebi", "24867", None, None).as_deref(),
//!     Some("https://www.ebi.ac.uk/chebi/searchId.do?chebiId=CHEBI:24867")
//! );
//! ```

pub mod curie;
pub mod error;
pub mod handle;
pub mod index;
pub mod pattern;
pub mod registry;
pub mod resolve;
pub mod snapshot;
pub mod uri;

#[cfg(test)]
mod testing;

// Re-export main types
pub use curie::{CurieCodec, CurieStyle, Reference};
pub use error::{ErrorCategory, ErrorDetail, ErrorResponse, LookupError, RegistryError, Result};
pub use handle::RegistryHandle;
pub use index::{RegistryIndex, SnapshotInfo};
pub use pattern::{PatternStats, PatternValidator};
pub use registry::{RegistryStore, SynonymIndex};
pub use resolve::{
    IriResolution, LinkSource, PrefixOverrides, ProviderLinks, ResolverConfig, TieBreak,
};
pub use snapshot::{
    Dataset, LoadedSnapshot, Provider, Resource, SnapshotLoader, SnapshotValidator,
    ValidationIssue, ValidationResult,
};
pub use uri::{Candidate, ProviderIndex, UriTemplate};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
