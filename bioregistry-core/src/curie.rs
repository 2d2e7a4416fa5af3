//! CURIE Codec
//!
//! Parses `prefix:identifier` strings against the registry and renders
//! references back out, optionally with the preferred prefix and banana.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::registry::RegistryStore;
use crate::snapshot::Resource;

/// A normalized `(prefix, identifier)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    /// Canonical prefix
    pub prefix: String,
    /// Local identifier without banana
    pub identifier: String,
}

impl Reference {
    pub fn new(prefix: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            identifier: identifier.into(),
        }
    }

    /// Render as `prefix:identifier`
    pub fn curie(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.identifier)
    }
}

/// How a reference is rendered back into a CURIE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurieStyle {
    /// Use the stylized preferred prefix when one is set
    #[serde(default)]
    pub use_preferred: bool,
    /// Re-attach the banana to the identifier
    #[serde(default)]
    pub embed_banana: bool,
}

impl CurieStyle {
    /// Lowercase canonical prefix, no banana
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Preferred prefix, no banana
    pub fn preferred() -> Self {
        Self {
            use_preferred: true,
            embed_banana: false,
        }
    }

    pub fn with_banana(mut self) -> Self {
        self.embed_banana = true;
        self
    }
}

/// Remove one leading `banana + peel` from an identifier
pub fn strip_banana<'a>(resource: &Resource, identifier: &'a str) -> &'a str {
    match resource.banana_token() {
        Some(token) => identifier.strip_prefix(token.as_str()).unwrap_or(identifier),
        None => identifier,
    }
}

/// CURIE parser and renderer over a registry store
#[derive(Debug, Clone, Copy)]
pub struct CurieCodec<'a> {
    store: &'a RegistryStore,
}

impl<'a> CurieCodec<'a> {
    pub fn new(store: &'a RegistryStore) -> Self {
        Self { store }
    }

    /// Parse a CURIE, reporting why it failed
    pub fn try_parse(&self, curie: &str) -> Result<Reference, LookupError> {
        let malformed = || LookupError::MalformedCurie {
            curie: curie.to_string(),
        };

        let (prefix, identifier) = curie.trim().split_once(':').ok_or_else(malformed)?;
        if prefix.trim().is_empty() || identifier.is_empty() {
            return Err(malformed());
        }

        let resource = self
            .store
            .get(prefix)
            .ok_or_else(|| LookupError::UnknownPrefix {
                prefix: prefix.to_string(),
            })?;

        let identifier = strip_banana(resource, identifier);
        if identifier.is_empty() {
            return Err(malformed());
        }

        Ok(Reference::new(resource.prefix.as_str(), identifier))
    }

    /// Parse a CURIE into its canonical prefix and bare identifier
    pub fn parse(&self, curie: &str) -> Option<Reference> {
        self.try_parse(curie).ok()
    }

    /// Parse and re-render in canonical form
    pub fn normalize(&self, curie: &str) -> Option<String> {
        self.parse(curie).map(|reference| reference.to_string())
    }

    /// Parse and re-render with the preferred prefix
    pub fn standardize(&self, curie: &str) -> Option<String> {
        let reference = self.parse(curie)?;
        self.render(&reference.prefix, &reference.identifier, CurieStyle::preferred())
    }

    /// Render a prefix and identifier in the given style
    ///
    /// The prefix is normalized first; an identifier that already carries
    /// the banana is not given a second one.
    pub fn render(&self, prefix: &str, identifier: &str, style: CurieStyle) -> Option<String> {
        let resource = self.store.get(prefix)?;
        let identifier = strip_banana(resource, identifier);

        let display = match (&resource.preferred_prefix, style.use_preferred) {
            (Some(preferred), true) => preferred.as_str(),
            _ => resource.prefix.as_str(),
        };

        match (resource.banana_token(), style.embed_banana) {
            (Some(token), true) => Some(format!("{}:{}{}", display, token, identifier)),
            _ => Some(format!("{}:{}", display, identifier)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Dataset;

    fn store() -> RegistryStore {
        RegistryStore::load(Dataset::new(vec![
            Resource::new("go").with_banana("GO").with_preferred_prefix("GO"),
            Resource::new("ncbitaxon")
                .with_preferred_prefix("NCBITaxon")
                .with_synonym("taxonomy"),
            Resource::new("doi"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_parse_with_synonym() {
        let store = store();
        let codec = CurieCodec::new(&store);
        assert_eq!(
            codec.parse("taxonomy:9606"),
            Some(Reference::new("ncbitaxon", "9606"))
        );
        assert_eq!(
            codec.parse("NCBITaxon:9606"),
            Some(Reference::new("ncbitaxon", "9606"))
        );
    }

    #[test]
    fn test_banana_stripped_once() {
        let store = store();
        let codec = CurieCodec::new(&store);
        assert_eq!(codec.normalize("GO:GO:0006915").as_deref(), Some("go:0006915"));
        assert_eq!(codec.normalize("GO:0006915").as_deref(), Some("go:0006915"));
        assert_eq!(
            codec.normalize("go:GO:GO:0006915").as_deref(),
            Some("go:GO:0006915")
        );
    }

    #[test]
    fn test_identifier_keeps_later_colons() {
        let store = store();
        let codec = CurieCodec::new(&store);
        assert_eq!(
            codec.parse("doi:10.1000/a:b"),
            Some(Reference::new("doi", "10.1000/a:b"))
        );
    }

    #[test]
    fn test_try_parse_errors() {
        let store = store();
        let codec = CurieCodec::new(&store);

        assert!(matches!(
            codec.try_parse("nocolon"),
            Err(LookupError::MalformedCurie { .. })
        ));
        assert!(matches!(
            codec.try_parse(":123"),
            Err(LookupError::MalformedCurie { .. })
        ));
        assert!(matches!(
            codec.try_parse("go:"),
            Err(LookupError::MalformedCurie { .. })
        ));
        assert!(matches!(
            codec.try_parse("go:GO:"),
            Err(LookupError::MalformedCurie { .. })
        ));
        assert_eq!(
            codec.try_parse("nope:1"),
            Err(LookupError::UnknownPrefix {
                prefix: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_render_styles() {
        let store = store();
        let codec = CurieCodec::new(&store);

        assert_eq!(
            codec.render("GO", "0006915", CurieStyle::canonical()).as_deref(),
            Some("go:0006915")
        );
        assert_eq!(
            codec
                .render("go", "GO:0006915", CurieStyle::preferred().with_banana())
                .as_deref(),
            Some("GO:GO:0006915")
        );
        assert_eq!(
            codec.standardize("taxonomy:9606").as_deref(),
            Some("NCBITaxon:9606")
        );
        assert!(codec.render("nope", "1", CurieStyle::canonical()).is_none());
    }
}
