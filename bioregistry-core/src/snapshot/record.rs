//! Namespace records and the dataset that carries them

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RegistryError, Result};

/// Delimiter between a banana and the local identifier when none is given
pub const DEFAULT_BANANA_PEEL: &str = ":";

/// Placeholder token in every URI template
pub const PLACEHOLDER: &str = "$1";

/// One namespace in the registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Canonical prefix (lowercase, globally unique)
    #[serde(default)]
    pub prefix: String,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description of the namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Project homepage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Stylized prefix for display (e.g. "NCBITaxon")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_prefix: Option<String>,

    /// Alternate prefixes, matched case-insensitively
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,

    /// Regular expression for local identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Redundant namespace token embedded in local identifiers (e.g. "GO")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banana: Option<String>,

    /// Delimiter following the banana (default ":")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banana_peel: Option<String>,

    /// Example local identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    /// First-party URI template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri_format: Option<String>,

    /// URI template for semantic web (RDF) use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdf_uri_format: Option<String>,

    /// Additional resolvers, in curated order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Provider>,

    /// External registry prefixes keyed by metaprefix (e.g. "miriam" -> "taxonomy")
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, String>,

    /// Larger namespace this one belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<String>,

    /// Namespace whose identifiers this one resolves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<String>,

    /// Namespace that supersedes this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_canonical: Option<String>,

    /// Whether the namespace is no longer maintained
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

impl Resource {
    /// Create a record with only a canonical prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_preferred_prefix(mut self, preferred: impl Into<String>) -> Self {
        self.preferred_prefix = Some(preferred.into());
        self
    }

    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.push(synonym.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_banana(mut self, banana: impl Into<String>) -> Self {
        self.banana = Some(banana.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn with_uri_format(mut self, uri_format: impl Into<String>) -> Self {
        self.uri_format = Some(uri_format.into());
        self
    }

    pub fn with_rdf_uri_format(mut self, uri_format: impl Into<String>) -> Self {
        self.rdf_uri_format = Some(uri_format.into());
        self
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_mapping(mut self, metaprefix: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.mappings.insert(metaprefix.into(), prefix.into());
        self
    }

    /// Delimiter after the banana, falling back to ":"
    pub fn banana_peel(&self) -> &str {
        self.banana_peel.as_deref().unwrap_or(DEFAULT_BANANA_PEEL)
    }

    /// The full token embedded before local identifiers, e.g. "GO:"
    pub fn banana_token(&self) -> Option<String> {
        self.banana
            .as_deref()
            .map(|banana| format!("{}{}", banana, self.banana_peel()))
    }

    /// Get a provider by code
    pub fn get_provider(&self, code: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.code == code)
    }

    /// Get the external prefix registered under a metaprefix
    pub fn get_mapping(&self, metaprefix: &str) -> Option<&str> {
        self.mappings.get(metaprefix).map(|s| s.as_str())
    }
}

/// An alternative resolver for a namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Short code, used as a metaprefix in priority lists
    pub code: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Provider homepage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// URI template containing `$1`
    pub uri_format: String,
}

impl Provider {
    pub fn new(code: impl Into<String>, uri_format: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: None,
            homepage: None,
            uri_format: uri_format.into(),
        }
    }
}

/// A consensus snapshot of namespace records, as handed over by a loader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Records in input order
    pub resources: Vec<Resource>,
}

impl Dataset {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    /// Decode a dataset from JSON text
    ///
    /// Accepts either an object keyed by canonical prefix or an array of
    /// records carrying their own `prefix`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode a dataset from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let mut resources = Vec::with_capacity(map.len());
                for (key, record) in map {
                    let mut resource: Resource = serde_json::from_value(record)?;
                    if resource.prefix.is_empty() {
                        resource.prefix = key;
                    } else if resource.prefix != key {
                        return Err(RegistryError::InvalidSnapshot {
                            reason: format!(
                                "record keyed '{}' declares prefix '{}'",
                                key, resource.prefix
                            ),
                        });
                    }
                    resources.push(resource);
                }
                Ok(Self { resources })
            }
            Value::Array(_) => Ok(Self {
                resources: serde_json::from_value(value)?,
            }),
            other => Err(RegistryError::InvalidSnapshot {
                reason: format!("expected an object or array, got {}", json_kind(&other)),
            }),
        }
    }

    /// Encode as an object keyed by prefix
    pub fn to_value(&self) -> Value {
        let map = self
            .resources
            .iter()
            .map(|r| {
                let mut record = serde_json::to_value(r).unwrap_or(Value::Null);
                if let Value::Object(fields) = &mut record {
                    fields.remove("prefix");
                }
                (r.prefix.clone(), record)
            })
            .collect();
        Value::Object(map)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
