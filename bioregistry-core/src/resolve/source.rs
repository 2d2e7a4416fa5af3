//! Provider sources and tie-break rules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::snapshot::Resource;
use crate::uri::UriTemplate;

/// Base of every OBO Library PURL
pub const OBO_PURL_BASE: &str = "http://purl.obolibrary.org/obo/";

/// Default `get_iri` priority
pub const DEFAULT_PRIORITY: &[LinkSource] = &[
    LinkSource::Custom,
    LinkSource::Default,
    LinkSource::Miriam,
    LinkSource::Ols,
    LinkSource::OboFoundry,
    LinkSource::N2t,
    LinkSource::BioPortal,
];

/// Sources that can be derived for any record, in listing order
pub const BUILTIN_SOURCES: &[LinkSource] = &[
    LinkSource::Default,
    LinkSource::Rdf,
    LinkSource::Bioregistry,
    LinkSource::Miriam,
    LinkSource::Ols,
    LinkSource::OboFoundry,
    LinkSource::N2t,
    LinkSource::BioPortal,
];

/// Where a URI template comes from
///
/// Tokens in priority lists parse into these variants; anything that is not
/// a reserved metaprefix names one of the record's own providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkSource {
    /// Caller-supplied overrides
    Custom,
    /// The record's `uri_format`
    Default,
    /// The record's `rdf_uri_format`
    Rdf,
    /// bioregistry.io resolver
    Bioregistry,
    /// identifiers.org
    Miriam,
    /// Ontology Lookup Service
    Ols,
    /// OBO Library PURLs
    OboFoundry,
    /// Name-to-Thing
    N2t,
    /// BioPortal
    BioPortal,
    /// A provider listed on the record, by code
    Provider(String),
}

impl LinkSource {
    /// Parse a priority token
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "custom" => LinkSource::Custom,
            "default" => LinkSource::Default,
            "rdf" => LinkSource::Rdf,
            "bioregistry" => LinkSource::Bioregistry,
            "miriam" => LinkSource::Miriam,
            "ols" => LinkSource::Ols,
            "obofoundry" => LinkSource::OboFoundry,
            "n2t" => LinkSource::N2t,
            "bioportal" => LinkSource::BioPortal,
            _ => LinkSource::Provider(token.trim().to_string()),
        }
    }

    /// Parse a comma-separated priority list
    pub fn parse_list(tokens: &str) -> Vec<Self> {
        tokens
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Self::from_token)
            .collect()
    }

    /// The metaprefix naming this source
    pub fn metaprefix(&self) -> &str {
        match self {
            LinkSource::Custom => "custom",
            LinkSource::Default => "default",
            LinkSource::Rdf => "rdf",
            LinkSource::Bioregistry => "bioregistry",
            LinkSource::Miriam => "miriam",
            LinkSource::Ols => "ols",
            LinkSource::OboFoundry => "obofoundry",
            LinkSource::N2t => "n2t",
            LinkSource::BioPortal => "bioportal",
            LinkSource::Provider(code) => code,
        }
    }

    /// Whether this is a reserved metaprefix rather than a provider code
    pub fn is_reserved(&self) -> bool {
        !matches!(self, LinkSource::Provider(_))
    }

    /// Whether the template belongs to the record itself
    pub fn is_resource_level(&self) -> bool {
        matches!(self, LinkSource::Default | LinkSource::Rdf)
    }

    /// The raw URI template this source offers for a record
    ///
    /// `Custom` never yields a template here; overrides are held by the caller.
    pub fn uri_format(&self, resource: &Resource) -> Option<String> {
        match self {
            LinkSource::Custom => None,
            LinkSource::Default => resource.uri_format.clone(),
            LinkSource::Rdf => resource.rdf_uri_format.clone(),
            LinkSource::Bioregistry => {
                Some(format!("https://bioregistry.io/{}:$1", resource.prefix))
            }
            LinkSource::Miriam => resolver_format(resource, "miriam", "https://identifiers.org/"),
            LinkSource::N2t => resolver_format(resource, "n2t", "https://n2t.net/"),
            LinkSource::OboFoundry => obo_purl_format(resource),
            LinkSource::Ols => {
                let ols = resource.get_mapping("ols")?;
                let purl = obo_purl_format(resource)?;
                Some(format!(
                    "https://www.ebi.ac.uk/ols4/ontologies/{}/terms?iri={}",
                    ols, purl
                ))
            }
            LinkSource::BioPortal => {
                let bioportal = resource.get_mapping("bioportal")?;
                let purl = obo_purl_format(resource)?;
                Some(format!(
                    "https://bioportal.bioontology.org/ontologies/{}/?p=classes&conceptid={}",
                    bioportal, purl
                ))
            }
            LinkSource::Provider(code) => resource
                .get_provider(code)
                .map(|provider| provider.uri_format.clone()),
        }
    }

    /// The parsed template, if the source offers a well-formed one
    pub fn template(&self, resource: &Resource) -> Option<UriTemplate> {
        self.uri_format(resource)
            .and_then(|format| UriTemplate::parse(&format))
    }
}

/// Meta-resolvers (identifiers.org, n2t.net) expect the banana inside the
/// identifier, and otherwise address the namespace by their own prefix.
fn resolver_format(resource: &Resource, metaprefix: &str, base: &str) -> Option<String> {
    let mapped = resource.get_mapping(metaprefix)?;
    match resource.banana_token() {
        Some(token) => Some(format!("{}{}$1", base, token)),
        None => Some(format!("{}{}:$1", base, mapped)),
    }
}

fn obo_purl_format(resource: &Resource) -> Option<String> {
    resource
        .get_mapping("obofoundry")
        .map(|obo| format!("{}{}_$1", OBO_PURL_BASE, obo))
}

impl fmt::Display for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metaprefix())
    }
}

impl FromStr for LinkSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

impl From<String> for LinkSource {
    fn from(token: String) -> Self {
        Self::from_token(&token)
    }
}

impl From<LinkSource> for String {
    fn from(source: LinkSource) -> Self {
        source.metaprefix().to_string()
    }
}

/// One step of IRI disambiguation
///
/// Rules run in the configured order. Each keeps only the best-ranked
/// candidates under its own criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// `uri_format` / `rdf_uri_format` beat provider templates
    ResourceLevel,
    /// Longer literal URI prefixes beat shorter ones
    LongestPrefix,
    /// Earlier sources in the priority list win
    MetaprefixPriority,
    /// A matched pattern beats a record without a pattern
    ValidatedPattern,
}

/// Default tie-break order
pub const DEFAULT_TIE_BREAKS: &[TieBreak] = &[
    TieBreak::ResourceLevel,
    TieBreak::LongestPrefix,
    TieBreak::MetaprefixPriority,
    TieBreak::ValidatedPattern,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Provider;

    fn chebi() -> Resource {
        Resource::new("chebi")
            .with_banana("CHEBI")
            .with_uri_format("https://www.ebi.ac.uk/chebi/searchId.do?chebiId=CHEBI:$1")
            .with_mapping("miriam", "chebi")
            .with_mapping("obofoundry", "CHEBI")
            .with_mapping("ols", "chebi")
            .with_mapping("bioportal", "CHEBI")
            .with_provider(Provider::new("chebi-img", "https://www.ebi.ac.uk/chebi/displayImage.do?chebiId=$1"))
    }

    #[test]
    fn test_token_roundtrip() {
        for source in BUILTIN_SOURCES.iter().chain([&LinkSource::Custom]) {
            assert_eq!(&LinkSource::from_token(source.metaprefix()), source);
        }
        assert_eq!(LinkSource::from_token("OBOFoundry"), LinkSource::OboFoundry);
        assert_eq!(
            LinkSource::from_token("europepmc"),
            LinkSource::Provider("europepmc".to_string())
        );
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            LinkSource::parse_list("obofoundry, default,,custom"),
            vec![LinkSource::OboFoundry, LinkSource::Default, LinkSource::Custom]
        );
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&vec![LinkSource::Miriam, LinkSource::Provider("x".into())])
            .unwrap();
        assert_eq!(json, r#"["miriam","x"]"#);
        let parsed: Vec<LinkSource> = serde_json::from_str(r#"["OLS","default"]"#).unwrap();
        assert_eq!(parsed, vec![LinkSource::Ols, LinkSource::Default]);
    }

    #[test]
    fn test_derived_formats() {
        let chebi = chebi();
        assert_eq!(
            LinkSource::Miriam.uri_format(&chebi).as_deref(),
            Some("https://identifiers.org/CHEBI:$1")
        );
        assert_eq!(
            LinkSource::OboFoundry.uri_format(&chebi).as_deref(),
            Some("http://purl.obolibrary.org/obo/CHEBI_$1")
        );
        assert_eq!(
            LinkSource::Ols.uri_format(&chebi).as_deref(),
            Some("https://www.ebi.ac.uk/ols4/ontologies/chebi/terms?iri=http://purl.obolibrary.org/obo/CHEBI_$1")
        );
        assert_eq!(
            LinkSource::Bioregistry.uri_format(&chebi).as_deref(),
            Some("https://bioregistry.io/chebi:$1")
        );
        assert!(LinkSource::N2t.uri_format(&chebi).is_none());
        assert!(LinkSource::Rdf.uri_format(&chebi).is_none());
        assert!(LinkSource::Custom.uri_format(&chebi).is_none());
        assert!(LinkSource::Provider("chebi-img".into()).uri_format(&chebi).is_some());
    }

    #[test]
    fn test_miriam_without_banana() {
        let taxonomy = Resource::new("ncbitaxon").with_mapping("miriam", "taxonomy");
        assert_eq!(
            LinkSource::Miriam.uri_format(&taxonomy).as_deref(),
            Some("https://identifiers.org/taxonomy:$1")
        );
    }

    #[test]
    fn test_levels() {
        assert!(LinkSource::Default.is_resource_level());
        assert!(LinkSource::Rdf.is_resource_level());
        assert!(!LinkSource::Miriam.is_resource_level());
        assert!(!LinkSource::Provider("x".into()).is_reserved());
    }
}
