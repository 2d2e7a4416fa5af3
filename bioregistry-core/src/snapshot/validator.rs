//! Snapshot Validator
//!
//! Lints a dataset before it is indexed:
//! - Prefix well-formedness and uniqueness
//! - Synonym collisions across records
//! - Pattern, example and URI template sanity
//! - Provider codes and relational edges

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use regex::Regex;

use crate::registry::{fold, SynonymIndex};
use crate::resolve::LinkSource;
use crate::uri::placeholder_count;

use super::record::{Dataset, Resource};

/// Validation result with detailed findings
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,

    /// Error-level issues that prevent indexing
    pub errors: Vec<ValidationIssue>,

    /// Warning-level issues that degrade resolution
    pub warnings: Vec<ValidationIssue>,

    /// Informational notes
    pub info: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
            warnings: vec![],
            info: vec![],
        }
    }

    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.is_valid = false;
        self.errors.push(issue);
    }

    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    pub fn add_info(&mut self, issue: ValidationIssue) {
        self.info.push(issue);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "{}: {} errors, {} warnings, {} info",
            if self.is_valid { "VALID" } else { "INVALID" },
            self.errors.len(),
            self.warnings.len(),
            self.info.len()
        )
    }

    /// Issues carrying a given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .chain(&self.info)
            .filter(move |issue| issue.code == code)
    }
}

/// A single validation issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Issue code
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Path to the problematic element (e.g., "go.providers[1].code")
    pub path: Option<String>,

    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            suggestion: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(path) = &self.path {
            write!(f, " (at {})", path)?;
        }
        Ok(())
    }
}

/// Dataset validator
pub struct SnapshotValidator {
    /// Whether to check for recommended practices
    check_recommendations: bool,
    /// Whether to compile patterns and match examples against them
    check_patterns: bool,
}

impl SnapshotValidator {
    pub fn new() -> Self {
        Self {
            check_recommendations: true,
            check_patterns: true,
        }
    }

    /// Disable recommendation checks
    pub fn skip_recommendations(mut self) -> Self {
        self.check_recommendations = false;
        self
    }

    /// Disable pattern compilation (W001, W002)
    pub fn skip_patterns(mut self) -> Self {
        self.check_patterns = false;
        self
    }

    /// Validate a dataset
    pub fn validate(&self, dataset: &Dataset) -> ValidationResult {
        let mut result = ValidationResult::valid();

        self.validate_prefixes(dataset, &mut result);
        self.validate_synonyms(dataset, &mut result);

        let known: BTreeSet<&str> = dataset.resources.iter().map(|r| r.prefix.as_str()).collect();
        for resource in &dataset.resources {
            if self.check_patterns {
                self.validate_pattern(resource, &mut result);
            }
            self.validate_templates(resource, &mut result);
            self.validate_providers(resource, &mut result);
            self.validate_edges(resource, &known, &mut result);

            if self.check_recommendations {
                self.check_recommendations(resource, &mut result);
            }
        }

        result
    }

    fn validate_prefixes(&self, dataset: &Dataset, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, resource) in dataset.resources.iter().enumerate() {
            let prefix = &resource.prefix;

            if prefix.is_empty() {
                result.add_error(
                    ValidationIssue::new("E001", "prefix cannot be empty")
                        .with_path(format!("resources[{}].prefix", i)),
                );
                continue;
            }

            if fold(prefix) != *prefix || prefix.contains(':') {
                result.add_error(
                    ValidationIssue::new(
                        "E002",
                        format!("prefix '{}' is not in canonical form", prefix),
                    )
                    .with_path(format!("{}.prefix", prefix))
                    .with_suggestion(format!(
                        "Use '{}' and move the original spelling to preferred_prefix",
                        fold(prefix).replace(':', "")
                    )),
                );
            }

            if !seen.insert(prefix.as_str()) {
                result.add_error(
                    ValidationIssue::new("E003", format!("Duplicate prefix: {}", prefix))
                        .with_path(format!("{}.prefix", prefix)),
                );
            }
        }
    }

    fn validate_synonyms(&self, dataset: &Dataset, result: &mut ValidationResult) {
        for collision in SynonymIndex::collisions(&dataset.resources) {
            result.add_error(
                ValidationIssue::new(
                    "E004",
                    format!(
                        "Synonym '{}' of '{}' is already claimed by '{}'",
                        collision.synonym, collision.conflicting, collision.existing
                    ),
                )
                .with_path(format!("{}.synonyms", collision.conflicting))
                .with_suggestion("Remove the synonym from one of the two records"),
            );
        }
    }

    fn validate_pattern(&self, resource: &Resource, result: &mut ValidationResult) {
        let Some(pattern) = &resource.pattern else {
            return;
        };

        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                result.add_warning(
                    ValidationIssue::new(
                        "W001",
                        format!("Pattern for '{}' does not compile: {}", resource.prefix, e),
                    )
                    .with_path(format!("{}.pattern", resource.prefix)),
                );
                return;
            }
        };

        if let Some(example) = &resource.example {
            if !regex.is_match(example) {
                result.add_warning(
                    ValidationIssue::new(
                        "W002",
                        format!(
                            "Example '{}' does not match pattern {}",
                            example, pattern
                        ),
                    )
                    .with_path(format!("{}.example", resource.prefix)),
                );
            }
        }
    }

    fn validate_templates(&self, resource: &Resource, result: &mut ValidationResult) {
        let templates = [
            ("uri_format".to_string(), resource.uri_format.as_deref()),
            ("rdf_uri_format".to_string(), resource.rdf_uri_format.as_deref()),
        ]
        .into_iter()
        .chain(resource.providers.iter().enumerate().map(|(i, p)| {
            (format!("providers[{}].uri_format", i), Some(p.uri_format.as_str()))
        }));

        for (field, template) in templates {
            let Some(template) = template else {
                continue;
            };
            let count = placeholder_count(template);
            if count != 1 {
                result.add_warning(
                    ValidationIssue::new(
                        "W003",
                        format!(
                            "URI template '{}' has {} placeholders, expected exactly one $1",
                            template, count
                        ),
                    )
                    .with_path(format!("{}.{}", resource.prefix, field))
                    .with_suggestion("Use a single $1 where the local identifier goes"),
                );
            }
        }
    }

    fn validate_providers(&self, resource: &Resource, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, provider) in resource.providers.iter().enumerate() {
            let path = format!("{}.providers[{}].code", resource.prefix, i);

            if !seen.insert(provider.code.as_str()) {
                result.add_warning(
                    ValidationIssue::new(
                        "W004",
                        format!("Duplicate provider code: {}", provider.code),
                    )
                    .with_path(&path),
                );
            }

            if LinkSource::from_token(&provider.code).is_reserved() {
                result.add_warning(
                    ValidationIssue::new(
                        "W005",
                        format!(
                            "Provider code '{}' is a reserved metaprefix and is never consulted",
                            provider.code
                        ),
                    )
                    .with_path(&path)
                    .with_suggestion("Rename the provider"),
                );
            }
        }
    }

    fn validate_edges(
        &self,
        resource: &Resource,
        known: &BTreeSet<&str>,
        result: &mut ValidationResult,
    ) {
        let edges = [
            ("part_of", &resource.part_of),
            ("provides", &resource.provides),
            ("has_canonical", &resource.has_canonical),
        ];

        for (field, target) in edges {
            let Some(target) = target else {
                continue;
            };
            if !known.contains(target.as_str()) {
                result.add_warning(
                    ValidationIssue::new(
                        "W006",
                        format!("{} points at unknown prefix '{}'", field, target),
                    )
                    .with_path(format!("{}.{}", resource.prefix, field)),
                );
            }
        }
    }

    fn check_recommendations(&self, resource: &Resource, result: &mut ValidationResult) {
        if resource.pattern.is_some() && resource.example.is_none() {
            result.add_info(
                ValidationIssue::new(
                    "I001",
                    format!("'{}' has a pattern but no example", resource.prefix),
                )
                .with_path(format!("{}.example", resource.prefix)),
            );
        }

        if resource.uri_format.is_none() && resource.providers.is_empty() {
            result.add_info(
                ValidationIssue::new(
                    "I002",
                    format!("'{}' has no first-party URI format", resource.prefix),
                )
                .with_path(format!("{}.uri_format", resource.prefix)),
            );
        }
    }
}

impl Default for SnapshotValidator {
    fn default() -> Self {
        Self::new()
    }
}
