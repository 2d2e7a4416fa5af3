//! URI templates with a single `$1` placeholder

use std::borrow::Cow;

use crate::snapshot::PLACEHOLDER;

/// A URI template split around its placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    /// Literal text before `$1`
    pub prefix: String,
    /// Literal text after `$1` (usually empty)
    pub suffix: String,
}

impl UriTemplate {
    /// Split a template, requiring exactly one placeholder
    pub fn parse(template: &str) -> Option<Self> {
        let mut parts = template.split(PLACEHOLDER);
        let prefix = parts.next()?;
        let suffix = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Build a template from a bare URI prefix
    pub fn from_uri_prefix(uri_prefix: impl Into<String>) -> Self {
        Self {
            prefix: uri_prefix.into(),
            suffix: String::new(),
        }
    }

    /// Substitute the identifier into the placeholder
    pub fn expand(&self, identifier: &str) -> String {
        let mut uri = String::with_capacity(self.prefix.len() + identifier.len() + self.suffix.len());
        uri.push_str(&self.prefix);
        uri.push_str(identifier);
        uri.push_str(&self.suffix);
        uri
    }

    /// True when the placeholder is the last thing in the template
    pub fn is_prefix_only(&self) -> bool {
        self.suffix.is_empty()
    }
}

/// Count placeholders in a raw template
pub fn placeholder_count(template: &str) -> usize {
    template.matches(PLACEHOLDER).count()
}

/// Lowercase the scheme and rewrite `https` to `http` so both compare equal
///
/// Everything after `://` is left as written.
pub fn normalize_scheme(uri: &str) -> Cow<'_, str> {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return Cow::Borrowed(uri);
    };
    let is_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return Cow::Borrowed(uri);
    }

    if scheme.eq_ignore_ascii_case("https") {
        Cow::Owned(format!("http://{}", rest))
    } else if scheme.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(format!("{}://{}", scheme.to_ascii_lowercase(), rest))
    } else {
        Cow::Borrowed(uri)
    }
}
