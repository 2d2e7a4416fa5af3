//! Pattern Validator
//!
//! Holds the identifier pattern of every namespace and compiles each one the
//! first time it is needed. Compiled patterns live as long as the snapshot.
//! Concurrent first uses may race to compile; exactly one result is kept.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use regex::Regex;

use crate::snapshot::Resource;

/// Lazily compiled regular expression for one prefix
#[derive(Debug)]
struct PatternSlot {
    source: String,
    compiled: OnceLock<Option<Regex>>,
}

/// Per-prefix pattern cache
#[derive(Debug, Default)]
pub struct PatternValidator {
    slots: HashMap<String, PatternSlot>,
    compiled: AtomicU64,
    failed: AtomicU64,
}

/// Pattern cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternStats {
    /// Prefixes with a registered pattern
    pub registered: usize,
    /// Patterns compiled so far
    pub compiled: u64,
    /// Patterns that failed to compile
    pub failed: u64,
}

impl PatternValidator {
    /// Register the pattern of every record; nothing is compiled yet
    pub fn from_resources<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Self {
        let slots = resources
            .into_iter()
            .filter_map(|r| {
                r.pattern.as_ref().map(|pattern| {
                    (
                        r.prefix.clone(),
                        PatternSlot {
                            source: pattern.clone(),
                            compiled: OnceLock::new(),
                        },
                    )
                })
            })
            .collect();

        Self {
            slots,
            compiled: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Check an identifier against the pattern of a canonical prefix
    ///
    /// Returns `None` when the prefix has no usable pattern: the validator has
    /// no opinion, which is different from a failed match.
    pub fn validate(&self, prefix: &str, identifier: &str) -> Option<bool> {
        self.regex(prefix).map(|re| re.is_match(identifier))
    }

    /// Whether a pattern is registered for the prefix
    pub fn has_pattern(&self, prefix: &str) -> bool {
        self.slots.contains_key(prefix)
    }

    /// Raw pattern source for the prefix
    pub fn pattern(&self, prefix: &str) -> Option<&str> {
        self.slots.get(prefix).map(|slot| slot.source.as_str())
    }

    fn regex(&self, prefix: &str) -> Option<&Regex> {
        let slot = self.slots.get(prefix)?;
        slot.compiled
            .get_or_init(|| match Regex::new(&slot.source) {
                Ok(re) => {
                    self.compiled.fetch_add(1, Ordering::Relaxed);
                    Some(re)
                }
                Err(e) => {
                    self.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("Pattern for '{}' does not compile: {}", prefix, e);
                    None
                }
            })
            .as_ref()
    }

    /// Get cache statistics
    pub fn stats(&self) -> PatternStats {
        PatternStats {
            registered: self.slots.len(),
            compiled: self.compiled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
