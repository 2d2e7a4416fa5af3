//! Registry Handle - atomically swappable index
//!
//! Readers take an `Arc` snapshot with [`RegistryHandle::current`] and keep
//! it for as long as they need; a reload never mutates an index in place.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::Result;
use crate::index::RegistryIndex;
use crate::registry::RegistryStore;
use crate::snapshot::Dataset;

/// Shared owner of the current [`RegistryIndex`]
#[derive(Debug)]
pub struct RegistryHandle {
    current: ArcSwap<RegistryIndex>,
}

impl RegistryHandle {
    pub fn new(index: RegistryIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
        }
    }

    /// Snapshot of the index in effect now
    pub fn current(&self) -> Arc<RegistryIndex> {
        self.current.load_full()
    }

    /// Swap in a new index, returning the one it replaced
    pub fn replace(&self, index: RegistryIndex) -> Arc<RegistryIndex> {
        self.current.swap(Arc::new(index))
    }

    /// Rebuild from a dataset with the current configuration
    ///
    /// Returns `Ok(false)` and keeps the current index when the dataset has
    /// the same fingerprint. On error the current index stays in place.
    pub fn reload(&self, dataset: Dataset) -> Result<bool> {
        let current = self.current();

        let store = RegistryStore::load(dataset.clone())?;
        if store.fingerprint() == current.info().fingerprint {
            tracing::debug!("Dataset unchanged, skipping reload");
            return Ok(false);
        }

        let index = RegistryIndex::build(dataset, current.config().clone())?;
        tracing::info!(
            "Reloaded registry: {} -> {} resources",
            current.len(),
            index.len()
        );
        self.current.store(Arc::new(index));
        Ok(true)
    }
}

impl From<RegistryIndex> for RegistryHandle {
    fn from(index: RegistryIndex) -> Self {
        Self::new(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Resource;
    use crate::testing::sample_dataset;

    #[test]
    fn test_reload_skips_unchanged() {
        let handle = RegistryHandle::new(RegistryIndex::from_dataset(sample_dataset()).unwrap());
        let before = handle.current();

        assert!(!handle.reload(sample_dataset()).unwrap());
        assert!(Arc::ptr_eq(&before, &handle.current()));
    }

    #[test]
    fn test_reload_swaps_changed() {
        let handle = RegistryHandle::new(RegistryIndex::from_dataset(sample_dataset()).unwrap());
        let before = handle.current();

        let mut dataset = sample_dataset();
        dataset.resources.push(Resource::new("hgnc").with_pattern(r"^\d+$"));
        assert!(handle.reload(dataset).unwrap());

        let after = handle.current();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), before.len() + 1);
        assert!(before.normalize_prefix("hgnc").is_none());
        assert_eq!(after.normalize_prefix("HGNC"), Some("hgnc"));
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let handle = RegistryHandle::new(RegistryIndex::from_dataset(sample_dataset()).unwrap());
        let before = handle.current();

        let mut dataset = sample_dataset();
        dataset.resources.push(Resource::new("gene").with_synonym("pmid"));
        assert!(handle.reload(dataset).is_err());
        assert!(Arc::ptr_eq(&before, &handle.current()));
    }

    #[test]
    fn test_replace_returns_previous() {
        let handle: RegistryHandle = RegistryIndex::from_dataset(sample_dataset()).unwrap().into();
        let empty = RegistryIndex::from_dataset(Dataset::default()).unwrap();

        let previous = handle.replace(empty);
        assert!(!previous.is_empty());
        assert!(handle.current().is_empty());
    }
}
