//! Snapshot Loader
//!
//! Provides functionality to load a dataset snapshot from:
//! - JSON files
//! - In-memory JSON strings
//! - Well-known locations under a set of search paths

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, Result};

use super::record::Dataset;
use super::validator::SnapshotValidator;

/// File name looked up in each search path
pub const DEFAULT_FILE_NAME: &str = "bioregistry.json";

/// Snapshot loader for reading datasets from various sources
pub struct SnapshotLoader {
    /// Search paths for snapshot discovery
    search_paths: Vec<PathBuf>,

    /// Whether to lint on load
    validate_on_load: bool,
}

/// A loaded dataset with its source information
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// The dataset
    pub dataset: Dataset,

    /// Source path (if loaded from file)
    pub source_path: Option<PathBuf>,
}

impl SnapshotLoader {
    /// Create a new snapshot loader
    pub fn new() -> Self {
        Self {
            search_paths: vec![],
            validate_on_load: true,
        }
    }

    /// Add a search path for snapshot discovery
    pub fn with_search_path(mut self, path: PathBuf) -> Self {
        self.search_paths.push(path);
        self
    }

    /// Disable validation on load
    pub fn skip_validation(mut self) -> Self {
        self.validate_on_load = false;
        self
    }

    /// Load a snapshot from a JSON string
    pub fn load_from_json(&self, json: &str) -> Result<LoadedSnapshot> {
        let dataset = Dataset::from_json_str(json)?;
        self.check(&dataset)?;

        Ok(LoadedSnapshot {
            dataset,
            source_path: None,
        })
    }

    /// Load a snapshot from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<LoadedSnapshot> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| RegistryError::SnapshotLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let dataset =
            Dataset::from_json_str(&content).map_err(|e| RegistryError::SnapshotLoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        self.check(&dataset)?;

        tracing::debug!(
            "Loaded {} records from {}",
            dataset.len(),
            path.display()
        );

        Ok(LoadedSnapshot {
            dataset,
            source_path: Some(path.to_path_buf()),
        })
    }

    /// Discover snapshot files in search paths
    ///
    /// A search path may name a file directly or a directory containing
    /// `bioregistry.json`.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut found = vec![];

        for search_path in &self.search_paths {
            if search_path.is_file() {
                found.push(search_path.clone());
                continue;
            }

            let direct = search_path.join(DEFAULT_FILE_NAME);
            if direct.is_file() {
                found.push(direct);
            }
        }

        found
    }

    /// Load the first discovered snapshot
    pub fn load_discovered(&self) -> Result<LoadedSnapshot> {
        let paths = self.discover();
        let Some(path) = paths.first() else {
            return Err(RegistryError::SnapshotLoadError {
                path: self
                    .search_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                reason: format!("no {} found", DEFAULT_FILE_NAME),
            });
        };

        self.load_from_file(path)
    }

    /// Reload a snapshot from its source file
    pub fn reload(&self, loaded: &LoadedSnapshot) -> Result<LoadedSnapshot> {
        let source_path = loaded
            .source_path
            .as_ref()
            .ok_or_else(|| RegistryError::SnapshotLoadError {
                path: "<memory>".to_string(),
                reason: "No source path available for reload".to_string(),
            })?;

        self.load_from_file(source_path)
    }

    fn check(&self, dataset: &Dataset) -> Result<()> {
        if !self.validate_on_load {
            return Ok(());
        }

        let report = SnapshotValidator::new().validate(dataset);
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }
        if report.is_valid {
            Ok(())
        } else {
            Err(RegistryError::InvalidSnapshot {
                reason: report
                    .errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            })
        }
    }
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self::new()
    }
}
