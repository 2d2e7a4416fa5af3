//! Snapshot module - the consensus dataset and how it is loaded
//!
//! A snapshot is the full set of namespace records the engine is built
//! from. It is deserialized from `bioregistry.json`, linted, and handed to
//! the registry store. Nothing here is consulted at query time.

mod loader;
mod record;
mod validator;

pub use loader::{LoadedSnapshot, SnapshotLoader, DEFAULT_FILE_NAME};
pub use record::{Dataset, Provider, Resource, DEFAULT_BANANA_PEEL, PLACEHOLDER};
pub use validator::{SnapshotValidator, ValidationIssue, ValidationResult};
