//! Error types for registry construction and lookups
//!
//! Two families of errors live here:
//! - [`RegistryError`]: hard failures while loading or building a snapshot.
//!   A snapshot that fails these checks is never served.
//! - [`LookupError`]: the per-call miss taxonomy. The public query functions
//!   return `Option` and never raise; the `try_*` variants expose *why* a
//!   lookup came back empty.
//!
//! # Error Codes
//!
//! Each variant has a stable, uppercase error code (e.g. `SYNONYM_COLLISION`)
//! suitable for logs, CLI output and API responses.
//!
//! # Example
//!
//! ```rust
//! use bioregistry_core::error::{ErrorCategory, RegistryError};
//!
//! let err = RegistryError::DuplicatePrefix { prefix: "go".to_string() };
//! assert_eq!(err.error_code(), "DUPLICATE_PREFIX");
//! assert_eq!(err.category(), ErrorCategory::Integrity);
//! assert!(err.is_fatal());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for registry construction
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Prefix or provider not known to the registry
    NotFound,
    /// Caller input is malformed
    Validation,
    /// The dataset is internally inconsistent
    Integrity,
    /// Reading or decoding the dataset failed
    External,
}

/// Errors raised while loading a dataset or building a [`RegistryIndex`](crate::RegistryIndex)
#[derive(Error, Debug)]
pub enum RegistryError {
    // ═══════════════════════════════════════════════════════════════════════
    // Integrity errors (the snapshot cannot be served consistently)
    // ═══════════════════════════════════════════════════════════════════════

    /// Two records share the same canonical prefix
    #[error("Duplicate canonical prefix: '{prefix}'. Each namespace must appear exactly once.")]
    DuplicatePrefix { prefix: String },

    /// A synonym (or preferred prefix) normalizes to more than one canonical prefix
    #[error("Synonym '{synonym}' maps to both '{existing}' and '{conflicting}'. Remove it from one of the records.")]
    SynonymCollision {
        synonym: String,
        existing: String,
        conflicting: String,
    },

    /// A canonical prefix is empty or not in case-folded, trimmed form
    #[error("Invalid canonical prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// The snapshot failed validation for another reason
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Infrastructure errors (reading and decoding)
    // ═══════════════════════════════════════════════════════════════════════

    /// Failed to load a snapshot from a file
    #[error("Failed to load snapshot from '{path}': {reason}")]
    SnapshotLoadError { path: String, reason: String },

    /// JSON deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("IO error: {message}")]
    Io { message: String },
}

impl RegistryError {
    /// Returns true if this error means the snapshot itself is defective
    ///
    /// Fatal errors are never retried with the same data; the dataset must
    /// be fixed upstream.
    pub fn is_fatal(&self) -> bool {
        matches!(self.category(), ErrorCategory::Integrity)
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistryError::DuplicatePrefix { .. }
            | RegistryError::SynonymCollision { .. }
            | RegistryError::InvalidPrefix { .. }
            | RegistryError::InvalidSnapshot { .. } => ErrorCategory::Integrity,

            RegistryError::SnapshotLoadError { .. }
            | RegistryError::Json(_)
            | RegistryError::Io { .. } => ErrorCategory::External,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            RegistryError::DuplicatePrefix { .. } => "DUPLICATE_PREFIX",
            RegistryError::SynonymCollision { .. } => "SYNONYM_COLLISION",
            RegistryError::InvalidPrefix { .. } => "INVALID_PREFIX",
            RegistryError::InvalidSnapshot { .. } => "INVALID_SNAPSHOT",
            RegistryError::SnapshotLoadError { .. } => "SNAPSHOT_LOAD_ERROR",
            RegistryError::Json(_) => "JSON_ERROR",
            RegistryError::Io { .. } => "IO_ERROR",
        }
    }

    /// Converts this error to a JSON-serializable response object
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
            },
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Io {
            message: err.to_string(),
        }
    }
}

/// Why a lookup produced no answer
///
/// Only [`LookupError::AmbiguousIri`] indicates a problem with the data; the
/// other variants are ordinary misses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No `:` separator, or an empty prefix or identifier half
    #[error("Malformed CURIE: '{curie}'. Expected 'prefix:identifier'.")]
    MalformedCurie { curie: String },

    /// The prefix is neither canonical nor a known synonym
    #[error("Unknown prefix: '{prefix}'")]
    UnknownPrefix { prefix: String },

    /// Every source in the priority list lacked a URI template for the prefix
    #[error("No provider available for '{prefix}' in the given priority list")]
    NoProviderAvailable { prefix: String },

    /// More than one candidate survived every tie-break rule
    #[error("Ambiguous IRI '{iri}': candidates {candidates:?}. The dataset has overlapping URI formats.")]
    AmbiguousIri { iri: String, candidates: Vec<String> },
}

impl LookupError {
    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::MalformedCurie { .. } => ErrorCategory::Validation,
            LookupError::UnknownPrefix { .. } | LookupError::NoProviderAvailable { .. } => {
                ErrorCategory::NotFound
            }
            LookupError::AmbiguousIri { .. } => ErrorCategory::Integrity,
        }
    }

    /// Returns the stable error code for this miss
    pub fn error_code(&self) -> &'static str {
        match self {
            LookupError::MalformedCurie { .. } => "MALFORMED_CURIE",
            LookupError::UnknownPrefix { .. } => "UNKNOWN_PREFIX",
            LookupError::NoProviderAvailable { .. } => "NO_PROVIDER_AVAILABLE",
            LookupError::AmbiguousIri { .. } => "AMBIGUOUS_IRI",
        }
    }

    /// Converts this miss to a JSON-serializable response object
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
            },
        }
    }
}

/// JSON-serializable error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail for JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g., "UNKNOWN_PREFIX")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category
    pub category: ErrorCategory,
}
