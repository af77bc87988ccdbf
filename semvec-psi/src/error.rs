//! Error types for predication training.
//!
//! Skipped predications are not errors: they are counted in the
//! [`TrainingReport`](crate::TrainingReport) and logged.
//!
//! # Example
//!
//! ```rust
//! use semvec_psi::{PsiConfig, PsiError};
//!
//! let config = PsiConfig::default().with_dimension(0);
//! match config.validate() {
//!     Err(PsiError::InvalidConfig(msg)) => assert!(msg.contains("dimension")),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use thiserror::Error;

/// Result type alias for predication training operations.
pub type Result<T> = std::result::Result<T, PsiError>;

/// Errors that can occur while building, training or persisting vectors.
#[derive(Debug, Error)]
pub enum PsiError {
    /// A collaborator was set up inconsistently for a required field.
    #[error("configuration error for field '{field}': {reason}")]
    Configuration {
        /// Field that triggered the error.
        field: String,
        /// What went wrong.
        reason: String,
    },

    /// The index holds no terms at all for a field.
    #[error("no terms for field '{0}'")]
    NoTermsForField(String),

    /// An operation was attempted in a state that forbids it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Invalid configuration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed corpus input.
    #[error("corpus error at line {line}: {reason}")]
    Corpus {
        /// One-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// Malformed or incompatible vector store.
    #[error("vector store error: {0}")]
    VectorStore(String),

    /// Correlation could not be computed.
    #[error("correlation error: {0}")]
    Correlation(String),

    /// Vector algebra error.
    #[error("vector error: {0}")]
    Vsa(#[from] semvec_vsa::VsaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parse error.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}
