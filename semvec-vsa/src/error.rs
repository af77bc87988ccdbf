//! Error types for semvec-vsa.

use thiserror::Error;

/// Result type alias for vector algebra operations.
pub type Result<T> = std::result::Result<T, VsaError>;

/// Errors that can occur during vector operations.
///
/// Both variants that involve two operands indicate an inconsistent
/// configuration rather than bad data: a single run never mixes
/// representations or dimensions.
#[derive(Debug, Error)]
pub enum VsaError {
    /// Dimension mismatch in vector operations.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// The representation does not define the requested operation.
    #[error("unsupported representation for {operation}: {kind}")]
    UnsupportedRepresentation {
        /// Operation that was attempted.
        operation: &'static str,
        /// Description of the offending representation(s).
        kind: String,
    },

    /// Vectors must have at least one dimension.
    #[error("invalid dimension: {0} (must be greater than zero)")]
    InvalidDimension(usize),

    /// Sparse elemental vectors cannot have more seeds than dimensions.
    #[error("seed length {seed_length} exceeds dimension {dimension}")]
    InvalidSeedLength {
        /// Requested number of non-zero entries.
        seed_length: usize,
        /// Vector dimension.
        dimension: usize,
    },
}
