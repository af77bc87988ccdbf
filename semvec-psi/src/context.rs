//! Per-field context vectors.
//!
//! A context vector is the normalized, weighted superposition of the
//! elemental vectors of every admitted token in one field of one document.
//! Every token position contributes with the same positional weight; only
//! the term's global weight scales its contribution.

use semvec_vsa::{Vector, VectorKind};

use crate::elemental::ElementalVectorStore;
use crate::error::Result;
use crate::index::Field;
use crate::term_stats::TermStats;

/// Builds context vectors of a fixed kind and dimension.
#[derive(Debug, Clone, Copy)]
pub struct ContextVectorBuilder {
    kind: VectorKind,
    dimension: usize,
}

impl ContextVectorBuilder {
    /// Create a builder for vectors of `kind` and `dimension`.
    #[must_use]
    pub const fn new(kind: VectorKind, dimension: usize) -> Self {
        Self { kind, dimension }
    }

    /// Create a builder matching an elemental store.
    #[must_use]
    pub fn for_store(elementals: &ElementalVectorStore) -> Self {
        Self::new(elementals.kind(), elementals.dimension())
    }

    /// Build the context vector for `tokens` of `field`.
    ///
    /// Tokens without an elemental vector are skipped. The result is the
    /// zero vector when no token contributed.
    ///
    /// # Errors
    ///
    /// Returns an error if an elemental vector does not match the builder's
    /// kind or dimension.
    pub fn build<S: TermStats + ?Sized>(
        &self,
        elementals: &ElementalVectorStore,
        stats: &S,
        field: Field,
        tokens: &[String],
    ) -> Result<Vector> {
        let mut context = Vector::zero(self.kind, self.dimension)?;
        for token in tokens {
            let Some(elemental) = elementals.get(token) else {
                continue;
            };
            let weight = stats.global_weight(field, token);
            context.superpose(elemental, weight)?;
        }
        context.normalize();
        Ok(context)
    }
}
