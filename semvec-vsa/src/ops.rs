//! The capability interface shared by every representation.
//!
//! Each representation implements [`VectorOps`] over operands of its own
//! type. Methods on this trait assume both operands have the same
//! dimension and panic otherwise, the same contract as the low-level
//! bind/bundle functions. Checked, fallible dispatch lives on
//! [`crate::Vector`].
//!
//! # Laws
//!
//! ```text
//! superpose   commutative and associative up to rounding
//! bind        approximately dissimilar to both inputs
//! release     release(bind(a, b), a) ~ b
//! normalize   idempotent
//! is_zero     exact: true only if no signal was ever added
//! overlap     symmetric, bounded to [-1, 1]
//! ```

/// Algebra over one vector representation.
pub trait VectorOps: Clone + Sized {
    /// Additive identity of the given dimension.
    fn zero(dimension: usize) -> Self;

    /// Number of logical dimensions.
    fn dimension(&self) -> usize;

    /// `self += weight * other`.
    fn superpose(&mut self, other: &Self, weight: f32);

    /// Structure-preserving combination of `self` and `other`.
    #[must_use]
    fn bind(&self, other: &Self) -> Self;

    /// Approximate inverse of [`VectorOps::bind`]: `bind(a, b).release(a) ~ b`.
    #[must_use]
    fn release(&self, key: &Self) -> Self;

    /// Rescale to the canonical magnitude of the representation.
    fn normalize(&mut self);

    /// Similarity in `[-1, 1]`.
    fn overlap(&self, other: &Self) -> f32;

    /// True iff no superposition has contributed signal.
    fn is_zero(&self) -> bool;
}
