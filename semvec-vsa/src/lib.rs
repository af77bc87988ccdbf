//! Vector Symbolic Architecture algebra for semantic-vector training.
//!
//! This crate provides the high-dimensional vector operations that the
//! predication trainer builds on: superposition, binding and its inverse,
//! normalization, exact zero detection and overlap. Three representations
//! are supported and are never mixed within one run.
//!
//! # Features
//!
//! - **Representations**: [`RealVector`] (dense `f32`), [`ComplexVector`]
//!   (unit phasors), [`BinaryVector`] (packed bits with voting)
//! - **Capability trait**: [`VectorOps`], implemented by each representation
//! - **Checked dispatch**: [`Vector`], which rejects mismatched kinds and
//!   dimensions with a [`VsaError`]
//! - **Deterministic generation**: [`ElementalConfig`] over a seeded
//!   `ChaCha8` stream
//!
//! # Quick Start
//!
//! ```rust
//! use semvec_vsa::{random, ElementalConfig, Vector, VectorKind};
//!
//! let config = ElementalConfig::new(VectorKind::Real, 512);
//! let mut rng = random::seeded_rng(42);
//!
//! let cat = config.generate(&mut rng)?;
//! let chase = config.generate(&mut rng)?;
//!
//! // Bind, then release to recover the bound partner.
//! let bound = chase.bind(&cat)?;
//! let recovered = bound.release(&chase)?;
//! assert!(recovered.overlap(&cat)? > 0.1);
//! # Ok::<(), semvec_vsa::VsaError>(())
//! ```
//!
//! # Representation summary
//!
//! ```text
//! kind    | superpose          | bind                 | normalize
//! --------+--------------------+----------------------+-------------------
//! real    | coordinate-wise    | circular convolution | unit L2 norm
//! complex | coordinate-wise    | element-wise product | unit L2 norm
//! binary  | weighted voting    | XOR                  | majority threshold
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)] // exact zero tests are part of the contract

mod binary;
mod complex;
mod error;
mod kind;
mod ops;
pub mod random;
mod real;
mod vector;

pub use binary::BinaryVector;
pub use complex::ComplexVector;
pub use error::{Result, VsaError};
pub use kind::VectorKind;
pub use ops::VectorOps;
pub use random::ElementalConfig;
pub use real::RealVector;
pub use vector::Vector;

pub use num_complex;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use semvec_vsa::prelude::*;
/// ```
pub mod prelude {
    pub use crate::random::{seeded_rng, term_rng, ElementalConfig, ElementalRng};
    pub use crate::{BinaryVector, ComplexVector, RealVector, Vector, VectorKind, VectorOps};
    pub use crate::{Result, VsaError};
}
