//! Deterministic elemental-vector generation.
//!
//! All randomness flows through [`ChaCha8Rng`] so that a fixed seed and
//! dimension always yield the same vectors on every platform.

use std::f32::consts::TAU;

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use crate::binary::BinaryVector;
use crate::complex::ComplexVector;
use crate::error::{Result, VsaError};
use crate::kind::VectorKind;
use crate::real::RealVector;
use crate::vector::Vector;

/// Default number of non-zero entries in a sparse real elemental vector.
pub const DEFAULT_SEED_LENGTH: usize = 10;

/// Parameters for elemental-vector generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementalConfig {
    /// Representation to generate.
    pub kind: VectorKind,
    /// Vector dimension.
    pub dimension: usize,
    /// Non-zero entries for sparse real vectors (ignored by other kinds).
    pub seed_length: usize,
}

impl ElementalConfig {
    /// Create a configuration with the default seed length.
    #[must_use]
    pub fn new(kind: VectorKind, dimension: usize) -> Self {
        Self {
            kind,
            dimension,
            seed_length: DEFAULT_SEED_LENGTH.min(dimension),
        }
    }

    /// Set the seed length.
    #[must_use]
    pub const fn with_seed_length(mut self, seed_length: usize) -> Self {
        self.seed_length = seed_length;
        self
    }

    /// Check that vectors can be generated with these parameters.
    ///
    /// # Errors
    ///
    /// Returns [`VsaError::InvalidDimension`] for a zero dimension and
    /// [`VsaError::InvalidSeedLength`] when a real seed length exceeds the
    /// dimension.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(VsaError::InvalidDimension(0));
        }
        if self.kind == VectorKind::Real && self.seed_length > self.dimension {
            return Err(VsaError::InvalidSeedLength {
                seed_length: self.seed_length,
                dimension: self.dimension,
            });
        }
        Ok(())
    }

    /// Generate one elemental vector from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if [`ElementalConfig::validate`] fails.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vector> {
        self.validate()?;
        Ok(match self.kind {
            VectorKind::Real => Vector::Real(random_real_sparse(self.dimension, self.seed_length, rng)),
            VectorKind::Complex => Vector::Complex(random_complex(self.dimension, rng)),
            VectorKind::Binary => Vector::Binary(random_binary(self.dimension, rng)),
        })
    }
}

/// The generator behind every elemental vector.
pub type ElementalRng = ChaCha8Rng;

/// Create the generator used everywhere in this crate.
#[must_use]
pub fn seeded_rng(seed: u64) -> ElementalRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Create a generator seeded from a base seed and the term's text.
///
/// The SHA-256 digest of the base seed's little-endian bytes followed by
/// the term's UTF-8 bytes is the 32-byte ChaCha seed, so a term always
/// receives the same vector regardless of creation order.
#[must_use]
pub fn term_rng(base: u64, term: &str) -> ElementalRng {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(term.as_bytes());
    ChaCha8Rng::from_seed(hasher.finalize().into())
}

/// Sparse ternary real vector: `seed_length / 2` entries of `+1`, the rest
/// of the seeds `-1`, at distinct random positions.
///
/// # Panics
///
/// Panics if `seed_length > dimension`.
#[must_use]
pub fn random_real_sparse<R: Rng + ?Sized>(dimension: usize, seed_length: usize, rng: &mut R) -> RealVector {
    let mut coords = vec![0.0f32; dimension];
    let positions = index::sample(rng, dimension, seed_length);
    for (n, pos) in positions.iter().enumerate() {
        coords[pos] = if n < seed_length / 2 { 1.0 } else { -1.0 };
    }
    RealVector::from_coords(coords)
}

/// Dense complex vector of unit phasors with uniform random phase.
#[must_use]
pub fn random_complex<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> ComplexVector {
    let phases: Vec<f32> = (0..dimension).map(|_| rng.gen::<f32>() * TAU).collect();
    ComplexVector::from_phases(&phases)
}

/// Dense binary vector with each bit set with probability one half.
#[must_use]
pub fn random_binary<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> BinaryVector {
    let words: Vec<u64> = (0..dimension.div_ceil(64)).map(|_| rng.next_u64()).collect();
    BinaryVector::from_words(words, dimension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::VectorOps;

    #[test]
    fn test_same_seed_same_vector() {
        let config = ElementalConfig::new(VectorKind::Real, 200);
        let a = config.generate(&mut seeded_rng(42)).unwrap();
        let b = config.generate(&mut seeded_rng(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        for kind in [VectorKind::Real, VectorKind::Complex, VectorKind::Binary] {
            let config = ElementalConfig::new(kind, 200);
            let a = config.generate(&mut seeded_rng(1)).unwrap();
            let b = config.generate(&mut seeded_rng(2)).unwrap();
            assert_ne!(a, b, "{kind} vectors should depend on the seed");
        }
    }

    #[test]
    fn test_real_sparse_has_seed_length_entries() {
        let v = random_real_sparse(500, 10, &mut seeded_rng(3));
        assert_eq!(v.count_nonzero(), 10);
        let sum: f32 = v.coords().iter().sum();
        assert_eq!(sum, 0.0, "half +1 and half -1");
    }

    #[test]
    fn test_binary_roughly_balanced() {
        let v = random_binary(4096, &mut seeded_rng(4));
        let ones = v.count_ones();
        assert!(ones > 1800 && ones < 2300, "got {ones} set bits");
    }

    #[test]
    fn test_complex_unit_coordinates() {
        let v = random_complex(64, &mut seeded_rng(5));
        for c in v.coords() {
            assert!((c.norm() - 1.0).abs() < 1e-5);
        }
        assert_eq!(v.dimension(), 64);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(matches!(
            ElementalConfig::new(VectorKind::Real, 0).validate(),
            Err(VsaError::InvalidDimension(0))
        ));
        assert!(matches!(
            ElementalConfig::new(VectorKind::Real, 8).with_seed_length(9).validate(),
            Err(VsaError::InvalidSeedLength { .. })
        ));
        assert!(ElementalConfig::new(VectorKind::Binary, 8)
            .with_seed_length(9)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_term_rng_stable_and_distinct() {
        let config = ElementalConfig::new(VectorKind::Binary, 256);
        let draw = |base: u64, term: &str| config.generate(&mut term_rng(base, term)).unwrap();
        assert_eq!(draw(42, "cat"), draw(42, "cat"));
        assert_ne!(draw(42, "cat"), draw(42, "mouse"));
        assert_ne!(draw(1, "cat"), draw(2, "cat"));
    }

    #[test]
    fn test_term_rng_independent_of_stream_position() {
        let config = ElementalConfig::new(VectorKind::Real, 200);
        let mut shared = seeded_rng(7);
        let _ = config.generate(&mut shared).unwrap();
        let a = config.generate(&mut term_rng(7, "mouse")).unwrap();
        let b = config.generate(&mut term_rng(7, "mouse")).unwrap();
        assert_eq!(a, b);
    }
}
