//! The representation-polymorphic vector.
//!
//! [`Vector`] is a closed enum over the supported representations. Every
//! two-operand method checks that both sides share a kind and a dimension
//! and reports a [`VsaError`] otherwise, then forwards to the
//! representation's [`VectorOps`] implementation.

use serde::{Deserialize, Serialize};

use crate::binary::BinaryVector;
use crate::complex::ComplexVector;
use crate::error::{Result, VsaError};
use crate::kind::VectorKind;
use crate::ops::VectorOps;
use crate::real::RealVector;

/// A hypervector of one of the supported representations.
///
/// # Examples
///
/// ```
/// use semvec_vsa::{Vector, VectorKind};
///
/// let mut acc = Vector::zero(VectorKind::Real, 4)?;
/// assert!(acc.is_zero());
///
/// let v = Vector::from_real(vec![1.0, 0.0, 0.0, 0.0]);
/// acc.superpose(&v, 2.0)?;
/// acc.normalize();
/// assert!((acc.overlap(&v)? - 1.0).abs() < 1e-6);
/// # Ok::<(), semvec_vsa::VsaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vector {
    /// Dense real coordinates.
    Real(RealVector),
    /// Dense complex coordinates.
    Complex(ComplexVector),
    /// Packed bits.
    Binary(BinaryVector),
}

impl Vector {
    /// Additive identity for superposition.
    ///
    /// # Errors
    ///
    /// Returns [`VsaError::InvalidDimension`] if `dimension` is zero.
    pub fn zero(kind: VectorKind, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(VsaError::InvalidDimension(dimension));
        }
        Ok(match kind {
            VectorKind::Real => Vector::Real(RealVector::zero(dimension)),
            VectorKind::Complex => Vector::Complex(ComplexVector::zero(dimension)),
            VectorKind::Binary => Vector::Binary(BinaryVector::zero(dimension)),
        })
    }

    /// Wrap real coordinates.
    #[must_use]
    pub fn from_real(coords: Vec<f32>) -> Self {
        Vector::Real(RealVector::from_coords(coords))
    }

    /// The representation kind.
    #[must_use]
    pub fn kind(&self) -> VectorKind {
        match self {
            Vector::Real(_) => VectorKind::Real,
            Vector::Complex(_) => VectorKind::Complex,
            Vector::Binary(_) => VectorKind::Binary,
        }
    }

    /// Number of logical dimensions.
    #[must_use]
    pub fn dimension(&self) -> usize {
        match self {
            Vector::Real(v) => v.dimension(),
            Vector::Complex(v) => v.dimension(),
            Vector::Binary(v) => v.dimension(),
        }
    }

    /// `self += weight * other`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operands differ in kind or dimension.
    pub fn superpose(&mut self, other: &Vector, weight: f32) -> Result<()> {
        check_dimensions(self.dimension(), other.dimension())?;
        match (self, other) {
            (Vector::Real(a), Vector::Real(b)) => a.superpose(b, weight),
            (Vector::Complex(a), Vector::Complex(b)) => a.superpose(b, weight),
            (Vector::Binary(a), Vector::Binary(b)) => a.superpose(b, weight),
            (a, b) => return Err(mismatch("superpose", a.kind(), b.kind())),
        }
        Ok(())
    }

    /// Bind `self` with `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operands differ in kind or dimension.
    pub fn bind(&self, other: &Vector) -> Result<Vector> {
        check_dimensions(self.dimension(), other.dimension())?;
        Ok(match (self, other) {
            (Vector::Real(a), Vector::Real(b)) => Vector::Real(a.bind(b)),
            (Vector::Complex(a), Vector::Complex(b)) => Vector::Complex(a.bind(b)),
            (Vector::Binary(a), Vector::Binary(b)) => Vector::Binary(a.bind(b)),
            (a, b) => return Err(mismatch("bind", a.kind(), b.kind())),
        })
    }

    /// Undo a binding with `key`: `a.bind(b)?.release(a)? ~ b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operands differ in kind or dimension.
    pub fn release(&self, key: &Vector) -> Result<Vector> {
        check_dimensions(self.dimension(), key.dimension())?;
        Ok(match (self, key) {
            (Vector::Real(a), Vector::Real(k)) => Vector::Real(a.release(k)),
            (Vector::Complex(a), Vector::Complex(k)) => Vector::Complex(a.release(k)),
            (Vector::Binary(a), Vector::Binary(k)) => Vector::Binary(a.release(k)),
            (a, k) => return Err(mismatch("release", a.kind(), k.kind())),
        })
    }

    /// Rescale to canonical magnitude. Idempotent; zero stays zero.
    pub fn normalize(&mut self) {
        match self {
            Vector::Real(v) => v.normalize(),
            Vector::Complex(v) => v.normalize(),
            Vector::Binary(v) => v.normalize(),
        }
    }

    /// Similarity in `[-1, 1]`; zero vectors overlap nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the operands differ in kind or dimension.
    pub fn overlap(&self, other: &Vector) -> Result<f32> {
        check_dimensions(self.dimension(), other.dimension())?;
        match (self, other) {
            (Vector::Real(a), Vector::Real(b)) => Ok(a.overlap(b)),
            (Vector::Complex(a), Vector::Complex(b)) => Ok(a.overlap(b)),
            (Vector::Binary(a), Vector::Binary(b)) => Ok(a.overlap(b)),
            (a, b) => Err(mismatch("overlap", a.kind(), b.kind())),
        }
    }

    /// True iff no superposition has ever contributed signal.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Vector::Real(v) => v.is_zero(),
            Vector::Complex(v) => v.is_zero(),
            Vector::Binary(v) => v.is_zero(),
        }
    }

    /// Independent duplicate.
    #[must_use]
    pub fn copy(&self) -> Vector {
        self.clone()
    }

    /// Borrow as a real vector.
    #[must_use]
    pub fn as_real(&self) -> Option<&RealVector> {
        match self {
            Vector::Real(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a complex vector.
    #[must_use]
    pub fn as_complex(&self) -> Option<&ComplexVector> {
        match self {
            Vector::Complex(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a binary vector.
    #[must_use]
    pub fn as_binary(&self) -> Option<&BinaryVector> {
        match self {
            Vector::Binary(v) => Some(v),
            _ => None,
        }
    }
}

impl From<RealVector> for Vector {
    fn from(v: RealVector) -> Self {
        Vector::Real(v)
    }
}

impl From<ComplexVector> for Vector {
    fn from(v: ComplexVector) -> Self {
        Vector::Complex(v)
    }
}

impl From<BinaryVector> for Vector {
    fn from(v: BinaryVector) -> Self {
        Vector::Binary(v)
    }
}

fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(VsaError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

fn mismatch(operation: &'static str, left: VectorKind, right: VectorKind) -> VsaError {
    VsaError::UnsupportedRepresentation {
        operation,
        kind: format!("{left} x {right}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{seeded_rng, ElementalConfig};

    fn elemental(kind: VectorKind, dim: usize, seed: u64) -> Vector {
        ElementalConfig::new(kind, dim)
            .generate(&mut seeded_rng(seed))
            .unwrap()
    }

    #[test]
    fn test_zero_rejects_empty_dimension() {
        assert!(matches!(
            Vector::zero(VectorKind::Real, 0),
            Err(VsaError::InvalidDimension(0))
        ));
    }

    #[test]
    fn test_zero_for_every_kind() {
        for kind in [VectorKind::Real, VectorKind::Complex, VectorKind::Binary] {
            let v = Vector::zero(kind, 32).unwrap();
            assert!(v.is_zero());
            assert_eq!(v.kind(), kind);
            assert_eq!(v.dimension(), 32);
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut a = Vector::zero(VectorKind::Real, 8).unwrap();
        let b = Vector::zero(VectorKind::Real, 16).unwrap();
        assert!(matches!(
            a.superpose(&b, 1.0),
            Err(VsaError::DimensionMismatch {
                expected: 8,
                actual: 16
            })
        ));
        assert!(a.bind(&b).is_err());
        assert!(a.overlap(&b).is_err());
    }

    #[test]
    fn test_kind_mismatch_is_unsupported() {
        let a = Vector::zero(VectorKind::Real, 8).unwrap();
        let b = Vector::zero(VectorKind::Binary, 8).unwrap();
        let err = a.bind(&b).unwrap_err();
        assert!(matches!(err, VsaError::UnsupportedRepresentation { operation: "bind", .. }));
        assert!(err.to_string().contains("real x binary"));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = elemental(VectorKind::Real, 64, 1);
        let mut copy = original.copy();
        copy.superpose(&original, 1.0).unwrap();
        assert_ne!(copy, original);
        assert_eq!(original, elemental(VectorKind::Real, 64, 1));
    }

    #[test]
    fn test_release_round_trip_every_kind() {
        for kind in [VectorKind::Real, VectorKind::Complex, VectorKind::Binary] {
            let a = elemental(kind, 512, 10);
            let b = elemental(kind, 512, 20);
            let unrelated = elemental(kind, 512, 30);
            let recovered = a.bind(&b).unwrap().release(&a).unwrap();
            let signal = recovered.overlap(&b).unwrap();
            let noise = recovered.overlap(&unrelated).unwrap();
            assert!(signal > 0.1, "{kind}: signal {signal}");
            assert!(signal > noise, "{kind}: signal {signal} noise {noise}");
        }
    }

    #[test]
    fn test_superpose_order_independent() {
        for kind in [VectorKind::Real, VectorKind::Complex, VectorKind::Binary] {
            let vs: Vec<Vector> = (0..5).map(|s| elemental(kind, 128, s)).collect();
            let mut forward = Vector::zero(kind, 128).unwrap();
            let mut backward = Vector::zero(kind, 128).unwrap();
            for v in &vs {
                forward.superpose(v, 0.5).unwrap();
            }
            for v in vs.iter().rev() {
                backward.superpose(v, 0.5).unwrap();
            }
            forward.normalize();
            backward.normalize();
            assert!(forward.overlap(&backward).unwrap() > 0.9999, "{kind}");
        }
    }
}
