//! Dense complex-valued vectors.
//!
//! Elemental vectors are random unit phasors. Binding multiplies
//! coordinates (adding phases) and release multiplies by the conjugate of
//! the key (subtracting phases), which is exact when the key has unit
//! magnitude in every coordinate.

use num_complex::Complex32;
use serde::{Deserialize, Serialize};

use crate::ops::VectorOps;

/// A dense vector of complex coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexVector {
    coords: Vec<Complex32>,
}

impl ComplexVector {
    /// Wrap existing coordinates.
    #[must_use]
    pub fn from_coords(coords: Vec<Complex32>) -> Self {
        Self { coords }
    }

    /// Build from phase angles (radians), one unit phasor per coordinate.
    #[must_use]
    pub fn from_phases(phases: &[f32]) -> Self {
        Self {
            coords: phases.iter().map(|&p| Complex32::from_polar(1.0, p)).collect(),
        }
    }

    /// Borrow the coordinates.
    #[must_use]
    pub fn coords(&self) -> &[Complex32] {
        &self.coords
    }

    /// Euclidean norm over all coordinates, accumulated in `f64`.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.coords
            .iter()
            .map(|c| f64::from(c.norm_sqr()))
            .sum::<f64>()
            .sqrt()
    }

    /// Real part of the Hermitian inner product `sum a[i] * conj(b[i])`.
    fn real_inner(&self, other: &ComplexVector) -> f64 {
        assert_eq!(self.coords.len(), other.coords.len(), "dimension mismatch");
        self.coords
            .iter()
            .zip(&other.coords)
            .map(|(a, b)| f64::from(a.re) * f64::from(b.re) + f64::from(a.im) * f64::from(b.im))
            .sum()
    }
}

impl VectorOps for ComplexVector {
    fn zero(dimension: usize) -> Self {
        Self {
            coords: vec![Complex32::new(0.0, 0.0); dimension],
        }
    }

    fn dimension(&self) -> usize {
        self.coords.len()
    }

    fn superpose(&mut self, other: &Self, weight: f32) {
        assert_eq!(self.coords.len(), other.coords.len(), "dimension mismatch");
        for (acc, c) in self.coords.iter_mut().zip(&other.coords) {
            *acc += *c * weight;
        }
    }

    fn bind(&self, other: &Self) -> Self {
        assert_eq!(self.coords.len(), other.coords.len(), "dimension mismatch");
        Self {
            coords: self
                .coords
                .iter()
                .zip(&other.coords)
                .map(|(a, b)| *a * *b)
                .collect(),
        }
    }

    fn release(&self, key: &Self) -> Self {
        assert_eq!(self.coords.len(), key.coords.len(), "dimension mismatch");
        Self {
            coords: self
                .coords
                .iter()
                .zip(&key.coords)
                .map(|(c, k)| *c * k.conj())
                .collect(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn normalize(&mut self) {
        let norm = self.norm();
        if norm == 0.0 || (norm - 1.0).abs() <= f64::from(f32::EPSILON) {
            return;
        }
        let scale = (1.0 / norm) as f32;
        for c in &mut self.coords {
            *c *= scale;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn overlap(&self, other: &Self) -> f32 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        (self.real_inner(other) / denom).clamp(-1.0, 1.0) as f32
    }

    fn is_zero(&self) -> bool {
        self.coords.iter().all(|c| c.re == 0.0 && c.im == 0.0)
    }
}
