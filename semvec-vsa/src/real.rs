//! Dense real-valued vectors.
//!
//! Binding is circular convolution and release is circular correlation,
//! as in holographic reduced representations:
//!
//! ```text
//! bind(a, b)[k]    = sum_i a[i] * b[(k - i) mod D]
//! release(c, a)[j] = sum_i a[i] * c[(i + j) mod D]
//! ```
//!
//! Elemental vectors are sparse (a handful of +1/-1 seeds), so both loops
//! skip zero coordinates of `a`. Cost is `O(nnz(a) * D)`.

use serde::{Deserialize, Serialize};

use crate::ops::VectorOps;

/// A dense vector of `f32` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealVector {
    coords: Vec<f32>,
}

impl RealVector {
    /// Wrap existing coordinates.
    #[must_use]
    pub fn from_coords(coords: Vec<f32>) -> Self {
        Self { coords }
    }

    /// Borrow the coordinates.
    #[must_use]
    pub fn coords(&self) -> &[f32] {
        &self.coords
    }

    /// Euclidean norm, accumulated in `f64`.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.coords
            .iter()
            .map(|&c| f64::from(c) * f64::from(c))
            .sum::<f64>()
            .sqrt()
    }

    /// Inner product, accumulated in `f64`.
    ///
    /// # Panics
    ///
    /// Panics if vectors have different dimensions.
    #[must_use]
    pub fn dot(&self, other: &RealVector) -> f64 {
        assert_eq!(self.coords.len(), other.coords.len(), "dimension mismatch");
        self.coords
            .iter()
            .zip(&other.coords)
            .map(|(&a, &b)| f64::from(a) * f64::from(b))
            .sum()
    }

    /// Number of non-zero coordinates.
    #[must_use]
    pub fn count_nonzero(&self) -> usize {
        self.coords.iter().filter(|&&c| c != 0.0).count()
    }
}

impl VectorOps for RealVector {
    fn zero(dimension: usize) -> Self {
        Self {
            coords: vec![0.0; dimension],
        }
    }

    fn dimension(&self) -> usize {
        self.coords.len()
    }

    fn superpose(&mut self, other: &Self, weight: f32) {
        assert_eq!(self.coords.len(), other.coords.len(), "dimension mismatch");
        for (acc, &c) in self.coords.iter_mut().zip(&other.coords) {
            *acc += weight * c;
        }
    }

    fn bind(&self, other: &Self) -> Self {
        assert_eq!(self.coords.len(), other.coords.len(), "dimension mismatch");
        let dim = self.coords.len();
        let mut result = vec![0.0f32; dim];

        for (i, &a) in self.coords.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (j, &b) in other.coords.iter().enumerate() {
                result[(i + j) % dim] += a * b;
            }
        }

        Self { coords: result }
    }

    fn release(&self, key: &Self) -> Self {
        assert_eq!(self.coords.len(), key.coords.len(), "dimension mismatch");
        let dim = self.coords.len();
        let mut result = vec![0.0f32; dim];

        for (i, &a) in key.coords.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (j, out) in result.iter_mut().enumerate() {
                *out += a * self.coords[(i + j) % dim];
            }
        }

        Self { coords: result }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn normalize(&mut self) {
        let norm = self.norm();
        // Zero stays zero. Unit vectors are left as-is, keeping this idempotent.
        if norm == 0.0 || (norm - 1.0).abs() <= f64::from(f32::EPSILON) {
            return;
        }
        for c in &mut self.coords {
            *c = (f64::from(*c) / norm) as f32;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn overlap(&self, other: &Self) -> f32 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0) as f32
    }

    fn is_zero(&self) -> bool {
        self.coords.iter().all(|&c| c == 0.0)
    }
}
