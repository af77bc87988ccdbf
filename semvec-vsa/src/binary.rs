//! Packed binary vectors with deferred-threshold superposition.
//!
//! Bits are packed into `u64` words. Superposition cannot be expressed on
//! bits directly, so the first call switches the vector into *voting* mode:
//! every dimension keeps a running `f32` tally, where a set bit in the
//! superposed operand votes `+weight` and a clear bit votes `-weight`.
//! [`VectorOps::normalize`] thresholds the tally back into bits (positive
//! tally sets the bit, ties clear it) and leaves voting mode.
//!
//! ```text
//! mode    | storage          | is_zero
//! --------+------------------+----------------------
//! bits    | words            | every word is 0
//! voting  | words + tallies  | every tally is 0.0
//! ```
//!
//! Binding and release are both XOR, so `release(bind(a, b), a) == b`
//! exactly.

use serde::{Deserialize, Serialize};

use crate::ops::VectorOps;

const WORD_BITS: usize = 64;

/// A packed binary hypervector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BinaryVectorData")]
pub struct BinaryVector {
    /// Bit storage, `dimension.div_ceil(64)` words, tail bits always clear.
    words: Vec<u64>,
    /// Number of logical dimensions.
    dimension: usize,
    /// Voting record while superposition is in progress.
    #[serde(skip)]
    votes: Option<Vec<f32>>,
}

/// Serialized form, checked before it becomes a [`BinaryVector`].
#[derive(Deserialize)]
struct BinaryVectorData {
    words: Vec<u64>,
    dimension: usize,
}

impl TryFrom<BinaryVectorData> for BinaryVector {
    type Error = String;

    fn try_from(data: BinaryVectorData) -> Result<Self, Self::Error> {
        let expected = data.dimension.div_ceil(WORD_BITS);
        if data.words.len() != expected {
            return Err(format!(
                "binary vector of dimension {} needs {expected} words, found {}",
                data.dimension,
                data.words.len()
            ));
        }
        Ok(Self::from_words(data.words, data.dimension))
    }
}

impl BinaryVector {
    /// Create an all-clear vector.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            words: vec![0; dimension.div_ceil(WORD_BITS)],
            dimension,
            votes: None,
        }
    }

    /// Create from raw words; tail bits beyond `dimension` are cleared.
    ///
    /// # Panics
    ///
    /// Panics if `words` has the wrong length for `dimension`.
    #[must_use]
    pub fn from_words(mut words: Vec<u64>, dimension: usize) -> Self {
        assert_eq!(
            words.len(),
            dimension.div_ceil(WORD_BITS),
            "word count does not match dimension"
        );
        mask_tail(&mut words, dimension);
        Self {
            words,
            dimension,
            votes: None,
        }
    }

    /// Parse a string of `0`/`1` characters.
    ///
    /// Returns `None` if any other character is present.
    #[must_use]
    pub fn from_bit_string(bits: &str) -> Option<Self> {
        let dimension = bits.chars().count();
        let mut vec = Self::new(dimension);
        for (i, ch) in bits.chars().enumerate() {
            match ch {
                '1' => vec.set(i, true),
                '0' => {}
                _ => return None,
            }
        }
        Some(vec)
    }

    /// Render as a string of `0`/`1` characters (thresholded if voting).
    #[must_use]
    pub fn to_bit_string(&self) -> String {
        let words = self.majority_words();
        (0..self.dimension)
            .map(|i| if bit(&words, i) { '1' } else { '0' })
            .collect()
    }

    /// Get the bit at a dimension (thresholded if voting).
    ///
    /// # Panics
    ///
    /// Panics if `dim >= dimension`.
    #[must_use]
    pub fn get(&self, dim: usize) -> bool {
        assert!(dim < self.dimension, "dimension out of bounds");
        match &self.votes {
            Some(votes) => votes[dim] > 0.0,
            None => bit(&self.words, dim),
        }
    }

    /// Set the bit at a dimension.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= dimension` or the vector is in voting mode.
    pub fn set(&mut self, dim: usize, value: bool) {
        assert!(dim < self.dimension, "dimension out of bounds");
        assert!(self.votes.is_none(), "cannot set bits while voting");
        let mask = 1u64 << (dim % WORD_BITS);
        if value {
            self.words[dim / WORD_BITS] |= mask;
        } else {
            self.words[dim / WORD_BITS] &= !mask;
        }
    }

    /// Borrow the packed words (stale while voting; normalize first).
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// True while an un-normalized voting record is held.
    #[must_use]
    pub fn is_voting(&self) -> bool {
        self.votes.is_some()
    }

    /// Number of set bits (thresholded if voting).
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.majority_words()
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum()
    }

    /// Number of dimensions on which the two vectors differ.
    ///
    /// # Panics
    ///
    /// Panics if vectors have different dimensions.
    #[must_use]
    pub fn hamming_distance(&self, other: &BinaryVector) -> usize {
        assert_eq!(self.dimension, other.dimension, "dimension mismatch");
        let a = self.majority_words();
        let b = other.majority_words();
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x ^ y).count_ones() as usize)
            .sum()
    }

    /// Bits as they would be after thresholding.
    fn majority_words(&self) -> std::borrow::Cow<'_, [u64]> {
        match &self.votes {
            None => std::borrow::Cow::Borrowed(&self.words),
            Some(votes) => std::borrow::Cow::Owned(threshold(votes, self.dimension)),
        }
    }

    /// Seed a voting record from the current bits.
    ///
    /// An all-clear vector carries no signal and starts from zero tallies;
    /// otherwise every existing bit counts as one vote.
    fn initial_votes(&self) -> Vec<f32> {
        if self.words.iter().all(|&w| w == 0) {
            return vec![0.0; self.dimension];
        }
        (0..self.dimension)
            .map(|i| if bit(&self.words, i) { 1.0 } else { -1.0 })
            .collect()
    }

    fn xor(&self, other: &BinaryVector) -> BinaryVector {
        assert_eq!(self.dimension, other.dimension, "dimension mismatch");
        let a = self.majority_words();
        let b = other.majority_words();
        BinaryVector {
            words: a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect(),
            dimension: self.dimension,
            votes: None,
        }
    }
}

impl VectorOps for BinaryVector {
    fn zero(dimension: usize) -> Self {
        Self::new(dimension)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn superpose(&mut self, other: &Self, weight: f32) {
        assert_eq!(self.dimension, other.dimension, "dimension mismatch");
        if other.is_zero() {
            return;
        }
        if self.votes.is_none() {
            let seeded = self.initial_votes();
            self.votes = Some(seeded);
        }
        let other_words = other.majority_words();
        if let Some(votes) = self.votes.as_mut() {
            for (i, vote) in votes.iter_mut().enumerate() {
                if bit(&other_words, i) {
                    *vote += weight;
                } else {
                    *vote -= weight;
                }
            }
        }
    }

    fn bind(&self, other: &Self) -> Self {
        self.xor(other)
    }

    fn release(&self, key: &Self) -> Self {
        self.xor(key)
    }

    fn normalize(&mut self) {
        if let Some(votes) = self.votes.take() {
            self.words = threshold(&votes, self.dimension);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn overlap(&self, other: &Self) -> f32 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        let distance = self.hamming_distance(other) as f32;
        1.0 - 2.0 * distance / self.dimension as f32
    }

    fn is_zero(&self) -> bool {
        match &self.votes {
            Some(votes) => votes.iter().all(|&v| v == 0.0),
            None => self.words.iter().all(|&w| w == 0),
        }
    }
}

fn bit(words: &[u64], dim: usize) -> bool {
    (words[dim / WORD_BITS] >> (dim % WORD_BITS)) & 1 == 1
}

fn threshold(votes: &[f32], dimension: usize) -> Vec<u64> {
    let mut words = vec![0u64; dimension.div_ceil(WORD_BITS)];
    for (i, &v) in votes.iter().enumerate() {
        if v > 0.0 {
            words[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
        }
    }
    words
}

fn mask_tail(words: &mut [u64], dimension: usize) {
    let used = dimension % WORD_BITS;
    if used != 0 {
        if let Some(last) = words.last_mut() {
            *last &= (1u64 << used) - 1;
        }
    }
}
