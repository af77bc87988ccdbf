//! Semantic vector accumulators.
//!
//! The store is the sole owner of every accumulator. Entries are created as
//! zero vectors during vocabulary building, trained in place through
//! [`SemanticVectorStore::get_mut`], and normalized once by
//! [`SemanticVectorStore::finalize`]. After finalization the store is
//! read-only.

use std::collections::BTreeMap;

use semvec_vsa::{Vector, VectorKind};

use crate::error::{PsiError, Result};

/// Term to accumulator mapping with a terminal finalized state.
#[derive(Debug, Clone)]
pub struct SemanticVectorStore {
    kind: VectorKind,
    dimension: usize,
    vectors: BTreeMap<String, Vector>,
    finalized: bool,
}

impl SemanticVectorStore {
    /// Create an empty store for vectors of one kind and dimension.
    #[must_use]
    pub fn new(kind: VectorKind, dimension: usize) -> Self {
        Self {
            kind,
            dimension,
            vectors: BTreeMap::new(),
            finalized: false,
        }
    }

    /// Insert or overwrite the vector for `term`.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::InvalidState`] once the store is finalized, and a
    /// vector error if `vector` does not match the store's kind or
    /// dimension.
    pub fn put(&mut self, term: &str, vector: Vector) -> Result<()> {
        self.ensure_mutable("put")?;
        if vector.kind() != self.kind {
            return Err(semvec_vsa::VsaError::UnsupportedRepresentation {
                operation: "put",
                kind: format!("{} x {}", self.kind, vector.kind()),
            }
            .into());
        }
        if vector.dimension() != self.dimension {
            return Err(semvec_vsa::VsaError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.dimension(),
            }
            .into());
        }
        self.vectors.insert(term.to_string(), vector);
        Ok(())
    }

    /// Insert a fresh zero accumulator for `term` unless one exists.
    ///
    /// Returns whether an entry was created.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::InvalidState`] once the store is finalized.
    pub fn insert_zero(&mut self, term: &str) -> Result<bool> {
        self.ensure_mutable("insert")?;
        if self.vectors.contains_key(term) {
            return Ok(false);
        }
        let zero = Vector::zero(self.kind, self.dimension)?;
        self.vectors.insert(term.to_string(), zero);
        Ok(true)
    }

    /// Read access to the vector for `term`.
    #[must_use]
    pub fn get(&self, term: &str) -> Option<&Vector> {
        self.vectors.get(term)
    }

    /// Mutable access to the accumulator for `term`.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::InvalidState`] once the store is finalized.
    pub fn get_mut(&mut self, term: &str) -> Result<Option<&mut Vector>> {
        self.ensure_mutable("train")?;
        Ok(self.vectors.get_mut(term))
    }

    /// Whether `term` has an entry.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.vectors.contains_key(term)
    }

    /// All entries, ordered by term.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Vector)> {
        self.vectors.iter().map(|(t, v)| (t.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True if the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Representation of every vector in the store.
    #[must_use]
    pub fn kind(&self) -> VectorKind {
        self.kind
    }

    /// Dimension of every vector in the store.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether [`finalize`](Self::finalize) has run.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Normalize every entry and freeze the store.
    ///
    /// A second call finds the store already finalized and changes nothing.
    /// Returns the number of entries normalized by this call.
    pub fn finalize(&mut self) -> usize {
        if self.finalized {
            return 0;
        }
        for vector in self.vectors.values_mut() {
            vector.normalize();
        }
        self.finalized = true;
        self.vectors.len()
    }

    fn ensure_mutable(&self, operation: &str) -> Result<()> {
        if self.finalized {
            return Err(PsiError::InvalidState(format!(
                "cannot {operation} semantic vectors after finalization"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SemanticVectorStore {
        SemanticVectorStore::new(VectorKind::Real, 4)
    }

    #[test]
    fn test_insert_zero_once() {
        let mut s = store();
        assert!(s.insert_zero("cat").unwrap());
        assert!(!s.insert_zero("cat").unwrap());
        assert_eq!(s.len(), 1);
        assert!(s.get("cat").unwrap().is_zero());
    }

    #[test]
    fn test_accumulate_then_finalize() {
        let mut s = store();
        s.insert_zero("cat").unwrap();
        let v = Vector::from_real(vec![3.0, 0.0, 4.0, 0.0]);
        s.get_mut("cat").unwrap().unwrap().superpose(&v, 1.0).unwrap();
        assert!(s.get_mut("dog").unwrap().is_none());

        assert_eq!(s.finalize(), 1);
        let cat = s.get("cat").unwrap().as_real().unwrap();
        assert!((cat.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_second_finalize_changes_nothing() {
        let mut s = store();
        s.put("cat", Vector::from_real(vec![1.0, 2.0, 3.0, 4.0])).unwrap();
        s.finalize();
        let once = s.get("cat").cloned();
        assert_eq!(s.finalize(), 0);
        assert_eq!(s.get("cat").cloned(), once);
    }

    #[test]
    fn test_mutation_after_finalize_is_invalid_state() {
        let mut s = store();
        s.insert_zero("cat").unwrap();
        s.finalize();
        assert!(matches!(s.get_mut("cat"), Err(PsiError::InvalidState(_))));
        assert!(matches!(
            s.put("cat", Vector::from_real(vec![0.0; 4])),
            Err(PsiError::InvalidState(_))
        ));
        assert!(matches!(s.insert_zero("dog"), Err(PsiError::InvalidState(_))));
    }

    #[test]
    fn test_put_rejects_incompatible_vectors() {
        let mut s = store();
        assert!(s.put("cat", Vector::from_real(vec![0.0; 3])).is_err());
        let binary = Vector::zero(VectorKind::Binary, 4).unwrap();
        assert!(matches!(s.put("cat", binary), Err(PsiError::Vsa(_))));
    }

    #[test]
    fn test_entries_sorted() {
        let mut s = store();
        for term in ["mouse", "cat", "dog"] {
            s.insert_zero(term).unwrap();
        }
        let terms: Vec<&str> = s.entries().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["cat", "dog", "mouse"]);
    }
}
