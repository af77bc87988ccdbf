//! Lazily materialized elemental vectors.
//!
//! The store owns every elemental vector in an arena and maps terms to
//! arena slots. A vector is generated on first request and never changes
//! afterwards.

use std::collections::HashMap;

use semvec_vsa::random::{seeded_rng, term_rng, ElementalRng};
use semvec_vsa::{ElementalConfig, Vector, VectorKind};

use crate::config::{ElementalMethod, PsiConfig};
use crate::error::Result;

/// Memoized term to elemental-vector mapping.
///
/// # Example
///
/// ```
/// use semvec_psi::{ElementalVectorStore, PsiConfig};
///
/// let mut store = ElementalVectorStore::from_config(&PsiConfig::default())?;
/// let first = store.get_or_create("cat")?.clone();
/// assert_eq!(store.get_or_create("cat")?, &first);
/// assert_eq!(store.len(), 1);
/// # Ok::<(), semvec_psi::PsiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ElementalVectorStore {
    generation: ElementalConfig,
    method: ElementalMethod,
    seed: u64,
    rng: ElementalRng,
    vectors: Vec<(String, Vector)>,
    slots: HashMap<String, usize>,
}

impl ElementalVectorStore {
    /// Create an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if `generation` cannot produce vectors.
    pub fn new(generation: ElementalConfig, method: ElementalMethod, seed: u64) -> Result<Self> {
        generation.validate()?;
        Ok(Self {
            generation,
            method,
            seed,
            rng: seeded_rng(seed),
            vectors: Vec::new(),
            slots: HashMap::new(),
        })
    }

    /// Create an empty store from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot produce vectors.
    pub fn from_config(config: &PsiConfig) -> Result<Self> {
        Self::new(config.elemental_config(), config.elemental_method, config.seed)
    }

    /// Return the elemental vector for `term`, generating it if unseen.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    pub fn get_or_create(&mut self, term: &str) -> Result<&Vector> {
        let slot = match self.slots.get(term) {
            Some(&slot) => slot,
            None => {
                let vector = match self.method {
                    ElementalMethod::Random => self.generation.generate(&mut self.rng)?,
                    ElementalMethod::ContentHash => {
                        let mut rng = term_rng(self.seed, term);
                        self.generation.generate(&mut rng)?
                    }
                };
                let slot = self.vectors.len();
                self.vectors.push((term.to_string(), vector));
                self.slots.insert(term.to_string(), slot);
                slot
            }
        };
        Ok(&self.vectors[slot].1)
    }

    /// The elemental vector for `term`, if it has been materialized.
    #[must_use]
    pub fn get(&self, term: &str) -> Option<&Vector> {
        self.slots.get(term).map(|&slot| &self.vectors[slot].1)
    }

    /// Whether `term` has been materialized.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.slots.contains_key(term)
    }

    /// Number of materialized vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True if no vector has been materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Representation of every vector in the store.
    #[must_use]
    pub fn kind(&self) -> VectorKind {
        self.generation.kind
    }

    /// Dimension of every vector in the store.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.generation.dimension
    }

    /// Entries in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vector)> {
        self.vectors.iter().map(|(t, v)| (t.as_str(), v))
    }
}
