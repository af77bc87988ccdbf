//! Term admission and global weighting.
//!
//! [`TermStats`] is the contract the trainer consults for every term;
//! [`CorpusTermStats`] computes it once from a [`PredicationIndex`] and a
//! [`PsiConfig`].
//!
//! ```text
//! field      | stopwords | non-alpha cap | min length | frequency window
//! -----------+-----------+---------------+------------+-----------------
//! subject    | yes       | yes           | yes        | yes
//! object     | yes       | yes           | yes        | yes
//! predicate  | yes       | no            | 1          | no
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::config::{FilterConfig, PsiConfig, TermWeight};
use crate::error::{PsiError, Result};
use crate::index::{Field, PredicationIndex};

/// Admission test and global weight per field and term.
pub trait TermStats {
    /// Whether `term` may enter the vocabulary of `field`.
    fn admit(&self, field: Field, term: &str) -> bool;

    /// Non-negative multiplier applied to the term's contributions.
    fn global_weight(&self, field: Field, term: &str) -> f32;
}

#[derive(Debug, Clone, Copy)]
struct TermEntry {
    frequency: u64,
    weight: f32,
}

/// Term statistics computed from an indexed corpus.
#[derive(Debug, Clone)]
pub struct CorpusTermStats {
    filter: FilterConfig,
    stopwords: BTreeSet<String>,
    scheme: TermWeight,
    entries: HashMap<Field, HashMap<String, TermEntry>>,
}

impl CorpusTermStats {
    /// Compute frequencies and weights for every term of every field.
    ///
    /// # Errors
    ///
    /// Returns an error if the stopword file cannot be read.
    pub fn from_index<I: PredicationIndex + ?Sized>(index: &I, config: &PsiConfig) -> Result<Self> {
        let stopwords = config.filter.resolve_stopwords()?;
        let num_documents = index.num_documents();
        let mut entries = HashMap::new();

        for field in Field::ALL {
            let terms = match index.terms_for_field(field) {
                Ok(terms) => terms,
                Err(PsiError::NoTermsForField(_)) => Vec::new(),
                Err(e) => return Err(e),
            };
            let field_entries: HashMap<String, TermEntry> = terms
                .into_iter()
                .map(|term| {
                    let entry = TermEntry {
                        frequency: index.term_frequency(field, &term),
                        weight: weigh(index, config.term_weight, num_documents, field, &term),
                    };
                    (term, entry)
                })
                .collect();
            entries.insert(field, field_entries);
        }

        Ok(Self {
            filter: config.filter.clone(),
            stopwords,
            scheme: config.term_weight,
            entries,
        })
    }

    /// Total corpus frequency of `term` in `field` (0 if unseen).
    #[must_use]
    pub fn frequency(&self, field: Field, term: &str) -> u64 {
        self.entry(field, term).map_or(0, |e| e.frequency)
    }

    /// Resolved stopword set.
    #[must_use]
    pub fn stopwords(&self) -> &BTreeSet<String> {
        &self.stopwords
    }

    fn entry(&self, field: Field, term: &str) -> Option<&TermEntry> {
        self.entries.get(&field).and_then(|m| m.get(term))
    }
}

impl TermStats for CorpusTermStats {
    fn admit(&self, field: Field, term: &str) -> bool {
        if self.stopwords.contains(term) {
            return false;
        }
        if field == Field::Predicate {
            return !term.is_empty();
        }

        let nonalphabet = term.chars().filter(|c| !c.is_alphabetic()).count();
        if nonalphabet > self.filter.max_nonalphabet_chars {
            return false;
        }
        if term.chars().count() < self.filter.min_term_length {
            return false;
        }

        let frequency = self.frequency(field, term);
        frequency >= self.filter.min_frequency && frequency <= self.filter.max_frequency
    }

    fn global_weight(&self, field: Field, term: &str) -> f32 {
        match (self.scheme, self.entry(field, term)) {
            (TermWeight::None, _) => 1.0,
            (_, Some(entry)) => entry.weight,
            (_, None) => 0.0,
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn weigh<I: PredicationIndex + ?Sized>(
    index: &I,
    scheme: TermWeight,
    num_documents: usize,
    field: Field,
    term: &str,
) -> f32 {
    match scheme {
        TermWeight::None => 1.0,
        TermWeight::Idf => {
            let df = index.document_frequency(field, term);
            if df == 0 || num_documents == 0 {
                return 0.0;
            }
            (num_documents as f64 / df as f64).log10().max(0.0) as f32
        }
        TermWeight::LogEntropy => {
            if num_documents <= 1 {
                return 1.0;
            }
            let counts = index.document_term_frequencies(field, term);
            let global: f64 = counts.iter().map(|&c| f64::from(c)).sum();
            if global == 0.0 {
                return 0.0;
            }
            let entropy: f64 = counts
                .iter()
                .map(|&c| {
                    let p = f64::from(c) / global;
                    p * p.ln()
                })
                .sum();
            (1.0 + entropy / (num_documents as f64).ln()).max(0.0) as f32
        }
    }
}
