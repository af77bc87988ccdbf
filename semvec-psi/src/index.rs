//! The predication index collaborator.
//!
//! [`PredicationIndex`] is the contract the trainer reads the corpus
//! through. [`MemoryIndex`] is an in-memory implementation built from
//! [`Triple`]s: every triple becomes one document with three tokenized
//! fields and a deduplication key.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::Triple;
use crate::error::{PsiError, Result};

/// A tokenized field of a predication document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    /// The subject phrase.
    Subject,
    /// The predicate phrase.
    Predicate,
    /// The object phrase.
    Object,
}

impl Field {
    /// Every field, in document order.
    pub const ALL: [Field; 3] = [Field::Subject, Field::Predicate, Field::Object];

    /// Fields whose terms are concepts and receive semantic vectors.
    pub const ARGUMENTS: [Field; 2] = [Field::Subject, Field::Object];

    /// Stored field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::Subject => "tokenized_subject",
            Field::Predicate => "tokenized_predicate",
            Field::Object => "tokenized_object",
        }
    }

    /// Short role name used in log messages.
    #[must_use]
    pub const fn role(self) -> &'static str {
        match self {
            Field::Subject => "subject",
            Field::Predicate => "predicate",
            Field::Object => "object",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Field::Subject => 0,
            Field::Predicate => 1,
            Field::Object => 2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to one indexed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocId(pub usize);

/// Read access to an indexed predication corpus.
///
/// Enumerations are in lexicographic order.
pub trait PredicationIndex {
    /// Distinct terms appearing in `field`.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::NoTermsForField`] if the field holds no terms.
    fn terms_for_field(&self, field: Field) -> Result<Vec<String>>;

    /// Distinct predication keys.
    fn unique_keys(&self) -> Vec<String>;

    /// The first document indexed under `key`.
    fn representative_document(&self, key: &str) -> Option<DocId>;

    /// Ordered token sequence of one field of a document.
    fn field_tokens(&self, doc: DocId, field: Field) -> Option<&[String]>;

    /// Number of indexed documents.
    fn num_documents(&self) -> usize;

    /// Number of documents whose `field` contains `term`.
    fn document_frequency(&self, field: Field, term: &str) -> u64;

    /// Total occurrences of `term` in `field` across all documents.
    fn term_frequency(&self, field: Field, term: &str) -> u64;

    /// Occurrence count of `term` in each document of `field` containing it.
    fn document_term_frequencies(&self, field: Field, term: &str) -> Vec<u32>;
}

/// Split a phrase into whitespace-separated tokens.
///
/// Case and punctuation are kept; term filtering decides what is admitted.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone)]
struct Document {
    triple: Triple,
    tokens: [Vec<String>; 3],
}

type Postings = BTreeMap<String, BTreeMap<DocId, u32>>;

/// In-memory predication index.
///
/// # Example
///
/// ```
/// use semvec_psi::{Field, MemoryIndex, PredicationIndex, Triple};
///
/// let index = MemoryIndex::from_triples([
///     Triple::new("cat", "chase", "mouse"),
///     Triple::new("cat", "chase", "mouse"),
/// ]);
/// assert_eq!(index.num_documents(), 2);
/// assert_eq!(index.unique_keys(), vec!["catCHASEmouse".to_string()]);
/// assert_eq!(index.terms_for_field(Field::Object)?, vec!["mouse".to_string()]);
/// # Ok::<(), semvec_psi::PsiError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    documents: Vec<Document>,
    keys: BTreeMap<String, Vec<DocId>>,
    postings: [Postings; 3],
}

impl MemoryIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from triples, in order.
    pub fn from_triples<I: IntoIterator<Item = Triple>>(triples: I) -> Self {
        let mut index = Self::new();
        for triple in triples {
            index.add(triple);
        }
        index
    }

    /// Index one triple as a new document.
    pub fn add(&mut self, triple: Triple) -> DocId {
        let doc = DocId(self.documents.len());
        let tokens = [
            tokenize(&triple.subject),
            tokenize(&triple.predicate),
            tokenize(&triple.object),
        ];

        for field in Field::ALL {
            let postings = &mut self.postings[field.slot()];
            for token in &tokens[field.slot()] {
                *postings
                    .entry(token.clone())
                    .or_default()
                    .entry(doc)
                    .or_insert(0) += 1;
            }
        }

        self.keys.entry(triple.predication_key()).or_default().push(doc);
        self.documents.push(Document { triple, tokens });
        doc
    }

    /// The triple stored for a document.
    #[must_use]
    pub fn triple(&self, doc: DocId) -> Option<&Triple> {
        self.documents.get(doc.0).map(|d| &d.triple)
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if nothing has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl PredicationIndex for MemoryIndex {
    fn terms_for_field(&self, field: Field) -> Result<Vec<String>> {
        let postings = &self.postings[field.slot()];
        if postings.is_empty() {
            return Err(PsiError::NoTermsForField(field.name().to_string()));
        }
        Ok(postings.keys().cloned().collect())
    }

    fn unique_keys(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }

    fn representative_document(&self, key: &str) -> Option<DocId> {
        self.keys.get(key).and_then(|docs| docs.first().copied())
    }

    fn field_tokens(&self, doc: DocId, field: Field) -> Option<&[String]> {
        self.documents
            .get(doc.0)
            .map(|d| d.tokens[field.slot()].as_slice())
    }

    fn num_documents(&self) -> usize {
        self.documents.len()
    }

    fn document_frequency(&self, field: Field, term: &str) -> u64 {
        self.postings[field.slot()]
            .get(term)
            .map_or(0, |docs| docs.len() as u64)
    }

    fn term_frequency(&self, field: Field, term: &str) -> u64 {
        self.postings[field.slot()]
            .get(term)
            .map_or(0, |docs| docs.values().map(|&n| u64::from(n)).sum())
    }

    fn document_term_frequencies(&self, field: Field, term: &str) -> Vec<u32> {
        self.postings[field.slot()]
            .get(term)
            .map(|docs| docs.values().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryIndex {
        MemoryIndex::from_triples([
            Triple::new("the cat", "chases", "a mouse"),
            Triple::new("dog", "chases", "the cat"),
            Triple::new("the cat", "chases", "a mouse"),
        ])
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::Subject.name(), "tokenized_subject");
        assert_eq!(Field::Predicate.to_string(), "tokenized_predicate");
        assert_eq!(Field::Object.role(), "object");
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  The Cat,  sat. "), vec!["The", "Cat,", "sat."]);
        assert_eq!(tokenize("covid-19\t(virus)"), vec!["covid-19", "(virus)"]);
        assert!(tokenize(" \n ").is_empty());
    }

    #[test]
    fn test_terms_are_sorted_and_distinct() {
        let index = sample();
        assert_eq!(index.terms_for_field(Field::Subject).unwrap(), vec!["cat", "dog", "the"]);
        assert_eq!(index.terms_for_field(Field::Predicate).unwrap(), vec!["chases"]);
    }

    #[test]
    fn test_no_terms_for_empty_field() {
        let index = MemoryIndex::new();
        assert!(matches!(
            index.terms_for_field(Field::Subject),
            Err(PsiError::NoTermsForField(f)) if f == "tokenized_subject"
        ));
    }

    #[test]
    fn test_duplicate_triples_share_key() {
        let index = sample();
        assert_eq!(index.num_documents(), 3);
        let keys = index.unique_keys();
        assert_eq!(keys, vec!["dogCHASESthe_cat", "the_catCHASESa_mouse"]);
        assert_eq!(index.representative_document("the_catCHASESa_mouse"), Some(DocId(0)));
        assert_eq!(index.representative_document("missing"), None);
    }

    #[test]
    fn test_field_tokens() {
        let index = sample();
        assert_eq!(
            index.field_tokens(DocId(1), Field::Object).unwrap(),
            ["the".to_string(), "cat".to_string()]
        );
        assert!(index.field_tokens(DocId(99), Field::Object).is_none());
    }

    #[test]
    fn test_frequencies() {
        let index = MemoryIndex::from_triples([
            Triple::new("cat cat", "sees", "mouse"),
            Triple::new("cat", "sees", "dog"),
        ]);
        assert_eq!(index.document_frequency(Field::Subject, "cat"), 2);
        assert_eq!(index.term_frequency(Field::Subject, "cat"), 3);
        assert_eq!(index.document_term_frequencies(Field::Subject, "cat"), vec![2, 1]);
        assert_eq!(index.term_frequency(Field::Object, "cat"), 0);
        assert!(index.document_term_frequencies(Field::Object, "cat").is_empty());
    }
}
