//! # semvec-psi
//!
//! Predication-based semantic indexing: trains distributional semantic
//! vectors from a corpus of subject-predicate-object triples on top of the
//! [`semvec_vsa`] vector algebra.
//!
//! Every admitted concept and predicate term receives a random *elemental*
//! vector. Every concept additionally receives a *semantic* vector that
//! accumulates, for each predication it takes part in, the binding of the
//! predicate with the opposite argument:
//!
//! ```text
//! semantic(object)  += weight(object)  * bind(predicate, subject)
//! semantic(subject) += weight(subject) * bind(predicate, object)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use semvec_psi::{create_psi_vectors, CorpusTermStats, FileVectorStore, MemoryIndex, PsiConfig, Triple};
//!
//! let dir = tempfile::tempdir()?;
//! let mut config = PsiConfig::default();
//! config.output.directory = dir.path().to_path_buf();
//!
//! let index = MemoryIndex::from_triples([
//!     Triple::new("cat", "chase", "mouse"),
//!     Triple::new("dog", "chase", "cat"),
//! ]);
//! let stats = CorpusTermStats::from_index(&index, &config)?;
//! let mut writer = FileVectorStore::new(config.output.clone());
//!
//! let report = create_psi_vectors(&config, &index, &stats, &mut writer)?;
//! assert_eq!(report.processed, 2);
//! assert!(writer.path_for("semanticvectors").exists());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`config`]: run configuration, loadable from YAML
//! - [`corpus`]: ReVerb and plain triple ingestion
//! - [`index`]: the index contract and an in-memory implementation
//! - [`term_stats`]: term admission and global weighting
//! - [`elemental`] / [`semantic`]: the two vector stores
//! - [`context`]: per-field context vectors
//! - [`trainer`]: the training state machine
//! - [`vector_store`]: persistence
//! - [`correlation`]: evaluation against human similarity judgments
//!
//! ## References
//!
//! - Cohen, T., Schvaneveldt, R. & Widdows, D. (2010). Reflective Random
//!   Indexing and indirect inference
//! - Widdows, D. & Cohen, T. (2015). Reasoning with vectors: a continuous
//!   model for fast robust inference

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

pub mod config;
pub mod context;
pub mod corpus;
pub mod correlation;
pub mod elemental;
pub mod error;
pub mod index;
pub mod semantic;
pub mod term_stats;
pub mod trainer;
pub mod vector_store;

pub use config::{ElementalMethod, FilterConfig, OutputConfig, PsiConfig, StoreFormat, TermWeight};
pub use context::ContextVectorBuilder;
pub use corpus::{read_triples, CorpusFormat, Triple};
pub use correlation::{evaluate_pairs, CorrelationReport};
pub use elemental::ElementalVectorStore;
pub use error::{PsiError, Result};
pub use index::{DocId, Field, MemoryIndex, PredicationIndex};
pub use semantic::SemanticVectorStore;
pub use term_stats::{CorpusTermStats, TermStats};
pub use trainer::{create_psi_vectors, PredicationTrainer, SkipCounts, TrainedVectors, TrainingPhase, TrainingReport};
pub use vector_store::{
    read_vector_store, FileVectorStore, LoadedVectorStore, NamedStore, StoreHeader, VectorStoreWriter,
};
