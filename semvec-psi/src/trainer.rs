//! Predication-based semantic vector training.
//!
//! [`PredicationTrainer`] runs one pass over an indexed corpus through four
//! phases that only ever move forward:
//!
//! ```text
//! VocabBuilding -> PredicationScanning -> Finalizing -> Done
//! ```
//!
//! 1. **VocabBuilding**: admitted subject and object terms receive an
//!    elemental vector and a zero semantic vector; admitted predicate terms
//!    receive an elemental vector only.
//! 2. **PredicationScanning**: each unique predication key is resolved to
//!    one representative document. Its subject, predicate and object context
//!    vectors are built; if any is zero the predication is skipped.
//!    Otherwise `bind(predicate, subject)` is superposed into the semantic
//!    vectors of the object tokens and `bind(predicate, object)` into those
//!    of the subject tokens, each scaled by the receiving token's weight.
//! 3. **Finalizing**: every semantic vector is normalized once.
//! 4. **Done**: the stores are handed over as [`TrainedVectors`].
//!
//! # Example
//!
//! ```
//! use semvec_psi::{CorpusTermStats, MemoryIndex, PredicationTrainer, PsiConfig, Triple};
//!
//! let index = MemoryIndex::from_triples([Triple::new("cat", "chase", "mouse")]);
//! let config = PsiConfig::default();
//! let stats = CorpusTermStats::from_index(&index, &config)?;
//!
//! let trained = PredicationTrainer::new(config, &index, &stats)?.train()?;
//! assert_eq!(trained.report.processed, 1);
//! assert!(trained.semantic.contains("mouse"));
//! assert!(!trained.semantic.contains("chase"));
//! # Ok::<(), semvec_psi::PsiError>(())
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::PsiConfig;
use crate::context::ContextVectorBuilder;
use crate::elemental::ElementalVectorStore;
use crate::error::{PsiError, Result};
use crate::index::{Field, PredicationIndex};
use crate::semantic::SemanticVectorStore;
use crate::term_stats::TermStats;
use crate::vector_store::{NamedStore, StoreHeader, VectorStoreWriter};

/// Phase of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingPhase {
    /// Materializing elemental and zero semantic vectors.
    VocabBuilding,
    /// Accumulating bound products from unique predications.
    PredicationScanning,
    /// Normalizing semantic vectors.
    Finalizing,
    /// Training complete; the stores can be taken.
    Done,
}

impl TrainingPhase {
    /// Returns the phase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            TrainingPhase::VocabBuilding => "VOCAB_BUILDING",
            TrainingPhase::PredicationScanning => "PREDICATION_SCANNING",
            TrainingPhase::Finalizing => "FINALIZING",
            TrainingPhase::Done => "DONE",
        }
    }
}

impl std::fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why predications were skipped.
///
/// A predication with several zero contexts increments each matching
/// counter once; [`SkipCounts::predications`] counts it once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    /// Predications skipped for any reason.
    pub predications: usize,
    /// Subject context was zero.
    pub subject_zero: usize,
    /// Predicate context was zero.
    pub predicate_zero: usize,
    /// Object context was zero.
    pub object_zero: usize,
    /// No representative document could be resolved.
    pub missing_document: usize,
}

impl SkipCounts {
    fn record_zero(&mut self, field: Field) {
        match field {
            Field::Subject => self.subject_zero += 1,
            Field::Predicate => self.predicate_zero += 1,
            Field::Object => self.object_zero += 1,
        }
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Concept terms with a semantic vector.
    pub concepts: usize,
    /// Admitted predicate terms.
    pub predicates: usize,
    /// Unique predication keys in the index.
    pub unique_predications: usize,
    /// Predications that updated semantic vectors.
    pub processed: usize,
    /// Skipped predications.
    pub skipped: SkipCounts,
    /// Wall-clock time spent training.
    pub elapsed: Duration,
}

/// The outcome of a completed run.
#[derive(Debug, Clone)]
pub struct TrainedVectors {
    /// Elemental vectors of every admitted concept and predicate.
    pub elemental: ElementalVectorStore,
    /// Normalized semantic vectors of every admitted concept.
    pub semantic: SemanticVectorStore,
    /// Run summary.
    pub report: TrainingReport,
}

impl TrainedVectors {
    /// Persist the elemental and semantic stores under the given names.
    ///
    /// Both stores go to `writer` in one [`VectorStoreWriter::write_all`]
    /// call, so either both are persisted or neither is.
    ///
    /// # Errors
    ///
    /// Returns an error if either store cannot be written.
    pub fn persist<W: VectorStoreWriter + ?Sized>(
        &self,
        writer: &mut W,
        elemental_name: &str,
        semantic_name: &str,
    ) -> Result<()> {
        let elemental: Vec<_> = self.elemental.iter().collect();
        let semantic: Vec<_> = self.semantic.entries().collect();
        writer.write_all(&[
            NamedStore {
                name: elemental_name,
                header: StoreHeader::new(self.elemental.kind(), self.elemental.dimension()),
                entries: &elemental,
            },
            NamedStore {
                name: semantic_name,
                header: StoreHeader::new(self.semantic.kind(), self.semantic.dimension()),
                entries: &semantic,
            },
        ])
    }
}

/// Trains semantic vectors from an indexed predication corpus.
pub struct PredicationTrainer<'a, I: ?Sized, S: ?Sized> {
    config: PsiConfig,
    index: &'a I,
    stats: &'a S,
    phase: TrainingPhase,
    elemental: ElementalVectorStore,
    semantic: SemanticVectorStore,
    report: TrainingReport,
    started: Option<Instant>,
}

impl<'a, I, S> PredicationTrainer<'a, I, S>
where
    I: PredicationIndex + ?Sized,
    S: TermStats + ?Sized,
{
    /// Create a trainer over `index`, admitting and weighting terms with
    /// `stats`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PsiConfig, index: &'a I, stats: &'a S) -> Result<Self> {
        config.validate()?;
        let elemental = ElementalVectorStore::from_config(&config)?;
        let semantic = SemanticVectorStore::new(config.vector_type, config.dimension);
        Ok(Self {
            config,
            index,
            stats,
            phase: TrainingPhase::VocabBuilding,
            elemental,
            semantic,
            report: TrainingReport::default(),
            started: None,
        })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    /// Run every remaining phase and return the trained stores.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::Configuration`] if a required field holds no
    /// terms, or any vector error raised while training.
    pub fn train(mut self) -> Result<TrainedVectors> {
        loop {
            match self.phase {
                TrainingPhase::VocabBuilding => self.build_vocabulary()?,
                TrainingPhase::PredicationScanning => self.scan_predications()?,
                TrainingPhase::Finalizing => self.finalize()?,
                TrainingPhase::Done => return self.into_trained(),
            }
        }
    }

    /// Materialize elemental and semantic vectors for the admitted
    /// vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::InvalidState`] outside the vocabulary phase and
    /// [`PsiError::Configuration`] if a field holds no terms.
    pub fn build_vocabulary(&mut self) -> Result<()> {
        self.expect_phase(TrainingPhase::VocabBuilding)?;
        self.started.get_or_insert_with(Instant::now);

        let filter = &self.config.filter;
        tracing::info!("Starting predication training");
        tracing::info!("  Documents: {}", self.index.num_documents());
        tracing::info!(
            "  Vectors: {} x {} (seed length {})",
            self.config.vector_type,
            self.config.dimension,
            self.config.seed_length
        );
        tracing::info!(
            "  Frequency window: [{}, {}], max non-alphabet chars: {}",
            filter.min_frequency,
            filter.max_frequency,
            filter.max_nonalphabet_chars
        );

        for field in Field::ARGUMENTS {
            for term in self.required_terms(field)? {
                if !self.stats.admit(field, &term) {
                    tracing::debug!("Filtered out {} term '{}'", field.role(), term);
                    continue;
                }
                if self.semantic.insert_zero(&term)? {
                    self.elemental.get_or_create(&term)?;
                }
            }
        }
        self.report.concepts = self.semantic.len();
        tracing::info!("Created {} concept vectors", self.report.concepts);

        let mut predicates = 0;
        for term in self.required_terms(Field::Predicate)? {
            if !self.stats.admit(Field::Predicate, &term) {
                tracing::debug!("Filtered out predicate term '{}'", term);
                continue;
            }
            self.elemental.get_or_create(&term)?;
            predicates += 1;
        }
        self.report.predicates = predicates;
        tracing::info!(
            "Created {} predicate vectors ({} elemental vectors in total)",
            predicates,
            self.elemental.len()
        );

        self.phase = TrainingPhase::PredicationScanning;
        Ok(())
    }

    /// Accumulate bound products from every unique predication.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::InvalidState`] outside the scanning phase, or a
    /// vector error.
    pub fn scan_predications(&mut self) -> Result<()> {
        self.expect_phase(TrainingPhase::PredicationScanning)?;
        self.started.get_or_insert_with(Instant::now);

        let index = self.index;
        let stats = self.stats;
        let builder = ContextVectorBuilder::for_store(&self.elemental);
        let keys = index.unique_keys();
        self.report.unique_predications = keys.len();
        tracing::info!("Scanning {} unique predications", keys.len());

        for (n, key) in keys.iter().enumerate() {
            let count = n + 1;
            if count % 10_000 == 0 || (count < 10_000 && count % 1000 == 0) {
                tracing::info!("{} ... ", count);
            }

            let resolved = index.representative_document(key).and_then(|doc| {
                Some((
                    index.field_tokens(doc, Field::Subject)?,
                    index.field_tokens(doc, Field::Predicate)?,
                    index.field_tokens(doc, Field::Object)?,
                ))
            });
            let Some((subject_tokens, predicate_tokens, object_tokens)) = resolved else {
                tracing::warn!("No document found for predication key '{}', skipping", key);
                self.report.skipped.missing_document += 1;
                self.report.skipped.predications += 1;
                continue;
            };

            let subject = builder.build(&self.elemental, stats, Field::Subject, subject_tokens)?;
            let predicate = builder.build(&self.elemental, stats, Field::Predicate, predicate_tokens)?;
            let object = builder.build(&self.elemental, stats, Field::Object, object_tokens)?;

            let zero: Vec<Field> = [(Field::Subject, &subject), (Field::Predicate, &predicate), (Field::Object, &object)]
                .into_iter()
                .filter(|(_, v)| v.is_zero())
                .map(|(f, _)| f)
                .collect();
            if !zero.is_empty() {
                for field in zero {
                    tracing::info!(
                        "--> {} zero\tskipping predication {} | {} | {}",
                        field.role(),
                        subject_tokens.join(" "),
                        predicate_tokens.join(" "),
                        object_tokens.join(" ")
                    );
                    self.report.skipped.record_zero(field);
                }
                self.report.skipped.predications += 1;
                continue;
            }

            let bound_so = predicate.bind(&subject)?;
            self.accumulate(Field::Object, object_tokens, &bound_so)?;

            let bound_po = predicate.bind(&object)?;
            self.accumulate(Field::Subject, subject_tokens, &bound_po)?;

            self.report.processed += 1;
        }

        tracing::info!(
            "Processed {} predications, skipped {} (subject zero {}, predicate zero {}, object zero {}, missing {})",
            self.report.processed,
            self.report.skipped.predications,
            self.report.skipped.subject_zero,
            self.report.skipped.predicate_zero,
            self.report.skipped.object_zero,
            self.report.skipped.missing_document
        );
        self.phase = TrainingPhase::Finalizing;
        Ok(())
    }

    /// Normalize every semantic vector.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::InvalidState`] outside the finalizing phase.
    pub fn finalize(&mut self) -> Result<()> {
        self.expect_phase(TrainingPhase::Finalizing)?;
        let normalized = self.semantic.finalize();
        tracing::info!("Normalized {} semantic vectors", normalized);
        self.phase = TrainingPhase::Done;
        Ok(())
    }

    /// Take the trained stores.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::InvalidState`] unless training is done.
    pub fn into_trained(mut self) -> Result<TrainedVectors> {
        self.expect_phase(TrainingPhase::Done)?;
        self.report.elapsed = self.started.map_or(Duration::ZERO, |t| t.elapsed());
        tracing::info!("Training finished in {:.2}s", self.report.elapsed.as_secs_f64());
        Ok(TrainedVectors {
            elemental: self.elemental,
            semantic: self.semantic,
            report: self.report,
        })
    }

    /// Superpose `bound` into the semantic vector of every known token.
    fn accumulate(&mut self, field: Field, tokens: &[String], bound: &semvec_vsa::Vector) -> Result<()> {
        for token in tokens {
            let weight = self.stats.global_weight(field, token);
            if let Some(target) = self.semantic.get_mut(token)? {
                target.superpose(bound, weight)?;
            }
        }
        Ok(())
    }

    fn required_terms(&self, field: Field) -> Result<Vec<String>> {
        self.index.terms_for_field(field).map_err(|e| match e {
            PsiError::NoTermsForField(name) => PsiError::Configuration {
                field: name,
                reason: "the predication index holds no terms for this field".into(),
            },
            other => other,
        })
    }

    fn expect_phase(&self, expected: TrainingPhase) -> Result<()> {
        if self.phase != expected {
            return Err(PsiError::InvalidState(format!(
                "expected phase {expected}, trainer is in {}",
                self.phase
            )));
        }
        Ok(())
    }
}

/// Train on `index` and persist both stores with `writer`, named after
/// `config.output`.
///
/// Nothing is written unless training completes and both stores can be
/// written.
///
/// # Errors
///
/// Returns any training or persistence error.
pub fn create_psi_vectors<I, S, W>(config: &PsiConfig, index: &I, stats: &S, writer: &mut W) -> Result<TrainingReport>
where
    I: PredicationIndex + ?Sized,
    S: TermStats + ?Sized,
    W: VectorStoreWriter + ?Sized,
{
    let trained = PredicationTrainer::new(config.clone(), index, stats)?.train()?;
    trained.persist(writer, &config.output.elemental_name, &config.output.semantic_name)?;
    Ok(trained.report)
}
