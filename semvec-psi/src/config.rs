//! Configuration types for predication training.
//!
//! [`PsiConfig`] is the single configuration object of a run. It is
//! serializable to and from YAML, every field has a default, and nested
//! sections group the term filter and the output location:
//! - [`FilterConfig`]: vocabulary admission thresholds and stopwords
//! - [`OutputConfig`]: where and how vector stores are persisted
//!
//! ```yaml
//! vector_type: real
//! dimension: 200
//! seed_length: 10
//! seed: 42
//! elemental_method: random
//! term_weight: idf
//! filter:
//!   min_frequency: 2
//!   max_nonalphabet_chars: 0
//!   stopwords: [the, a, of]
//! output:
//!   directory: vectors
//!   format: json
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use semvec_vsa::{ElementalConfig, VectorKind};
use serde::{Deserialize, Serialize};

use crate::error::{PsiError, Result};

/// How elemental vectors are seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementalMethod {
    /// One seeded stream consumed in term-creation order.
    #[default]
    Random,
    /// A per-term seed derived from the base seed and the term text, so a
    /// term's vector does not depend on which other terms exist.
    ContentHash,
}

/// Global term weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermWeight {
    /// Every term weighs 1.0.
    #[default]
    None,
    /// `log10(N / df)`.
    Idf,
    /// `1 + sum(p * ln p) / ln N` over the documents containing the term.
    LogEntropy,
}

/// On-disk vector store layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    /// Versioned JSON document.
    #[default]
    Json,
    /// Header line followed by `term|c0|c1|...` lines.
    Text,
}

impl StoreFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Text => "txt",
        }
    }
}

/// Vocabulary admission thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum total corpus frequency of an argument term.
    pub min_frequency: u64,

    /// Maximum total corpus frequency of an argument term.
    pub max_frequency: u64,

    /// Maximum number of non-letter characters in an argument term.
    pub max_nonalphabet_chars: usize,

    /// Minimum argument term length in characters.
    pub min_term_length: usize,

    /// Terms that are never admitted, in any field.
    pub stopwords: Vec<String>,

    /// Optional file with one stopword per line.
    pub stopword_file: Option<PathBuf>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_frequency: 0,
            max_frequency: u64::MAX,
            max_nonalphabet_chars: 0,
            min_term_length: 0,
            stopwords: Vec::new(),
            stopword_file: None,
        }
    }
}

impl FilterConfig {
    /// Set the frequency window.
    #[must_use]
    pub const fn with_frequency_range(mut self, min: u64, max: u64) -> Self {
        self.min_frequency = min;
        self.max_frequency = max;
        self
    }

    /// Set the non-alphabetic character cap.
    #[must_use]
    pub const fn with_max_nonalphabet_chars(mut self, max: usize) -> Self {
        self.max_nonalphabet_chars = max;
        self
    }

    /// Set the minimum term length.
    #[must_use]
    pub const fn with_min_term_length(mut self, min: usize) -> Self {
        self.min_term_length = min;
        self
    }

    /// Replace the stopword list.
    #[must_use]
    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = stopwords.into_iter().map(Into::into).collect();
        self
    }

    /// Merge the inline stopwords with those of `stopword_file`.
    ///
    /// Blank lines in the file are ignored and entries are trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the stopword file cannot be read.
    pub fn resolve_stopwords(&self) -> Result<BTreeSet<String>> {
        let mut words: BTreeSet<String> = self.stopwords.iter().cloned().collect();
        if let Some(path) = &self.stopword_file {
            let content = std::fs::read_to_string(path)?;
            words.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            );
        }
        Ok(words)
    }
}

/// Where and how the trained stores are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory.
    pub directory: PathBuf,

    /// File-name prefix applied to both stores.
    pub prefix: String,

    /// Name of the elemental store.
    pub elemental_name: String,

    /// Name of the semantic store.
    pub semantic_name: String,

    /// File layout.
    pub format: StoreFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            prefix: "tok".to_string(),
            elemental_name: "elementalvectors".to_string(),
            semantic_name: "semanticvectors".to_string(),
            format: StoreFormat::Json,
        }
    }
}

impl OutputConfig {
    /// Set the output directory.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the file format.
    #[must_use]
    pub const fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    /// Full path of the store called `name`.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}.{}", self.prefix, name, self.format.extension()))
    }
}

/// Complete configuration of a training run.
///
/// # Example
///
/// ```
/// use semvec_psi::{PsiConfig, TermWeight};
/// use semvec_vsa::VectorKind;
///
/// let config = PsiConfig::default()
///     .with_vector_type(VectorKind::Binary)
///     .with_dimension(4096)
///     .with_term_weight(TermWeight::Idf);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsiConfig {
    /// Vector representation, fixed for the whole run.
    pub vector_type: VectorKind,

    /// Vector dimension.
    pub dimension: usize,

    /// Non-zero entries in a real elemental vector.
    pub seed_length: usize,

    /// Base random seed.
    pub seed: u64,

    /// How elemental vectors are seeded.
    pub elemental_method: ElementalMethod,

    /// Global term weighting.
    pub term_weight: TermWeight,

    /// Vocabulary filter.
    pub filter: FilterConfig,

    /// Output location.
    pub output: OutputConfig,
}

impl Default for PsiConfig {
    fn default() -> Self {
        Self {
            vector_type: VectorKind::Real,
            dimension: 200,
            seed_length: 10,
            seed: 42,
            elemental_method: ElementalMethod::Random,
            term_weight: TermWeight::None,
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl PsiConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set the vector representation.
    #[must_use]
    pub const fn with_vector_type(mut self, kind: VectorKind) -> Self {
        self.vector_type = kind;
        self
    }

    /// Set the vector dimension.
    #[must_use]
    pub const fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the seed length.
    #[must_use]
    pub const fn with_seed_length(mut self, seed_length: usize) -> Self {
        self.seed_length = seed_length;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the elemental seeding method.
    #[must_use]
    pub const fn with_elemental_method(mut self, method: ElementalMethod) -> Self {
        self.elemental_method = method;
        self
    }

    /// Set the term weighting.
    #[must_use]
    pub const fn with_term_weight(mut self, weight: TermWeight) -> Self {
        self.term_weight = weight;
        self
    }

    /// Replace the filter section.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the output section.
    #[must_use]
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Elemental generation parameters derived from this configuration.
    #[must_use]
    pub fn elemental_config(&self) -> ElementalConfig {
        ElementalConfig::new(self.vector_type, self.dimension).with_seed_length(self.seed_length)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(PsiError::InvalidConfig("dimension must be > 0".into()));
        }

        if self.vector_type == VectorKind::Real {
            if self.seed_length == 0 {
                return Err(PsiError::InvalidConfig("seed_length must be > 0".into()));
            }
            if self.seed_length > self.dimension {
                return Err(PsiError::InvalidConfig(format!(
                    "seed_length ({}) must not exceed dimension ({})",
                    self.seed_length, self.dimension
                )));
            }
        }

        if self.filter.min_frequency > self.filter.max_frequency {
            return Err(PsiError::InvalidConfig(format!(
                "filter.min_frequency ({}) exceeds filter.max_frequency ({})",
                self.filter.min_frequency, self.filter.max_frequency
            )));
        }

        if self.output.elemental_name == self.output.semantic_name {
            return Err(PsiError::InvalidConfig(
                "output.elemental_name and output.semantic_name must differ".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PsiConfig::default();
        assert_eq!(config.vector_type, VectorKind::Real);
        assert_eq!(config.dimension, 200);
        assert_eq!(config.seed_length, 10);
        assert_eq!(config.filter.max_frequency, u64::MAX);
        assert_eq!(config.output.prefix, "tok");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = PsiConfig::default()
            .with_vector_type(VectorKind::Complex)
            .with_term_weight(TermWeight::LogEntropy)
            .with_filter(FilterConfig::default().with_stopwords(["the", "of"]));
        let yaml = serde_yaml::to_string(&config).unwrap();
        let restored: PsiConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "vector_type: binary\nterm_weight: idf\nfilter:\n  min_frequency: 3\n";
        let config: PsiConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.vector_type, VectorKind::Binary);
        assert_eq!(config.term_weight, TermWeight::Idf);
        assert_eq!(config.filter.min_frequency, 3);
        assert_eq!(config.filter.max_frequency, u64::MAX);
        assert_eq!(config.dimension, 200);
        assert_eq!(config.output.format, StoreFormat::Json);
    }

    #[test]
    fn test_validation() {
        assert!(PsiConfig::default().with_dimension(0).validate().is_err());
        assert!(PsiConfig::default().with_seed_length(0).validate().is_err());
        assert!(PsiConfig::default()
            .with_dimension(8)
            .with_seed_length(9)
            .validate()
            .is_err());
        // Seed length only constrains sparse real vectors.
        assert!(PsiConfig::default()
            .with_vector_type(VectorKind::Binary)
            .with_dimension(8)
            .with_seed_length(9)
            .validate()
            .is_ok());
        let filter = FilterConfig::default().with_frequency_range(5, 2);
        assert!(PsiConfig::default().with_filter(filter).validate().is_err());
    }

    #[test]
    fn test_output_path() {
        let output = OutputConfig::default()
            .with_directory("/tmp/vectors")
            .with_format(StoreFormat::Text);
        assert_eq!(
            output.path_for("semanticvectors"),
            PathBuf::from("/tmp/vectors/toksemanticvectors.txt")
        );
    }

    #[test]
    fn test_resolve_stopwords_merges_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        std::fs::write(&path, "the\n\n  and \n").unwrap();
        let filter = FilterConfig {
            stopwords: vec!["of".into()],
            stopword_file: Some(path),
            ..FilterConfig::default()
        };
        let words = filter.resolve_stopwords().unwrap();
        let expected: BTreeSet<String> = ["and", "of", "the"].iter().map(|s| (*s).to_string()).collect();
        assert_eq!(words, expected);
    }
}
