//! Corpus ingestion.
//!
//! Two line formats are understood:
//!
//! ```text
//! format  | columns                         | used
//! --------+---------------------------------+----------------------------
//! reverb  | >= 18, tab-separated            | 0 doc path, 12 sentence,
//!         |                                 | 15 subject, 16 predicate,
//!         |                                 | 17 object
//! triples | 3, tab-separated                | subject, predicate, object
//! ```
//!
//! Subjects and objects are trimmed and lower-cased; predicates are only
//! trimmed. Malformed lines are reported per line and skipped by
//! [`read_triples`].

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{PsiError, Result};

/// Minimum number of tab-separated columns in a ReVerb extraction line.
pub const REVERB_MIN_COLUMNS: usize = 18;

/// One subject-predicate-object extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    /// Subject phrase.
    pub subject: String,
    /// Predicate phrase.
    pub predicate: String,
    /// Object phrase.
    pub object: String,
    /// Sentence the triple was extracted from, if known.
    pub source: Option<String>,
    /// Identifier of the originating document, if known.
    pub document_id: Option<String>,
}

impl Triple {
    /// Build a triple from its three phrases, normalizing case like the
    /// line parsers do.
    #[must_use]
    pub fn new(subject: &str, predicate: &str, object: &str) -> Self {
        Self {
            subject: subject.trim().to_lowercase(),
            predicate: predicate.trim().to_string(),
            object: object.trim().to_lowercase(),
            source: None,
            document_id: None,
        }
    }

    /// Deduplication key: `subject_` + `PREDICATE_` + `object_`, with spaces
    /// replaced by underscores and no separator between parts.
    #[must_use]
    pub fn predication_key(&self) -> String {
        format!(
            "{}{}{}",
            self.subject.replace(' ', "_"),
            self.predicate.replace(' ', "_").to_uppercase(),
            self.object.replace(' ', "_")
        )
    }
}

/// Line format of a corpus file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// ReVerb extractor output.
    #[default]
    Reverb,
    /// Plain `subject<TAB>predicate<TAB>object` lines.
    Triples,
}

/// Parse one line of ReVerb output.
///
/// # Errors
///
/// Returns [`PsiError::Corpus`] (line 0) if the line has fewer than
/// [`REVERB_MIN_COLUMNS`] columns.
pub fn parse_reverb_line(line: &str) -> Result<Triple> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < REVERB_MIN_COLUMNS {
        return Err(PsiError::Corpus {
            line: 0,
            reason: format!(
                "expected at least {REVERB_MIN_COLUMNS} columns, found {}",
                columns.len()
            ),
        });
    }

    let mut triple = Triple::new(columns[15], columns[16], columns[17]);
    triple.source = Some(columns[12].to_string());
    triple.document_id = Some(document_stem(columns[0]).to_string());
    Ok(triple)
}

/// Parse one `subject<TAB>predicate<TAB>object` line.
///
/// # Errors
///
/// Returns [`PsiError::Corpus`] (line 0) unless the line has exactly three
/// non-empty columns.
pub fn parse_triple_line(line: &str) -> Result<Triple> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != 3 {
        return Err(PsiError::Corpus {
            line: 0,
            reason: format!("expected 3 columns, found {}", columns.len()),
        });
    }
    if columns.iter().any(|c| c.trim().is_empty()) {
        return Err(PsiError::Corpus {
            line: 0,
            reason: "empty subject, predicate or object".into(),
        });
    }
    Ok(Triple::new(columns[0], columns[1], columns[2]))
}

/// Read every well-formed triple from `reader`.
///
/// Blank lines are ignored. Malformed lines are logged and skipped.
///
/// # Errors
///
/// Returns an error only if reading from `reader` fails.
pub fn read_triples<R: BufRead>(reader: R, format: CorpusFormat) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();
    let mut rejected = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        if line_number % 10_000 == 0 || (line_number < 10_000 && line_number % 1000 == 0) {
            tracing::info!("{} lines read ...", line_number);
        }
        if line.trim().is_empty() {
            continue;
        }

        let parsed = match format {
            CorpusFormat::Reverb => parse_reverb_line(&line),
            CorpusFormat::Triples => parse_triple_line(&line),
        };
        match parsed {
            Ok(triple) => triples.push(triple),
            Err(PsiError::Corpus { reason, .. }) => {
                rejected += 1;
                tracing::warn!(
                    "Ignoring line {} that probably does not hold a triple ({}): {}",
                    line_number,
                    reason,
                    line
                );
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!("Read {} triples ({} lines rejected)", triples.len(), rejected);
    Ok(triples)
}

/// File stem of a document path: the text between the last `/` and the
/// last `.`, or the whole value when that slice does not exist.
fn document_stem(path: &str) -> &str {
    let start = path.rfind('/').map_or(0, |i| i + 1);
    match path.rfind('.') {
        Some(end) if end >= start => &path[start..end],
        _ => path,
    }
}
