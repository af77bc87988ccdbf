//! Vector store persistence.
//!
//! Stores are written through [`VectorStoreWriter`]. [`FileVectorStore`]
//! writes one file per store in one of two layouts:
//!
//! - **JSON**: `{ "version", "header": { "vector_type", "dimension" },
//!   "entries": [{ "term", "vector" }] }`
//! - **Text**: a `-vectortype REAL -dimension 200` header line followed by
//!   one `term|c0|c1|...` line per entry. Complex coordinates are written as
//!   alternating real and imaginary parts; binary vectors as one `0`/`1`
//!   string.
//!
//! Entries are sorted by term in both layouts. Every store of one
//! [`VectorStoreWriter::write_all`] call is written to a temporary sibling
//! first; the files are renamed into place only once all of them are
//! complete, so a failed run leaves no store behind.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use semvec_vsa::num_complex::Complex32;
use semvec_vsa::{BinaryVector, ComplexVector, Vector, VectorKind, VectorOps};
use serde::{Deserialize, Serialize};

use crate::config::{OutputConfig, StoreFormat};
use crate::error::{PsiError, Result};

/// Current JSON store format version.
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Kind and dimension shared by every vector of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHeader {
    /// Representation of every vector.
    pub vector_type: VectorKind,
    /// Dimension of every vector.
    pub dimension: usize,
}

impl StoreHeader {
    /// Create a header.
    #[must_use]
    pub const fn new(vector_type: VectorKind, dimension: usize) -> Self {
        Self {
            vector_type,
            dimension,
        }
    }

    /// Text-format header line.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "-vectortype {} -dimension {}",
            self.vector_type.header_tag(),
            self.dimension
        )
    }

    /// Parse a text-format header line.
    ///
    /// # Errors
    ///
    /// Returns [`PsiError::VectorStore`] if either flag is missing or
    /// malformed.
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut vector_type = None;
        let mut dimension = None;
        let mut parts = line.split_whitespace();
        while let Some(flag) = parts.next() {
            let value = parts
                .next()
                .ok_or_else(|| PsiError::VectorStore(format!("missing value for header flag '{flag}'")))?;
            match flag {
                "-vectortype" => vector_type = Some(value.parse::<VectorKind>()?),
                "-dimension" => {
                    dimension = Some(
                        value
                            .parse::<usize>()
                            .map_err(|e| PsiError::VectorStore(format!("invalid dimension '{value}': {e}")))?,
                    );
                }
                other => return Err(PsiError::VectorStore(format!("unknown header flag '{other}'"))),
            }
        }
        match (vector_type, dimension) {
            (Some(vector_type), Some(dimension)) => Ok(Self::new(vector_type, dimension)),
            _ => Err(PsiError::VectorStore(format!("incomplete header line '{line}'"))),
        }
    }

    fn check(&self, term: &str, vector: &Vector) -> Result<()> {
        if vector.kind() != self.vector_type || vector.dimension() != self.dimension {
            return Err(PsiError::VectorStore(format!(
                "vector for '{term}' is {} x {}, store holds {} x {}",
                vector.kind(),
                vector.dimension(),
                self.vector_type,
                self.dimension
            )));
        }
        Ok(())
    }
}

/// One named store to persist.
#[derive(Debug, Clone, Copy)]
pub struct NamedStore<'a> {
    /// Store name, e.g. `semanticvectors`.
    pub name: &'a str,
    /// Kind and dimension of every entry.
    pub header: StoreHeader,
    /// Term and vector pairs, in any order.
    pub entries: &'a [(&'a str, &'a Vector)],
}

/// Destination for named vector stores.
pub trait VectorStoreWriter {
    /// Persist every store in `stores`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry does not match its header or a store
    /// cannot be written.
    fn write_all(&mut self, stores: &[NamedStore<'_>]) -> Result<()>;

    /// Persist a single store.
    ///
    /// # Errors
    ///
    /// Same conditions as [`VectorStoreWriter::write_all`].
    fn write(&mut self, name: &str, header: &StoreHeader, entries: &[(&str, &Vector)]) -> Result<()> {
        self.write_all(&[NamedStore {
            name,
            header: *header,
            entries,
        }])
    }
}

#[derive(Serialize)]
struct EntryRef<'a> {
    term: &'a str,
    vector: &'a Vector,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    header: StoreHeader,
    entries: Vec<EntryRef<'a>>,
}

#[derive(Deserialize)]
struct Entry {
    term: String,
    vector: Vector,
}

#[derive(Deserialize)]
struct StoreFile {
    version: u32,
    header: StoreHeader,
    entries: Vec<Entry>,
}

/// Writes vector stores as files under an output directory.
#[derive(Debug, Clone)]
pub struct FileVectorStore {
    output: OutputConfig,
}

impl FileVectorStore {
    /// Create a writer for the given output settings.
    #[must_use]
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    /// Path the store called `name` is written to.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.output.path_for(name)
    }

    fn tmp_path(&self, path: &Path) -> PathBuf {
        path.with_extension(format!("{}.tmp", self.output.format.extension()))
    }

    fn write_file(&self, path: &Path, store: &NamedStore<'_>) -> Result<usize> {
        let mut sorted = store.entries.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        match self.output.format {
            StoreFormat::Json => write_json(&mut writer, &store.header, &sorted)?,
            StoreFormat::Text => write_text(&mut writer, &store.header, &sorted)?,
        }
        writer.flush()?;
        Ok(sorted.len())
    }
}

fn discard(paths: &[&Path]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {}", path.display(), e);
            }
        }
    }
}

impl VectorStoreWriter for FileVectorStore {
    fn write_all(&mut self, stores: &[NamedStore<'_>]) -> Result<()> {
        for store in stores {
            for (term, vector) in store.entries {
                store.header.check(term, vector)?;
            }
        }
        std::fs::create_dir_all(&self.output.directory)?;

        // (tmp, final, entry count) for every fully written store
        let mut staged: Vec<(PathBuf, PathBuf, usize)> = Vec::with_capacity(stores.len());
        for store in stores {
            let path = self.path_for(store.name);
            let tmp = self.tmp_path(&path);
            match self.write_file(&tmp, store) {
                Ok(count) => staged.push((tmp, path, count)),
                Err(e) => {
                    let mut leftovers: Vec<&Path> = staged.iter().map(|(t, _, _)| t.as_path()).collect();
                    leftovers.push(&tmp);
                    discard(&leftovers);
                    return Err(e);
                }
            }
        }

        for (n, (tmp, path, _)) in staged.iter().enumerate() {
            if let Err(e) = std::fs::rename(tmp, path) {
                let mut leftovers: Vec<&Path> = staged[..n].iter().map(|(_, p, _)| p.as_path()).collect();
                leftovers.extend(staged[n..].iter().map(|(t, _, _)| t.as_path()));
                discard(&leftovers);
                return Err(e.into());
            }
        }

        for (_, path, count) in &staged {
            tracing::info!("Wrote {} vectors to {}", count, path.display());
        }
        Ok(())
    }
}

fn write_json<W: Write>(writer: &mut W, header: &StoreHeader, entries: &[(&str, &Vector)]) -> Result<()> {
    let file = StoreFileRef {
        version: STORE_FORMAT_VERSION,
        header: *header,
        entries: entries
            .iter()
            .map(|&(term, vector)| EntryRef { term, vector })
            .collect(),
    };
    serde_json::to_writer(&mut *writer, &file)?;
    writeln!(writer)?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut W, header: &StoreHeader, entries: &[(&str, &Vector)]) -> Result<()> {
    writeln!(writer, "{}", header.to_line())?;
    let mut line = String::new();
    for (term, vector) in entries {
        line.clear();
        line.push_str(term);
        match vector {
            Vector::Real(v) => {
                for c in v.coords() {
                    let _ = write!(line, "|{c}");
                }
            }
            Vector::Complex(v) => {
                for c in v.coords() {
                    let _ = write!(line, "|{}|{}", c.re, c.im);
                }
            }
            Vector::Binary(v) => {
                line.push('|');
                line.push_str(&v.to_bit_string());
            }
        }
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// A vector store read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedVectorStore {
    /// Kind and dimension of every vector.
    pub header: StoreHeader,
    /// Vectors by term.
    pub vectors: BTreeMap<String, Vector>,
}

impl LoadedVectorStore {
    /// The vector for `term`.
    #[must_use]
    pub fn get(&self, term: &str) -> Option<&Vector> {
        self.vectors.get(term)
    }

    /// Whether `term` has a vector.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.vectors.contains_key(term)
    }

    /// Number of vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Read a store written by [`FileVectorStore`], in either layout.
///
/// # Errors
///
/// Returns [`PsiError::VectorStore`] for an unsupported version or a
/// malformed file, or an IO/JSON error.
pub fn read_vector_store<P: AsRef<Path>>(path: P) -> Result<LoadedVectorStore> {
    let content = std::fs::read_to_string(path.as_ref())?;
    if content.trim_start().starts_with('{') {
        parse_json(&content)
    } else {
        parse_text(BufReader::new(content.as_bytes()))
    }
}

fn parse_json(content: &str) -> Result<LoadedVectorStore> {
    let file: StoreFile = serde_json::from_str(content)?;
    if file.version != STORE_FORMAT_VERSION {
        return Err(PsiError::VectorStore(format!(
            "unsupported store version {} (expected {STORE_FORMAT_VERSION})",
            file.version
        )));
    }
    let mut vectors = BTreeMap::new();
    for entry in file.entries {
        file.header.check(&entry.term, &entry.vector)?;
        vectors.insert(entry.term, entry.vector);
    }
    Ok(LoadedVectorStore {
        header: file.header,
        vectors,
    })
}

fn parse_text<R: BufRead>(reader: R) -> Result<LoadedVectorStore> {
    let mut lines = reader.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| PsiError::VectorStore("empty store file".into()))??;
    let header = StoreHeader::parse_line(&header_line)?;

    let fields = match header.vector_type {
        VectorKind::Real => header.dimension,
        VectorKind::Complex => header.dimension * 2,
        VectorKind::Binary => 1,
    };

    let mut vectors = BTreeMap::new();
    for (n, line) in lines.enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let line_number = n + 2;
        let mut parts: Vec<&str> = line.rsplitn(fields + 1, '|').collect();
        if parts.len() != fields + 1 {
            return Err(PsiError::VectorStore(format!(
                "line {line_number}: expected {fields} values"
            )));
        }
        parts.reverse();
        let term = parts[0].to_string();
        let vector = parse_values(&header, &parts[1..])
            .map_err(|reason| PsiError::VectorStore(format!("line {line_number}: {reason}")))?;
        vectors.insert(term, vector);
    }
    Ok(LoadedVectorStore { header, vectors })
}

fn parse_values(header: &StoreHeader, values: &[&str]) -> std::result::Result<Vector, String> {
    let floats = || -> std::result::Result<Vec<f32>, String> {
        values
            .iter()
            .map(|v| v.parse::<f32>().map_err(|e| format!("invalid value '{v}': {e}")))
            .collect()
    };
    match header.vector_type {
        VectorKind::Real => Ok(Vector::from_real(floats()?)),
        VectorKind::Complex => {
            let parts = floats()?;
            let coords = parts
                .chunks_exact(2)
                .map(|pair| Complex32::new(pair[0], pair[1]))
                .collect();
            Ok(Vector::Complex(ComplexVector::from_coords(coords)))
        }
        VectorKind::Binary => {
            let bits = values.first().copied().unwrap_or_default();
            let vector = BinaryVector::from_bit_string(bits).ok_or_else(|| "invalid bit string".to_string())?;
            if vector.dimension() != header.dimension {
                return Err(format!(
                    "expected {} bits, found {}",
                    header.dimension,
                    vector.dimension()
                ));
            }
            Ok(Vector::Binary(vector))
        }
    }
}
