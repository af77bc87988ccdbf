//! Agreement between vector overlaps and human similarity judgments.
//!
//! [`evaluate_pairs`] reads `term1,term2,score` lines, scores every pair
//! whose two terms have vectors, and correlates model overlaps with the
//! reference scores.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{PsiError, Result};
use crate::vector_store::LoadedVectorStore;

/// Outcome of a pairwise evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// Pairs with vectors for both terms.
    pub pairs_scored: usize,
    /// Pairs skipped because a term had no vector.
    pub pairs_missing: usize,
    /// Pearson's r between reference scores and overlaps.
    pub pearson: f64,
    /// Spearman's rho between reference scores and overlaps.
    pub spearman: f64,
}

/// Pearson correlation, computed as the cosine of the mean-centred samples.
///
/// # Errors
///
/// Returns [`PsiError::Correlation`] if the samples differ in length, are
/// empty, or either is constant.
#[allow(clippy::cast_precision_loss)]
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(PsiError::Correlation(format!(
            "sample lengths differ: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(PsiError::Correlation("empty samples".into()));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut dot = 0.0;
    let mut norm_x = 0.0;
    let mut norm_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        dot += dx * dy;
        norm_x += dx * dx;
        norm_y += dy * dy;
    }
    if norm_x == 0.0 || norm_y == 0.0 {
        return Err(PsiError::Correlation("constant sample".into()));
    }
    Ok((dot / (norm_x.sqrt() * norm_y.sqrt())).clamp(-1.0, 1.0))
}

/// Spearman rank correlation; tied values share their average rank.
///
/// # Errors
///
/// Same conditions as [`pearson`].
pub fn spearman(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(PsiError::Correlation(format!(
            "sample lengths differ: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    pearson(&ranks(x), &ranks(y))
}

/// One-based ranks with ties averaged.
#[allow(clippy::cast_precision_loss)]
fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold equal values; ranks are one-based.
        let average = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = average;
        }
        start = end;
    }
    ranks
}

/// Score `term1,term2,score` pairs against `store`.
///
/// Terms are lower-cased. A first line whose score does not parse is
/// treated as a header; later unparsable lines are logged and skipped.
///
/// # Errors
///
/// Returns an IO error, or [`PsiError::Correlation`] if fewer than two
/// pairs could be scored or the scores are constant.
pub fn evaluate_pairs<R: BufRead>(store: &LoadedVectorStore, reader: R) -> Result<CorrelationReport> {
    let mut human = Vec::new();
    let mut model = Vec::new();
    let mut pairs_missing = 0;

    for (n, line) in reader.lines().enumerate() {
        let line = line?.to_lowercase();
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let score = parts.get(2).and_then(|s| s.parse::<f64>().ok());
        let (Some(score), [first, second, ..]) = (score, parts.as_slice()) else {
            if n > 0 {
                tracing::warn!("Ignoring malformed pair on line {}: {}", n + 1, line);
            }
            continue;
        };

        match (store.get(first), store.get(second)) {
            (Some(a), Some(b)) => {
                human.push(score);
                model.push(f64::from(a.overlap(b)?));
            }
            (a, b) => {
                if a.is_none() {
                    tracing::warn!("Vector not found for term {}", first);
                }
                if b.is_none() {
                    tracing::warn!("Vector not found for term {}", second);
                }
                pairs_missing += 1;
            }
        }
    }

    if human.len() < 2 {
        return Err(PsiError::Correlation(format!(
            "need at least two scored pairs, found {}",
            human.len()
        )));
    }

    let report = CorrelationReport {
        pairs_scored: human.len(),
        pairs_missing,
        pearson: pearson(&human, &model)?,
        spearman: spearman(&human, &model)?,
    };
    tracing::info!(
        "Pearson's r = {:.4}, Spearman's rho = {:.4} over {} pairs ({} missing)",
        report.pearson,
        report.spearman,
        report.pairs_scored,
        report.pairs_missing
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::StoreHeader;
    use semvec_vsa::{Vector, VectorKind};
    use std::collections::BTreeMap;
    use std::io::Cursor;

    #[test]
    fn test_pearson_perfect() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_errors() {
        assert!(pearson(&[1.0], &[1.0, 2.0]).is_err());
        assert!(pearson(&[], &[]).is_err());
        assert!(pearson(&[1.0, 1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_ranks_average_ties() {
        assert_eq!(ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
    }

    #[test]
    fn test_spearman_monotonic() {
        let rho = spearman(&[1.0, 2.0, 3.0, 4.0], &[1.0, 10.0, 100.0, 1000.0]).unwrap();
        assert!((rho - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_pairs() {
        let mut vectors = BTreeMap::new();
        vectors.insert("cat".to_string(), Vector::from_real(vec![1.0, 0.0, 0.0]));
        vectors.insert("dog".to_string(), Vector::from_real(vec![0.8, 0.6, 0.0]));
        vectors.insert("car".to_string(), Vector::from_real(vec![0.0, 0.0, 1.0]));
        let store = LoadedVectorStore {
            header: StoreHeader::new(VectorKind::Real, 3),
            vectors,
        };
        let input = "word1,word2,score\nCat,Dog,8.0\ncat,car,1.0\ndog,car,2.0\ncat,unicorn,5.0\n";
        let report = evaluate_pairs(&store, Cursor::new(input)).unwrap();
        assert_eq!(report.pairs_scored, 3);
        assert_eq!(report.pairs_missing, 1);
        // Overlaps 0.8, 0.0, 0.0 against scores 8, 1, 2.
        assert!(report.pearson > 0.9);
        assert!(report.spearman > 0.5);
    }

    #[test]
    fn test_evaluate_pairs_needs_two_pairs() {
        let store = LoadedVectorStore {
            header: StoreHeader::new(VectorKind::Real, 3),
            vectors: BTreeMap::new(),
        };
        assert!(evaluate_pairs(&store, Cursor::new("a,b,1.0\n")).is_err());
    }
}
