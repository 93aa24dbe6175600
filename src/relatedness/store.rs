// Relatedness store: owns the association matrix and its two term indexes.
//
// A store is either fully loaded or never returned: every artifact is checked
// before anything is parsed. After construction nothing is mutated, so one
// store can be shared by reference (or `Arc`) across threads without locking.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use super::matrix::CsrMatrix;
use super::terms::TermIndex;
use crate::config::RelatednessPaths;
use crate::error::{Result, SemevalError};

/// Column term paired with its relatedness score.
pub type ScoredTerm = (String, f64);

pub struct RelatednessStore {
    rows: TermIndex,
    cols: TermIndex,
    matrix: CsrMatrix,
}

impl RelatednessStore {
    /// Load a store from its three artifacts. Fails with `MissingResource`
    /// before reading anything if any of them is absent.
    pub fn open(rows_path: &Path, cols_path: &Path, matrix_path: &Path) -> Result<Self> {
        for path in [rows_path, cols_path, matrix_path] {
            if !path.is_file() {
                return Err(SemevalError::MissingResource {
                    path: path.to_path_buf(),
                });
            }
        }

        let started = Instant::now();
        let rows = TermIndex::load(rows_path)?;
        let cols = TermIndex::load(cols_path)?;
        let matrix = CsrMatrix::load(matrix_path, (rows.positions_len(), cols.positions_len()))?;

        info!(
            rows = rows.len(),
            cols = cols.len(),
            nnz = matrix.nnz(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded relatedness store from {}",
            matrix_path.display()
        );

        Ok(Self { rows, cols, matrix })
    }

    /// Load the store for a language from resolved artifact paths.
    pub fn open_paths(paths: &RelatednessPaths) -> Result<Self> {
        Self::open(&paths.rows, &paths.cols, &paths.matrix)
    }

    /// Assemble a store from in-memory parts. The matrix shape must match
    /// the number of positions in each index.
    pub fn from_parts(rows: TermIndex, cols: TermIndex, matrix: CsrMatrix) -> Result<Self> {
        if matrix.shape() != (rows.positions_len(), cols.positions_len()) {
            return Err(SemevalError::InvalidArgument(format!(
                "matrix shape {:?} does not match {} row terms and {} column terms",
                matrix.shape(),
                rows.positions_len(),
                cols.positions_len()
            )));
        }
        Ok(Self { rows, cols, matrix })
    }

    pub fn row_terms(&self) -> &TermIndex {
        &self.rows
    }

    pub fn col_terms(&self) -> &TermIndex {
        &self.cols
    }

    pub fn contains(&self, term: &str) -> bool {
        self.rows.contains(term)
    }

    /// Dense relatedness row for `term`, optionally L1-normalized.
    ///
    /// Returns `None` for terms outside the row index. An all-zero row is
    /// returned unchanged when normalizing.
    pub fn vector(&self, term: &str, normalize: bool) -> Option<Vec<f64>> {
        let Some(i) = self.rows.lookup(term) else {
            debug!(term, "Term not in relatedness rows");
            return None;
        };
        let mut row = self.matrix.row_dense(i)?;
        if normalize {
            l1_normalize(&mut row);
        }
        Some(row)
    }

    /// Relatedness of `term` to every column term, keyed by column term.
    ///
    /// With `positive_only`, scores `<= 0` are dropped: zero means "no
    /// evidence", not a judged relation.
    pub fn relatedness(
        &self,
        term: &str,
        normalize: bool,
        positive_only: bool,
    ) -> Option<HashMap<String, f64>> {
        let entries = self.profile_entries(term, normalize, positive_only)?;
        Some(
            entries
                .into_iter()
                .map(|(t, s)| (t.to_string(), s))
                .collect(),
        )
    }

    /// Relatedness profile sorted by descending score. `k > 0` keeps only the
    /// top `k` entries; `k == 0` keeps all of them. Equal scores keep column
    /// order.
    pub fn ranked_relatedness(
        &self,
        term: &str,
        normalize: bool,
        positive_only: bool,
        k: usize,
    ) -> Option<Vec<ScoredTerm>> {
        let mut entries = self.profile_entries(term, normalize, positive_only)?;
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        if k > 0 {
            entries.truncate(k);
        }
        Some(
            entries
                .into_iter()
                .map(|(t, s)| (t.to_string(), s))
                .collect(),
        )
    }

    /// Column-ordered `(column term, score)` pairs for one row. Duplicate
    /// column terms contribute only their canonical position.
    fn profile_entries(
        &self,
        term: &str,
        normalize: bool,
        positive_only: bool,
    ) -> Option<Vec<(&str, f64)>> {
        let row = self.vector(term, normalize)?;
        Some(
            self.cols
                .terms()
                .iter()
                .zip(row)
                .enumerate()
                .filter(|(c, (_, score))| {
                    (!positive_only || *score > 0.0) && self.cols.is_canonical(*c)
                })
                .map(|(_, (t, score))| (t.as_str(), score))
                .collect(),
        )
    }
}

/// Divide every value by the row's L1 norm. Zero rows are left as is.
pub fn l1_normalize(row: &mut [f64]) {
    let norm: f64 = row.iter().map(|v| v.abs()).sum();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}
