// Sparse relatedness matrix in compressed-sparse-row layout.
//
// The on-disk artifact is either the CSR arrays serialized as JSON
// (`{"shape": [r, c], "indptr": [...], "indices": [...], "data": [...]}`) or a
// coordinate-triplet text file. Once loaded the matrix is never mutated; the
// only read path is densifying one row at a time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SemevalError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Build from `(row, col, value)` triplets. Duplicate coordinates are
    /// summed; explicit zeros are kept out of the structure.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self> {
        let mut per_row: Vec<Vec<(usize, f64)>> = vec![Vec::new(); rows];
        for (r, c, v) in triplets {
            if r >= rows || c >= cols {
                return Err(SemevalError::InvalidArgument(format!(
                    "entry ({r}, {c}) outside shape {rows}x{cols}"
                )));
            }
            per_row[r].push((c, v));
        }

        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for mut entries in per_row {
            entries.sort_by_key(|&(c, _)| c);
            let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
            for (c, v) in entries {
                match merged.last_mut() {
                    Some(last) if last.0 == c => last.1 += v,
                    _ => merged.push((c, v)),
                }
            }
            for (c, v) in merged {
                if v != 0.0 {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }

        Ok(Self {
            shape: (rows, cols),
            indptr,
            indices,
            data,
        })
    }

    /// Build from dense rows. All rows must have the same length.
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(SemevalError::InvalidArgument(format!(
                "row {bad} has {} values, expected {cols}",
                rows[bad].len()
            )));
        }
        let triplets = rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0.0)
                .map(move |(c, v)| (r, c, *v))
        });
        Self::from_triplets(rows.len(), cols, triplets)
    }

    /// Load a matrix artifact whose shape must be `expected` (row term lines,
    /// column term lines). Paths ending in `.json` are read as serialized CSR
    /// arrays; anything else as coordinate triplets. The stored shape is
    /// checked against `expected` before anything is sized from it.
    pub fn load(path: &Path, expected: (usize, usize)) -> Result<Self> {
        if !path.is_file() {
            return Err(SemevalError::MissingResource {
                path: path.to_path_buf(),
            });
        }

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let matrix = if is_json {
            let bytes = fs::read(path)?;
            let matrix: CsrMatrix = serde_json::from_slice(&bytes)?;
            check_shape(path, 0, matrix.shape, expected)?;
            matrix
                .validate()
                .map_err(|message| SemevalError::invalid_format(path, 0, message))?;
            matrix
        } else {
            Self::parse_triplets(path, &fs::read_to_string(path)?, expected)?
        };

        debug!(
            path = %path.display(),
            rows = matrix.shape.0,
            cols = matrix.shape.1,
            nnz = matrix.nnz(),
            "Loaded relatedness matrix"
        );
        Ok(matrix)
    }

    /// Parse the triplet text format: a `rows<TAB>cols` header followed by
    /// `row<TAB>col<TAB>value` lines. Blank lines are ignored.
    fn parse_triplets(path: &Path, content: &str, expected: (usize, usize)) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let (header_no, header) = lines
            .next()
            .ok_or_else(|| SemevalError::invalid_format(path, 1, "missing shape header"))?;
        let shape: Vec<&str> = header.split_whitespace().collect();
        let (rows, cols) = match shape.as_slice() {
            [r, c] => (
                parse_field::<usize>(path, header_no, r)?,
                parse_field::<usize>(path, header_no, c)?,
            ),
            _ => {
                return Err(SemevalError::invalid_format(
                    path,
                    header_no + 1,
                    "header must be `rows cols`",
                ))
            }
        };
        check_shape(path, header_no + 1, (rows, cols), expected)?;

        let mut triplets = Vec::new();
        for (no, line) in lines {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [r, c, v] = fields.as_slice() else {
                return Err(SemevalError::invalid_format(
                    path,
                    no + 1,
                    "expected `row col value`",
                ));
            };
            let r = parse_field::<usize>(path, no, r)?;
            let c = parse_field::<usize>(path, no, c)?;
            let v = parse_field::<f64>(path, no, v)?;
            if r >= rows || c >= cols {
                return Err(SemevalError::invalid_format(
                    path,
                    no + 1,
                    format!("entry ({r}, {c}) outside shape {rows}x{cols}"),
                ));
            }
            triplets.push((r, c, v));
        }

        Self::from_triplets(rows, cols, triplets)
    }

    /// Structural checks for deserialized arrays.
    fn validate(&self) -> std::result::Result<(), String> {
        let (rows, cols) = self.shape;
        if rows.checked_add(1) != Some(self.indptr.len()) {
            return Err(format!(
                "indptr has {} entries for {rows} rows",
                self.indptr.len()
            ));
        }
        if self.indices.len() != self.data.len() {
            return Err(format!(
                "indices ({}) and data ({}) differ in length",
                self.indices.len(),
                self.data.len()
            ));
        }
        if self.indptr.first() != Some(&0) || self.indptr.last() != Some(&self.data.len()) {
            return Err("indptr must start at 0 and end at nnz".to_string());
        }
        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err("indptr is not monotone".to_string());
        }
        if let Some(&c) = self.indices.iter().find(|&&c| c >= cols) {
            return Err(format!("column index {c} out of range for {cols} columns"));
        }
        Ok(())
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.0
    }

    pub fn cols(&self) -> usize {
        self.shape.1
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Densify row `i` into a vector of `cols` values.
    pub fn row_dense(&self, i: usize) -> Option<Vec<f64>> {
        if i >= self.shape.0 {
            return None;
        }
        let mut row = vec![0.0; self.shape.1];
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        for (&c, &v) in self.indices[start..end].iter().zip(&self.data[start..end]) {
            row[c] += v;
        }
        Some(row)
    }
}

/// Reject a stored shape that disagrees with the term files.
fn check_shape(
    path: &Path,
    line: usize,
    found: (usize, usize),
    expected: (usize, usize),
) -> Result<()> {
    if found != expected {
        return Err(SemevalError::invalid_format(
            path,
            line,
            format!(
                "matrix shape {}x{} does not match {} row terms and {} column terms",
                found.0, found.1, expected.0, expected.1
            ),
        ));
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(path: &Path, line_no: usize, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| SemevalError::invalid_format(path, line_no + 1, format!("{raw:?}: {e}")))
}
