// Term index: bidirectional mapping between terms and matrix positions.
//
// Built from a plain term list where each line's first tab-delimited field is
// the term and the line number is its position. Rows and columns each get
// their own index; they do not need to share an order.
//
// Duplicate terms keep every line in the position list (so column positions
// stay aligned with the matrix) while the term lookup points at the last
// occurrence.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, SemevalError};

/// Immutable term ↔ position mapping.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    /// Term at each position, in file order (one entry per line)
    terms: Vec<String>,
    /// Term → position of its last occurrence
    positions: HashMap<String, usize>,
}

impl TermIndex {
    /// Build an index from raw lines. Only the first tab-delimited field of
    /// each line is kept; a trailing `\r` is stripped.
    pub fn build<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = lines
            .into_iter()
            .map(|line| {
                let line = line.as_ref();
                let line = line.strip_suffix('\r').unwrap_or(line);
                line.split('\t').next().unwrap_or("").to_string()
            })
            .collect();

        let mut positions = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            positions.insert(term.clone(), i);
        }

        Self { terms, positions }
    }

    /// Read a UTF-8 term file, one term per line.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SemevalError::MissingResource {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::build(content.lines()))
    }

    /// Position of `term` (its last occurrence when duplicated).
    pub fn lookup(&self, term: &str) -> Option<usize> {
        self.positions.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.positions.contains_key(term)
    }

    /// Term stored at `position`, if in range.
    pub fn term(&self, position: usize) -> Option<&str> {
        self.terms.get(position).map(String::as_str)
    }

    /// All terms in position order, including duplicates.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of positions (lines), which is the matrix dimension this index
    /// must match.
    pub fn positions_len(&self) -> usize {
        self.terms.len()
    }

    /// True when `position` is the one `lookup` resolves its term to.
    pub(crate) fn is_canonical(&self, position: usize) -> bool {
        self.term(position)
            .and_then(|t| self.lookup(t))
            .is_some_and(|p| p == position)
    }
}
