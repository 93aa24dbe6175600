// Precomputed word-vector space in word2vec text format.
//
// Loaded once and read-only afterwards. Every query that ranks the vocabulary
// scans the unit-normalized matrix in parallel with rayon; ties keep
// vocabulary order. Unknown words are filtered out of word lists, and a
// query left with no known word is an `InvalidArgument`.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use super::similarity::{cosine_similarity, dot, mean_vector, unit_vector};
use crate::error::{Result, SemevalError};

/// Word paired with a similarity score.
pub type ScoredWord = (String, f64);

/// Upper bound on up-front allocation from an untrusted header count.
const MAX_PREALLOCATED_WORDS: usize = 1 << 20;

/// Keeps the cosmul denominator away from zero.
const COSMUL_EPSILON: f64 = 1e-6;

pub struct WordVectors {
    words: Vec<String>,
    index: HashMap<String, usize>,
    dim: usize,
    /// Raw vectors, row-major, `words.len() * dim`
    vectors: Vec<f32>,
    /// Unit-length copies of `vectors`
    unit: Vec<f32>,
}

impl WordVectors {
    /// Load a word2vec text file: a `<count> <dim>` header followed by one
    /// `<word> <v1> .. <vdim>` line per word. Invalid UTF-8 is replaced.
    /// Repeated words keep their first vector.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SemevalError::MissingResource {
                path: path.to_path_buf(),
            });
        }

        let started = Instant::now();
        let mut reader = BufReader::new(File::open(path)?);
        let mut buf = Vec::new();

        reader.read_until(b'\n', &mut buf)?;
        let header = String::from_utf8_lossy(&buf).into_owned();
        let fields: Vec<&str> = header.split_whitespace().collect();
        let (count, dim) = match fields.as_slice() {
            [c, d] => match (c.parse::<usize>(), d.parse::<usize>()) {
                (Ok(c), Ok(d)) if d > 0 => (c, d),
                _ => {
                    return Err(SemevalError::invalid_format(
                        path,
                        1,
                        "header must be `<count> <dim>` with dim > 0",
                    ))
                }
            },
            _ => {
                return Err(SemevalError::invalid_format(
                    path,
                    1,
                    "header must be `<count> <dim>`",
                ))
            }
        };

        let progress = ProgressBar::new(count as u64);
        progress.set_style(
            ProgressStyle::with_template("  [{bar:40.cyan/blue}] {pos}/{len} words ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        let mut entries: Vec<(String, Vec<f32>)> =
            Vec::with_capacity(count.min(MAX_PREALLOCATED_WORDS));
        for line_no in 2..count.saturating_add(2) {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                progress.abandon();
                return Err(SemevalError::invalid_format(
                    path,
                    line_no,
                    format!("expected {count} vectors, file ended after {}", line_no - 2),
                ));
            }
            let line = String::from_utf8_lossy(&buf);
            let mut parts = line.trim_end().split(' ');
            let word = parts.next().unwrap_or("").to_string();
            let values = parts
                .filter(|p| !p.is_empty())
                .map(|p| p.parse::<f32>())
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| SemevalError::invalid_format(path, line_no, e.to_string()))?;
            if values.len() != dim {
                return Err(SemevalError::invalid_format(
                    path,
                    line_no,
                    format!("expected {dim} values for {word:?}, found {}", values.len()),
                ));
            }
            entries.push((word, values));
            progress.inc(1);
        }
        progress.finish_and_clear();

        let vectors = Self::from_entries(dim, entries)?;
        info!(
            words = vectors.len(),
            dim,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded word vectors from {}",
            path.display()
        );
        Ok(vectors)
    }

    /// Build a space from in-memory `(word, vector)` pairs.
    pub fn from_entries(dim: usize, entries: Vec<(String, Vec<f32>)>) -> Result<Self> {
        if dim == 0 {
            return Err(SemevalError::InvalidArgument(
                "vector dimension must be positive".to_string(),
            ));
        }

        let mut words = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len() * dim);
        let mut unit = Vec::with_capacity(entries.len() * dim);

        for (word, values) in entries {
            if values.len() != dim {
                return Err(SemevalError::InvalidArgument(format!(
                    "vector for {word:?} has {} values, expected {dim}",
                    values.len()
                )));
            }
            if index.contains_key(&word) {
                warn!(word = %word, "Duplicate word in vector space, keeping the first");
                continue;
            }
            index.insert(word.clone(), words.len());
            unit.extend(unit_vector(&values));
            vectors.extend(values);
            words.push(word);
        }

        Ok(Self {
            words,
            index,
            dim,
            vectors,
            unit,
        })
    }

    /// Words in file order.
    pub fn vocabulary(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Raw vector for `word`.
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        let i = *self.index.get(word)?;
        Some(&self.vectors[i * self.dim..(i + 1) * self.dim])
    }

    fn unit_row(&self, i: usize) -> &[f32] {
        &self.unit[i * self.dim..(i + 1) * self.dim]
    }

    /// Indices of the known words, in input order.
    fn known<S: AsRef<str>>(&self, words: &[S]) -> Vec<usize> {
        words
            .iter()
            .filter_map(|w| self.index.get(w.as_ref()).copied())
            .collect()
    }

    /// Cosine similarity between two words. `None` if either is unknown.
    pub fn similarity(&self, w1: &str, w2: &str) -> Option<f64> {
        let a = *self.index.get(w1)?;
        let b = *self.index.get(w2)?;
        Some(dot(self.unit_row(a), self.unit_row(b)))
    }

    /// Cosine similarity between the mean vectors of two word lists.
    pub fn n_similarity<S: AsRef<str>>(&self, ws1: &[S], ws2: &[S]) -> Result<f64> {
        let v1 = self.centroid(ws1);
        let v2 = self.centroid(ws2);
        match (v1, v2) {
            (Some(a), Some(b)) => Ok(cosine_similarity(&a, &b)),
            _ => Err(SemevalError::InvalidArgument(
                "At least one of the passed lists has no known words".to_string(),
            )),
        }
    }

    /// Words closest to the mean of the positive words minus the negative
    /// ones. `topn == 0` returns the whole ranked vocabulary.
    pub fn most_similar<S: AsRef<str>>(
        &self,
        positive: &[S],
        negative: &[S],
        topn: usize,
    ) -> Result<Vec<ScoredWord>> {
        let pos = self.known(positive);
        let neg = self.known(negative);
        if pos.is_empty() && neg.is_empty() {
            return Err(no_input());
        }

        let weighted: Vec<Vec<f32>> = pos
            .iter()
            .map(|&i| self.unit_row(i).to_vec())
            .chain(
                neg.iter()
                    .map(|&i| self.unit_row(i).iter().map(|x| -x).collect()),
            )
            .collect();
        let refs: Vec<&[f32]> = weighted.iter().map(Vec::as_slice).collect();
        let query = unit_vector(&mean_vector(&refs).ok_or_else(no_input)?);

        let scores = self.scan(|row| dot(row, &query));
        let exclude: HashSet<usize> = pos.into_iter().chain(neg).collect();
        Ok(self.top(&scores, &exclude, topn))
    }

    /// Multiplicative combination of similarities (Levy & Goldberg, 2014).
    pub fn most_similar_cosmul<S: AsRef<str>>(
        &self,
        positive: &[S],
        negative: &[S],
        topn: usize,
    ) -> Result<Vec<ScoredWord>> {
        let pos = self.known(positive);
        let neg = self.known(negative);
        if pos.is_empty() && neg.is_empty() {
            return Err(no_input());
        }

        let pos_rows: Vec<&[f32]> = pos.iter().map(|&i| self.unit_row(i)).collect();
        let neg_rows: Vec<&[f32]> = neg.iter().map(|&i| self.unit_row(i)).collect();

        let scores = self.scan(|row| {
            let p: f64 = pos_rows.iter().map(|t| (1.0 + dot(row, t)) / 2.0).product();
            let n: f64 = neg_rows.iter().map(|t| (1.0 + dot(row, t)) / 2.0).product();
            p / (n + COSMUL_EPSILON)
        });
        let exclude: HashSet<usize> = pos.into_iter().chain(neg).collect();
        Ok(self.top(&scores, &exclude, topn))
    }

    /// Nearest `topn` words to `word`.
    pub fn neighbours(&self, word: &str, topn: usize) -> Result<Vec<ScoredWord>> {
        let none: [&str; 0] = [];
        self.most_similar(&[word], &none, topn)
    }

    /// Every word whose similarity to `word` is at least `threshold`.
    pub fn neighbours_threshold(&self, word: &str, threshold: f64) -> Result<Vec<ScoredWord>> {
        let none: [&str; 0] = [];
        let mut ranked = self.most_similar(&[word], &none, 0)?;
        ranked.retain(|(_, score)| *score >= threshold);
        Ok(ranked)
    }

    /// "a is to b as c is to ?"
    pub fn analogy(&self, a: &str, b: &str, c: &str, topn: usize) -> Result<Vec<ScoredWord>> {
        self.most_similar(&[b, c], &[a], topn)
    }

    /// The single word that best summarizes `words`.
    pub fn theme<S: AsRef<str>>(&self, words: &[S]) -> Result<ScoredWord> {
        let none: [&str; 0] = [];
        let known: Vec<&str> = words
            .iter()
            .map(|w| w.as_ref())
            .filter(|w| self.contains(w))
            .collect();
        self.most_similar(&known, &none, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                SemevalError::InvalidArgument("no candidate words outside the input".to_string())
            })
    }

    /// Mean raw vector of the known words; `None` when none is known.
    pub fn centroid<S: AsRef<str>>(&self, words: &[S]) -> Option<Vec<f32>> {
        let rows: Vec<&[f32]> = words.iter().filter_map(|w| self.vector(w.as_ref())).collect();
        mean_vector(&rows)
    }

    /// Mean vector of a token sequence. Fails if no token is known.
    pub fn to_vector<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<f32>> {
        self.centroid(tokens).ok_or_else(|| {
            SemevalError::InvalidArgument("No words in the text found in the model.".to_string())
        })
    }

    /// Words closest to an arbitrary vector. Nothing is excluded.
    pub fn similar_by_vector(&self, vector: &[f32], topn: usize) -> Result<Vec<ScoredWord>> {
        if vector.len() != self.dim {
            return Err(SemevalError::InvalidArgument(format!(
                "vector has {} dimensions, space has {}",
                vector.len(),
                self.dim
            )));
        }
        let query = unit_vector(vector);
        let scores = self.scan(|row| dot(row, &query));
        Ok(self.top(&scores, &HashSet::new(), topn))
    }

    /// Project `word` from `source` into `target` (aligned spaces, e.g. two
    /// languages). `Ok(None)` when `word` is unknown in `source`.
    pub fn align(
        source: &WordVectors,
        target: &WordVectors,
        word: &str,
        topn: usize,
    ) -> Result<Option<Vec<ScoredWord>>> {
        match source.vector(word) {
            Some(v) => target.similar_by_vector(v, topn).map(Some),
            None => Ok(None),
        }
    }

    /// [`align`](Self::align) with `self` as the source space.
    pub fn project(
        &self,
        word: &str,
        target: &WordVectors,
        topn: usize,
    ) -> Result<Option<Vec<ScoredWord>>> {
        Self::align(self, target, word, topn)
    }

    /// Score every unit row in parallel.
    fn scan<F>(&self, score: F) -> Vec<f64>
    where
        F: Fn(&[f32]) -> f64 + Sync + Send,
    {
        self.unit.par_chunks(self.dim).map(score).collect()
    }

    /// Highest scores first, skipping `exclude`. `topn == 0` keeps all.
    fn top(&self, scores: &[f64], exclude: &HashSet<usize>, topn: usize) -> Vec<ScoredWord> {
        let mut order: Vec<usize> = (0..scores.len())
            .filter(|i| !exclude.contains(i))
            .collect();
        order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));
        if topn > 0 {
            order.truncate(topn);
        }
        order
            .into_iter()
            .map(|i| (self.words[i].clone(), scores[i]))
            .collect()
    }
}

fn no_input() -> SemevalError {
    SemevalError::InvalidArgument("cannot compute similarity with no known input words".to_string())
}
