// Metaphor interpretation by combined rank.
//
// Xiao, Alnajjar, Granroth-Wilding, Agres & Toivonen (2016), "Meta4meaning:
// Automatic Metaphor Interpretation Using Corpus-Derived Word Associations".
//
// Every column that is positive for the tenor or the vehicle is a candidate
// feature. Candidates are ranked twice: by multiplicative salience
// (tenor × vehicle, shared features only) and by overlap difference
// (vehicle − tenor, shared features only, everything else last). A feature's
// combined rank is the better of its two positions, so it is salient if it
// does well under either criterion.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::store::RelatednessStore;

/// One interpreted feature. Lower rank means more salient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub feature: String,
    pub rank: usize,
}

/// Per-feature scores that feed the two rankings.
///
/// `features` holds column positions in ascending order; `salience` and
/// `overlap_difference` are aligned with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScores {
    pub features: Vec<usize>,
    pub salience: Vec<f64>,
    pub overlap_difference: Vec<f64>,
}

impl FeatureScores {
    /// Score the candidate features of two equally long relatedness rows.
    ///
    /// Non-shared features get zero salience and an overlap difference of
    /// negative infinity, which sorts after every finite value.
    pub fn compute(tenor: &[f64], vehicle: &[f64]) -> Self {
        let features: Vec<usize> = tenor
            .iter()
            .zip(vehicle)
            .enumerate()
            .filter(|(_, (t, v))| **t > 0.0 || **v > 0.0)
            .map(|(c, _)| c)
            .collect();

        let mut salience = Vec::with_capacity(features.len());
        let mut overlap_difference = Vec::with_capacity(features.len());
        for &c in &features {
            let (t, v) = (tenor[c], vehicle[c]);
            if t > 0.0 && v > 0.0 {
                salience.push(t * v);
                overlap_difference.push(v - t);
            } else {
                salience.push(0.0);
                overlap_difference.push(f64::NEG_INFINITY);
            }
        }

        Self {
            features,
            salience,
            overlap_difference,
        }
    }

    /// Combined rank of each feature, aligned with `features`.
    pub fn combined_ranks(&self) -> Vec<usize> {
        let by_salience = descending_positions(&self.salience);
        let by_difference = descending_positions(&self.overlap_difference);
        by_salience
            .into_iter()
            .zip(by_difference)
            .map(|(a, b)| a.min(b))
            .collect()
    }
}

/// For each value, its 0-based position when all values are sorted in
/// descending order. Ties keep input order.
fn descending_positions(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut positions = vec![0; values.len()];
    for (pos, idx) in order.into_iter().enumerate() {
        positions[idx] = pos;
    }
    positions
}

impl RelatednessStore {
    /// Interpret the metaphor "tenor is vehicle" from raw relatedness rows.
    ///
    /// Returns features ordered by ascending combined rank (ties by column
    /// order). Unknown tenor or vehicle yields an empty result.
    pub fn interpret(&self, tenor: &str, vehicle: &str) -> Vec<Interpretation> {
        self.interpret_with(tenor, vehicle, false)
    }

    /// Like [`interpret`](Self::interpret), optionally L1-normalizing both
    /// rows first. Normalization changes the overlap-difference ranking.
    pub fn interpret_with(&self, tenor: &str, vehicle: &str, normalize: bool) -> Vec<Interpretation> {
        let (Some(tv), Some(vv)) = (
            self.vector(tenor, normalize),
            self.vector(vehicle, normalize),
        ) else {
            return Vec::new();
        };

        let scores = FeatureScores::compute(&tv, &vv);
        let ranks = scores.combined_ranks();
        let cols = self.col_terms();

        let mut interpretations: Vec<Interpretation> = scores
            .features
            .iter()
            .zip(ranks)
            .filter(|&(&c, _)| cols.is_canonical(c))
            .filter_map(|(&c, rank)| {
                cols.term(c).map(|feature| Interpretation {
                    feature: feature.to_string(),
                    rank,
                })
            })
            .collect();

        interpretations.sort_by_key(|i| i.rank);
        interpretations
    }
}
