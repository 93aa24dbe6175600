// Metaphoricity of an expression for a tenor/vehicle pair.
//
// Alnajjar & Toivonen (2020), "Computational Generation of Slogans".
//
// `tv_score` rewards vocabulary related to both tenor and vehicle;
// `vt_diff` rewards vocabulary more related to the vehicle than the tenor.
// The combined score is their mean, gated on both being positive.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::store::RelatednessStore;
use crate::error::{Result, SemevalError};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metaphoricity {
    pub tv_score: f64,
    pub vt_diff: f64,
    pub combined: f64,
}

impl Metaphoricity {
    /// The "no metaphoricity" result.
    pub const ZERO: Metaphoricity = Metaphoricity {
        tv_score: 0.0,
        vt_diff: 0.0,
        combined: 0.0,
    };

    /// Score expression tokens against two relatedness profiles. Tokens
    /// missing from a profile score 0.0 there.
    pub fn from_profiles<S: AsRef<str>>(
        tenor: &HashMap<String, f64>,
        vehicle: &HashMap<String, f64>,
        expression: &[S],
    ) -> Self {
        if expression.is_empty() {
            return Self::ZERO;
        }

        let mut t_relatedness = f64::NEG_INFINITY;
        let mut v_relatedness = f64::NEG_INFINITY;
        let mut vt_diff = f64::NEG_INFINITY;

        for token in expression {
            let token = token.as_ref();
            let t = tenor.get(token).copied().unwrap_or(0.0);
            let v = vehicle.get(token).copied().unwrap_or(0.0);
            t_relatedness = t_relatedness.max(t);
            v_relatedness = v_relatedness.max(v);
            vt_diff = vt_diff.max(v - t);
        }

        let tv_score = t_relatedness * v_relatedness;
        let combined = if tv_score > 0.0 && vt_diff > 0.0 {
            (tv_score + vt_diff) / 2.0
        } else {
            0.0
        };

        Self {
            tv_score,
            vt_diff,
            combined,
        }
    }
}

/// Runs of non-space, non-punctuation characters, or a single punctuation mark.
const TOKEN_PATTERN: &str = r#"[^\s.,!?;:"'()\[\]]+|[.,!?;:"'()\[\]]"#;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"))
}

/// Split free text into expression tokens. Punctuation marks become their
/// own tokens so they can still match profile entries such as ".".
pub fn tokenize_expression(text: &str) -> Vec<String> {
    token_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

impl RelatednessStore {
    /// Metaphoricity of `expression` for the metaphor "tenor is vehicle".
    ///
    /// Profiles are positive-only and ranked; `k > 0` keeps only the top `k`
    /// terms of each. `k` must be below the number of row terms. Unknown
    /// terms, empty profiles and empty expressions all give
    /// [`Metaphoricity::ZERO`].
    pub fn metaphoricity<S: AsRef<str>>(
        &self,
        tenor: &str,
        vehicle: &str,
        expression: &[S],
        k: usize,
        normalize: bool,
    ) -> Result<Metaphoricity> {
        let tenor_profile = self.ranked_relatedness(tenor, normalize, true, 0);
        let vehicle_profile = self.ranked_relatedness(vehicle, normalize, true, 0);

        let (Some(mut tp), Some(mut vp)) = (tenor_profile, vehicle_profile) else {
            return Ok(Metaphoricity::ZERO);
        };
        if tp.is_empty() || vp.is_empty() {
            return Ok(Metaphoricity::ZERO);
        }

        if k > 0 {
            let limit = self.row_terms().len();
            if k >= limit {
                return Err(SemevalError::InvalidArgument(format!(
                    "k must be positive and less than {limit}, got {k}"
                )));
            }
            tp.truncate(k);
            vp.truncate(k);
        }

        let tp: HashMap<String, f64> = tp.into_iter().collect();
        let vp: HashMap<String, f64> = vp.into_iter().collect();

        Ok(Metaphoricity::from_profiles(&tp, &vp, expression))
    }
}
