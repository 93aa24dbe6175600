// Relatedness: figurative association scoring over a term-by-term
// co-occurrence matrix.

pub mod interpret;
pub mod matrix;
pub mod metaphoricity;
pub mod store;
pub mod terms;

pub use interpret::{FeatureScores, Interpretation};
pub use matrix::CsrMatrix;
pub use metaphoricity::{tokenize_expression, Metaphoricity};
pub use store::{RelatednessStore, ScoredTerm};
pub use terms::TermIndex;
