// Word embeddings: similarity, analogy and neighbourhood queries over a
// precomputed vector space.

pub mod similarity;
pub mod vectors;

pub use vectors::{ScoredWord, WordVectors};
