// Semeval: lexical-semantic queries over precomputed vector spaces.
//
// This is the library root. `relatedness` scores figurative associations
// from a co-occurrence matrix; `embeddings` answers similarity queries over
// a word-vector space. The CLI in main.rs is a thin caller.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod output;
pub mod relatedness;
pub mod status;

pub use error::{Result, SemevalError};
