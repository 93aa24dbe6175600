// Shared fixtures for integration tests.
//
// Artifacts are written under std::env::temp_dir() in a directory unique to
// the test name and process, so parallel tests never share files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use semeval::config::RelatednessPaths;
use semeval::relatedness::CsrMatrix;

pub const ROWS: [&str; 5] = ["alcohol", "crutch", "life", "journey", "silence"];

pub const COLS: [&str; 8] = [
    "support", "escape", "lean", "drink", "walk", "road", "time", "pain",
];

/// Raw co-occurrence counts, one row per entry of `ROWS`.
pub fn dense_rows() -> Vec<Vec<f64>> {
    vec![
        // support escape lean drink walk road time pain
        vec![2.0, 4.0, 1.0, 8.0, 0.0, 0.0, 0.0, 3.0], // alcohol (sum 18)
        vec![6.0, 1.0, 5.0, 0.0, 2.0, 0.0, 0.0, 2.0], // crutch (sum 16)
        vec![1.0, 0.0, 0.0, 0.0, 3.0, 2.0, 6.0, 4.0], // life (sum 16)
        vec![0.0, 1.0, 0.0, 0.0, 5.0, 6.0, 3.0, 0.0], // journey (sum 15)
        vec![0.0; 8],                                 // silence
    ]
}

/// Fresh, empty directory for one test.
pub fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("semeval-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create fixture dir");
    dir
}

/// Write term files with a second tab-separated field, as real term files
/// carry frequency columns.
pub fn write_terms(path: &Path, terms: &[&str]) {
    let content: String = terms
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{t}\t{}\n", 100 - i))
        .collect();
    fs::write(path, content).expect("write term file");
}

/// Write the standard fixture for `lang` into `dir` and return its paths.
pub fn write_relatedness(dir: &Path, lang: &str) -> RelatednessPaths {
    let paths = RelatednessPaths::for_language(dir, lang);
    write_terms(&paths.rows, &ROWS);
    write_terms(&paths.cols, &COLS);
    let matrix = CsrMatrix::from_dense(&dense_rows()).expect("fixture matrix");
    fs::write(
        &paths.matrix,
        serde_json::to_string(&matrix).expect("serialize matrix"),
    )
    .expect("write matrix");
    paths
}

/// A small word2vec text file with a clear king/queen/man/woman geometry.
pub const VECTORS_ENG: &str = "5 3
king 0.9 0.8 0.1
queen 0.9 0.1 0.8
man 0.5 0.9 0.0
woman 0.5 0.0 0.9
apple 0.0 0.1 -0.2
";

/// A second space aligned with `VECTORS_ENG`.
pub const VECTORS_FIN: &str = "3 3
kuningas 0.9 0.8 0.1
kuningatar 0.9 0.1 0.8
omena 0.0 0.1 -0.2
";

pub fn write_vectors(dir: &Path, lang: &str, content: &str) -> PathBuf {
    let path = dir.join(format!("vectors-{lang}.txt"));
    fs::write(&path, content).expect("write vectors");
    path
}
