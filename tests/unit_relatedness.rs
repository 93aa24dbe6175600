// Integration tests for the relatedness store: loading, row extraction,
// normalization and ranked profiles.

mod common;

use std::fs;
use std::sync::Arc;
use std::thread;

use semeval::relatedness::{CsrMatrix, RelatednessStore, TermIndex};
use semeval::SemevalError;

use common::{dense_rows, fixture_dir, write_relatedness, write_terms, COLS, ROWS};

fn open_fixture(name: &str) -> RelatednessStore {
    let dir = fixture_dir(name);
    let paths = write_relatedness(&dir, "eng");
    RelatednessStore::open_paths(&paths).expect("fixture store should load")
}

// ============================================================
// Construction
// ============================================================

#[test]
fn open_reads_all_terms() {
    let store = open_fixture("open-reads");
    assert_eq!(store.row_terms().len(), ROWS.len());
    assert_eq!(store.col_terms().len(), COLS.len());
    assert!(store.contains("journey"));
    assert!(!store.contains("100"), "second term-file field must be ignored");
}

#[test]
fn open_missing_matrix_is_missing_resource() {
    let dir = fixture_dir("open-missing");
    let paths = write_relatedness(&dir, "eng");
    fs::remove_file(&paths.matrix).unwrap();

    match RelatednessStore::open_paths(&paths) {
        Err(SemevalError::MissingResource { path }) => assert_eq!(path, paths.matrix),
        Err(other) => panic!("expected MissingResource, got {other:?}"),
        Ok(_) => panic!("store must not load without its matrix"),
    }
}

#[test]
fn open_missing_rows_is_missing_resource() {
    let dir = fixture_dir("open-missing-rows");
    let paths = write_relatedness(&dir, "eng");
    fs::remove_file(&paths.rows).unwrap();

    assert!(matches!(
        RelatednessStore::open_paths(&paths),
        Err(SemevalError::MissingResource { .. })
    ));
}

#[test]
fn open_rejects_shape_mismatch() {
    let dir = fixture_dir("open-shape");
    let paths = write_relatedness(&dir, "eng");
    write_terms(&paths.rows, &["alcohol", "crutch"]);

    assert!(matches!(
        RelatednessStore::open_paths(&paths),
        Err(SemevalError::InvalidFormat { .. })
    ));
}

#[test]
fn open_rejects_malformed_json_matrix() {
    let dir = fixture_dir("open-bad-json");
    let paths = write_relatedness(&dir, "eng");
    fs::write(&paths.matrix, "{\"shape\": [5, 8]").unwrap();

    assert!(matches!(
        RelatednessStore::open_paths(&paths),
        Err(SemevalError::Json(_))
    ));
}

#[test]
fn open_rejects_oversized_json_shape() {
    let dir = fixture_dir("open-huge-json");
    let paths = write_relatedness(&dir, "eng");
    fs::write(
        &paths.matrix,
        format!(
            r#"{{"shape":[{},8],"indptr":[0],"indices":[],"data":[]}}"#,
            usize::MAX
        ),
    )
    .unwrap();

    match RelatednessStore::open_paths(&paths) {
        Err(SemevalError::InvalidFormat { path, .. }) => assert_eq!(path, paths.matrix),
        Err(other) => panic!("expected InvalidFormat, got {other:?}"),
        Ok(_) => panic!("corrupt matrix must not load"),
    }
}

#[test]
fn open_rejects_oversized_triplet_header() {
    let dir = fixture_dir("open-huge-triplets");
    let paths = write_relatedness(&dir, "eng");
    let triplets = dir.join("eng-relatedness-model.tsv");
    fs::write(&triplets, format!("{}\t8\n0\t0\t1.0\n", usize::MAX)).unwrap();

    match RelatednessStore::open(&paths.rows, &paths.cols, &triplets) {
        Err(SemevalError::InvalidFormat { line, .. }) => assert_eq!(line, 1),
        Err(other) => panic!("expected InvalidFormat, got {other:?}"),
        Ok(_) => panic!("corrupt matrix must not load"),
    }
}

#[test]
fn open_rejects_triplet_header_disagreeing_with_terms() {
    let dir = fixture_dir("open-triplet-shape");
    let paths = write_relatedness(&dir, "eng");
    let triplets = dir.join("eng-relatedness-model.tsv");
    fs::write(&triplets, "5\t9\n0\t0\t1.0\n").unwrap();

    assert!(matches!(
        RelatednessStore::open(&paths.rows, &paths.cols, &triplets),
        Err(SemevalError::InvalidFormat { .. })
    ));
}

#[test]
fn open_accepts_triplet_matrix() {
    let dir = fixture_dir("open-triplets");
    let paths = write_relatedness(&dir, "eng");
    let triplets = dir.join("eng-relatedness-model.tsv");

    let mut content = format!("{}\t{}\n", ROWS.len(), COLS.len());
    for (r, row) in dense_rows().iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            if *v != 0.0 {
                content.push_str(&format!("{r}\t{c}\t{v}\n"));
            }
        }
    }
    fs::write(&triplets, content).unwrap();

    let from_json = RelatednessStore::open_paths(&paths).unwrap();
    let from_tsv = RelatednessStore::open(&paths.rows, &paths.cols, &triplets).unwrap();
    for term in ROWS {
        assert_eq!(
            from_json.vector(term, false),
            from_tsv.vector(term, false),
            "row {term} differs between formats"
        );
    }
}

#[test]
fn loading_twice_is_deterministic() {
    let dir = fixture_dir("round-trip");
    let paths = write_relatedness(&dir, "eng");
    let a = RelatednessStore::open_paths(&paths).unwrap();
    let b = RelatednessStore::open_paths(&paths).unwrap();

    for term in ROWS {
        assert_eq!(
            a.ranked_relatedness(term, true, true, 0),
            b.ranked_relatedness(term, true, true, 0)
        );
    }
}

// ============================================================
// vector
// ============================================================

#[test]
fn normalized_vector_sums_to_one() {
    let store = open_fixture("vector-sum");
    for term in ["alcohol", "crutch", "life", "journey"] {
        let v = store.vector(term, true).unwrap();
        let sum: f64 = v.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "{term} sums to {sum}");
    }
}

#[test]
fn zero_row_stays_zero_when_normalized() {
    let store = open_fixture("vector-zero");
    let v = store.vector("silence", true).unwrap();
    assert_eq!(v.len(), COLS.len());
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn raw_vector_matches_matrix_row() {
    let store = open_fixture("vector-raw");
    assert_eq!(store.vector("life", false).unwrap(), dense_rows()[2]);
}

#[test]
fn unknown_term_is_none_everywhere() {
    let store = open_fixture("unknown");
    assert!(store.vector("unicorn", true).is_none());
    assert!(store.relatedness("unicorn", true, true).is_none());
    assert!(store.ranked_relatedness("unicorn", true, true, 0).is_none());
    // Column terms are not row terms
    assert!(store.vector("road", false).is_none());
}

// ============================================================
// relatedness / ranked_relatedness
// ============================================================

#[test]
fn relatedness_positive_only_drops_zeros() {
    let store = open_fixture("rel-positive");
    let rel = store.relatedness("journey", false, true).unwrap();
    assert_eq!(rel.len(), 4);
    assert!(!rel.contains_key("support"));
    assert_eq!(rel["road"], 6.0);
}

#[test]
fn relatedness_keeps_all_columns_when_not_filtered() {
    let store = open_fixture("rel-all");
    let rel = store.relatedness("silence", true, false).unwrap();
    assert_eq!(rel.len(), COLS.len());
    assert!(store.relatedness("silence", true, true).unwrap().is_empty());
}

#[test]
fn ranked_relatedness_is_descending() {
    let store = open_fixture("ranked-order");
    let ranked = store.ranked_relatedness("life", true, true, 0).unwrap();
    let terms: Vec<&str> = ranked.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(terms, vec!["time", "pain", "walk", "road", "support"]);
    assert!((ranked[0].1 - 0.375).abs() < 1e-12);
    assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn ranked_relatedness_never_contains_nonpositive() {
    let store = open_fixture("ranked-positive");
    for term in ROWS {
        let ranked = store.ranked_relatedness(term, true, true, 0).unwrap();
        assert!(
            ranked.iter().all(|(_, s)| *s > 0.0),
            "{term} profile has a non-positive score"
        );
    }
}

#[test]
fn ranked_relatedness_truncation_is_prefix() {
    let store = open_fixture("ranked-prefix");
    for term in ROWS {
        let full = store.ranked_relatedness(term, true, true, 0).unwrap();
        let top = store.ranked_relatedness(term, true, true, 3).unwrap();
        assert_eq!(top.len(), full.len().min(3));
        assert_eq!(top[..], full[..top.len()]);
    }
}

#[test]
fn ranked_relatedness_k_larger_than_profile() {
    let store = open_fixture("ranked-large-k");
    let ranked = store.ranked_relatedness("journey", false, true, 100).unwrap();
    assert_eq!(ranked.len(), 4);
}

#[test]
fn ranked_ties_keep_column_order() {
    let rows = TermIndex::build(["t"]);
    let cols = TermIndex::build(["b", "a", "c"]);
    let matrix = CsrMatrix::from_dense(&[vec![1.0, 1.0, 2.0]]).unwrap();
    let store = RelatednessStore::from_parts(rows, cols, matrix).unwrap();

    let ranked = store.ranked_relatedness("t", false, true, 0).unwrap();
    let terms: Vec<&str> = ranked.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(terms, vec!["c", "b", "a"]);
}

// ============================================================
// Sharing
// ============================================================

#[test]
fn store_is_shareable_across_threads() {
    let store = Arc::new(open_fixture("threads"));
    let expected = store.ranked_relatedness("life", true, true, 0);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.ranked_relatedness("life", true, true, 0))
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
