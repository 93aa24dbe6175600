// Colored terminal output for query results.
//
// main.rs delegates all human-readable rendering here; `--json` output
// bypasses this module entirely.

use colored::Colorize;

use super::truncate_chars;
use crate::embeddings::ScoredWord;
use crate::relatedness::{Interpretation, Metaphoricity, ScoredTerm};

/// Widest term shown before truncation.
const TERM_WIDTH: usize = 32;

/// Display a ranked relatedness profile.
pub fn display_profile(term: &str, profile: &[ScoredTerm]) {
    println!(
        "\n{}",
        format!("=== Relatedness of '{term}' ({} terms) ===", profile.len()).bold()
    );
    if profile.is_empty() {
        println!("  {}", "No related terms.".dimmed());
        return;
    }
    print_scored(profile);
}

/// Display an interpretation in combined-rank order.
pub fn display_interpretation(tenor: &str, vehicle: &str, features: &[Interpretation]) {
    println!(
        "\n{}",
        format!("=== '{tenor}' is '{vehicle}' ({} features) ===", features.len()).bold()
    );
    if features.is_empty() {
        println!(
            "  {}",
            "No interpretation: tenor or vehicle unknown, or no features.".dimmed()
        );
        return;
    }

    println!("  {:>6}  {}", "Rank".dimmed(), "Feature".dimmed());
    println!("  {}", "-".repeat(TERM_WIDTH + 8).dimmed());
    for f in features {
        let rank = format!("{:>6}", f.rank);
        let rank = if f.rank < 10 {
            rank.bright_green()
        } else {
            rank.normal()
        };
        println!("  {}  {}", rank, truncate_chars(&f.feature, TERM_WIDTH));
    }
}

/// Display the three metaphoricity scalars.
pub fn display_metaphoricity(tenor: &str, vehicle: &str, tokens: &[String], m: &Metaphoricity) {
    println!(
        "\n{}",
        format!("=== Metaphoricity of '{tenor}' is '{vehicle}' ===").bold()
    );
    println!("  Expression: {}", tokens.join(" ").dimmed());
    println!("  tv_score:   {:.6}", m.tv_score);
    println!("  vt_diff:    {:.6}", m.vt_diff);
    let combined = format!("{:.6}", m.combined);
    let combined = if m.combined > 0.0 {
        combined.bright_green().bold()
    } else {
        combined.dimmed()
    };
    println!("  combined:   {combined}");
}

/// Display ranked words from a vector-space query.
pub fn display_words(title: &str, words: &[ScoredWord]) {
    println!("\n{}", format!("=== {title} ===").bold());
    if words.is_empty() {
        println!("  {}", "No results.".dimmed());
        return;
    }
    print_scored(words);
}

/// Display a vector, eliding the middle of long ones.
pub fn display_vector(label: &str, vector: &[f32]) {
    println!(
        "\n{}",
        format!("=== {label} ({} dims) ===", vector.len()).bold()
    );
    let shown: Vec<String> = if vector.len() > 10 {
        vector[..5]
            .iter()
            .map(|v| format!("{v:.4}"))
            .chain(std::iter::once("...".to_string()))
            .chain(vector[vector.len() - 5..].iter().map(|v| format!("{v:.4}")))
            .collect()
    } else {
        vector.iter().map(|v| format!("{v:.4}")).collect()
    };
    println!("  [{}]", shown.join(", "));
}

fn print_scored(entries: &[(String, f64)]) {
    println!(
        "  {:>4}  {:<width$} {:>10}",
        "#".dimmed(),
        "Term".dimmed(),
        "Score".dimmed(),
        width = TERM_WIDTH
    );
    println!("  {}", "-".repeat(TERM_WIDTH + 17).dimmed());
    for (i, (term, score)) in entries.iter().enumerate() {
        println!(
            "  {:>4}. {:<width$} {:>10.6}",
            i + 1,
            truncate_chars(term, TERM_WIDTH),
            score,
            width = TERM_WIDTH
        );
    }
}
