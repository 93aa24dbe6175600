// Artifact status display: which models are available per language.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::config::Config;

/// Availability of one artifact file.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactStatus {
    pub path: String,
    pub present: bool,
    pub size_bytes: Option<u64>,
}

/// Availability of everything a language needs.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageStatus {
    pub lang: String,
    pub relatedness: Vec<ArtifactStatus>,
    pub vectors: ArtifactStatus,
}

impl LanguageStatus {
    pub fn relatedness_ready(&self) -> bool {
        self.relatedness.iter().all(|a| a.present)
    }
}

/// Collect artifact status for each language.
pub fn collect(config: &Config, langs: &[String]) -> Vec<LanguageStatus> {
    langs
        .iter()
        .map(|lang| {
            let paths = config.relatedness_paths(lang);
            LanguageStatus {
                lang: lang.clone(),
                relatedness: [&paths.rows, &paths.cols, &paths.matrix]
                    .into_iter()
                    .map(|p| artifact(p))
                    .collect(),
                vectors: artifact(&config.vectors_path(lang)),
            }
        })
        .collect()
}

/// Display artifact status to the terminal.
pub fn show(config: &Config, statuses: &[LanguageStatus]) {
    println!("Data directory: {}", config.data_dir.display());
    if !config.data_dir.exists() {
        println!("  {}", "(does not exist)".yellow());
    }

    for status in statuses {
        println!("\n{}", format!("Language: {}", status.lang).bold());

        let ready = if status.relatedness_ready() {
            "ready".green()
        } else {
            "missing files".red()
        };
        println!("  Relatedness: {ready}");
        for a in &status.relatedness {
            print_artifact(a);
        }

        let ready = if status.vectors.present {
            "ready".green()
        } else {
            "missing".red()
        };
        println!("  Vectors: {ready}");
        print_artifact(&status.vectors);
    }
}

fn artifact(path: &Path) -> ArtifactStatus {
    let size_bytes = std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len());
    ArtifactStatus {
        path: path.display().to_string(),
        present: size_bytes.is_some(),
        size_bytes,
    }
}

fn print_artifact(a: &ArtifactStatus) {
    match a.size_bytes {
        Some(size) => println!("    {} {} ({})", "✓".green(), a.path, format_bytes(size)),
        None => println!("    {} {}", "✗".red(), a.path.dimmed()),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
