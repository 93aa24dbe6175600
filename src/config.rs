use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Language used when none is given on the command line or in the environment.
pub const DEFAULT_LANG: &str = "eng";

/// The three artifacts a relatedness store is loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatednessPaths {
    pub rows: PathBuf,
    pub cols: PathBuf,
    pub matrix: PathBuf,
}

impl RelatednessPaths {
    /// Standard artifact names for `lang` inside `data_dir`.
    pub fn for_language(data_dir: &Path, lang: &str) -> Self {
        Self {
            rows: data_dir.join(format!("{lang}-relatedness-rows.txt")),
            cols: data_dir.join(format!("{lang}-relatedness-cols.txt")),
            matrix: data_dir.join(format!("{lang}-relatedness-model.json")),
        }
    }

    /// Artifacts that do not exist on disk.
    pub fn missing(&self) -> Vec<&Path> {
        [&self.rows, &self.cols, &self.matrix]
            .into_iter()
            .filter(|p| !p.is_file())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Directory holding term files, matrices and vector spaces
    pub data_dir: PathBuf,
    /// Language used when a command does not name one
    pub default_lang: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing is required: the data directory falls back to the platform
    /// data dir and the language to `eng`.
    pub fn load() -> Result<Self> {
        let data_dir = env::var("SEMEVAL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let default_lang = env::var("SEMEVAL_LANG")
            .ok()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Ok(Self {
            data_dir,
            default_lang,
        })
    }

    pub fn relatedness_paths(&self, lang: &str) -> RelatednessPaths {
        RelatednessPaths::for_language(&self.data_dir, lang)
    }

    pub fn vectors_path(&self, lang: &str) -> PathBuf {
        self.data_dir.join(format!("vectors-{lang}.txt"))
    }

    /// Check that every relatedness artifact for `lang` is present.
    /// Call this before loading a store so the operator gets one message
    /// listing everything that is absent.
    pub fn require_relatedness(&self, lang: &str) -> Result<()> {
        let paths = self.relatedness_paths(lang);
        let missing = paths.missing();
        if !missing.is_empty() {
            let listed: Vec<String> = missing
                .iter()
                .map(|p| format!("  {}", p.display()))
                .collect();
            anyhow::bail!(
                "Relatedness artifacts for '{lang}' not found:\n{}\n\
                 Place them in {} or set SEMEVAL_DATA_DIR.",
                listed.join("\n"),
                self.data_dir.display()
            );
        }
        Ok(())
    }

    /// Check that the vector space for `lang` is present.
    pub fn require_vectors(&self, lang: &str) -> Result<()> {
        let path = self.vectors_path(lang);
        if !path.is_file() {
            anyhow::bail!(
                "Vectors for language '{lang}' not found: {}\n\
                 Place them in {} or set SEMEVAL_DATA_DIR.",
                path.display(),
                self.data_dir.display()
            );
        }
        Ok(())
    }
}

/// Returns the default directory for artifacts.
/// Uses the platform data directory: ~/.local/share/semeval/models/ on Linux.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("semeval")
        .join("models")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relatedness_paths_naming() {
        let paths = RelatednessPaths::for_language(Path::new("/data"), "fin");
        assert_eq!(paths.rows, PathBuf::from("/data/fin-relatedness-rows.txt"));
        assert_eq!(paths.cols, PathBuf::from("/data/fin-relatedness-cols.txt"));
        assert_eq!(paths.matrix, PathBuf::from("/data/fin-relatedness-model.json"));
    }

    #[test]
    fn test_missing_reports_all_absent() {
        let dir = std::env::temp_dir().join("semeval-config-test-nonexistent");
        let paths = RelatednessPaths::for_language(&dir, "eng");
        assert_eq!(paths.missing().len(), 3);
    }

    #[test]
    fn test_require_vectors_message_names_language() {
        let config = Config {
            data_dir: std::env::temp_dir().join("semeval-config-test-nonexistent"),
            default_lang: DEFAULT_LANG.to_string(),
        };
        let err = config.require_vectors("fin").unwrap_err().to_string();
        assert!(err.contains("'fin'"), "message should name the language: {err}");
        assert!(err.contains("vectors-fin.txt"));
    }

    #[test]
    fn test_default_data_dir_ends_with_models() {
        assert!(default_data_dir().ends_with("semeval/models"));
    }
}
