// Error taxonomy for the library.
//
// Unknown terms are not errors: lookups return `None` or an empty result so
// aggregate callers can skip them. Only construction failures and caller
// bugs (bad arguments) surface here.

use std::path::PathBuf;

/// Result alias used throughout the library.
pub type Result<T, E = SemevalError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SemevalError {
    /// A required artifact is absent on disk. Raised only while loading.
    #[error("Required resource not found: {}", path.display())]
    MissingResource { path: PathBuf },

    /// An argument is outside its valid range. Never silently clamped.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An artifact exists but cannot be parsed, or disagrees with its
    /// companion files (e.g. matrix shape vs. term counts).
    #[error("Invalid format in {} (line {line}): {message}", path.display())]
    InvalidFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SemevalError {
    pub(crate) fn invalid_format(
        path: impl Into<PathBuf>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        SemevalError::InvalidFormat {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
