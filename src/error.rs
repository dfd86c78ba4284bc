//! Error types shared by extractors and validators

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn one source file into a snapshot.
///
/// Always recoverable: callers log it and continue with an empty snapshot.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("section '{0}' not found")]
    MissingSection(String),
}

/// Errors that abort a validation run (exit code 1)
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("required files are missing: {}", format_paths(.0))]
    MissingRequired(Vec<PathBuf>),

    #[error("invalid settings in {path}: {message}")]
    Settings { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_lists_every_path() {
        let err = ValidatorError::MissingRequired(vec![
            PathBuf::from("src/config/GameBalance.js"),
            PathBuf::from("src/bubbles/Bubble.ts"),
        ]);
        let text = err.to_string();
        assert!(text.contains("GameBalance.js"));
        assert!(text.contains("Bubble.ts"));
    }
}
