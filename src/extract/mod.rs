//! Source extractors
//!
//! Each extractor turns the text of one source file into an [`EntitySnapshot`].
//! Extraction is literal pattern matching over hand-authored config blocks,
//! not language parsing; the [`Extractor`] trait is the seam where a real
//! parser could replace a pattern extractor without touching rules or reports.

pub mod bubble_class;
pub mod game_balance;
pub mod json;
pub mod patterns;
pub mod test_expectations;

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::snapshot::EntitySnapshot;

pub use bubble_class::BubbleClassExtractor;
pub use game_balance::GameBalanceExtractor;
pub use json::JsonExtractor;
pub use test_expectations::{TestExpectations, extract_expectations, extract_test_expectations};

/// Turns source text into a snapshot
pub trait Extractor: Send + Sync {
    /// Source name recorded on the snapshot (e.g. "GameBalance")
    fn source(&self) -> &str;

    fn extract(&self, content: &str) -> Result<EntitySnapshot, ExtractError>;
}

/// Read a file and run an extractor over it
pub fn extract_file(path: &Path, extractor: &dyn Extractor) -> Result<EntitySnapshot, ExtractError> {
    let content = fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = extractor.extract(&content)?;
    debug!(
        "{}: extracted {} entities from {}",
        extractor.source(),
        snapshot.len(),
        path.display()
    );
    Ok(snapshot)
}

/// Like [`extract_file`], but a failure is a warning and yields an empty snapshot
pub fn extract_or_empty(path: &Path, extractor: &dyn Extractor) -> EntitySnapshot {
    match extract_file(path, extractor) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("{}: {} (continuing with no entities)", extractor.source(), e);
            EntitySnapshot::new(extractor.source())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = extract_or_empty(&dir.path().join("nope.js"), &GameBalanceExtractor);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.source, "GameBalance");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_file(&dir.path().join("nope.js"), &GameBalanceExtractor).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "export const GAME_BALANCE = {{\n  baseScores: {{ normal: 15, boss: 100 }},\n  bubbles: {{\n    normal: {{ health: 1, size: 50 }},\n    boss: {{ health: 8, size: 90 }}\n  }}\n}};\n"
        )
        .unwrap();

        let first = extract_file(file.path(), &GameBalanceExtractor).unwrap();
        let second = extract_file(file.path(), &GameBalanceExtractor).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
