//! Numeric expectations from unit-test files
//!
//! Collects the integers tests assert against (`expect(x).toBe(15)`), so the
//! report can show which balance numbers the test suite pins down.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

/// Test file name -> asserted integers
pub type TestExpectations = BTreeMap<String, Vec<i64>>;

static TO_BE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"expect\([^)]+\)\.toBe\((-?\d+)\)").expect("valid regex"));
static TO_EQUAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"expect\([^)]+\)\.toEqual\((-?\d+)\)").expect("valid regex"));

/// Asserted integers in one file: all `toBe` values, then all `toEqual` values
pub fn extract_expectations(content: &str) -> Vec<i64> {
    TO_BE
        .captures_iter(content)
        .chain(TO_EQUAL.captures_iter(content))
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect()
}

/// Read each test file; missing or unreadable files are warnings
pub fn extract_test_expectations(paths: &[impl AsRef<Path>]) -> TestExpectations {
    let mut expectations = TestExpectations::new();

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Test file not found: {}", path.display());
            continue;
        }

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read test file {}: {}", path.display(), e);
                continue;
            }
        };

        let values = extract_expectations(&content);
        if values.is_empty() {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        info!("{}: {} expectations", name, values.len());
        expectations.insert(name, values);
    }

    expectations
}
