//! Bubblecheck - configuration consistency checks for the bubble game
//!
//! Pulls bubble definitions out of the game's source files, runs
//! consistency / sanity / performance rules over them, and reports.

// Pipeline
pub mod extract;
pub mod report;
pub mod rules;
pub mod snapshot;
pub mod validators;

// Ambient
pub mod cli;
pub mod error;
pub mod logging;
pub mod settings;

// Re-export commonly used types for convenience
pub use cli::CliArgs;
pub use error::{ExtractError, ValidatorError};
pub use extract::{
    BubbleClassExtractor, Extractor, GameBalanceExtractor, JsonExtractor, TestExpectations,
    extract_file, extract_or_empty, extract_test_expectations,
};
pub use report::{Summary, ValidationReport, exit_code, finish};
pub use rules::{
    Category, CheckResult, CheckStatus, Evaluation, Issue, IssueKind, Rule, RuleEngine, Severity,
    Thresholds, Verdict,
};
pub use settings::{SETTINGS_FILE, ValidatorSettings};
pub use snapshot::{EntityFields, EntitySnapshot, FieldValue, SourceSummary};
