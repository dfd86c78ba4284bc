//! Configuration consistency validator
//!
//! Cross-checks the GameBalance table against the Bubble class's hardcoded
//! fallback, then sanity-checks GameBalance on its own.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::{display_relative, ensure_exists};
use crate::error::ValidatorError;
use crate::extract::{
    BubbleClassExtractor, GameBalanceExtractor, TestExpectations, extract_or_empty,
    extract_test_expectations,
};
use crate::report::ValidationReport;
use crate::rules::{RuleEngine, balance};
use crate::settings::ValidatorSettings;
use crate::snapshot::{EntitySnapshot, SourceSummary};

pub const VALIDATOR: &str = "configuration";
pub const TITLE: &str = "Configuration validation report";

/// Extracted inputs, attached to the JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Configurations<'a> {
    game_balance: &'a EntitySnapshot,
    bubble_hardcoded: &'a EntitySnapshot,
    test_expectations: &'a TestExpectations,
}

pub fn run(settings: &ValidatorSettings, root: &Path) -> Result<ValidationReport, ValidatorError> {
    ensure_exists(&settings.required_files(root))?;

    info!("Extracting values from configuration sources...");
    let balance_path = settings.resolve(root, &settings.game_balance);
    let bubble_path = settings.resolve(root, &settings.bubble_class);

    let (game_balance, bubble_class) = rayon::join(
        || extract_or_empty(&balance_path, &GameBalanceExtractor),
        || extract_or_empty(&bubble_path, &BubbleClassExtractor),
    );
    info!("GameBalance: {} bubble types", game_balance.len());
    info!("Bubble class: {} hardcoded configs", bubble_class.len());

    let test_paths: Vec<_> = settings
        .test_files
        .iter()
        .map(|p| settings.resolve(root, p))
        .collect();
    let expectations = extract_test_expectations(&test_paths);

    info!("Checking consistency, logic and performance rules...");
    let engine = RuleEngine::new(settings.thresholds.clone()).with_rules(&balance::all_rules());
    let evaluation = engine.evaluate(&game_balance, &bubble_class);

    let sources = vec![
        SourceSummary::of(&game_balance, &display_relative(&balance_path, root)),
        SourceSummary::of(&bubble_class, &display_relative(&bubble_path, root)),
    ];
    let configurations = serde_json::to_value(Configurations {
        game_balance: &game_balance,
        bubble_hardcoded: &bubble_class,
        test_expectations: &expectations,
    })?;

    Ok(ValidationReport::new(VALIDATOR, game_balance.len(), evaluation, sources)
        .with_configurations(configurations))
}
