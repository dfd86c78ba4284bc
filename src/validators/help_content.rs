//! Help content consistency validator
//!
//! Help text lives in `<help_dir>/<lang>/<category>.json`. Every translation
//! is compared field by field against the reference language.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{display_relative, ensure_exists};
use crate::error::ValidatorError;
use crate::extract::{Extractor, JsonExtractor, extract_file};
use crate::report::ValidationReport;
use crate::rules::{Evaluation, RuleEngine, content};
use crate::settings::ValidatorSettings;
use crate::snapshot::{EntitySnapshot, SourceSummary};

pub const VALIDATOR: &str = "help-content";
pub const TITLE: &str = "Help content consistency report";

/// Language directories under the help root, sorted
pub fn discover_languages(help_dir: &Path) -> Result<Vec<String>, ValidatorError> {
    let mut languages: Vec<String> = fs::read_dir(help_dir)?
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    languages.sort();
    Ok(languages)
}

/// Category files (`*.json`) in a language directory, sorted
fn category_files(lang_dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(lang_dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("Cannot read {}: {}", lang_dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    files.sort();
    files
}

/// One snapshot per language, entities named `<category>/<key>`.
///
/// A category file that can't be read or parsed is skipped with a warning.
pub fn load_language(help_dir: &Path, lang: &str) -> EntitySnapshot {
    let mut snapshot = EntitySnapshot::new(lang);

    for path in category_files(&help_dir.join(lang)) {
        let category = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let extractor = JsonExtractor::new(lang).with_prefix(&category);

        match extract_file(&path, &extractor) {
            Ok(part) => {
                debug!("{}/{}: {} entries", lang, category, part.len());
                snapshot.absorb(part);
            }
            Err(e) => warn!("{}: skipping {} ({})", extractor.source(), path.display(), e),
        }
    }

    snapshot
}

pub fn run(
    settings: &ValidatorSettings,
    root: &Path,
    reference_override: Option<&str>,
) -> Result<ValidationReport, ValidatorError> {
    let help_dir = settings.resolve(root, &settings.help_dir);
    let reference_lang = reference_override.unwrap_or(settings.reference_language.as_str());
    ensure_exists(&[help_dir.join(reference_lang)])?;

    let languages: Vec<String> = discover_languages(&help_dir)?
        .into_iter()
        .filter(|lang| lang != reference_lang)
        .collect();
    info!(
        "Reference language '{}', comparing {} translation(s)",
        reference_lang,
        languages.len()
    );

    let reference = load_language(&help_dir, reference_lang);
    if reference.is_empty() {
        warn!("Reference language '{}' has no help entries", reference_lang);
    }

    let translations: Vec<EntitySnapshot> = languages
        .par_iter()
        .map(|lang| load_language(&help_dir, lang))
        .collect();

    let engine = RuleEngine::new(settings.thresholds.clone()).with_rules(content::CONTENT_RULES);
    let mut evaluation = Evaluation::default();
    for translation in &translations {
        let mut part = engine.evaluate(&reference, translation);
        part.extend(content::check_entities(&reference, translation));
        for check in &mut part.checks {
            check.name = format!("{}: {}", translation.source, check.name);
        }
        evaluation.extend(part);
    }

    let relative_dir = display_relative(&help_dir, root);
    let sources = std::iter::once(&reference)
        .chain(translations.iter())
        .map(|snap| SourceSummary::of(snap, &relative_dir.join(&snap.source)))
        .collect();

    Ok(ValidationReport::new(VALIDATOR, reference.len(), evaluation, sources))
}
