//! Validator settings
//!
//! Source locations (relative to the project root) and rule thresholds.
//! Read from an optional `bubblecheck.toml`; anything it omits keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ValidatorError;
use crate::rules::Thresholds;

/// Settings file looked up in the project root when `--config` isn't given
pub const SETTINGS_FILE: &str = "bubblecheck.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
    /// Canonical balance table
    pub game_balance: PathBuf,
    /// Must exist, but isn't extracted
    pub game_config: PathBuf,
    /// Class holding the hardcoded fallback table
    pub bubble_class: PathBuf,
    /// Unit tests whose asserted numbers go in the report
    pub test_files: Vec<PathBuf>,
    /// Help content root: `<help_dir>/<lang>/<category>.json`
    pub help_dir: PathBuf,
    pub reference_language: String,
    pub thresholds: Thresholds,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            game_balance: PathBuf::from("src/config/GameBalance.js"),
            game_config: PathBuf::from("src/config/GameConfig.js"),
            bubble_class: PathBuf::from("src/bubbles/Bubble.ts"),
            test_files: vec![
                PathBuf::from("tests/unit/Bubble.test.js"),
                PathBuf::from("tests/unit/GameBalance.test.js"),
                PathBuf::from("tests/unit/BubbleManager.test.js"),
            ],
            help_dir: PathBuf::from("src/locales/help"),
            reference_language: "ja".to_string(),
            thresholds: Thresholds::default(),
        }
    }
}

impl ValidatorSettings {
    /// Parse a settings file. A missing file gives defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ValidatorError> {
        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings = toml::from_str(&content).map_err(|e| ValidatorError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Like [`ValidatorSettings::load`], but a malformed file only warns
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Settings for a run: an explicit file must parse, the default one may be broken
    pub fn for_run(root: &Path, explicit: Option<&Path>) -> Result<Self, ValidatorError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::load_or_default(&root.join(SETTINGS_FILE))),
        }
    }

    pub fn resolve(&self, root: &Path, relative: &Path) -> PathBuf {
        root.join(relative)
    }

    /// Files without which the config validator cannot run
    pub fn required_files(&self, root: &Path) -> Vec<PathBuf> {
        [&self.game_balance, &self.game_config, &self.bubble_class]
            .into_iter()
            .map(|p| self.resolve(root, p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ValidatorSettings::load(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, ValidatorSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            r#"
bubble_class = "src/bubbles/Bubble.js"
reference_language = "en"

[thresholds]
max_health = 80
"#,
        )
        .unwrap();

        let settings = ValidatorSettings::load(&path).unwrap();
        assert_eq!(settings.bubble_class, PathBuf::from("src/bubbles/Bubble.js"));
        assert_eq!(settings.reference_language, "en");
        assert_eq!(settings.thresholds.max_health, 80);
        assert_eq!(settings.thresholds.max_size, 200);
        assert_eq!(settings.game_balance, PathBuf::from("src/config/GameBalance.js"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "thresholds = [").unwrap();

        assert!(matches!(
            ValidatorSettings::load(&path),
            Err(ValidatorError::Settings { .. })
        ));
        assert_eq!(ValidatorSettings::load_or_default(&path), ValidatorSettings::default());
        assert!(ValidatorSettings::for_run(dir.path(), None).is_ok());
        assert!(ValidatorSettings::for_run(dir.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_required_files_are_rooted() {
        let files = ValidatorSettings::default().required_files(Path::new("/game"));
        assert_eq!(files[0], PathBuf::from("/game/src/config/GameBalance.js"));
        assert_eq!(files.len(), 3);
    }
}
