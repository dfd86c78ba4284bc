//! Validator pipelines: extract sources, run rules, build the report

pub mod config;
pub mod help_content;

use std::path::{Path, PathBuf};

use tracing::error;

use crate::cli::CliArgs;
use crate::error::ValidatorError;
use crate::report::{self, ValidationReport};

/// Exit code for a run that could not produce a report
pub const FATAL_EXIT_CODE: i32 = 1;

/// Finish a run: print and save the report, or log the fatal error.
/// Returns the process exit code.
pub fn conclude(
    result: Result<ValidationReport, ValidatorError>,
    title: &str,
    args: &CliArgs,
) -> i32 {
    match result {
        Ok(report) => report::finish(&report, title, args),
        Err(e) => {
            error!("Validation failed: {}", e);
            if args.ci || args.verbose {
                print_environment(&args.root);
            }
            FATAL_EXIT_CODE
        }
    }
}

fn print_environment(root: &Path) {
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "?".to_string());
    eprintln!("Environment:");
    eprintln!("  cwd:      {}", cwd);
    eprintln!("  root:     {}", root.display());
    eprintln!("  platform: {}-{}", std::env::consts::OS, std::env::consts::ARCH);
}

/// Fail with every missing path at once, not just the first
pub fn ensure_exists(paths: &[PathBuf]) -> Result<(), ValidatorError> {
    let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.exists()).cloned().collect();
    if missing.is_empty() {
        return Ok(());
    }

    error!("Required files not found:");
    for path in &missing {
        error!("  - {}", path.display());
    }
    Err(ValidatorError::MissingRequired(missing))
}

pub(crate) fn display_relative(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
