//! Command-line flags shared by the validator binaries
//!
//! Flags are matched literally (`--output=<path>`), no parser crate.

use std::env;
use std::path::PathBuf;

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub verbose: bool,
    pub json_only: bool,
    pub show_help: bool,
    /// Set by `CI` / `GITHUB_ACTIONS`
    pub ci: bool,
    pub output: Option<PathBuf>,
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    /// Reference language override for the help-content check
    pub reference: Option<String>,
    /// Arguments that matched no flag
    pub ignored: Vec<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            verbose: false,
            json_only: false,
            show_help: false,
            ci: false,
            output: None,
            root: PathBuf::from("."),
            config: None,
            reference: None,
            ignored: Vec::new(),
        }
    }
}

impl CliArgs {
    /// Parse arguments (without the program name)
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();

        for arg in args {
            let arg: String = arg.into();
            match arg.as_str() {
                "--verbose" | "-v" => config.verbose = true,
                "--json-only" => config.json_only = true,
                "--help" | "-h" => config.show_help = true,
                a if a.starts_with("--output=") => {
                    config.output = non_empty(&a["--output=".len()..]).map(PathBuf::from);
                }
                a if a.starts_with("--root=") => {
                    if let Some(root) = non_empty(&a["--root=".len()..]) {
                        config.root = PathBuf::from(root);
                    }
                }
                a if a.starts_with("--config=") => {
                    config.config = non_empty(&a["--config=".len()..]).map(PathBuf::from);
                }
                a if a.starts_with("--reference=") => {
                    config.reference = non_empty(&a["--reference=".len()..]).map(str::to_string);
                }
                other => config.ignored.push(other.to_string()),
            }
        }

        config
    }

    /// Process arguments plus `VERBOSE`, `CI` and `GITHUB_ACTIONS`
    pub fn from_env() -> Self {
        let mut config = Self::parse(env::args().skip(1));
        if env_flag("VERBOSE") {
            config.verbose = true;
        }
        config.ci = env_flag("CI") || env_flag("GITHUB_ACTIONS");
        config
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| v == "true").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse(Vec::<String>::new());
        assert_eq!(args, CliArgs::default());
        assert_eq!(args.root, PathBuf::from("."));
    }

    #[test]
    fn test_prefix_flags() {
        let args = CliArgs::parse([
            "--verbose",
            "--output=reports/config.json",
            "--root=../game",
            "--config=ci.toml",
            "--reference=en",
            "--json-only",
        ]);
        assert!(args.verbose);
        assert!(args.json_only);
        assert_eq!(args.output, Some(PathBuf::from("reports/config.json")));
        assert_eq!(args.root, PathBuf::from("../game"));
        assert_eq!(args.config, Some(PathBuf::from("ci.toml")));
        assert_eq!(args.reference.as_deref(), Some("en"));
        assert!(args.ignored.is_empty());
    }

    #[test]
    fn test_output_needs_equals_form() {
        let args = CliArgs::parse(["--output", "report.json", "-h"]);
        assert_eq!(args.output, None);
        assert!(args.show_help);
        assert_eq!(args.ignored, vec!["--output".to_string(), "report.json".to_string()]);
    }

    #[test]
    fn test_empty_values_ignored() {
        let args = CliArgs::parse(["--output=", "--root="]);
        assert_eq!(args.output, None);
        assert_eq!(args.root, PathBuf::from("."));
    }
}
