//! Help content consistency check
//!
//! Compares every translation under the help directory against the
//! reference language.
//!
//! Usage:
//!   cargo run --bin check-help-content
//!   cargo run --bin check-help-content -- --reference=en --output=reports/help.json

use std::process;

use bubblecheck::validators::{self, help_content::{self, TITLE}};
use bubblecheck::{CliArgs, ValidatorSettings, logging};
use tracing::warn;

fn main() {
    let args = CliArgs::from_env();

    if args.show_help {
        print_help();
        return;
    }

    logging::init(args.verbose);
    for arg in &args.ignored {
        warn!("Ignoring unknown argument: {}", arg);
    }

    let result = ValidatorSettings::for_run(&args.root, args.config.as_deref()).and_then(|settings| {
        help_content::run(&settings, &args.root, args.reference.as_deref())
    });

    process::exit(validators::conclude(result, TITLE, &args));
}

fn print_help() {
    println!("Help content consistency check");
    println!();
    println!("Usage: check-help-content [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -v, --verbose        Debug logging (also VERBOSE=true)");
    println!("  --reference=<lang>   Reference language (default from settings: ja)");
    println!("  --output=<path>      Write the JSON report to <path>");
    println!("  --root=<dir>         Project root (default: .)");
    println!("  --config=<file>      Settings file (default: <root>/bubblecheck.toml)");
    println!("  --json-only          Print the JSON report instead of the text report");
    println!("  -h, --help           Show this help");
}
