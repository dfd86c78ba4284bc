//! Configuration consistency validator
//!
//! Compares GameBalance against the Bubble class's hardcoded fallback,
//! prints a report, and exits 1 when any HIGH-severity issue is found.
//!
//! Usage:
//!   cargo run -- --verbose
//!   cargo run -- --output=reports/config-validation.json
//!   cargo run -- --root=../awaputi --json-only

use std::process;

use bubblecheck::validators::{self, config::{self, TITLE}};
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

    let result = ValidatorSettings::for_run(&args.root, args.config.as_deref())
        .and_then(|settings| config::run(&settings, &args.root));

    process::exit(validators::conclude(result, TITLE, &args));
}

fn print_help() {
    println!("Configuration consistency validator");
    println!();
    println!("Usage: validate-config [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -v, --verbose        Debug logging (also VERBOSE=true)");
    println!("  --output=<path>      Write the JSON report to <path>");
    println!("  --root=<dir>         Project root (default: .)");
    println!("  --config=<file>      Settings file (default: <root>/bubblecheck.toml)");
    println!("  --json-only          Print the JSON report instead of the text report");
    println!("  -h, --help           Show this help");
    println!();
    println!("Exit code is 1 when any HIGH-severity issue is found.");
}
