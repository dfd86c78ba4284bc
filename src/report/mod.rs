//! Validation reports
//!
//! Aggregates issues into counts, renders the console report, writes the
//! JSON file, and decides the exit code.

mod format;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::error::ValidatorError;
use crate::rules::{CheckResult, Evaluation, Issue, IssueKind, Severity};
use crate::snapshot::SourceSummary;

pub use format::{SECTION_WIDTH, section};

/// Issue counts for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_entities: usize,
    pub total_issues: usize,
    /// Always has all three severities, zero or not
    pub issues_by_severity: BTreeMap<Severity, usize>,
    pub issues_by_type: BTreeMap<IssueKind, usize>,
    pub critical_issues: usize,
    pub build_should_fail: bool,
}

impl Summary {
    pub fn from_issues(issues: &[Issue], total_entities: usize) -> Self {
        let mut issues_by_severity: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();
        let mut issues_by_type = BTreeMap::new();

        for issue in issues {
            *issues_by_severity.entry(issue.severity).or_default() += 1;
            *issues_by_type.entry(issue.kind).or_default() += 1;
        }

        let critical_issues = issues_by_severity[&Severity::High];
        Self {
            total_entities,
            total_issues: issues.len(),
            issues_by_severity,
            issues_by_type,
            critical_issues,
            build_should_fail: critical_issues > 0,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues_by_severity.get(&severity).copied().unwrap_or(0)
    }
}

/// Result of one validator run. Written at most once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// ISO-8601, UTC
    pub timestamp: String,
    pub validator: String,
    pub summary: Summary,
    pub issues: Vec<Issue>,
    pub checks: Vec<CheckResult>,
    pub sources_summary: Vec<SourceSummary>,
    /// Raw extracted data, for debugging a failing run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configurations: Option<serde_json::Value>,
}

impl ValidationReport {
    pub fn new(
        validator: &str,
        total_entities: usize,
        evaluation: Evaluation,
        sources_summary: Vec<SourceSummary>,
    ) -> Self {
        let summary = Summary::from_issues(&evaluation.issues, total_entities);
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            validator: validator.to_string(),
            summary,
            issues: evaluation.issues,
            checks: evaluation.checks,
            sources_summary,
            configurations: None,
        }
    }

    pub fn with_configurations(mut self, configurations: serde_json::Value) -> Self {
        self.configurations = Some(configurations);
        self
    }

    /// Issues of one severity, in detection order
    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn exit_code(&self) -> i32 {
        exit_code(&self.issues)
    }

    pub fn to_json(&self) -> Result<String, ValidatorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report, creating parent directories as needed
    pub fn save_json(&self, path: &Path) -> Result<(), ValidatorError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Print the report (text, or JSON with `--json-only`), save it when
/// `--output` was given, and return the exit code.
///
/// A failed save is logged; the exit code follows issue severity only.
pub fn finish(report: &ValidationReport, title: &str, args: &CliArgs) -> i32 {
    if args.json_only {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => error!("{}", e),
        }
    } else {
        println!("{}", report.format_text(title));
    }

    if let Some(output) = &args.output {
        match report.save_json(output) {
            Ok(()) => info!("Report written to {}", output.display()),
            Err(e) => error!("Failed to write report: {}", e),
        }
    }

    report.exit_code()
}

/// 1 if any issue is HIGH, else 0
pub fn exit_code(issues: &[Issue]) -> i32 {
    if issues.iter().any(|i| i.severity == Severity::High) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Evaluation;
    use crate::snapshot::FieldValue;
    use pretty_assertions::assert_eq;

    fn issue(kind: IssueKind) -> Issue {
        Issue::new(kind, format!("{} detected", kind))
            .entity("normal")
            .values(Some(FieldValue::Number(10)), Some(FieldValue::Number(15)))
    }

    fn report(kinds: &[IssueKind]) -> ValidationReport {
        let evaluation = Evaluation {
            issues: kinds.iter().map(|k| issue(*k)).collect(),
            checks: Vec::new(),
        };
        ValidationReport::new("config", 3, evaluation, Vec::new())
    }

    #[test]
    fn test_exit_code_follows_high_severity() {
        assert_eq!(report(&[]).exit_code(), 0);
        assert_eq!(report(&[IssueKind::BossWeak, IssueKind::SizeMismatch]).exit_code(), 0);
        assert_eq!(report(&[IssueKind::BossWeak, IssueKind::ScoreMismatch]).exit_code(), 1);
    }

    #[test]
    fn test_summary_counts() {
        let r = report(&[IssueKind::ScoreMismatch, IssueKind::ScoreMismatch, IssueKind::LargeSize]);
        assert_eq!(r.summary.total_issues, 3);
        assert_eq!(r.summary.critical_issues, 2);
        assert_eq!(r.summary.count(Severity::Medium), 0);
        assert_eq!(r.summary.count(Severity::Low), 1);
        assert_eq!(r.summary.issues_by_type[&IssueKind::ScoreMismatch], 2);
        assert!(r.summary.build_should_fail);
    }

    #[test]
    fn test_saved_json_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("report.json");
        let r = report(&[IssueKind::ScoreMismatch, IssueKind::BossWeak]);
        r.save_json(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let issues = value["issues"].as_array().unwrap();
        assert_eq!(value["summary"]["totalIssues"].as_u64().unwrap() as usize, issues.len());
        assert_eq!(value["summary"]["issuesBySeverity"]["HIGH"], 1);
        assert_eq!(value["summary"]["issuesBySeverity"]["MEDIUM"], 0);
        assert_eq!(issues[0]["type"], "SCORE_MISMATCH");
        assert_eq!(issues[0]["severity"], "HIGH");
        assert_eq!(issues[0]["sourceAValue"], 10);
        assert_eq!(issues[0]["sourceBValue"], 15);
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_save_to_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should go
        let r = report(&[]);
        assert!(r.save_json(dir.path()).is_err());
    }

    fn args_with_output(output: &Path) -> CliArgs {
        CliArgs {
            json_only: true,
            output: Some(output.to_path_buf()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_failed_save_keeps_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_with_output(dir.path());

        let failing = report(&[IssueKind::ScoreMismatch]);
        assert_eq!(finish(&failing, "Configuration validation", &args), 1);

        let passing = report(&[IssueKind::BossWeak]);
        assert_eq!(finish(&passing, "Configuration validation", &args), 0);
    }

    #[test]
    fn test_finish_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        let args = args_with_output(&path);
        let code = finish(&report(&[IssueKind::SizeMismatch]), "Configuration validation", &args);

        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["issuesBySeverity"]["MEDIUM"], 1);
    }
}
