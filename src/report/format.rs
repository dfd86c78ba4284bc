//! Console rendering of a [`ValidationReport`]

use super::ValidationReport;
use crate::rules::{CheckStatus, Issue, Severity};

pub const SECTION_WIDTH: usize = 60;

/// Banner heading used between report sections
pub fn section(out: &mut String, title: &str) {
    let rule = "=".repeat(SECTION_WIDTH);
    out.push_str(&format!("\n{}\n  {}\n{}\n", rule, title, rule));
}

fn severity_heading(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "Critical issues (fail the build)",
        Severity::Medium => "Warnings",
        Severity::Low => "Informational",
    }
}

fn write_issue(out: &mut String, index: usize, issue: &Issue) {
    out.push_str(&format!("{}. [{}] {}\n", index + 1, issue.kind, issue.message));

    match (&issue.entity, &issue.field) {
        (Some(entity), Some(field)) => {
            out.push_str(&format!("   entity: {} ({})\n", entity, field));
        }
        (Some(entity), None) => {
            out.push_str(&format!("   entity: {}\n", entity));
        }
        _ => {}
    }

    if let (Some(a), Some(b)) = (&issue.source_a_value, &issue.source_b_value) {
        let name_a = issue.source_a.as_deref().unwrap_or("A");
        let name_b = issue.source_b.as_deref().unwrap_or("B");
        out.push_str(&format!("   {}: {}, {}: {}\n", name_a, a, name_b, b));
    }
}

impl ValidationReport {
    /// Human-readable report: overview, then critical, warning and
    /// informational sections in that order.
    pub fn format_text(&self, title: &str) -> String {
        let mut out = String::new();
        let summary = &self.summary;

        section(&mut out, title);
        out.push_str(&format!("Validated at:    {}\n", self.timestamp));
        out.push_str(&format!("Entities:        {}\n", summary.total_entities));
        out.push_str(&format!("Critical issues: {}\n", summary.critical_issues));
        out.push_str(&format!("Warnings:        {}\n", summary.count(Severity::Medium)));
        out.push_str(&format!("Informational:   {}\n", summary.count(Severity::Low)));
        out.push_str(&format!("Total issues:    {}\n", summary.total_issues));
        let result = if summary.build_should_fail { "FAIL" } else { "PASS" };
        out.push_str(&format!("Result:          {}\n", result));

        if !self.sources_summary.is_empty() {
            out.push_str("\nSources:\n");
            for source in &self.sources_summary {
                out.push_str(&format!(
                    "  {:<14} {:>4} entities  {}{}\n",
                    source.name,
                    source.entities,
                    source.path.display(),
                    if source.loaded { "" } else { "  (not loaded)" }
                ));
            }
        }

        for severity in Severity::ALL {
            let issues: Vec<_> = self.issues_with(severity).collect();
            if issues.is_empty() {
                continue;
            }
            section(&mut out, severity_heading(severity));
            for (i, issue) in issues.iter().enumerate() {
                write_issue(&mut out, i, issue);
            }
        }

        let unknown: Vec<_> = self
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Unknown)
            .collect();
        if !unknown.is_empty() {
            section(&mut out, "Not evaluated (inputs missing)");
            for check in unknown {
                out.push_str(&format!("  - {}\n", check.name));
            }
        }

        if summary.total_issues == 0 {
            out.push_str("\nAll checks passed with no issues.\n");
        }

        out
    }
}
