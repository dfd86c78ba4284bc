//! Help content / translation rules
//!
//! Source A is the reference language, source B a translation. Rules run
//! per field of the reference; a field the translation lacks only trips
//! the missing-field rule.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{CheckResult, CheckStatus, Evaluation, Issue, IssueKind, Rule, Verdict};
use crate::snapshot::{EntitySnapshot, FieldValue};

pub const CONTENT_RULES: &[Rule] = &[
    Rule::field("field translated", field_present),
    Rule::field("value kind preserved", same_kind),
    Rule::field("text not empty", not_empty),
    Rule::field("placeholders preserved", same_placeholders),
];

/// `{name}` and `{{name}}` interpolation markers
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{?\s*([\w.]+)\s*\}\}?").expect("valid regex"));

pub fn placeholders(text: &str) -> BTreeSet<&str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Entities of the reference that the translation doesn't have at all.
///
/// Reported separately from the field rules, which only see shared entities.
pub fn missing_entities(reference: &EntitySnapshot, translation: &EntitySnapshot) -> Vec<Issue> {
    reference
        .entities
        .keys()
        .filter(|name| !translation.entities.contains_key(*name))
        .map(|name| {
            Issue::new(
                IssueKind::MissingEntity,
                format!("{} is missing from {}", name, translation.source),
            )
            .entity(name)
            .sources(&reference.source, &translation.source)
        })
        .collect()
}

/// Entity coverage as its own check, so it shows up next to the field rules
pub fn check_entities(reference: &EntitySnapshot, translation: &EntitySnapshot) -> Evaluation {
    let issues = missing_entities(reference, translation);
    let check = CheckResult {
        name: "entities present".to_string(),
        status: CheckStatus::from_counts(reference.len(), issues.len()),
        evaluated: reference.len(),
        violations: issues.len(),
    };
    Evaluation {
        issues,
        checks: vec![check],
    }
}

fn field_present(entity: &str, field: &str, _: &FieldValue, theirs: Option<&FieldValue>) -> Verdict {
    if theirs.is_some() {
        return Verdict::Pass;
    }
    Verdict::Violation(
        Issue::new(IssueKind::MissingField, format!("{}: '{}' is not translated", entity, field))
            .entity(entity)
            .field(field),
    )
}

fn same_kind(entity: &str, field: &str, ours: &FieldValue, theirs: Option<&FieldValue>) -> Verdict {
    let Some(theirs) = theirs else {
        return Verdict::Skipped;
    };
    if ours.kind() == theirs.kind() {
        return Verdict::Pass;
    }
    Verdict::Violation(
        Issue::new(
            IssueKind::TypeMismatch,
            format!(
                "{}: '{}' is {} in the reference but {} in the translation",
                entity,
                field,
                ours.kind(),
                theirs.kind()
            ),
        )
        .entity(entity)
        .field(field)
        .values(Some(ours.clone()), Some(theirs.clone())),
    )
}

fn not_empty(entity: &str, field: &str, ours: &FieldValue, theirs: Option<&FieldValue>) -> Verdict {
    let (Some(ours), Some(theirs)) = (ours.as_text(), theirs.and_then(FieldValue::as_text)) else {
        return Verdict::Skipped;
    };
    if ours.trim().is_empty() || !theirs.trim().is_empty() {
        return Verdict::Pass;
    }
    Verdict::Violation(
        Issue::new(IssueKind::EmptyValue, format!("{}: '{}' is empty in the translation", entity, field))
            .entity(entity)
            .field(field)
            .values(Some(FieldValue::Text(ours.to_string())), Some(FieldValue::Text(theirs.to_string()))),
    )
}

fn same_placeholders(
    entity: &str,
    field: &str,
    ours: &FieldValue,
    theirs: Option<&FieldValue>,
) -> Verdict {
    let (Some(ours), Some(theirs)) = (ours.as_text(), theirs.and_then(FieldValue::as_text)) else {
        return Verdict::Skipped;
    };
    let expected = placeholders(ours);
    let found = placeholders(theirs);
    if expected == found {
        return Verdict::Pass;
    }

    let missing: Vec<_> = expected.difference(&found).copied().collect();
    let extra: Vec<_> = found.difference(&expected).copied().collect();
    Verdict::Violation(
        Issue::new(
            IssueKind::PlaceholderMismatch,
            format!(
                "{}: '{}' placeholders differ (missing: {:?}, unexpected: {:?})",
                entity, field, missing, extra
            ),
        )
        .entity(entity)
        .field(field)
        .values(Some(FieldValue::Text(ours.to_string())), Some(FieldValue::Text(theirs.to_string()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Extractor, JsonExtractor};
    use crate::rules::{RuleEngine, Severity, Thresholds};

    fn engine() -> RuleEngine {
        RuleEngine::new(Thresholds::default()).with_rules(CONTENT_RULES)
    }

    #[test]
    fn test_placeholders() {
        let found = placeholders("Score {score} in {{ time }}s, {score} again");
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["score", "time"]);
    }

    #[test]
    fn test_identical_content_is_clean() {
        let mut ja = EntitySnapshot::new("ja");
        ja.insert("basics", "title", "基本操作");
        ja.insert("basics", "order", 1);
        let en = ja.clone();
        assert!(engine().evaluate(&ja, &en).issues.is_empty());
    }

    #[test]
    fn test_translation_problems() {
        let mut ja = EntitySnapshot::new("ja");
        ja.insert("combo", "title", "コンボ");
        ja.insert("combo", "body", "{count}連続で{bonus}点");
        ja.insert("combo", "hint", "ヒント");
        ja.insert("combo", "order", 3);

        let mut en = EntitySnapshot::new("en");
        en.insert("combo", "title", "  ");
        en.insert("combo", "body", "Chain {count} pops");
        en.insert("combo", "order", "three");

        let eval = engine().evaluate(&ja, &en);
        let kinds: Vec<_> = eval.issues.iter().map(|i| (i.kind, i.field.as_deref().unwrap())).collect();
        assert_eq!(
            kinds,
            vec![
                (IssueKind::MissingField, "hint"),
                (IssueKind::TypeMismatch, "order"),
                (IssueKind::EmptyValue, "title"),
                (IssueKind::PlaceholderMismatch, "body"),
            ]
        );
        assert_eq!(eval.issues[1].severity, Severity::High);
    }

    fn bundle(lang: &str, json: &str) -> EntitySnapshot {
        JsonExtractor::new(lang).extract(json).unwrap()
    }

    #[test]
    fn test_null_and_stringly_bool_are_type_mismatches() {
        let ja = bundle("ja", r#"{"menu": {"title": "Start", "enabled": true}}"#);
        let en = bundle("en", r#"{"menu": {"title": null, "enabled": "true"}}"#);

        let eval = engine().evaluate(&ja, &en);
        let kinds: Vec<_> = eval.issues.iter().map(|i| (i.kind, i.field.as_deref().unwrap())).collect();
        assert_eq!(
            kinds,
            vec![(IssueKind::TypeMismatch, "enabled"), (IssueKind::TypeMismatch, "title")]
        );
        assert!(eval.issues.iter().all(|i| i.severity == Severity::High));
    }

    #[test]
    fn test_integer_and_float_are_same_kind() {
        let ja = bundle("ja", r#"{"layout": {"w": 1.0, "h": 2}}"#);
        let en = bundle("en", r#"{"layout": {"w": 1, "h": 2.5}}"#);
        assert!(engine().evaluate(&ja, &en).issues.is_empty());
    }

    #[test]
    fn test_missing_entities_reported_separately() {
        let mut ja = EntitySnapshot::new("ja");
        ja.insert("basics", "title", "基本");
        ja.insert("items", "title", "アイテム");
        let mut en = EntitySnapshot::new("en");
        en.insert("basics", "title", "Basics");

        let missing = missing_entities(&ja, &en);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].entity.as_deref(), Some("items"));
        assert_eq!(missing[0].severity, Severity::Low);
        assert!(engine().evaluate(&ja, &en).issues.is_empty());
    }

    #[test]
    fn test_entity_coverage_check() {
        let mut ja = EntitySnapshot::new("ja");
        ja.insert("basics", "title", "基本");
        ja.insert("items", "title", "アイテム");
        let mut en = EntitySnapshot::new("en");
        en.insert("basics", "title", "Basics");

        let eval = check_entities(&ja, &en);
        assert_eq!(eval.issues.len(), 1);
        assert_eq!(eval.checks[0].status, CheckStatus::Fail);
        assert_eq!(eval.checks[0].evaluated, 2);
        assert_eq!(eval.checks[0].violations, 1);

        let clean = check_entities(&ja, &ja.clone());
        assert_eq!(clean.checks[0].status, CheckStatus::Pass);
        let empty = check_entities(&EntitySnapshot::new("ja"), &en);
        assert_eq!(empty.checks[0].status, CheckStatus::Unknown);
    }
}
