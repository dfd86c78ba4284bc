//! Bubble balance rules
//!
//! Consistency rules compare the GameBalance table (source A) with the
//! Bubble class fallback copy (source B). Logical and performance rules
//! look at GameBalance alone. A field missing on either side is skipped.

use super::{Issue, IssueKind, Rule, Thresholds, Verdict};
use crate::snapshot::{EntityFields, EntitySnapshot, FieldValue};

pub const CONSISTENCY_RULES: &[Rule] = &[
    Rule::pair("health matches", health_matches),
    Rule::pair("score matches", score_matches),
    Rule::pair("size matches", size_matches),
    Rule::pair("maxAge matches", max_age_matches),
];

pub const LOGICAL_RULES: &[Rule] = &[
    Rule::snapshot("boss tougher than baseline", boss_health_ratio),
    Rule::snapshot("boss worth more than baseline", boss_score_higher),
    Rule::entity("size positive", size_positive),
    Rule::entity("size reasonable", size_reasonable),
    Rule::entity("health positive", health_positive),
    Rule::entity("health reasonable", health_reasonable),
];

pub const PERFORMANCE_RULES: &[Rule] = &[
    Rule::entity("lifespan long enough", lifespan_long_enough),
    Rule::entity("effect intensity bounded", effect_intensity_bounded),
];

/// Every balance rule, in report order
pub fn all_rules() -> Vec<Rule> {
    [CONSISTENCY_RULES, LOGICAL_RULES, PERFORMANCE_RULES].concat()
}

fn number(fields: &EntityFields, field: &str) -> Option<i64> {
    fields.get(field)?.as_number()
}

fn field_matches(
    kind: IssueKind,
    field: &str,
    entity: &str,
    a: &EntityFields,
    b: &EntityFields,
) -> Verdict {
    let (Some(left), Some(right)) = (number(a, field), number(b, field)) else {
        return Verdict::Skipped;
    };

    if left == right {
        return Verdict::Pass;
    }

    Verdict::Violation(
        Issue::new(
            kind,
            format!("{} bubble {} mismatch: {} vs {}", entity, field, left, right),
        )
        .entity(entity)
        .field(field)
        .values(Some(FieldValue::Number(left)), Some(FieldValue::Number(right))),
    )
}

fn health_matches(entity: &str, a: &EntityFields, b: &EntityFields) -> Verdict {
    field_matches(IssueKind::HealthMismatch, "health", entity, a, b)
}

fn score_matches(entity: &str, a: &EntityFields, b: &EntityFields) -> Verdict {
    field_matches(IssueKind::ScoreMismatch, "score", entity, a, b)
}

fn size_matches(entity: &str, a: &EntityFields, b: &EntityFields) -> Verdict {
    field_matches(IssueKind::SizeMismatch, "size", entity, a, b)
}

fn max_age_matches(entity: &str, a: &EntityFields, b: &EntityFields) -> Verdict {
    field_matches(IssueKind::MaxAgeMismatch, "maxAge", entity, a, b)
}

fn boss_health_ratio(snapshot: &EntitySnapshot, t: &Thresholds) -> Verdict {
    let (Some(boss), Some(base)) = (
        snapshot.number(&t.boss_entity, "health"),
        snapshot.number(&t.baseline_entity, "health"),
    ) else {
        return Verdict::Skipped;
    };

    // base * ratio can exceed i64
    let limit = i128::from(base) * i128::from(t.boss_health_ratio);
    if i128::from(boss) > limit {
        return Verdict::Pass;
    }

    Verdict::Violation(
        Issue::new(
            IssueKind::BossWeak,
            format!(
                "{} bubble may be too weak: {}={}, {}={} (needs more than {}x)",
                t.boss_entity, t.boss_entity, boss, t.baseline_entity, base, t.boss_health_ratio
            ),
        )
        .entity(&t.boss_entity)
        .field("health"),
    )
}

fn boss_score_higher(snapshot: &EntitySnapshot, t: &Thresholds) -> Verdict {
    let (Some(boss), Some(base)) = (
        snapshot.number(&t.boss_entity, "score"),
        snapshot.number(&t.baseline_entity, "score"),
    ) else {
        return Verdict::Skipped;
    };

    if boss > base {
        return Verdict::Pass;
    }

    Verdict::Violation(
        Issue::new(
            IssueKind::BossScoreLow,
            format!(
                "{} bubble score too low: {}={}, {}={}",
                t.boss_entity, t.boss_entity, boss, t.baseline_entity, base
            ),
        )
        .entity(&t.boss_entity)
        .field("score"),
    )
}

/// Flag a single field when `violates` holds
fn bound(
    kind: IssueKind,
    entity: &str,
    fields: &EntityFields,
    field: &str,
    violates: impl Fn(i64) -> bool,
    describe: &str,
) -> Verdict {
    let Some(value) = number(fields, field) else {
        return Verdict::Skipped;
    };

    if !violates(value) {
        return Verdict::Pass;
    }

    Verdict::Violation(
        Issue::new(kind, format!("{} bubble {}: {}", entity, describe, value))
            .entity(entity)
            .field(field)
            .values(Some(FieldValue::Number(value)), None),
    )
}

fn size_positive(entity: &str, fields: &EntityFields, _: &Thresholds) -> Verdict {
    bound(IssueKind::InvalidSize, entity, fields, "size", |v| v <= 0, "has invalid size")
}

fn size_reasonable(entity: &str, fields: &EntityFields, t: &Thresholds) -> Verdict {
    bound(
        IssueKind::LargeSize,
        entity,
        fields,
        "size",
        |v| v > t.max_size,
        "size may be too large",
    )
}

fn health_positive(entity: &str, fields: &EntityFields, _: &Thresholds) -> Verdict {
    bound(IssueKind::InvalidHealth, entity, fields, "health", |v| v <= 0, "has invalid health")
}

fn health_reasonable(entity: &str, fields: &EntityFields, t: &Thresholds) -> Verdict {
    bound(
        IssueKind::HighHealth,
        entity,
        fields,
        "health",
        |v| v > t.max_health,
        "health may be too high",
    )
}

fn lifespan_long_enough(entity: &str, fields: &EntityFields, t: &Thresholds) -> Verdict {
    bound(
        IssueKind::ShortLifespan,
        entity,
        fields,
        "maxAge",
        |v| v < t.min_lifespan_ms,
        "lifespan (ms) is short enough to cause frequent respawns",
    )
}

fn effect_intensity_bounded(entity: &str, fields: &EntityFields, t: &Thresholds) -> Verdict {
    bound(
        IssueKind::HighEffectIntensity,
        entity,
        fields,
        "effects.intensity",
        |v| v > t.max_effect_intensity,
        "effect intensity may hurt frame rate",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{CheckStatus, RuleEngine, Severity};
    use pretty_assertions::assert_eq;

    fn engine() -> RuleEngine {
        RuleEngine::new(Thresholds::default()).with_rules(&all_rules())
    }

    fn snapshot(source: &str, rows: &[(&str, &[(&str, i64)])]) -> EntitySnapshot {
        let mut snap = EntitySnapshot::new(source);
        for (entity, fields) in rows {
            snap.touch(entity);
            for (field, value) in fields.iter() {
                snap.insert(entity, field, *value);
            }
        }
        snap
    }

    #[test]
    fn test_score_mismatch_scenario() {
        let a = snapshot("GameBalance", &[("normal", &[("health", 1), ("score", 10)])]);
        let b = snapshot("BubbleClass", &[("normal", &[("health", 1), ("score", 15)])]);

        let eval = engine().evaluate(&a, &b);
        assert_eq!(eval.issues.len(), 1);

        let issue = &eval.issues[0];
        assert_eq!(issue.kind, IssueKind::ScoreMismatch);
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.entity.as_deref(), Some("normal"));
        assert_eq!(issue.source_a_value, Some(FieldValue::Number(10)));
        assert_eq!(issue.source_b_value, Some(FieldValue::Number(15)));
    }

    #[test]
    fn test_boss_weak_scenario() {
        let a = snapshot(
            "GameBalance",
            &[("boss", &[("health", 5)]), ("normal", &[("health", 3)])],
        );
        let eval = engine().evaluate(&a, &EntitySnapshot::new("BubbleClass"));

        assert_eq!(eval.issues.len(), 1);
        assert_eq!(eval.issues[0].kind, IssueKind::BossWeak);
        assert_eq!(eval.issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_identical_sources_have_no_serious_issues() {
        let rows: &[(&str, &[(&str, i64)])] = &[
            ("normal", &[("health", 1), ("score", 15), ("size", 50), ("maxAge", 12000)]),
            ("stone", &[("health", 2), ("score", 25), ("size", 55), ("maxAge", 16000)]),
            ("boss", &[("health", 8), ("score", 100), ("size", 90), ("maxAge", 35000)]),
        ];
        let eval = engine().evaluate(&snapshot("a", rows), &snapshot("b", rows));
        assert!(
            eval.issues
                .iter()
                .all(|i| i.severity == Severity::Low),
            "{:?}",
            eval.issues
        );
    }

    #[test]
    fn test_entity_missing_from_one_side_is_not_a_mismatch() {
        let a = snapshot("a", &[("rainbow", &[("health", 1), ("score", 400)])]);
        let b = snapshot("b", &[("normal", &[("health", 9), ("score", 1)])]);
        let eval = engine().evaluate(&a, &b);
        assert!(eval.issues.iter().all(|i| i.category != crate::rules::Category::Consistency));
    }

    #[test]
    fn test_sanity_bounds() {
        let a = snapshot(
            "a",
            &[
                ("broken", &[("size", 0), ("health", -1)]),
                ("giant", &[("size", 250), ("health", 60), ("maxAge", 500), ("effects.intensity", 40)]),
            ],
        );
        let eval = engine().evaluate(&a, &EntitySnapshot::new("b"));
        let kinds: Vec<_> = eval.issues.iter().map(|i| (i.kind, i.entity.clone().unwrap())).collect();

        assert_eq!(
            kinds,
            vec![
                (IssueKind::InvalidSize, "broken".to_string()),
                (IssueKind::LargeSize, "giant".to_string()),
                (IssueKind::InvalidHealth, "broken".to_string()),
                (IssueKind::HighHealth, "giant".to_string()),
                (IssueKind::ShortLifespan, "giant".to_string()),
                (IssueKind::HighEffectIntensity, "giant".to_string()),
            ]
        );
    }

    #[test]
    fn test_boss_rules_unknown_without_boss() {
        let a = snapshot("a", &[("normal", &[("health", 1), ("score", 10)])]);
        let eval = engine().evaluate(&a, &EntitySnapshot::new("b"));
        let boss = eval
            .checks
            .iter()
            .find(|c| c.name == "boss tougher than baseline")
            .unwrap();
        assert_eq!(boss.status, CheckStatus::Unknown);
    }

    #[test]
    fn test_boss_ratio_with_huge_values() {
        let base = i64::MAX / 2 + 1;
        let a = snapshot(
            "a",
            &[("boss", &[("health", i64::MAX)]), ("normal", &[("health", base)])],
        );
        let mut thresholds = Thresholds::default();
        thresholds.max_health = i64::MAX;
        let eval = RuleEngine::new(thresholds.clone())
            .with_rules(LOGICAL_RULES)
            .evaluate(&a, &EntitySnapshot::new("b"));
        let kinds: Vec<_> = eval.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::BossWeak]);

        thresholds.boss_health_ratio = i64::MAX;
        let small = snapshot("a", &[("boss", &[("health", 10)]), ("normal", &[("health", 3)])]);
        let eval = RuleEngine::new(thresholds)
            .with_rules(LOGICAL_RULES)
            .evaluate(&small, &EntitySnapshot::new("b"));
        assert_eq!(eval.issues.len(), 1);
        assert_eq!(eval.issues[0].kind, IssueKind::BossWeak);
    }

    #[test]
    fn test_boss_score_low_is_medium() {
        let a = snapshot(
            "a",
            &[("normal", &[("health", 1), ("score", 50)]), ("boss", &[("health", 10), ("score", 50)])],
        );
        let eval = engine().evaluate(&a, &EntitySnapshot::new("b"));
        assert_eq!(eval.issues.len(), 1);
        assert_eq!(eval.issues[0].kind, IssueKind::BossScoreLow);
        assert_eq!(eval.issues[0].severity, Severity::Medium);
    }
}
