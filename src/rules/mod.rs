//! Consistency rules and the engine that runs them
//!
//! Rules are plain functions over snapshots. They never mutate their inputs,
//! so evaluation order only affects the order issues are listed in.

pub mod balance;
pub mod content;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::{EntityFields, EntitySnapshot, FieldValue};

/// How bad an issue is. Any `High` fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which rule family produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Consistency,
    Logical,
    Performance,
    Content,
}

/// Issue type; each carries a fixed severity and category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IssueKind {
    #[serde(rename = "HEALTH_MISMATCH")]
    HealthMismatch,
    #[serde(rename = "SCORE_MISMATCH")]
    ScoreMismatch,
    #[serde(rename = "SIZE_MISMATCH")]
    SizeMismatch,
    #[serde(rename = "MAXAGE_MISMATCH")]
    MaxAgeMismatch,
    #[serde(rename = "BOSS_WEAK")]
    BossWeak,
    #[serde(rename = "BOSS_SCORE_LOW")]
    BossScoreLow,
    #[serde(rename = "INVALID_SIZE")]
    InvalidSize,
    #[serde(rename = "LARGE_SIZE")]
    LargeSize,
    #[serde(rename = "INVALID_HEALTH")]
    InvalidHealth,
    #[serde(rename = "HIGH_HEALTH")]
    HighHealth,
    #[serde(rename = "SHORT_LIFESPAN")]
    ShortLifespan,
    #[serde(rename = "HIGH_EFFECT_INTENSITY")]
    HighEffectIntensity,
    #[serde(rename = "MISSING_ENTITY")]
    MissingEntity,
    #[serde(rename = "MISSING_FIELD")]
    MissingField,
    #[serde(rename = "EMPTY_VALUE")]
    EmptyValue,
    #[serde(rename = "TYPE_MISMATCH")]
    TypeMismatch,
    #[serde(rename = "PLACEHOLDER_MISMATCH")]
    PlaceholderMismatch,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::HealthMismatch => "HEALTH_MISMATCH",
            IssueKind::ScoreMismatch => "SCORE_MISMATCH",
            IssueKind::SizeMismatch => "SIZE_MISMATCH",
            IssueKind::MaxAgeMismatch => "MAXAGE_MISMATCH",
            IssueKind::BossWeak => "BOSS_WEAK",
            IssueKind::BossScoreLow => "BOSS_SCORE_LOW",
            IssueKind::InvalidSize => "INVALID_SIZE",
            IssueKind::LargeSize => "LARGE_SIZE",
            IssueKind::InvalidHealth => "INVALID_HEALTH",
            IssueKind::HighHealth => "HIGH_HEALTH",
            IssueKind::ShortLifespan => "SHORT_LIFESPAN",
            IssueKind::HighEffectIntensity => "HIGH_EFFECT_INTENSITY",
            IssueKind::MissingEntity => "MISSING_ENTITY",
            IssueKind::MissingField => "MISSING_FIELD",
            IssueKind::EmptyValue => "EMPTY_VALUE",
            IssueKind::TypeMismatch => "TYPE_MISMATCH",
            IssueKind::PlaceholderMismatch => "PLACEHOLDER_MISMATCH",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::HealthMismatch
            | IssueKind::ScoreMismatch
            | IssueKind::InvalidSize
            | IssueKind::InvalidHealth
            | IssueKind::TypeMismatch
            | IssueKind::PlaceholderMismatch => Severity::High,
            IssueKind::SizeMismatch
            | IssueKind::BossScoreLow
            | IssueKind::ShortLifespan
            | IssueKind::HighEffectIntensity
            | IssueKind::EmptyValue => Severity::Medium,
            IssueKind::MaxAgeMismatch
            | IssueKind::BossWeak
            | IssueKind::LargeSize
            | IssueKind::HighHealth
            | IssueKind::MissingEntity
            | IssueKind::MissingField => Severity::Low,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            IssueKind::HealthMismatch
            | IssueKind::ScoreMismatch
            | IssueKind::SizeMismatch
            | IssueKind::MaxAgeMismatch => Category::Consistency,
            IssueKind::BossWeak
            | IssueKind::BossScoreLow
            | IssueKind::InvalidSize
            | IssueKind::LargeSize
            | IssueKind::InvalidHealth
            | IssueKind::HighHealth => Category::Logical,
            IssueKind::ShortLifespan | IssueKind::HighEffectIntensity => Category::Performance,
            IssueKind::MissingEntity
            | IssueKind::MissingField
            | IssueKind::EmptyValue
            | IssueKind::TypeMismatch
            | IssueKind::PlaceholderMismatch => Category::Content,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected inconsistency. Built once by a rule, never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Name of source A, when the rule read it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_a: Option<String>,
    /// Name of source B, when the rule compared against it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_b: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_a_value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_b_value: Option<FieldValue>,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            category: kind.category(),
            entity: None,
            source_a: None,
            source_b: None,
            field: None,
            source_a_value: None,
            source_b_value: None,
            message: message.into(),
        }
    }

    pub fn entity(mut self, entity: &str) -> Self {
        self.entity = Some(entity.to_string());
        self
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn sources(mut self, a: &str, b: &str) -> Self {
        self.source_a = Some(a.to_string());
        self.source_b = Some(b.to_string());
        self
    }

    pub fn values(mut self, a: Option<FieldValue>, b: Option<FieldValue>) -> Self {
        self.source_a_value = a;
        self.source_b_value = b;
        self
    }
}

/// Outcome of applying a rule to one input
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Violation(Issue),
    /// The inputs the rule needs are absent
    Skipped,
}

/// Numeric limits used by the sanity and relative rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Sizes above this are flagged as unusually large
    pub max_size: i64,
    /// Health above this is flagged as unusually high
    pub max_health: i64,
    /// Boss health must exceed baseline health by more than this factor
    pub boss_health_ratio: i64,
    /// Lifespans (ms) below this are flagged
    pub min_lifespan_ms: i64,
    pub max_effect_intensity: i64,
    pub boss_entity: String,
    pub baseline_entity: String,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_size: 200,
            max_health: 50,
            boss_health_ratio: 2,
            min_lifespan_ms: 1000,
            max_effect_intensity: 30,
            boss_entity: "boss".to_string(),
            baseline_entity: "normal".to_string(),
        }
    }
}

pub type PairCheck = fn(&str, &EntityFields, &EntityFields) -> Verdict;
pub type FieldCheck = fn(&str, &str, &FieldValue, Option<&FieldValue>) -> Verdict;
pub type EntityCheck = fn(&str, &EntityFields, &Thresholds) -> Verdict;
pub type SnapshotCheck = fn(&EntitySnapshot, &Thresholds) -> Verdict;

/// What a rule looks at
#[derive(Clone, Copy)]
pub enum Check {
    /// Each entity present in both sources
    Pair(PairCheck),
    /// Each field of source A on entities present in both sources
    Field(FieldCheck),
    /// Each entity of source A on its own
    Entity(EntityCheck),
    /// Source A as a whole
    Snapshot(SnapshotCheck),
}

impl Check {
    /// Whether the rule reads source B
    pub fn compares(&self) -> bool {
        matches!(self, Check::Pair(_) | Check::Field(_))
    }
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: Check,
}

impl Rule {
    pub const fn pair(name: &'static str, check: PairCheck) -> Self {
        Self { name, check: Check::Pair(check) }
    }

    pub const fn field(name: &'static str, check: FieldCheck) -> Self {
        Self { name, check: Check::Field(check) }
    }

    pub const fn entity(name: &'static str, check: EntityCheck) -> Self {
        Self { name, check: Check::Entity(check) }
    }

    pub const fn snapshot(name: &'static str, check: SnapshotCheck) -> Self {
        Self { name, check: Check::Snapshot(check) }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Whether a rule could say anything about the inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// Never had the inputs it needs, so no verdict either way
    Unknown,
}

impl CheckStatus {
    pub fn from_counts(evaluated: usize, violations: usize) -> Self {
        if violations > 0 {
            CheckStatus::Fail
        } else if evaluated > 0 {
            CheckStatus::Pass
        } else {
            CheckStatus::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub evaluated: usize,
    pub violations: usize,
}

/// Issues plus per-rule status from one engine run
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub issues: Vec<Issue>,
    pub checks: Vec<CheckResult>,
}

impl Evaluation {
    pub fn extend(&mut self, other: Evaluation) {
        self.issues.extend(other.issues);
        self.checks.extend(other.checks);
    }
}

#[derive(Debug, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    thresholds: Thresholds,
}

impl RuleEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            rules: Vec::new(),
            thresholds,
        }
    }

    pub fn with_rules(mut self, rules: &[Rule]) -> Self {
        self.rules.extend_from_slice(rules);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run every rule. Source `a` is the canonical side.
    pub fn evaluate(&self, a: &EntitySnapshot, b: &EntitySnapshot) -> Evaluation {
        let mut evaluation = Evaluation::default();

        for rule in &self.rules {
            let verdicts = self.apply(rule, a, b);

            let mut evaluated = 0;
            let mut violations = 0;
            for verdict in verdicts {
                match verdict {
                    Verdict::Pass => evaluated += 1,
                    Verdict::Violation(mut issue) => {
                        evaluated += 1;
                        violations += 1;
                        issue.source_a = Some(a.source.clone());
                        if rule.check.compares() {
                            issue.source_b = Some(b.source.clone());
                        }
                        evaluation.issues.push(issue);
                    }
                    Verdict::Skipped => {}
                }
            }

            evaluation.checks.push(CheckResult {
                name: rule.name.to_string(),
                status: CheckStatus::from_counts(evaluated, violations),
                evaluated,
                violations,
            });
        }

        evaluation
    }

    fn apply(&self, rule: &Rule, a: &EntitySnapshot, b: &EntitySnapshot) -> Vec<Verdict> {
        match rule.check {
            Check::Pair(check) => a
                .shared_entities(b)
                .map(|name| check(name, &a.entities[name], &b.entities[name]))
                .collect(),
            Check::Field(check) => a
                .shared_entities(b)
                .flat_map(|name| {
                    let theirs = &b.entities[name];
                    a.entities[name]
                        .iter()
                        .map(move |(field, value)| check(name, field, value, theirs.get(field)))
                })
                .collect(),
            Check::Entity(check) => a
                .entities
                .iter()
                .map(|(name, fields)| check(name, fields, &self.thresholds))
                .collect(),
            Check::Snapshot(check) => vec![check(a, &self.thresholds)],
        }
    }
}
