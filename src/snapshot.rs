//! Extracted entity values
//!
//! A snapshot is everything one source says about every entity it defines.
//! Ordered maps keep repeated extractions (and their JSON) byte-identical.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A single configuration value.
///
/// JSON keeps its own kinds, so a translation that turns text into `null`
/// or a bool into `"true"` is still visible to the rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers and floats alike
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// `1` and `1.0` are the same kind
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Number(_) | FieldValue::Float(_) => "number",
            FieldValue::Bool(_) => "bool",
            FieldValue::Text(_) => "text",
            FieldValue::Null => "null",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Text(s) => write!(f, "{:?}", s),
            FieldValue::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Field name -> value for one entity
pub type EntityFields = BTreeMap<String, FieldValue>;

/// Entity name -> fields, as seen by one source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub source: String,
    pub entities: BTreeMap<String, EntityFields>,
}

impl EntitySnapshot {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entities: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn get(&self, entity: &str) -> Option<&EntityFields> {
        self.entities.get(entity)
    }

    /// Look up one numeric field; absent or non-numeric is `None`, never zero
    pub fn number(&self, entity: &str, field: &str) -> Option<i64> {
        self.entities.get(entity)?.get(field)?.as_number()
    }

    /// Set a field, creating the entity on first use
    pub fn insert(&mut self, entity: &str, field: &str, value: impl Into<FieldValue>) {
        self.entities
            .entry(entity.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
    }

    /// Make sure an entity exists even when none of its fields matched
    pub fn touch(&mut self, entity: &str) {
        self.entities.entry(entity.to_string()).or_default();
    }

    /// Entity names present in both snapshots, in order
    pub fn shared_entities<'a>(&'a self, other: &'a EntitySnapshot) -> impl Iterator<Item = &'a str> {
        self.entities
            .keys()
            .filter(move |name| other.entities.contains_key(*name))
            .map(String::as_str)
    }

    /// Merge another snapshot's entities into this one (later values win)
    pub fn absorb(&mut self, other: EntitySnapshot) {
        for (entity, fields) in other.entities {
            self.entities.entry(entity).or_default().extend(fields);
        }
    }
}

/// Where a snapshot came from, for the report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub name: String,
    pub path: PathBuf,
    pub entities: usize,
    pub loaded: bool,
}

impl SourceSummary {
    pub fn of(snapshot: &EntitySnapshot, path: &Path) -> Self {
        Self {
            name: snapshot.source.clone(),
            path: path.to_path_buf(),
            entities: snapshot.len(),
            loaded: !snapshot.is_empty(),
        }
    }
}
