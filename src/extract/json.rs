//! JSON bundle extractor (help content, translations)
//!
//! Each top-level key is an entity. Nested objects and arrays are flattened
//! into dotted field names: `{"menu": {"items": ["a"]}}` -> `menu` / `items.0`.

use serde_json::Value;

use super::Extractor;
use crate::error::ExtractError;
use crate::snapshot::{EntityFields, EntitySnapshot, FieldValue};

/// Field name used when a top-level value is not an object
pub const SCALAR_FIELD: &str = "value";

#[derive(Debug, Clone)]
pub struct JsonExtractor {
    source: String,
    /// Prepended to entity names as `<prefix>/<key>`
    prefix: Option<String>,
}

impl JsonExtractor {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn entity_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{}/{}", p, key),
            None => key.to_string(),
        }
    }
}

impl Extractor for JsonExtractor {
    fn source(&self) -> &str {
        &self.source
    }

    fn extract(&self, content: &str) -> Result<EntitySnapshot, ExtractError> {
        let root: Value = serde_json::from_str(content).map_err(|e| ExtractError::Parse {
            what: self.source.clone(),
            message: e.to_string(),
        })?;

        let Value::Object(map) = root else {
            return Err(ExtractError::Parse {
                what: self.source.clone(),
                message: "top-level value is not an object".to_string(),
            });
        };

        let mut snapshot = EntitySnapshot::new(self.source.clone());
        for (key, value) in &map {
            let mut fields = EntityFields::new();
            match value {
                Value::Object(_) | Value::Array(_) => flatten(value, "", &mut fields),
                scalar => flatten(scalar, SCALAR_FIELD, &mut fields),
            }
            snapshot.entities.insert(self.entity_name(key), fields);
        }

        Ok(snapshot)
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn flatten(value: &Value, path: &str, out: &mut EntityFields) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(child, &join(path, key), out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten(child, &join(path, &i.to_string()), out);
            }
        }
        Value::String(s) => {
            out.insert(path.to_string(), FieldValue::Text(s.clone()));
        }
        Value::Number(n) => {
            let field = match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => FieldValue::Number(i),
                (None, Some(f)) => FieldValue::Float(f),
                (None, None) => FieldValue::Text(n.to_string()),
            };
            out.insert(path.to_string(), field);
        }
        Value::Bool(b) => {
            out.insert(path.to_string(), FieldValue::Bool(*b));
        }
        Value::Null => {
            out.insert(path.to_string(), FieldValue::Null);
        }
    }
}
