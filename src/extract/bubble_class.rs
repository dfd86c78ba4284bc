//! Bubble class fallback-config extractor
//!
//! The Bubble class carries a hardcoded copy of the balance table in
//! `_getHardcodedConfig()`, as a `configs` object literal keyed by bubble type.

use std::sync::LazyLock;

use regex::Regex;

use super::Extractor;
use super::patterns::{find_block, nested_objects, number_field, strip_comments, top_level};
use crate::error::ExtractError;
use crate::snapshot::EntitySnapshot;

pub const SOURCE: &str = "BubbleClass";

const FIELDS: &[&str] = &["health", "score", "size", "maxAge"];

static METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_getHardcodedConfig\s*\([^)]*\)[^{;]*\{").expect("valid regex")
});
// Allows a TS annotation between the name and `=`
static CONFIGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bconfigs\b[^=;]*=\s*\{").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleClassExtractor;

impl Extractor for BubbleClassExtractor {
    fn source(&self) -> &str {
        SOURCE
    }

    fn extract(&self, content: &str) -> Result<EntitySnapshot, ExtractError> {
        let content = strip_comments(content);
        let method = find_block(&content, &METHOD)
            .ok_or_else(|| ExtractError::MissingSection("_getHardcodedConfig".to_string()))?;
        let configs = find_block(method, &CONFIGS)
            .ok_or_else(|| ExtractError::MissingSection("configs".to_string()))?;

        let mut snapshot = EntitySnapshot::new(SOURCE);
        for (bubble_type, body) in nested_objects(configs) {
            snapshot.touch(bubble_type);
            let own = top_level(body);
            for field in FIELDS {
                if let Some(value) = number_field(&own, field) {
                    snapshot.insert(bubble_type, field, value);
                }
            }
        }

        Ok(snapshot)
    }
}
