//! GameBalance module extractor
//!
//! Reads the canonical balance table:
//!
//! ```text
//! baseScores: { normal: 15, stone: 25, ... },
//! bubbles: {
//!     normal: { health: 1, size: 50, maxAge: 12000 },
//!     boss:   { health: 8, size: 90, effects: { intensity: 20, duration: 800 } },
//! }
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::Extractor;
use super::patterns::{
    find_block, nested_objects, number_field, number_pairs, strip_comments, top_level,
};
use crate::error::ExtractError;
use crate::snapshot::EntitySnapshot;

pub const SOURCE: &str = "GameBalance";

/// Per-bubble numeric fields
const BUBBLE_FIELDS: &[&str] = &["health", "size", "maxAge"];

/// Fields read from a bubble's `effects` sub-block, stored as `effects.<name>`
const EFFECT_FIELDS: &[&str] = &["intensity", "duration"];

static BASE_SCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbaseScores\s*:\s*\{").expect("valid regex"));
static BUBBLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbubbles\s*:\s*\{").expect("valid regex"));
static EFFECTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\beffects\s*:\s*\{").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct GameBalanceExtractor;

impl Extractor for GameBalanceExtractor {
    fn source(&self) -> &str {
        SOURCE
    }

    fn extract(&self, content: &str) -> Result<EntitySnapshot, ExtractError> {
        let content = strip_comments(content);
        let scores = find_block(&content, &BASE_SCORES);
        let bubbles = find_block(&content, &BUBBLES);

        if scores.is_none() && bubbles.is_none() {
            return Err(ExtractError::MissingSection("baseScores / bubbles".to_string()));
        }

        let mut snapshot = EntitySnapshot::new(SOURCE);

        if let Some(block) = scores {
            for (bubble_type, score) in number_pairs(&top_level(block)) {
                snapshot.insert(bubble_type, "score", score);
            }
        }

        if let Some(block) = bubbles {
            for (bubble_type, body) in nested_objects(block) {
                snapshot.touch(bubble_type);

                let own = top_level(body);
                for field in BUBBLE_FIELDS {
                    if let Some(value) = number_field(&own, field) {
                        snapshot.insert(bubble_type, field, value);
                    }
                }

                if let Some(effects) = find_block(body, &EFFECTS) {
                    for field in EFFECT_FIELDS {
                        if let Some(value) = number_field(effects, field) {
                            snapshot.insert(bubble_type, &format!("effects.{}", field), value);
                        }
                    }
                }
            }
        }

        Ok(snapshot)
    }
}
