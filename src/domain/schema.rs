//! Block-level decoding of a stored `page_blocks` column.
//!
//! One malformed entry never poisons the rest: each element is decoded on its own
//! and rejected entries are reported as [`SchemaViolation`]s.

use crate::domain::DomainError;
use crate::domain::blocks::Block;
use serde_json::Value;
use std::fmt;

/// A stored block that could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation {
    /// Position in the stored array.
    pub index: usize,
    pub block_id: Option<String>,
    pub block_type: Option<String>,
    pub reason: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block #{} (id={}, type={}): {}",
            self.index,
            self.block_id.as_deref().unwrap_or("?"),
            self.block_type.as_deref().unwrap_or("?"),
            self.reason
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBlocks {
    pub blocks: Vec<Block>,
    pub violations: Vec<SchemaViolation>,
}

/// Decode every element of a stored block array independently.
///
/// `null` decodes to nothing. A non-array value is a single violation.
pub fn decode_blocks(value: &Value) -> DecodedBlocks {
    let items = match value {
        Value::Null => return DecodedBlocks::default(),
        Value::Array(items) => items,
        other => {
            return DecodedBlocks {
                blocks: Vec::new(),
                violations: vec![SchemaViolation {
                    index: 0,
                    block_id: None,
                    block_type: None,
                    reason: format!("expected an array of blocks, found {}", kind_name(other)),
                }],
            };
        }
    };

    let mut decoded = DecodedBlocks::default();
    for (index, item) in items.iter().enumerate() {
        match decode_one(item) {
            Ok(block) => decoded.blocks.push(block),
            Err(reason) => decoded.violations.push(SchemaViolation {
                index,
                block_id: item.get("id").and_then(Value::as_str).map(String::from),
                block_type: item.get("type").and_then(Value::as_str).map(String::from),
                reason,
            }),
        }
    }
    decoded
}

fn decode_one(item: &Value) -> Result<Block, String> {
    let block: Block = serde_json::from_value(item.clone()).map_err(|e| e.to_string())?;
    block.content.validate().map_err(|e| match e {
        DomainError::Schema(msg) => msg,
        other => other.to_string(),
    })?;
    Ok(block)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bad_block_is_contained() {
        let decoded = decode_blocks(&json!([
            { "id": "a", "type": "hero", "order": 0, "data": { "heading": "Acme" } },
            { "id": "b", "type": "testimonial", "order": 1, "data": {} },
            { "id": "c", "type": "stats", "order": 2, "data": { "items": [] } },
            { "id": "d", "type": "cta", "order": 3, "data": { "buttonText": "Go", "buttonLink": "/jobs" } }
        ]));

        let ids: Vec<&str> = decoded.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(decoded.violations.len(), 2);
        assert_eq!(decoded.violations[0].index, 1);
        assert_eq!(decoded.violations[0].block_type.as_deref(), Some("testimonial"));
        assert!(decoded.violations[0].reason.contains("testimonial"));
        assert_eq!(decoded.violations[1].block_id.as_deref(), Some("c"));
    }

    #[test]
    fn test_validation_failures_are_violations() {
        let decoded = decode_blocks(&json!([
            { "id": "a", "type": "hero", "order": 0, "data": { "heading": "   " } }
        ]));
        assert!(decoded.blocks.is_empty());
        assert!(decoded.violations[0].reason.contains("heading"));
    }

    #[test]
    fn test_null_and_non_array() {
        assert_eq!(decode_blocks(&Value::Null), DecodedBlocks::default());
        let decoded = decode_blocks(&json!({ "blocks": [] }));
        assert!(decoded.blocks.is_empty());
        assert_eq!(decoded.violations.len(), 1);
    }
}
