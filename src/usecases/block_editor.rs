//! Field-level editor over one block's payload.
//!
//! Every edit is checked by rebuilding the typed payload from the edited JSON. A
//! rejected edit leaves the draft untouched.

use crate::domain::{Block, BlockContent, BlockId, BlockType, DomainError};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain string, entered as-is.
    Text,
    /// Numbers, booleans, lists and objects, entered as JSON.
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: Option<Value>,
}

impl Field {
    /// Current value as the user would type it back in.
    pub fn display_value(&self) -> String {
        match (&self.value, self.kind) {
            (None, _) => String::new(),
            (Some(Value::String(s)), FieldKind::Text) => s.clone(),
            (Some(v), _) => v.to_string(),
        }
    }
}

type FieldSpec = (&'static str, FieldKind, bool);

fn field_specs(kind: BlockType) -> &'static [FieldSpec] {
    use FieldKind::{Json, Text};
    match kind {
        BlockType::Hero => &[
            ("heading", Text, true),
            ("subheading", Text, false),
            ("backgroundImage", Text, false),
            ("backgroundVideo", Text, false),
            ("logoUrl", Text, false),
            ("ctaText", Text, false),
            ("ctaLink", Text, false),
        ],
        BlockType::TextMedia => &[
            ("heading", Text, false),
            ("text", Text, true),
            ("mediaUrl", Text, false),
            ("mediaType", Text, false),
            ("layout", Text, true),
        ],
        BlockType::RichText => &[("heading", Text, false), ("content", Text, true)],
        BlockType::ImageGallery => &[("images", Json, true), ("columns", Json, false)],
        BlockType::ImageCarousel => &[("images", Json, true), ("autoplay", Json, false)],
        BlockType::Video => &[
            ("videoUrl", Text, true),
            ("thumbnailUrl", Text, false),
            ("autoplay", Json, false),
            ("caption", Text, false),
        ],
        BlockType::Stats => &[("stats", Json, true)],
        BlockType::ExpandableRoles => &[("categories", Json, true)],
        BlockType::BenefitsCulture => &[("title", Text, false), ("items", Json, true)],
        BlockType::Accordion => &[
            ("title", Text, false),
            ("items", Json, true),
            ("allowMultiple", Json, false),
        ],
        BlockType::Cta => &[
            ("heading", Text, false),
            ("text", Text, false),
            ("buttonText", Text, true),
            ("buttonLink", Text, true),
            ("variant", Text, false),
        ],
    }
}

/// Draft copy of a block. Produces a replacement with the same id and order.
#[derive(Debug, Clone)]
pub struct BlockEditor {
    id: BlockId,
    order: i64,
    draft: BlockContent,
}

impl BlockEditor {
    pub fn new(block: &Block) -> Self {
        Self {
            id: block.id.clone(),
            order: block.order,
            draft: block.content.clone(),
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.draft.block_type()
    }

    pub fn draft(&self) -> &BlockContent {
        &self.draft
    }

    pub fn fields(&self) -> Result<Vec<Field>, DomainError> {
        let data = self.draft.data_value()?;
        Ok(field_specs(self.block_type())
            .iter()
            .map(|&(key, kind, required)| Field {
                key,
                kind,
                required,
                value: data.get(key).cloned(),
            })
            .collect())
    }

    /// Set one field from user input. Blank input clears an optional field.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), DomainError> {
        let invalid = |reason: String| DomainError::InvalidEdit {
            field: key.to_string(),
            reason,
        };
        let &(key, kind, required) = field_specs(self.block_type())
            .iter()
            .find(|(k, _, _)| *k == key)
            .ok_or_else(|| invalid(format!("no such field on {}", self.block_type())))?;

        let mut data = match self.draft.data_value()? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if raw.trim().is_empty() && !required {
            data.remove(key);
        } else {
            let value = match kind {
                FieldKind::Text => Value::String(raw.to_string()),
                FieldKind::Json => serde_json::from_str(raw)
                    .map_err(|e| invalid(format!("invalid JSON: {e}")))?,
            };
            data.insert(key.to_string(), value);
        }

        let candidate = BlockContent::from_parts(self.block_type().as_str(), Value::Object(data))
            .map_err(|e| invalid(e.to_string()))?;
        candidate.validate().map_err(|e| invalid(e.to_string()))?;
        self.draft = candidate;
        Ok(())
    }

    pub fn commit(self) -> Block {
        Block {
            id: self.id,
            order: self.order,
            content: self.draft,
        }
    }
}
