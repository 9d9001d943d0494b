//! Page aggregate: one business's composable marketing page.

use crate::domain::blocks::{Block, BlockContent, BlockId, CtaData, CtaVariant, HeroData};
use crate::domain::templates::{self, PageTemplate, TemplateStyles};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single page per business.
pub const DEFAULT_PAGE_ID: &str = "overview";

/// Visual theme selector. Orthogonal to block content; unknown ids are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub const DEFAULT: &'static str = "employer-brand";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Preset with this id, if any.
    pub fn preset(&self) -> Option<&'static PageTemplate> {
        templates::find(&self.0)
    }

    pub fn styles(&self) -> TemplateStyles {
        templates::styles_for(&self.0)
    }
}

impl Default for TemplateId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub template_id: TemplateId,
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn new(template_id: TemplateId, blocks: Vec<Block>) -> Self {
        Self {
            id: DEFAULT_PAGE_ID.to_string(),
            template_id,
            blocks,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn empty(template_id: TemplateId) -> Self {
        Self::new(template_id, Vec::new())
    }

    /// Two-block minimum (Hero, CTA) used when nothing else is available.
    pub fn minimum(business_name: Option<&str>, template_id: TemplateId) -> Self {
        let hero = BlockContent::Hero(HeroData {
            heading: business_name.unwrap_or("Your Business").to_string(),
            subheading: Some("Join our team".into()),
            cta_text: Some("View Opportunities".into()),
            cta_link: Some("/jobs".into()),
            ..HeroData::default()
        });
        let cta = BlockContent::Cta(CtaData {
            heading: Some("Ready to Join Us?".into()),
            text: None,
            button_text: "View Open Roles".into(),
            button_link: "/jobs".into(),
            variant: Some(CtaVariant::Primary),
        });
        Self::new(template_id, vec![Block::new(0, hero), Block::new(1, cta)])
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in render order. See [`sorted_blocks`].
    pub fn sorted_blocks(&self) -> Vec<&Block> {
        sorted_blocks(self)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn max_order(&self) -> Option<i64> {
        self.blocks.iter().map(|b| b.order).max()
    }
}

/// Ascending by `order`; ties keep their array position (stable sort).
pub fn sorted_blocks(page: &Page) -> Vec<&Block> {
    let mut blocks: Vec<&Block> = page.blocks.iter().collect();
    blocks.sort_by_key(|b| b.order);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlockType;
    use serde_json::json;

    fn block(id: &str, order: i64) -> Block {
        Block {
            id: BlockId::from(id),
            order,
            content: BlockContent::default_for(BlockType::RichText),
        }
    }

    #[test]
    fn test_sorted_blocks_orders_cta_before_hero() {
        let page: Page = serde_json::from_value(json!({
            "id": "overview",
            "templateId": "employer-brand",
            "blocks": [
                { "id": "a", "type": "hero", "order": 1, "data": { "heading": "X" } },
                { "id": "b", "type": "cta", "order": 0, "data": { "buttonText": "Go", "buttonLink": "/jobs" } }
            ]
        }))
        .unwrap();

        let ids: Vec<&str> = page.sorted_blocks().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_sorted_blocks_is_stable_on_ties() {
        let page = Page::new(
            TemplateId::default(),
            vec![block("x", 2), block("y", 1), block("z", 2), block("w", 1)],
        );
        let ids: Vec<&str> = sorted_blocks(&page).iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["y", "w", "x", "z"]);
    }

    #[test]
    fn test_minimum_page_is_hero_then_cta() {
        let page = Page::minimum(Some("Acme"), TemplateId::default());
        let kinds: Vec<BlockType> = page.sorted_blocks().iter().map(|b| b.block_type()).collect();
        assert_eq!(kinds, vec![BlockType::Hero, BlockType::Cta]);
        let BlockContent::Hero(hero) = &page.blocks[0].content else {
            panic!("expected hero");
        };
        assert_eq!(hero.heading, "Acme");
    }

    #[test]
    fn test_unknown_template_id_is_preserved() {
        let id = TemplateId::new("classic");
        assert!(id.preset().is_none());
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("classic"));
    }
}
