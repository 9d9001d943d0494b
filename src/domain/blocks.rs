//! Page blocks. Closed tagged union of block variants and their payloads.
//!
//! Wire shape (backend JSON column): `{ "id", "type", "order", "data" }` with
//! camelCase payload keys. The `type` tag and the `data` shape are tied together
//! by [`BlockContent`]; a block whose payload does not fit its tag cannot be built.

use crate::domain::DomainError;
use chrono::Utc;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque block identifier. Stable across edits; generated once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Fresh id: `block-{unix_millis}-{9 random hex chars}`.
    pub fn generate() -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "block-{}-{}",
            Utc::now().timestamp_millis(),
            &suffix[..9]
        ))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Block discriminant. Serialized as the kebab-case `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Hero,
    TextMedia,
    RichText,
    ImageGallery,
    ImageCarousel,
    Video,
    Stats,
    ExpandableRoles,
    BenefitsCulture,
    Accordion,
    Cta,
}

impl BlockType {
    /// Every variant, in add-menu order.
    pub const ALL: [Self; 11] = [
        Self::Hero,
        Self::TextMedia,
        Self::RichText,
        Self::ImageGallery,
        Self::ImageCarousel,
        Self::Video,
        Self::Stats,
        Self::ExpandableRoles,
        Self::BenefitsCulture,
        Self::Accordion,
        Self::Cta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::TextMedia => "text-media",
            Self::RichText => "rich-text",
            Self::ImageGallery => "image-gallery",
            Self::ImageCarousel => "image-carousel",
            Self::Video => "video",
            Self::Stats => "stats",
            Self::ExpandableRoles => "expandable-roles",
            Self::BenefitsCulture => "benefits-culture",
            Self::Accordion => "accordion",
            Self::Cta => "cta",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::TextMedia => "Text + Media",
            Self::RichText => "Rich Text",
            Self::ImageGallery => "Image Gallery",
            Self::ImageCarousel => "Image Carousel",
            Self::Video => "Video",
            Self::Stats => "Stats",
            Self::ExpandableRoles => "Expandable Roles",
            Self::BenefitsCulture => "Benefits & Culture",
            Self::Accordion => "Accordion",
            Self::Cta => "Call to Action",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Hero => "Large header with image/video background",
            Self::TextMedia => "Text content with image or video",
            Self::RichText => "Multi-paragraph text content",
            Self::ImageGallery => "Grid of images with lightbox",
            Self::ImageCarousel => "Swipeable image carousel",
            Self::Video => "Video player",
            Self::Stats => "Animated numbers and metrics",
            Self::ExpandableRoles => "Collapsible role categories",
            Self::BenefitsCulture => "List of benefits or values",
            Self::Accordion => "Expandable sections",
            Self::Cta => "Button with heading",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownBlockType(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payloads
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextLayout {
    #[default]
    TextLeft,
    TextRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMediaData {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    pub layout: TextLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextData {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGalleryData {
    pub images: Vec<GalleryImage>,
    /// 2, 3 or 4; renderers fall back to 3 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCarouselData {
    pub images: Vec<GalleryImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footnote: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCategory {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandableRolesData {
    pub categories: Vec<RoleCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitsCultureData {
    pub items: Vec<BenefitItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccordionItem {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccordionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<AccordionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiple: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaVariant {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub button_text: String,
    pub button_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<CtaVariant>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tagged union
// ─────────────────────────────────────────────────────────────────────────────

/// Variant payload. The enum arm is the `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Hero(HeroData),
    TextMedia(TextMediaData),
    RichText(RichTextData),
    ImageGallery(ImageGalleryData),
    ImageCarousel(ImageCarouselData),
    Video(VideoData),
    Stats(StatsData),
    ExpandableRoles(ExpandableRolesData),
    BenefitsCulture(BenefitsCultureData),
    Accordion(AccordionData),
    Cta(CtaData),
}

impl BlockContent {
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Hero(_) => BlockType::Hero,
            Self::TextMedia(_) => BlockType::TextMedia,
            Self::RichText(_) => BlockType::RichText,
            Self::ImageGallery(_) => BlockType::ImageGallery,
            Self::ImageCarousel(_) => BlockType::ImageCarousel,
            Self::Video(_) => BlockType::Video,
            Self::Stats(_) => BlockType::Stats,
            Self::ExpandableRoles(_) => BlockType::ExpandableRoles,
            Self::BenefitsCulture(_) => BlockType::BenefitsCulture,
            Self::Accordion(_) => BlockType::Accordion,
            Self::Cta(_) => BlockType::Cta,
        }
    }

    /// Payload a freshly added block starts with. Every default renders visible content.
    pub fn default_for(kind: BlockType) -> Self {
        match kind {
            BlockType::Hero => Self::Hero(HeroData {
                heading: "Welcome".into(),
                subheading: Some("Join our team".into()),
                ..HeroData::default()
            }),
            BlockType::TextMedia => Self::TextMedia(TextMediaData {
                text: "Add your content here".into(),
                media_url: None,
                media_type: None,
                layout: TextLayout::TextLeft,
                heading: None,
            }),
            BlockType::RichText => Self::RichText(RichTextData {
                content: "Add your content here".into(),
                heading: None,
            }),
            BlockType::ImageGallery => Self::ImageGallery(ImageGalleryData {
                images: Vec::new(),
                columns: Some(3),
            }),
            BlockType::ImageCarousel => Self::ImageCarousel(ImageCarouselData {
                images: Vec::new(),
                autoplay: Some(false),
            }),
            BlockType::Video => Self::Video(VideoData {
                video_url: String::new(),
                thumbnail_url: None,
                autoplay: None,
                caption: None,
            }),
            BlockType::Stats => Self::Stats(StatsData {
                stats: vec![Stat {
                    value: "0".into(),
                    label: "Stat".into(),
                    footnote: None,
                }],
            }),
            BlockType::ExpandableRoles => Self::ExpandableRoles(ExpandableRolesData {
                categories: vec![RoleCategory {
                    title: "Category".into(),
                    description: None,
                    roles: None,
                }],
            }),
            BlockType::BenefitsCulture => Self::BenefitsCulture(BenefitsCultureData {
                items: vec![BenefitItem {
                    title: "Benefit".into(),
                    description: None,
                    icon: None,
                }],
                title: None,
            }),
            BlockType::Accordion => Self::Accordion(AccordionData {
                title: None,
                items: vec![AccordionItem {
                    title: "Section".into(),
                    content: "Content here".into(),
                    icon: None,
                }],
                allow_multiple: Some(false),
            }),
            BlockType::Cta => Self::Cta(CtaData {
                heading: None,
                text: None,
                button_text: "Click Here".into(),
                button_link: "#".into(),
                variant: None,
            }),
        }
    }

    /// Build a payload from its wire tag and JSON `data`.
    pub fn from_parts(kind: &str, data: serde_json::Value) -> Result<Self, DomainError> {
        let kind: BlockType = kind.parse()?;
        let schema_err = |e: serde_json::Error| DomainError::Schema(format!("{kind}: {e}"));
        Ok(match kind {
            BlockType::Hero => Self::Hero(serde_json::from_value(data).map_err(schema_err)?),
            BlockType::TextMedia => {
                Self::TextMedia(serde_json::from_value(data).map_err(schema_err)?)
            }
            BlockType::RichText => {
                Self::RichText(serde_json::from_value(data).map_err(schema_err)?)
            }
            BlockType::ImageGallery => {
                Self::ImageGallery(serde_json::from_value(data).map_err(schema_err)?)
            }
            BlockType::ImageCarousel => {
                Self::ImageCarousel(serde_json::from_value(data).map_err(schema_err)?)
            }
            BlockType::Video => Self::Video(serde_json::from_value(data).map_err(schema_err)?),
            BlockType::Stats => Self::Stats(serde_json::from_value(data).map_err(schema_err)?),
            BlockType::ExpandableRoles => {
                Self::ExpandableRoles(serde_json::from_value(data).map_err(schema_err)?)
            }
            BlockType::BenefitsCulture => {
                Self::BenefitsCulture(serde_json::from_value(data).map_err(schema_err)?)
            }
            BlockType::Accordion => {
                Self::Accordion(serde_json::from_value(data).map_err(schema_err)?)
            }
            BlockType::Cta => Self::Cta(serde_json::from_value(data).map_err(schema_err)?),
        })
    }

    /// Payload as a JSON object (the wire `data` field).
    pub fn data_value(&self) -> Result<serde_json::Value, DomainError> {
        let value = match self {
            Self::Hero(d) => serde_json::to_value(d),
            Self::TextMedia(d) => serde_json::to_value(d),
            Self::RichText(d) => serde_json::to_value(d),
            Self::ImageGallery(d) => serde_json::to_value(d),
            Self::ImageCarousel(d) => serde_json::to_value(d),
            Self::Video(d) => serde_json::to_value(d),
            Self::Stats(d) => serde_json::to_value(d),
            Self::ExpandableRoles(d) => serde_json::to_value(d),
            Self::BenefitsCulture(d) => serde_json::to_value(d),
            Self::Accordion(d) => serde_json::to_value(d),
            Self::Cta(d) => serde_json::to_value(d),
        };
        value.map_err(|e| DomainError::Schema(e.to_string()))
    }

    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Hero(d) if d.heading.trim().is_empty() => {
                Err(DomainError::Schema("hero: heading must not be empty".into()))
            }
            Self::ImageGallery(d) => {
                if let Some(c) = d.columns {
                    if !(2..=4).contains(&c) {
                        return Err(DomainError::Schema(format!(
                            "image-gallery: columns must be 2, 3 or 4 (got {c})"
                        )));
                    }
                }
                check_image_urls(BlockType::ImageGallery, &d.images)
            }
            Self::ImageCarousel(d) => check_image_urls(BlockType::ImageCarousel, &d.images),
            Self::Cta(d) if d.button_text.trim().is_empty() => {
                Err(DomainError::Schema("cta: buttonText must not be empty".into()))
            }
            _ => Ok(()),
        }
    }

    /// Mutable handles to every media URL in the payload (for asset resolution).
    pub fn asset_urls_mut(&mut self) -> Vec<&mut String> {
        match self {
            Self::Hero(d) => [
                d.background_image.as_mut(),
                d.background_video.as_mut(),
                d.logo_url.as_mut(),
            ]
            .into_iter()
            .flatten()
            .collect(),
            Self::TextMedia(d) => d.media_url.as_mut().into_iter().collect(),
            Self::ImageGallery(ImageGalleryData { images, .. })
            | Self::ImageCarousel(ImageCarouselData { images, .. }) => {
                images.iter_mut().map(|i| &mut i.url).collect()
            }
            Self::Video(d) => std::iter::once(&mut d.video_url)
                .chain(d.thumbnail_url.as_mut())
                .collect(),
            Self::RichText(_)
            | Self::Stats(_)
            | Self::ExpandableRoles(_)
            | Self::BenefitsCulture(_)
            | Self::Accordion(_)
            | Self::Cta(_) => Vec::new(),
        }
    }
}

fn check_image_urls(kind: BlockType, images: &[GalleryImage]) -> Result<(), DomainError> {
    match images.iter().position(|i| i.url.trim().is_empty()) {
        Some(idx) => Err(DomainError::Schema(format!(
            "{kind}: image {idx} has an empty url"
        ))),
        None => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block
// ─────────────────────────────────────────────────────────────────────────────

/// A positioned, identified block on a page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    /// Render position; only relative order matters.
    pub order: i64,
    pub content: BlockContent,
}

impl Block {
    /// New block with a generated id.
    pub fn new(order: i64, content: BlockContent) -> Self {
        Self {
            id: BlockId::generate(),
            order,
            content,
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }
}

/// Loosely typed wire form used to decode a block before its tag is checked.
#[derive(Debug, Deserialize)]
pub struct RawBlock {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: String,
    pub order: i64,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl TryFrom<RawBlock> for Block {
    type Error = DomainError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Ok(Self {
            content: BlockContent::from_parts(&raw.kind, raw.data)?,
            id: raw.id,
            order: raw.order,
        })
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Block", 4)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("type", &self.block_type())?;
        s.serialize_field("order", &self.order)?;
        match &self.content {
            BlockContent::Hero(d) => s.serialize_field("data", d)?,
            BlockContent::TextMedia(d) => s.serialize_field("data", d)?,
            BlockContent::RichText(d) => s.serialize_field("data", d)?,
            BlockContent::ImageGallery(d) => s.serialize_field("data", d)?,
            BlockContent::ImageCarousel(d) => s.serialize_field("data", d)?,
            BlockContent::Video(d) => s.serialize_field("data", d)?,
            BlockContent::Stats(d) => s.serialize_field("data", d)?,
            BlockContent::ExpandableRoles(d) => s.serialize_field("data", d)?,
            BlockContent::BenefitsCulture(d) => s.serialize_field("data", d)?,
            BlockContent::Accordion(d) => s.serialize_field("data", d)?,
            BlockContent::Cta(d) => s.serialize_field("data", d)?,
        }
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_wire_shape() {
        let block: Block = serde_json::from_value(json!({
            "id": "b",
            "type": "cta",
            "order": 0,
            "data": { "buttonText": "Go", "buttonLink": "/jobs" }
        }))
        .unwrap();

        assert_eq!(block.id.as_str(), "b");
        assert_eq!(block.block_type(), BlockType::Cta);
        let BlockContent::Cta(ref data) = block.content else {
            panic!("expected cta payload");
        };
        assert_eq!(data.button_text, "Go");
        assert_eq!(data.variant, None);

        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back["type"], "cta");
        assert_eq!(back["data"]["buttonLink"], "/jobs");
        assert!(back["data"].get("heading").is_none());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = BlockContent::from_parts("testimonial", json!({})).unwrap_err();
        assert!(matches!(err, DomainError::UnknownBlockType(t) if t == "testimonial"));
    }

    #[test]
    fn test_data_must_match_tag() {
        // A cta payload under the hero tag is missing `heading`.
        let err = BlockContent::from_parts(
            "hero",
            json!({ "buttonText": "Go", "buttonLink": "/jobs" }),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Schema(_)));
    }

    #[test]
    fn test_every_type_parses_and_has_valid_default() {
        for kind in BlockType::ALL {
            assert_eq!(kind.as_str().parse::<BlockType>().unwrap(), kind);
            let content = BlockContent::default_for(kind);
            assert_eq!(content.block_type(), kind);
            content.validate().unwrap();
        }
    }

    #[test]
    fn test_validate_rejects_bad_gallery_columns() {
        let content = BlockContent::ImageGallery(ImageGalleryData {
            images: vec![],
            columns: Some(5),
        });
        assert!(content.validate().is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = BlockId::generate();
        let b = BlockId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("block-"));
    }

    #[test]
    fn test_asset_urls_cover_hero_media() {
        let mut content = BlockContent::Hero(HeroData {
            heading: "X".into(),
            background_image: Some("hero.png".into()),
            logo_url: Some("logo.png".into()),
            ..HeroData::default()
        });
        let urls: Vec<String> = content.asset_urls_mut().into_iter().map(|u| u.clone()).collect();
        assert_eq!(urls, vec!["hero.png", "logo.png"]);
    }
}
