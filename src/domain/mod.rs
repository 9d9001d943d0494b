//! Core domain layer. No external I/O dependencies.
//!
//! Block schema, page aggregate, legacy records and template presets live here.
//! Dependencies flow inward.

pub mod blocks;
pub mod errors;
pub mod legacy;
pub mod page;
pub mod schema;
pub mod templates;

pub use blocks::{
    AccordionData, AccordionItem, BenefitItem, BenefitsCultureData, Block, BlockContent, BlockId,
    BlockType, CtaData, CtaVariant, ExpandableRolesData, GalleryImage, HeroData,
    ImageCarouselData, ImageGalleryData, MediaKind, RichTextData, RoleCategory, Stat, StatsData,
    TextLayout, TextMediaData, VideoData,
};
pub use errors::DomainError;
pub use legacy::{LegacyBenefit, LegacyBusinessArea, LegacyImpactStat, LegacyProfile};
pub use page::{Page, TemplateId, sorted_blocks};
pub use schema::{DecodedBlocks, SchemaViolation, decode_blocks};
pub use templates::{PageTemplate, Spacing, TemplateStyles};
