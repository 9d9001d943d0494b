//! Template presets: a starter block list plus theme styles.
//!
//! The catalog is built once on first access and shared for the process lifetime.

use crate::domain::blocks::{
    AccordionData, AccordionItem, BenefitItem, BenefitsCultureData, Block, BlockContent, CtaData,
    CtaVariant, ExpandableRolesData, HeroData, ImageCarouselData, ImageGalleryData, RoleCategory,
    Stat, StatsData, TextLayout, TextMediaData, VideoData,
};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Compact,
    Standard,
    Spacious,
}

impl Spacing {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Standard => "standard",
            Self::Spacious => "spacious",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateStyles {
    pub primary_color: &'static str,
    pub spacing: Spacing,
}

impl Default for TemplateStyles {
    fn default() -> Self {
        Self {
            primary_color: "#3b82f6",
            spacing: Spacing::Standard,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub default_blocks: Vec<BlockContent>,
    pub styles: TemplateStyles,
}

impl PageTemplate {
    /// Starter blocks with fresh ids and gap-free orders from 0.
    pub fn instantiate(&self) -> Vec<Block> {
        self.default_blocks
            .iter()
            .zip(0i64..)
            .map(|(content, order)| Block::new(order, content.clone()))
            .collect()
    }
}

static CATALOG: OnceLock<Vec<PageTemplate>> = OnceLock::new();

/// All presets, in menu order.
pub fn catalog() -> &'static [PageTemplate] {
    CATALOG.get_or_init(build_catalog)
}

/// Preset by id, if one exists.
pub fn find(id: &str) -> Option<&'static PageTemplate> {
    catalog().iter().find(|t| t.id == id)
}

/// Styles for a template id; unknown ids get the defaults.
pub fn styles_for(id: &str) -> TemplateStyles {
    find(id).map(|t| t.styles).unwrap_or_default()
}

fn stat(value: &str, label: &str) -> Stat {
    Stat {
        value: value.into(),
        label: label.into(),
        footnote: None,
    }
}

fn benefit(title: &str, description: &str) -> BenefitItem {
    BenefitItem {
        title: title.into(),
        description: Some(description.into()),
        icon: None,
    }
}

fn category(title: &str, description: &str) -> RoleCategory {
    RoleCategory {
        title: title.into(),
        description: Some(description.into()),
        roles: None,
    }
}

fn build_catalog() -> Vec<PageTemplate> {
    vec![
        PageTemplate {
            id: "employer-brand",
            name: "Employer Brand / Careers-Focused",
            description: "Modern, engaging layout perfect for talent attraction with interactive components",
            default_blocks: vec![
                BlockContent::Hero(HeroData {
                    heading: "Join Our Team".into(),
                    subheading: Some("Build your career with us".into()),
                    cta_text: Some("View Opportunities".into()),
                    cta_link: Some("#opportunities".into()),
                    ..HeroData::default()
                }),
                BlockContent::TextMedia(TextMediaData {
                    heading: Some("Why Work With Us".into()),
                    text: "We offer a dynamic environment where you can grow, learn, and make an impact. Our team is passionate about innovation and collaboration.".into(),
                    media_url: None,
                    media_type: None,
                    layout: TextLayout::TextLeft,
                }),
                BlockContent::ImageGallery(ImageGalleryData {
                    images: Vec::new(),
                    columns: Some(3),
                }),
                BlockContent::Stats(StatsData {
                    stats: vec![
                        stat("100+", "Team Members"),
                        stat("5", "Offices"),
                        stat("10+", "Years in Business"),
                    ],
                }),
                BlockContent::BenefitsCulture(BenefitsCultureData {
                    title: Some("Culture Highlights".into()),
                    items: vec![
                        benefit("Flexible Work", "Work from anywhere"),
                        benefit("Growth Opportunities", "Career development programs"),
                        benefit("Great Team", "Collaborative environment"),
                    ],
                }),
                BlockContent::ExpandableRoles(ExpandableRolesData {
                    categories: vec![
                        category("Sales", "Drive growth and build relationships"),
                        category("Technology", "Build innovative solutions"),
                        category("Operations", "Keep things running smoothly"),
                    ],
                }),
                BlockContent::Cta(CtaData {
                    heading: Some("Ready to Join Us?".into()),
                    text: Some("Explore our open positions and start your journey with us.".into()),
                    button_text: "View Open Roles".into(),
                    button_link: "/jobs".into(),
                    variant: Some(CtaVariant::Primary),
                }),
            ],
            styles: TemplateStyles {
                primary_color: "#3b82f6",
                spacing: Spacing::Spacious,
            },
        },
        PageTemplate {
            id: "visual-culture",
            name: "Visual / Story-Led",
            description: "Media-rich layout with carousel, animated stats, and inline video",
            default_blocks: vec![
                BlockContent::Hero(HeroData {
                    heading: "Our Story".into(),
                    subheading: Some("Where passion meets purpose".into()),
                    cta_text: Some("See Our Story".into()),
                    cta_link: Some("#culture".into()),
                    ..HeroData::default()
                }),
                BlockContent::TextMedia(TextMediaData {
                    heading: Some("Life at Our Company".into()),
                    text: "Experience our vibrant culture through the eyes of our team.".into(),
                    media_url: None,
                    media_type: None,
                    layout: TextLayout::TextLeft,
                }),
                BlockContent::ImageCarousel(ImageCarouselData {
                    images: Vec::new(),
                    autoplay: Some(false),
                }),
                BlockContent::Stats(StatsData {
                    stats: vec![
                        stat("500+", "Team Members"),
                        stat("50+", "Countries"),
                        stat("15+", "Years"),
                    ],
                }),
                BlockContent::Video(VideoData {
                    video_url: String::new(),
                    thumbnail_url: None,
                    autoplay: None,
                    caption: Some("Hear from our team".into()),
                }),
                BlockContent::BenefitsCulture(BenefitsCultureData {
                    title: Some("Our Values".into()),
                    items: vec![
                        benefit("Innovation", "We push boundaries"),
                        benefit("Collaboration", "Together we achieve more"),
                        benefit("Impact", "Making a difference"),
                    ],
                }),
                BlockContent::Cta(CtaData {
                    heading: Some("Be Part of Our Story".into()),
                    text: None,
                    button_text: "Join Our Team".into(),
                    button_link: "/jobs".into(),
                    variant: Some(CtaVariant::Primary),
                }),
            ],
            styles: TemplateStyles {
                primary_color: "#8b5cf6",
                spacing: Spacing::Standard,
            },
        },
        PageTemplate {
            id: "simple-corporate",
            name: "Compact / Modern Corporate",
            description: "Clean, professional layout with accordion sections and hover preview",
            default_blocks: vec![
                BlockContent::Hero(HeroData {
                    heading: "Welcome".into(),
                    subheading: Some("Professional excellence since day one".into()),
                    ..HeroData::default()
                }),
                BlockContent::Accordion(AccordionData {
                    title: Some("About Us".into()),
                    items: vec![
                        AccordionItem {
                            title: "Our Mission".into(),
                            content: "We are a leading company in our industry, committed to excellence and innovation.".into(),
                            icon: None,
                        },
                        AccordionItem {
                            title: "Our Culture".into(),
                            content: "We foster a collaborative environment where every team member can thrive and grow.".into(),
                            icon: None,
                        },
                        AccordionItem {
                            title: "Our Benefits".into(),
                            content: "Competitive compensation, comprehensive benefits, and opportunities for professional development.".into(),
                            icon: None,
                        },
                    ],
                    allow_multiple: Some(false),
                }),
                BlockContent::ImageGallery(ImageGalleryData {
                    images: Vec::new(),
                    columns: Some(4),
                }),
                BlockContent::Stats(StatsData {
                    stats: vec![stat("50+", "Employees"), stat("Est. 2010", "Founded")],
                }),
                BlockContent::ExpandableRoles(ExpandableRolesData {
                    categories: vec![
                        category("Sales", "Drive growth and build relationships"),
                        category("Operations", "Keep things running smoothly"),
                    ],
                }),
                BlockContent::Cta(CtaData {
                    heading: None,
                    text: None,
                    button_text: "View Careers".into(),
                    button_link: "/jobs".into(),
                    variant: Some(CtaVariant::Secondary),
                }),
            ],
            styles: TemplateStyles {
                primary_color: "#1e40af",
                spacing: Spacing::Compact,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlockType;

    #[test]
    fn test_catalog_presets_start_with_hero_and_end_with_cta() {
        assert_eq!(catalog().len(), 3);
        for template in catalog() {
            let blocks = template.instantiate();
            assert_eq!(blocks.first().map(Block::block_type), Some(BlockType::Hero));
            assert_eq!(blocks.last().map(Block::block_type), Some(BlockType::Cta));
            let orders: Vec<i64> = blocks.iter().map(|b| b.order).collect();
            assert_eq!(orders, (0..blocks.len() as i64).collect::<Vec<_>>());
            for block in &blocks {
                block.content.validate().unwrap();
            }
        }
    }

    #[test]
    fn test_unknown_template_gets_default_styles() {
        assert!(find("classic").is_none());
        assert_eq!(styles_for("classic"), TemplateStyles::default());
        assert_eq!(styles_for("simple-corporate").spacing, Spacing::Compact);
    }
}
