//! Legacy profile -> block page migration.
//!
//! Pure and deterministic: the same record always yields the same block types,
//! payloads and orders. Only the generated ids differ between runs.

use crate::domain::legacy::non_blank;
use crate::domain::{
    BenefitItem, BenefitsCultureData, Block, BlockContent, CtaData, CtaVariant,
    ExpandableRolesData, HeroData, LegacyProfile, Page, RoleCategory, Stat, StatsData, TemplateId,
    TextLayout, TextMediaData,
};

const DEFAULT_HEADING: &str = "Your Business";
const DEFAULT_SUBHEADING: &str = "Join our team and make an impact";
const JOBS_LINK: &str = "/jobs";

/// Build a page from a flat legacy record.
///
/// Emission order: hero, value proposition, stats, culture values, benefits,
/// business areas, closing CTA. Optional sections are skipped when empty; culture
/// values and benefits each get their own block.
pub fn migrate_legacy_profile(legacy: &LegacyProfile, template_id: TemplateId) -> Page {
    let mut contents = Vec::with_capacity(7);

    contents.push(BlockContent::Hero(HeroData {
        heading: legacy.display_name().unwrap_or(DEFAULT_HEADING).to_string(),
        subheading: Some(
            non_blank(&legacy.tagline)
                .unwrap_or(DEFAULT_SUBHEADING)
                .to_string(),
        ),
        background_image: non_blank(&legacy.hero_image_url).map(String::from),
        background_video: None,
        logo_url: non_blank(&legacy.logo_url).map(String::from),
        cta_text: Some("View Opportunities".into()),
        cta_link: Some(JOBS_LINK.into()),
    }));

    let headline = non_blank(&legacy.value_prop_headline);
    let body = non_blank(&legacy.value_prop_body).or_else(|| non_blank(&legacy.description));
    if headline.is_some() || body.is_some() {
        contents.push(BlockContent::TextMedia(TextMediaData {
            heading: Some(headline.unwrap_or("Why Work With Us").to_string()),
            text: body
                .unwrap_or("We are building a great team and looking for talented individuals to join us.")
                .to_string(),
            media_url: None,
            media_type: None,
            layout: TextLayout::TextLeft,
        }));
    }

    if !legacy.impact_stats.is_empty() {
        contents.push(BlockContent::Stats(StatsData {
            stats: legacy
                .impact_stats
                .iter()
                .map(|s| Stat {
                    value: s.value.clone(),
                    label: s.label.clone(),
                    footnote: non_blank(&s.footnote_optional).map(String::from),
                })
                .collect(),
        }));
    }

    if !legacy.culture_values.is_empty() {
        contents.push(BlockContent::BenefitsCulture(BenefitsCultureData {
            title: Some("Our Values".into()),
            items: legacy
                .culture_values
                .iter()
                .map(|value| BenefitItem {
                    title: value.clone(),
                    description: None,
                    icon: None,
                })
                .collect(),
        }));
    }

    if !legacy.benefits.is_empty() {
        contents.push(BlockContent::BenefitsCulture(BenefitsCultureData {
            title: Some("Benefits & Culture".into()),
            items: legacy
                .benefits
                .iter()
                .map(|b| BenefitItem {
                    title: b.title.clone(),
                    description: non_blank(&b.description).map(String::from),
                    icon: None,
                })
                .collect(),
        }));
    }

    if !legacy.business_areas.is_empty() {
        contents.push(BlockContent::ExpandableRoles(ExpandableRolesData {
            categories: legacy
                .business_areas
                .iter()
                .map(|a| RoleCategory {
                    title: a.title.clone(),
                    description: non_blank(&a.description).map(String::from),
                    roles: None,
                })
                .collect(),
        }));
    }

    contents.push(BlockContent::Cta(CtaData {
        heading: Some("Ready to Join Us?".into()),
        text: Some("Explore our open positions and start your journey with us.".into()),
        button_text: "View Open Roles".into(),
        button_link: JOBS_LINK.into(),
        variant: Some(CtaVariant::Primary),
    }));

    let blocks = contents
        .into_iter()
        .zip(0i64..)
        .map(|(content, order)| Block::new(order, content))
        .collect();
    Page::new(template_id, blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockType, LegacyBenefit, LegacyBusinessArea, LegacyImpactStat};

    fn shape(page: &Page) -> Vec<(BlockType, i64, BlockContent)> {
        page.sorted_blocks()
            .into_iter()
            .map(|b| (b.block_type(), b.order, b.content.clone()))
            .collect()
    }

    fn full_record() -> LegacyProfile {
        LegacyProfile {
            business_name: Some("Acme".into()),
            tagline: Some("Build rockets".into()),
            logo_url: Some("logos/acme.png".into()),
            value_prop_headline: Some("Why Acme".into()),
            value_prop_body: Some("Because.".into()),
            impact_stats: vec![LegacyImpactStat {
                label: "Hires".into(),
                value: "120+".into(),
                footnote_optional: Some("2024".into()),
            }],
            culture_values: vec!["Candour".into(), "Craft".into()],
            benefits: vec![LegacyBenefit {
                title: "Remote".into(),
                description: Some("Work anywhere".into()),
            }],
            business_areas: vec![LegacyBusinessArea {
                title: "Engineering".into(),
                area_slug: Some("eng".into()),
                description: None,
            }],
            ..LegacyProfile::default()
        }
    }

    #[test]
    fn test_migration_is_idempotent() {
        let record = full_record();
        let first = migrate_legacy_profile(&record, TemplateId::default());
        let second = migrate_legacy_profile(&record, TemplateId::default());
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn test_empty_record_yields_hero_and_cta() {
        let page = migrate_legacy_profile(&LegacyProfile::default(), TemplateId::default());
        let kinds: Vec<BlockType> = page.sorted_blocks().iter().map(|b| b.block_type()).collect();
        assert!(kinds.len() >= 2);
        assert_eq!(kinds.first(), Some(&BlockType::Hero));
        assert_eq!(kinds.last(), Some(&BlockType::Cta));

        let BlockContent::Hero(hero) = &page.blocks[0].content else {
            panic!("expected hero");
        };
        assert_eq!(hero.heading, "Your Business");
        assert_eq!(hero.cta_link.as_deref(), Some("/jobs"));
    }

    #[test]
    fn test_acme_stats_scenario() {
        let record = LegacyProfile {
            business_name: Some("Acme".into()),
            impact_stats: vec![LegacyImpactStat {
                label: "Hires".into(),
                value: "120+".into(),
                footnote_optional: None,
            }],
            ..LegacyProfile::default()
        };
        let page = migrate_legacy_profile(&record, TemplateId::default());
        let sorted = page.sorted_blocks();
        assert_eq!(sorted.len(), 3);

        let BlockContent::Hero(hero) = &sorted[0].content else {
            panic!("expected hero first");
        };
        assert_eq!(hero.heading, "Acme");

        let BlockContent::Stats(stats) = &sorted[1].content else {
            panic!("expected stats second");
        };
        assert_eq!(
            stats.stats,
            vec![Stat {
                value: "120+".into(),
                label: "Hires".into(),
                footnote: None
            }]
        );
        assert_eq!(sorted[2].block_type(), BlockType::Cta);
    }

    #[test]
    fn test_full_record_keeps_culture_and_benefits_separate() {
        let page = migrate_legacy_profile(&full_record(), TemplateId::new("visual-culture"));
        let kinds: Vec<BlockType> = page.sorted_blocks().iter().map(|b| b.block_type()).collect();
        assert_eq!(
            kinds,
            vec![
                BlockType::Hero,
                BlockType::TextMedia,
                BlockType::Stats,
                BlockType::BenefitsCulture,
                BlockType::BenefitsCulture,
                BlockType::ExpandableRoles,
                BlockType::Cta,
            ]
        );
        let orders: Vec<i64> = page.blocks.iter().map(|b| b.order).collect();
        assert_eq!(orders, (0..7).collect::<Vec<_>>());
        assert_eq!(page.template_id.as_str(), "visual-culture");
    }

    #[test]
    fn test_description_feeds_value_prop_block() {
        let record = LegacyProfile {
            description: Some("We make widgets.".into()),
            value_prop_body: Some("".into()),
            ..LegacyProfile::default()
        };
        let page = migrate_legacy_profile(&record, TemplateId::default());
        let BlockContent::TextMedia(text) = &page.blocks[1].content else {
            panic!("expected text-media");
        };
        assert_eq!(text.text, "We make widgets.");
        assert_eq!(text.heading.as_deref(), Some("Why Work With Us"));
    }
}
