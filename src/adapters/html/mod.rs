//! Static HTML rendering of blocks and whole pages.
//!
//! - `render_block`: exhaustive dispatch from block type to view
//! - `render_page`: sorted blocks inside a themed document; bad blocks are skipped
//!   and reported, never fatal

mod escape;
mod views;

pub use escape::{escape, escape_attr};

use crate::domain::{Block, BlockContent, BlockId, BlockType, DomainError, Page, Spacing};
use tracing::warn;

/// A block left out of a rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBlock {
    pub id: BlockId,
    pub block_type: BlockType,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub skipped: Vec<SkippedBlock>,
    /// Blocks actually rendered.
    pub rendered: usize,
}

/// Render one block. Edit mode only wraps the view with an "Editing" badge.
pub fn render_block(block: &Block, edit_mode: bool) -> Result<String, DomainError> {
    block.content.validate()?;
    let view = match &block.content {
        BlockContent::Hero(d) => views::hero(d),
        BlockContent::TextMedia(d) => views::text_media(d),
        BlockContent::RichText(d) => views::rich_text(d),
        BlockContent::ImageGallery(d) => views::image_gallery(d),
        BlockContent::ImageCarousel(d) => views::image_carousel(d),
        BlockContent::Video(d) => views::video(d),
        BlockContent::Stats(d) => views::stats(d),
        BlockContent::ExpandableRoles(d) => views::expandable_roles(d),
        BlockContent::BenefitsCulture(d) => views::benefits_culture(d),
        BlockContent::Accordion(d) => views::accordion(d),
        BlockContent::Cta(d) => views::cta(d),
    };
    if !edit_mode {
        return Ok(view);
    }
    Ok(format!(
        "<div class=\"bp-editing\" data-block-id=\"{}\">\n<span class=\"bp-badge\">Editing</span>\n{view}</div>\n",
        escape_attr(block.id.as_str())
    ))
}

/// Render the page body plus a report of skipped blocks.
///
/// A page that yields no renderable block is replaced by the two-block minimum.
pub fn render_page(page: &Page) -> RenderedPage {
    let (mut body, skipped, mut rendered) = render_blocks(page);
    if rendered == 0 {
        let fallback = Page::minimum(None, page.template_id.clone());
        let (minimum, _, count) = render_blocks(&fallback);
        body = minimum;
        rendered = count;
    }
    RenderedPage {
        html: document(page, &body),
        skipped,
        rendered,
    }
}

fn render_blocks(page: &Page) -> (String, Vec<SkippedBlock>, usize) {
    let mut body = String::new();
    let mut skipped = Vec::new();
    let mut rendered = 0;
    for block in page.sorted_blocks() {
        match render_block(block, false) {
            Ok(html) => {
                body.push_str(&html);
                rendered += 1;
            }
            Err(e) => {
                warn!(
                    block_id = %block.id,
                    kind = %block.block_type(),
                    error = %e,
                    "skipping block"
                );
                skipped.push(SkippedBlock {
                    id: block.id.clone(),
                    block_type: block.block_type(),
                    reason: e.to_string(),
                });
            }
        }
    }
    (body, skipped, rendered)
}

fn section_padding(spacing: Spacing) -> &'static str {
    match spacing {
        Spacing::Compact => "2rem",
        Spacing::Standard => "3.5rem",
        Spacing::Spacious => "5.5rem",
    }
}

fn document(page: &Page, body: &str) -> String {
    let styles = page.template_id.styles();
    let title = page
        .sorted_blocks()
        .into_iter()
        .find_map(|b| match &b.content {
            BlockContent::Hero(h) if !h.heading.trim().is_empty() => Some(h.heading.as_str()),
            _ => None,
        })
        .unwrap_or("Careers");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
:root {{ --bp-primary: {primary}; --bp-section-pad: {pad}; }}
body {{ margin: 0; font-family: system-ui, sans-serif; color: #111827; }}
.bp-block {{ padding: var(--bp-section-pad) 1.5rem; }}
.bp-inner {{ max-width: 72rem; margin: 0 auto; }}
.bp-hero {{ position: relative; text-align: center; color: #fff; background: var(--bp-primary); }}
.bp-hero-bg {{ position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; opacity: .45; }}
.bp-button {{ display: inline-block; padding: .75rem 1.5rem; border-radius: .5rem; text-decoration: none; }}
.bp-primary {{ background: var(--bp-primary); color: #fff; }}
.bp-secondary {{ border: 2px solid var(--bp-primary); color: var(--bp-primary); }}
.bp-grid {{ display: grid; gap: 1rem; }}
.bp-cols-2 {{ grid-template-columns: repeat(2, 1fr); }}
.bp-cols-3 {{ grid-template-columns: repeat(3, 1fr); }}
.bp-cols-4 {{ grid-template-columns: repeat(4, 1fr); }}
.bp-stats, .bp-cards {{ display: flex; flex-wrap: wrap; gap: 2rem; justify-content: center; }}
.bp-prose {{ white-space: pre-line; }}
.bp-editing {{ outline: 2px dashed var(--bp-primary); }}
</style>
</head>
<body class="bp-template-{template} bp-spacing-{spacing}">
{body}</body>
</html>
"#,
        title = escape(title),
        primary = escape_attr(styles.primary_color),
        pad = section_padding(styles.spacing),
        template = escape_attr(page.template_id.as_str()),
        spacing = styles.spacing.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HeroData, TemplateId};
    use serde_json::json;

    fn visible_text(html: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                c if !in_tag => out.push(c),
                _ => {}
            }
        }
        out.trim().to_string()
    }

    #[test]
    fn test_edit_and_view_modes_show_same_content() {
        for kind in BlockType::ALL {
            let block = Block::new(0, BlockContent::default_for(kind));
            let view = render_block(&block, false).unwrap();
            let edit = render_block(&block, true).unwrap();
            assert!(edit.contains(&view), "{kind} differs between modes");
            assert!(edit.contains("Editing"));
            assert!(!view.contains("Editing"));
            assert!(
                !visible_text(&view).is_empty() || view.contains("<img") || view.contains("<video"),
                "{kind} default renders nothing visible"
            );
        }
    }

    #[test]
    fn test_empty_galleries_show_placeholder() {
        for kind in [BlockType::ImageGallery, BlockType::ImageCarousel] {
            let block = Block::new(0, BlockContent::default_for(kind));
            let view = render_block(&block, false).unwrap();
            assert!(view.contains("bp-gallery-placeholder"), "{kind}");
        }
    }

    #[test]
    fn test_edit_mode_keeps_media_and_links() {
        let blocks: Vec<Block> = serde_json::from_value(json!([
            { "id": "h", "type": "hero", "order": 0, "data": {
                "heading": "Acme",
                "backgroundImage": "https://img.test/bg.jpg",
                "logoUrl": "https://img.test/logo.png",
                "ctaText": "Apply",
                "ctaLink": "https://acme.test/jobs"
            } },
            { "id": "g", "type": "image-gallery", "order": 1, "data": {
                "images": [{ "url": "https://img.test/g1.jpg", "caption": "Office" }],
                "columns": 2
            } },
            { "id": "k", "type": "image-carousel", "order": 2, "data": {
                "images": [{ "url": "https://img.test/c1.jpg", "alt": "Team" }]
            } },
            { "id": "v", "type": "video", "order": 3, "data": {
                "videoUrl": "https://video.test/intro.mp4",
                "thumbnailUrl": "https://img.test/thumb.jpg"
            } },
            { "id": "c", "type": "cta", "order": 4, "data": {
                "buttonText": "See roles", "buttonLink": "https://acme.test/roles"
            } }
        ]))
        .unwrap();
        let expected = [
            vec!["https://img.test/bg.jpg", "https://img.test/logo.png", "https://acme.test/jobs"],
            vec!["https://img.test/g1.jpg", "Office"],
            vec!["https://img.test/c1.jpg", "Team"],
            vec!["https://video.test/intro.mp4", "https://img.test/thumb.jpg"],
            vec!["https://acme.test/roles", "See roles"],
        ];
        for (block, needles) in blocks.iter().zip(expected) {
            let view = render_block(block, false).unwrap();
            let edit = render_block(block, true).unwrap();
            assert!(edit.contains(&view), "{} differs between modes", block.id);
            for needle in needles {
                assert!(view.contains(needle), "{} view lacks {needle}", block.id);
                assert!(edit.contains(needle), "{} edit lacks {needle}", block.id);
            }
        }
    }

    #[test]
    fn test_title_uses_first_valid_hero_in_display_order() {
        let mut page: Page = serde_json::from_value(json!({
            "id": "overview",
            "templateId": "employer-brand",
            "blocks": [
                { "id": "late", "type": "hero", "order": 5, "data": { "heading": "Later" } },
                { "id": "early", "type": "hero", "order": 1, "data": { "heading": "Blank" } },
                { "id": "first", "type": "hero", "order": 2, "data": { "heading": "Acme" } }
            ]
        }))
        .unwrap();
        if let BlockContent::Hero(hero) = &mut page.blocks[1].content {
            hero.heading = "  ".into();
        }
        let out = render_page(&page);
        assert!(out.html.contains("<title>Acme</title>"));
    }

    #[test]
    fn test_blank_hero_heading_is_a_render_error() {
        let block = Block::new(
            0,
            BlockContent::Hero(HeroData {
                heading: " ".into(),
                ..HeroData::default()
            }),
        );
        assert!(matches!(render_block(&block, false), Err(DomainError::Schema(_))));
    }

    #[test]
    fn test_render_page_skips_bad_blocks_in_order() {
        let page: Page = serde_json::from_value(json!({
            "id": "overview",
            "templateId": "simple-corporate",
            "blocks": [
                { "id": "c", "type": "cta", "order": 2, "data": { "buttonText": "Apply", "buttonLink": "/jobs" } },
                { "id": "h", "type": "hero", "order": 0, "data": { "heading": "Acme" } },
                { "id": "r", "type": "rich-text", "order": 1, "data": { "content": "About" } }
            ]
        }))
        .unwrap();
        let mut page = page;
        // stored blocks are validated on decode; break one after the fact
        if let BlockContent::Cta(cta) = &mut page.blocks[0].content {
            cta.button_text.clear();
        }

        let out = render_page(&page);
        assert_eq!(out.rendered, 2);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].id.as_str(), "c");
        let hero = out.html.find("<h1>Acme</h1>").unwrap();
        let prose = out.html.find(">About</div>").unwrap();
        assert!(hero < prose);
        assert!(out.html.contains("--bp-primary: #1e40af"));
        assert!(out.html.contains("<title>Acme</title>"));
    }

    #[test]
    fn test_empty_page_renders_minimum() {
        let out = render_page(&Page::empty(TemplateId::new("classic")));
        assert_eq!(out.rendered, 2);
        assert!(out.html.contains("Your Business"));
        assert!(out.html.contains("--bp-primary: #3b82f6"));
    }
}
