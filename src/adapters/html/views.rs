//! One static HTML view per block variant.
//!
//! Views are pure: same payload, same markup. All user text goes through
//! [`escape`]; all URLs through [`href`] or [`escape_attr`].

use super::escape::{escape, escape_attr, href};
use crate::domain::{
    AccordionData, BenefitsCultureData, BlockType, CtaData, CtaVariant, ExpandableRolesData,
    GalleryImage, HeroData, ImageCarouselData, ImageGalleryData, MediaKind, RichTextData,
    StatsData, TextLayout, TextMediaData, VideoData,
};

fn section(kind: BlockType, inner: &str) -> String {
    format!(
        "<section class=\"bp-block bp-{kind}\">\n<div class=\"bp-inner\">\n{inner}</div>\n</section>\n"
    )
}

fn opt_heading(tag: &str, text: Option<&str>) -> String {
    match text.filter(|t| !t.trim().is_empty()) {
        Some(t) => format!("<{tag}>{}</{tag}>\n", escape(t)),
        None => String::new(),
    }
}

fn img(url: &str, alt: &str, class: &str) -> String {
    format!(
        "<img class=\"{class}\" src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
        escape_attr(url),
        escape_attr(alt)
    )
}

pub fn hero(d: &HeroData) -> String {
    let mut inner = String::new();
    if let Some(video) = d.background_video.as_deref() {
        inner.push_str(&format!(
            "<video class=\"bp-hero-bg\" src=\"{}\" autoplay loop muted playsinline></video>\n",
            escape_attr(video)
        ));
    } else if let Some(image) = d.background_image.as_deref() {
        inner.push_str(&img(image, "Hero background", "bp-hero-bg"));
    }
    if let Some(logo) = d.logo_url.as_deref() {
        inner.push_str(&img(logo, "Logo", "bp-logo"));
    }
    inner.push_str(&format!("<h1>{}</h1>\n", escape(&d.heading)));
    if let Some(sub) = d.subheading.as_deref() {
        inner.push_str(&format!("<p class=\"bp-subheading\">{}</p>\n", escape(sub)));
    }
    if let (Some(text), Some(link)) = (d.cta_text.as_deref(), d.cta_link.as_deref()) {
        inner.push_str(&format!(
            "<a class=\"bp-button bp-primary\" href=\"{}\">{}</a>\n",
            href(link),
            escape(text)
        ));
    }
    section(BlockType::Hero, &inner)
}

pub fn text_media(d: &TextMediaData) -> String {
    let layout = match d.layout {
        TextLayout::TextLeft => "text-left",
        TextLayout::TextRight => "text-right",
    };
    let text = format!(
        "<div class=\"bp-text\">\n{}<p>{}</p>\n</div>\n",
        opt_heading("h2", d.heading.as_deref()),
        escape(&d.text)
    );
    let media = match (d.media_url.as_deref(), d.media_type) {
        (Some(url), Some(MediaKind::Video)) => format!(
            "<div class=\"bp-media\"><video src=\"{}\" controls></video></div>\n",
            escape_attr(url)
        ),
        (Some(url), _) => format!(
            "<div class=\"bp-media\">{}</div>\n",
            img(url, "", "bp-media-img").trim_end()
        ),
        (None, _) => String::new(),
    };
    let body = match d.layout {
        TextLayout::TextLeft => format!("{text}{media}"),
        TextLayout::TextRight => format!("{media}{text}"),
    };
    section(
        BlockType::TextMedia,
        &format!("<div class=\"bp-split bp-{layout}\">\n{body}</div>\n"),
    )
}

pub fn rich_text(d: &RichTextData) -> String {
    section(
        BlockType::RichText,
        &format!(
            "{}<div class=\"bp-prose\">{}</div>\n",
            opt_heading("h2", d.heading.as_deref()),
            escape(&d.content)
        ),
    )
}

fn figure(image: &GalleryImage) -> String {
    let alt = image.alt.as_deref().or(image.caption.as_deref()).unwrap_or("");
    let caption = image
        .caption
        .as_deref()
        .map(|c| format!("<figcaption>{}</figcaption>\n", escape(c)))
        .unwrap_or_default();
    format!("<figure>\n{}{caption}</figure>\n", img(&image.url, alt, "bp-photo"))
}

pub fn image_gallery(d: &ImageGalleryData) -> String {
    let columns = d.columns.unwrap_or(3);
    if d.images.is_empty() {
        return section(
            BlockType::ImageGallery,
            "<div class=\"bp-gallery-placeholder\">No images added yet</div>\n",
        );
    }
    let figures: String = d.images.iter().map(figure).collect();
    section(
        BlockType::ImageGallery,
        &format!("<div class=\"bp-grid bp-cols-{columns}\">\n{figures}</div>\n"),
    )
}

pub fn image_carousel(d: &ImageCarouselData) -> String {
    if d.images.is_empty() {
        return section(
            BlockType::ImageCarousel,
            "<div class=\"bp-gallery-placeholder\">No images available</div>\n",
        );
    }
    let autoplay = if d.autoplay.unwrap_or(false) {
        " data-autoplay"
    } else {
        ""
    };
    let slides: String = d
        .images
        .iter()
        .map(|i| format!("<div class=\"bp-slide\">\n{}</div>\n", figure(i)))
        .collect();
    section(
        BlockType::ImageCarousel,
        &format!("<div class=\"bp-carousel\"{autoplay}>\n{slides}</div>\n"),
    )
}

pub fn video(d: &VideoData) -> String {
    let poster = d
        .thumbnail_url
        .as_deref()
        .map(|t| format!(" poster=\"{}\"", escape_attr(t)))
        .unwrap_or_default();
    let autoplay = if d.autoplay.unwrap_or(false) {
        " autoplay muted"
    } else {
        ""
    };
    let player = if d.video_url.trim().is_empty() {
        "<div class=\"bp-video-placeholder\">No video yet</div>\n".to_string()
    } else {
        format!(
            "<video src=\"{}\"{poster} controls{autoplay}></video>\n",
            escape_attr(&d.video_url)
        )
    };
    let caption = d
        .caption
        .as_deref()
        .map(|c| format!("<p class=\"bp-caption\">{}</p>\n", escape(c)))
        .unwrap_or_default();
    section(BlockType::Video, &format!("{player}{caption}"))
}

pub fn stats(d: &StatsData) -> String {
    let items: String = d
        .stats
        .iter()
        .map(|s| {
            let footnote = s
                .footnote
                .as_deref()
                .map(|f| format!("<small>{}</small>", escape(f)))
                .unwrap_or_default();
            format!(
                "<div class=\"bp-stat\"><strong>{}</strong><span>{}</span>{footnote}</div>\n",
                escape(&s.value),
                escape(&s.label)
            )
        })
        .collect();
    section(BlockType::Stats, &format!("<div class=\"bp-stats\">\n{items}</div>\n"))
}

pub fn expandable_roles(d: &ExpandableRolesData) -> String {
    let categories: String = d
        .categories
        .iter()
        .map(|c| {
            let description = c
                .description
                .as_deref()
                .map(|t| format!("<p>{}</p>\n", escape(t)))
                .unwrap_or_default();
            let roles: String = c
                .roles
                .iter()
                .flatten()
                .map(|r| format!("<li>{}</li>\n", escape(r)))
                .collect();
            let roles = if roles.is_empty() {
                roles
            } else {
                format!("<ul>\n{roles}</ul>\n")
            };
            format!(
                "<details class=\"bp-role\">\n<summary>{}</summary>\n{description}{roles}</details>\n",
                escape(&c.title)
            )
        })
        .collect();
    section(BlockType::ExpandableRoles, &categories)
}

pub fn benefits_culture(d: &BenefitsCultureData) -> String {
    let items: String = d
        .items
        .iter()
        .map(|b| {
            let icon = b
                .icon
                .as_deref()
                .map(|i| format!("<span class=\"bp-icon\">{}</span>", escape(i)))
                .unwrap_or_default();
            let description = b
                .description
                .as_deref()
                .map(|t| format!("<p>{}</p>", escape(t)))
                .unwrap_or_default();
            format!(
                "<div class=\"bp-card\">{icon}<h3>{}</h3>{description}</div>\n",
                escape(&b.title)
            )
        })
        .collect();
    section(
        BlockType::BenefitsCulture,
        &format!(
            "{}<div class=\"bp-cards\">\n{items}</div>\n",
            opt_heading("h2", d.title.as_deref())
        ),
    )
}

pub fn accordion(d: &AccordionData) -> String {
    let group = if d.allow_multiple.unwrap_or(false) {
        "multiple"
    } else {
        "single"
    };
    let items: String = d
        .items
        .iter()
        .map(|item| {
            format!(
                "<details>\n<summary>{}</summary>\n<div>{}</div>\n</details>\n",
                escape(&item.title),
                escape(&item.content)
            )
        })
        .collect();
    section(
        BlockType::Accordion,
        &format!(
            "{}<div class=\"bp-accordion\" data-open=\"{group}\">\n{items}</div>\n",
            opt_heading("h2", d.title.as_deref())
        ),
    )
}

pub fn cta(d: &CtaData) -> String {
    let variant = match d.variant.unwrap_or(CtaVariant::Primary) {
        CtaVariant::Primary => "bp-primary",
        CtaVariant::Secondary => "bp-secondary",
    };
    let text = d
        .text
        .as_deref()
        .map(|t| format!("<p>{}</p>\n", escape(t)))
        .unwrap_or_default();
    section(
        BlockType::Cta,
        &format!(
            "{}{text}<a class=\"bp-button {variant}\" href=\"{}\">{}</a>\n",
            opt_heading("h2", d.heading.as_deref()),
            href(&d.button_link),
            escape(&d.button_text)
        ),
    )
}
