//! Implements InputPort. Inquire-based page builder session.
//!
//! Menu loop over one business page: add, edit, move, delete, apply template,
//! preview to an HTML file, save. Unsaved edits are dropped on quit after a confirm.

use crate::adapters::html::render_page;
use crate::domain::{BlockContent, BlockId, BlockType, DomainError, TemplateId, templates};
use crate::ports::InputPort;
use crate::usecases::{
    ASSET_RESOLUTION_TIMEOUT, BlockEditor, FieldKind, MoveDirection, PageBuilder, PageService,
};
use async_trait::async_trait;
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, Select, Text};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Prompt styling shared by every inquire prompt in the session.
pub fn apply_theme() {
    let accent = Color::Rgb {
        r: 0x8b,
        g: 0x5c,
        b: 0xf6,
    };
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("›").with_fg(accent))
        .with_highlighted_option_prefix(Styled::new("▸").with_fg(accent))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey));
    inquire::set_global_render_config(config);
}

/// Prompt outcome: Esc/Ctrl-C backs out of the current menu instead of failing.
fn prompt<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

/// One-line description of a block for pickers.
pub fn summary(content: &BlockContent) -> String {
    let text = match content {
        BlockContent::Hero(d) => d.heading.clone(),
        BlockContent::TextMedia(d) => d.heading.clone().unwrap_or_else(|| d.text.clone()),
        BlockContent::RichText(d) => d.heading.clone().unwrap_or_else(|| d.content.clone()),
        BlockContent::ImageGallery(d) => format!("{} images", d.images.len()),
        BlockContent::ImageCarousel(d) => format!("{} slides", d.images.len()),
        BlockContent::Video(d) => d.caption.clone().unwrap_or_else(|| d.video_url.clone()),
        BlockContent::Stats(d) => d
            .stats
            .iter()
            .map(|s| format!("{} {}", s.value, s.label))
            .collect::<Vec<_>>()
            .join(", "),
        BlockContent::ExpandableRoles(d) => format!("{} categories", d.categories.len()),
        BlockContent::BenefitsCulture(d) => d
            .title
            .clone()
            .unwrap_or_else(|| format!("{} items", d.items.len())),
        BlockContent::Accordion(d) => d
            .title
            .clone()
            .unwrap_or_else(|| format!("{} sections", d.items.len())),
        BlockContent::Cta(d) => d.button_text.clone(),
    };
    let mut chars = text.chars();
    let short: String = chars.by_ref().take(40).collect();
    if chars.next().is_some() {
        format!("{short}…")
    } else {
        short
    }
}

const MENU: [&str; 8] = [
    "Preview as HTML",
    "Add block",
    "Edit block",
    "Move block",
    "Delete block",
    "Apply template",
    "Save",
    "Quit",
];

pub struct TuiInputPort {
    service: Arc<PageService>,
    business_id: String,
    output_dir: PathBuf,
}

impl TuiInputPort {
    pub fn new(service: Arc<PageService>, business_id: String, output_dir: PathBuf) -> Self {
        Self {
            service,
            business_id,
            output_dir,
        }
    }

    fn pick_block(builder: &PageBuilder, message: &str) -> Result<Option<BlockId>, DomainError> {
        let sorted = builder.page().sorted_blocks();
        if sorted.is_empty() {
            println!("The page has no blocks yet.");
            return Ok(None);
        }
        let options: Vec<String> = sorted
            .iter()
            .map(|b| {
                format!(
                    "{:>3}  {:<18} {}",
                    b.order,
                    b.block_type().label(),
                    summary(&b.content)
                )
            })
            .collect();
        let picked = prompt(Select::new(message, options).raw_prompt())?;
        Ok(picked.map(|opt| sorted[opt.index].id.clone()))
    }

    fn edit_loop(builder: &mut PageBuilder, id: &BlockId) -> Result<(), DomainError> {
        let mut editor: BlockEditor = builder.edit_block(id)?;
        loop {
            let fields = editor.fields()?;
            let mut options: Vec<String> = fields
                .iter()
                .map(|f| {
                    let marker = if f.required { "*" } else { " " };
                    format!("{marker}{:<16} {}", f.key, f.display_value())
                })
                .collect();
            options.push("[Done]".into());
            options.push("[Discard changes]".into());

            let title = format!("Editing {}", editor.block_type().label());
            let Some(choice) = prompt(Select::new(&title, options).raw_prompt())? else {
                builder.cancel_edit();
                return Ok(());
            };
            if choice.index == fields.len() {
                match builder.update_block(editor.clone().commit()) {
                    Ok(()) => return Ok(()),
                    Err(e) => {
                        println!("Cannot apply: {e}");
                        continue;
                    }
                }
            }
            if choice.index > fields.len() {
                builder.cancel_edit();
                return Ok(());
            }

            let field = &fields[choice.index];
            let help = match field.kind {
                FieldKind::Text => "Plain text. Leave empty to clear an optional field.",
                FieldKind::Json => "JSON value, e.g. [{\"value\":\"10+\",\"label\":\"Offices\"}]",
            };
            let current = field.display_value();
            let input = prompt(
                Text::new(field.key)
                    .with_initial_value(&current)
                    .with_help_message(help)
                    .prompt(),
            )?;
            if let Some(raw) = input {
                if let Err(e) = editor.set_field(field.key, &raw) {
                    println!("Rejected: {e}");
                }
            }
        }
    }

    async fn preview(&self, builder: &PageBuilder) -> Result<(), DomainError> {
        let mut page = builder.page().clone();
        if let Err(e) = self
            .service
            .resolve_assets_within(&mut page, ASSET_RESOLUTION_TIMEOUT)
            .await
        {
            warn!(error = %e, "asset resolution skipped");
        }
        let rendered = render_page(&page);
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let path = self.output_dir.join(format!("{}.html", self.business_id));
        tokio::fs::write(&path, rendered.html.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        println!(
            "Wrote {} ({} blocks rendered, {} skipped)",
            path.display(),
            rendered.rendered,
            rendered.skipped.len()
        );
        for skipped in &rendered.skipped {
            println!("  skipped {} ({}): {}", skipped.id, skipped.block_type, skipped.reason);
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let (mut builder, loaded) = self.service.open_builder(&self.business_id).await;
        println!(
            "Loaded page for {} ({:?}, {} blocks, template {})",
            self.business_id,
            loaded.source,
            loaded.page.blocks.len(),
            loaded.page.template_id
        );
        for v in &loaded.violations {
            println!("  dropped stored {v}");
        }
        let mut saved = builder.snapshot();

        loop {
            let action =
                prompt(Select::new("What next?", MENU.to_vec()).prompt())?.unwrap_or("Quit");
            match action {
                "Preview as HTML" => self.preview(&builder).await?,
                "Add block" => {
                    builder.toggle_add_menu();
                    let options: Vec<String> = BlockType::ALL
                        .iter()
                        .map(|k| format!("{:<18} {}", k.label(), k.description()))
                        .collect();
                    match prompt(Select::new("Block type", options).raw_prompt())? {
                        Some(choice) => {
                            let id = builder.add_block(BlockType::ALL[choice.index]);
                            Self::edit_loop(&mut builder, &id)?;
                        }
                        None => builder.toggle_add_menu(),
                    }
                }
                "Edit block" => {
                    if let Some(id) = Self::pick_block(&builder, "Edit which block?")? {
                        Self::edit_loop(&mut builder, &id)?;
                    }
                }
                "Move block" => {
                    if let Some(id) = Self::pick_block(&builder, "Move which block?")? {
                        let dir = prompt(Select::new("Direction", vec!["Up", "Down"]).prompt())?;
                        let moved = match dir {
                            Some("Up") => builder.move_block(&id, MoveDirection::Up),
                            Some(_) => builder.move_block(&id, MoveDirection::Down),
                            None => false,
                        };
                        if !moved {
                            println!("Already at the edge.");
                        }
                    }
                }
                "Delete block" => {
                    if let Some(id) = Self::pick_block(&builder, "Delete which block?")? {
                        let sure = prompt(
                            Confirm::new("Delete this block?")
                                .with_default(false)
                                .prompt(),
                        )?;
                        if sure == Some(true) {
                            builder.delete_block(&id);
                        }
                    }
                }
                "Apply template" => {
                    let options: Vec<String> = templates::catalog()
                        .iter()
                        .map(|t| format!("{:<18} {}", t.id, t.name))
                        .collect();
                    if let Some(choice) =
                        prompt(Select::new("Template", options).raw_prompt())?
                    {
                        let template = &templates::catalog()[choice.index];
                        let sure = prompt(
                            Confirm::new("Replace all blocks with this template?")
                                .with_default(false)
                                .prompt(),
                        )?;
                        if sure == Some(true) {
                            builder.apply_template(TemplateId::new(template.id));
                        }
                    }
                }
                "Save" => match self.service.save(&mut builder, &self.business_id).await {
                    Ok(()) => {
                        saved = builder.snapshot();
                        println!("Saved.");
                    }
                    Err(e) => println!("Save failed, edits kept: {e}"),
                },
                _ => {
                    if !Arc::ptr_eq(&saved, &builder.snapshot()) {
                        let discard = prompt(
                            Confirm::new("Discard unsaved changes?")
                                .with_default(false)
                                .prompt(),
                        )?;
                        if discard != Some(true) {
                            continue;
                        }
                    }
                    info!(business_id = %self.business_id, "session ended");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CtaData;

    #[test]
    fn test_summary_truncates_long_text() {
        let long = BlockContent::Cta(CtaData {
            heading: None,
            text: None,
            button_text: "x".repeat(60),
            button_link: "/jobs".into(),
            variant: None,
        });
        let s = summary(&long);
        assert_eq!(s.chars().count(), 41);
        assert!(s.ends_with('…'));
        assert_eq!(summary(&BlockContent::default_for(BlockType::Stats)), "0 Stat");
    }
}
