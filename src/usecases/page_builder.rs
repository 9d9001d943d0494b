//! Authoring state machine for one business page.
//!
//! - Page is held as a shared snapshot; every mutation goes through `Arc::make_mut`
//! - A no-op mutation leaves the snapshot pointer untouched
//! - Save is split into `begin_save`/`finish_save` so edits can continue while the
//!   store call is in flight (last writer wins)

use crate::domain::{Block, BlockContent, BlockId, BlockType, DomainError, Page, TemplateId};
use crate::ports::PageStore;
use crate::usecases::block_editor::BlockEditor;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Snapshot taken by [`PageBuilder::begin_save`]. Hand it to the store, then back
/// to [`PageBuilder::finish_save`].
#[derive(Debug)]
pub struct SaveTicket {
    page: Page,
}

impl SaveTicket {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn stamped_at(&self) -> Option<DateTime<Utc>> {
        self.page.updated_at
    }
}

#[derive(Debug)]
pub struct PageBuilder {
    page: Arc<Page>,
    editing: Option<BlockId>,
    add_menu_open: bool,
    saving: bool,
    last_save_error: Option<String>,
}

impl PageBuilder {
    pub fn new(page: Page) -> Self {
        Self {
            page: Arc::new(page),
            editing: None,
            add_menu_open: false,
            saving: false,
            last_save_error: None,
        }
    }

    /// Fresh page seeded from a preset. Unknown ids start empty with that theme.
    pub fn from_template(template_id: TemplateId) -> Self {
        let blocks = template_id
            .preset()
            .map(|t| t.instantiate())
            .unwrap_or_default();
        Self::new(Page::new(template_id, blocks))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Shared handle to the current page. Cheap; unchanged until the next mutation.
    pub fn snapshot(&self) -> Arc<Page> {
        Arc::clone(&self.page)
    }

    pub fn editing_id(&self) -> Option<&BlockId> {
        self.editing.as_ref()
    }

    pub fn editing_block(&self) -> Option<&Block> {
        self.editing.as_ref().and_then(|id| self.page.block(id))
    }

    pub fn is_add_menu_open(&self) -> bool {
        self.add_menu_open
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn toggle_add_menu(&mut self) {
        self.add_menu_open = !self.add_menu_open;
    }

    /// Append a default block of `kind` after the current last one and open it for editing.
    pub fn add_block(&mut self, kind: BlockType) -> BlockId {
        let page = Arc::make_mut(&mut self.page);
        let order = match page.max_order() {
            None => 0,
            Some(max) => match max.checked_add(1) {
                Some(next) => next,
                None => renumber(page),
            },
        };
        let block = Block::new(order, BlockContent::default_for(kind));
        let id = block.id.clone();
        page.blocks.push(block);
        self.editing = Some(id.clone());
        self.add_menu_open = false;
        debug!(block_id = %id, kind = %kind, order, "block added");
        id
    }

    /// Remove a block. Returns false (and keeps the snapshot) for unknown ids.
    pub fn delete_block(&mut self, id: &BlockId) -> bool {
        let Some(pos) = self.page.position(id) else {
            return false;
        };
        Arc::make_mut(&mut self.page).blocks.remove(pos);
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }
        debug!(block_id = %id, "block deleted");
        true
    }

    /// Swap `order` with the sorted neighbour. No-op at either end or for unknown ids.
    pub fn move_block(&mut self, id: &BlockId, direction: MoveDirection) -> bool {
        let sorted: Vec<BlockId> = self
            .page
            .sorted_blocks()
            .into_iter()
            .map(|b| b.id.clone())
            .collect();
        let Some(pos) = sorted.iter().position(|b| b == id) else {
            return false;
        };
        let neighbour = match direction {
            MoveDirection::Up => pos.checked_sub(1),
            MoveDirection::Down => (pos + 1 < sorted.len()).then_some(pos + 1),
        };
        let Some(neighbour) = neighbour else {
            return false;
        };

        let page = Arc::make_mut(&mut self.page);
        let (mine, theirs) = (order_of(page, id), order_of(page, &sorted[neighbour]));
        if mine == theirs {
            renumber(page);
        }

        let (Some(mine), Some(theirs)) = (order_of(page, id), order_of(page, &sorted[neighbour]))
        else {
            return false;
        };
        if let Some(block) = block_mut(page, id) {
            block.order = theirs;
        }
        if let Some(block) = block_mut(page, &sorted[neighbour]) {
            block.order = mine;
        }
        debug!(block_id = %id, ?direction, "block moved");
        true
    }

    /// Open a block for editing and return a field editor over it.
    pub fn edit_block(&mut self, id: &BlockId) -> Result<BlockEditor, DomainError> {
        let block = self
            .page
            .block(id)
            .ok_or_else(|| DomainError::BlockNotFound(id.to_string()))?;
        let editor = BlockEditor::new(block);
        self.editing = Some(id.clone());
        Ok(editor)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Replace the block with the same id. Invalid or unknown blocks leave the page as it was.
    pub fn update_block(&mut self, block: Block) -> Result<(), DomainError> {
        block.content.validate()?;
        let pos = self
            .page
            .position(&block.id)
            .ok_or_else(|| DomainError::BlockNotFound(block.id.to_string()))?;
        let id = block.id.clone();
        Arc::make_mut(&mut self.page).blocks[pos] = block;
        if self.editing.as_ref() == Some(&id) {
            self.editing = None;
        }
        debug!(block_id = %id, "block updated");
        Ok(())
    }

    /// Switch theme. A known preset also replaces the blocks with its starter set.
    pub fn apply_template(&mut self, template_id: TemplateId) -> bool {
        let preset = template_id.preset();
        let page = Arc::make_mut(&mut self.page);
        page.template_id = template_id;
        match preset {
            Some(template) => {
                page.blocks = template.instantiate();
                self.editing = None;
                info!(template = template.id, blocks = page.blocks.len(), "template applied");
                true
            }
            None => false,
        }
    }

    /// Take the page as it is now and mark a save as running.
    pub fn begin_save(&mut self) -> Result<SaveTicket, DomainError> {
        if self.saving {
            return Err(DomainError::SaveInFlight);
        }
        self.saving = true;
        self.last_save_error = None;
        let mut page = Page::clone(&self.page);
        page.updated_at = Some(Utc::now());
        Ok(SaveTicket { page })
    }

    /// Clear the saving flag and record the outcome. The in-memory page is kept either way.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        outcome: Result<(), DomainError>,
    ) -> Result<(), DomainError> {
        self.saving = false;
        match outcome {
            Ok(()) => {
                if let Some(stamp) = ticket.stamped_at() {
                    Arc::make_mut(&mut self.page).updated_at = Some(stamp);
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "page save failed, edits kept");
                self.last_save_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn save(
        &mut self,
        store: &dyn PageStore,
        business_id: &str,
    ) -> Result<(), DomainError> {
        let ticket = self.begin_save()?;
        let outcome = store.save_page(business_id, ticket.page()).await;
        if outcome.is_ok() {
            info!(business_id, blocks = ticket.page().blocks.len(), "page saved");
        }
        self.finish_save(ticket, outcome)
    }
}

/// Rewrite orders to 0..n in current sorted order. Returns the next free order.
fn renumber(page: &mut Page) -> i64 {
    let sorted: Vec<BlockId> = page.sorted_blocks().into_iter().map(|b| b.id.clone()).collect();
    let mut next = 0i64;
    for block_id in &sorted {
        if let Some(block) = block_mut(page, block_id) {
            block.order = next;
        }
        next += 1;
    }
    next
}

fn order_of(page: &Page, id: &BlockId) -> Option<i64> {
    page.block(id).map(|b| b.order)
}

fn block_mut<'a>(page: &'a mut Page, id: &BlockId) -> Option<&'a mut Block> {
    page.blocks.iter_mut().find(|b| &b.id == id)
}
