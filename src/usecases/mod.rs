//! Application use cases. Orchestrate domain logic via ports.

pub mod block_editor;
pub mod migrator;
pub mod page_builder;
pub mod page_service;

pub use block_editor::{BlockEditor, Field, FieldKind};
pub use migrator::migrate_legacy_profile;
pub use page_builder::{MoveDirection, PageBuilder, SaveTicket};
pub use page_service::{
    ASSET_RESOLUTION_TIMEOUT, LoadedPage, PageService, PageSource, is_storage_path,
    resolve_page_assets,
};
