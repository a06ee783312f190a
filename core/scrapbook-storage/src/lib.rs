//! SQLite storage layer for the scrapbook service.
//!
//! Persists scrapbooks, pages, elements, songs and song links, and enforces
//! who may change them.
//!
//! # Architecture
//!
//! - [`Database`] is the single storage-engine handle; every store receives
//!   a clone of it explicitly (there is no process-wide client)
//! - [`OwnershipResolver`] walks an entity's parent chain up to the owning
//!   user and classifies access as Allow / Deny / NotFound
//! - [`ScrapbookStore`] covers scrapbook CRUD, page creation and song links;
//!   scrapbook update/delete are single owner-scoped conditional writes
//! - [`LayoutSynchronizer`] replaces a page's whole element set atomically
//! - [`SongCatalog`] holds the shared song list
//!
//! Deleting a scrapbook cascades to its pages, elements and song links
//! through SQLite foreign keys.

mod database;
mod error;
mod layout;
mod ownership;
mod rows;
mod scrapbooks;
mod songs;

pub use database::Database;
pub use error::{StoreError, StoreResult};
pub use layout::{LayoutSynchronizer, LayoutUpdate};
pub use ownership::{Access, EntityRef, OwnershipResolver};
pub use scrapbooks::ScrapbookStore;
pub use songs::SongCatalog;
