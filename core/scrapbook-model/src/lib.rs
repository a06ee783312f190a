//! Entity model for the scrapbook service.
//!
//! Defines the records every other crate exchanges:
//! - [`Scrapbook`], [`Page`], [`Element`], [`Song`], [`SongLink`]: persisted records
//! - [`NewScrapbook`], [`ScrapbookPatch`], [`NewPage`], [`PagePatch`], [`NewSong`]: validated inputs
//! - [`ElementDraft`] → [`ElementSpec`]: the wire shape of an element and its checked form
//! - [`ElementProperties`]: the per-type property schema, keyed on [`ElementType`]
//! - [`ordering`]: the render-order policy for a page's elements
//!
//! Nothing here touches storage; the rules are pure so they can run before
//! any transaction begins.

mod element;
mod error;
pub mod ordering;
mod page;
mod scrapbook;
mod song;
mod validate;

pub use element::{
    Element, ElementDraft, ElementProperties, ElementSpec, ElementType, PhotoProperties,
    StickerProperties, TextProperties,
};
pub use error::ValidationError;
pub use ordering::Stacked;
pub use page::{NewPage, Page, PageLayout, PagePatch};
pub use scrapbook::{NewScrapbook, Scrapbook, ScrapbookDetail, ScrapbookPatch, ScrapbookSummary};
pub use song::{NewSong, Song, SongLink};
pub use validate::MAX_TEXT_LEN;
