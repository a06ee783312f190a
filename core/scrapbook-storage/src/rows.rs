//! Row decoding for every table.
//!
//! Rows are read into plain column structs inside `query_map` closures and
//! converted to model types afterwards, so id parsing and JSON decoding
//! report `StoreError` rather than `rusqlite::Error`.

use crate::error::{StoreError, StoreResult};
use rusqlite::{Connection, OptionalExtension, Row, params};
use scrapbook_model::{
    Element, ElementProperties, ElementType, Page, Scrapbook, Song, SongLink,
};
use scrapbook_types::{PageId, ScrapbookId, Timestamp};
use std::fmt::Display;
use std::str::FromStr;

pub(crate) fn parse_id<T>(column: &str, raw: &str) -> StoreResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| StoreError::InvalidData(format!("invalid {column} '{raw}': {e}")))
}

// ── scrapbooks ───────────────────────────────────────────────────

pub(crate) const SCRAPBOOK_COLUMNS: &str =
    "id, user_id, title, theme_category, is_private, created_at, updated_at";

pub(crate) struct ScrapbookRow {
    id: String,
    user_id: String,
    title: String,
    theme_category: String,
    is_private: bool,
    created_at: i64,
    updated_at: i64,
}

impl ScrapbookRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            theme_category: row.get(3)?,
            is_private: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    pub(crate) fn into_model(self) -> StoreResult<Scrapbook> {
        Ok(Scrapbook {
            id: parse_id("scrapbook id", &self.id)?,
            owner_id: parse_id("user id", &self.user_id)?,
            title: self.title,
            theme_category: self.theme_category,
            is_private: self.is_private,
            created_at: Timestamp::from_millis(self.created_at),
            updated_at: Timestamp::from_millis(self.updated_at),
        })
    }
}

pub(crate) fn load_scrapbook(conn: &Connection, id: &ScrapbookId) -> StoreResult<Option<Scrapbook>> {
    let sql = format!("SELECT {SCRAPBOOK_COLUMNS} FROM scrapbooks WHERE id = ?1");
    conn.query_row(&sql, params![id.to_string()], ScrapbookRow::from_row)
        .optional()?
        .map(ScrapbookRow::into_model)
        .transpose()
}

// ── pages ────────────────────────────────────────────────────────

pub(crate) const PAGE_COLUMNS: &str =
    "id, scrapbook_id, page_order, background_color, background_image_url, created_at, updated_at";

pub(crate) struct PageRow {
    id: String,
    scrapbook_id: String,
    page_order: i64,
    background_color: Option<String>,
    background_image_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl PageRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            scrapbook_id: row.get(1)?,
            page_order: row.get(2)?,
            background_color: row.get(3)?,
            background_image_url: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    pub(crate) fn into_model(self) -> StoreResult<Page> {
        Ok(Page {
            id: parse_id("page id", &self.id)?,
            scrapbook_id: parse_id("scrapbook id", &self.scrapbook_id)?,
            page_order: self.page_order,
            background_color: self.background_color,
            background_image_url: self.background_image_url,
            created_at: Timestamp::from_millis(self.created_at),
            updated_at: Timestamp::from_millis(self.updated_at),
        })
    }
}

pub(crate) fn load_page(conn: &Connection, id: &PageId) -> StoreResult<Option<Page>> {
    let sql = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?1");
    conn.query_row(&sql, params![id.to_string()], PageRow::from_row)
        .optional()?
        .map(PageRow::into_model)
        .transpose()
}

/// Pages of a scrapbook in ascending `pageOrder`, creation order breaking ties.
pub(crate) fn load_pages(conn: &Connection, scrapbook_id: &ScrapbookId) -> StoreResult<Vec<Page>> {
    let sql = format!(
        "SELECT {PAGE_COLUMNS} FROM pages WHERE scrapbook_id = ?1 ORDER BY page_order, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![scrapbook_id.to_string()], PageRow::from_row)?;
    let mut pages = Vec::new();
    for row in rows {
        pages.push(row?.into_model()?);
    }
    Ok(pages)
}

// ── page_elements ────────────────────────────────────────────────

pub(crate) const ELEMENT_COLUMNS: &str =
    "id, page_id, element_type, x_pos, y_pos, rotation, scale, z_index, properties";

pub(crate) struct ElementRow {
    id: String,
    page_id: String,
    element_type: String,
    x_pos: f64,
    y_pos: f64,
    rotation: f64,
    scale: f64,
    z_index: i64,
    properties: String,
}

impl ElementRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            page_id: row.get(1)?,
            element_type: row.get(2)?,
            x_pos: row.get(3)?,
            y_pos: row.get(4)?,
            rotation: row.get(5)?,
            scale: row.get(6)?,
            z_index: row.get(7)?,
            properties: row.get(8)?,
        })
    }

    pub(crate) fn into_model(self) -> StoreResult<Element> {
        let element_type: ElementType = self
            .element_type
            .parse()
            .map_err(|e| StoreError::InvalidData(format!("element {}: {e}", self.id)))?;
        let properties = ElementProperties::from_json(
            element_type,
            serde_json::from_str(&self.properties)?,
        )
        .map_err(|e| StoreError::InvalidData(format!("element {}: {e}", self.id)))?;
        Ok(Element {
            id: parse_id("element id", &self.id)?,
            page_id: parse_id("page id", &self.page_id)?,
            element_type,
            x_pos: self.x_pos,
            y_pos: self.y_pos,
            rotation: self.rotation,
            scale: self.scale,
            z_index: self.z_index,
            properties,
        })
    }
}

/// Elements of a page in insertion order. Callers apply render order.
pub(crate) fn load_elements(conn: &Connection, page_id: &PageId) -> StoreResult<Vec<Element>> {
    let sql = format!("SELECT {ELEMENT_COLUMNS} FROM page_elements WHERE page_id = ?1 ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![page_id.to_string()], ElementRow::from_row)?;
    let mut elements = Vec::new();
    for row in rows {
        elements.push(row?.into_model()?);
    }
    Ok(elements)
}

// ── songs ────────────────────────────────────────────────────────

pub(crate) const SONG_COLUMNS: &str = "id, title, artist, file_url, duration_seconds, created_at";

pub(crate) struct SongRow {
    id: String,
    title: String,
    artist: String,
    file_url: String,
    duration_seconds: i64,
    created_at: i64,
}

impl SongRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            file_url: row.get(3)?,
            duration_seconds: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    pub(crate) fn into_model(self) -> StoreResult<Song> {
        Ok(Song {
            id: parse_id("song id", &self.id)?,
            title: self.title,
            artist: self.artist,
            file_url: self.file_url,
            duration_seconds: self.duration_seconds,
            created_at: Timestamp::from_millis(self.created_at),
        })
    }
}

/// Songs linked to a scrapbook, in the order they were linked.
pub(crate) fn load_linked_songs(conn: &Connection, scrapbook_id: &ScrapbookId) -> StoreResult<Vec<Song>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.title, s.artist, s.file_url, s.duration_seconds, s.created_at
         FROM scrapbook_songs l
         JOIN songs s ON s.id = l.song_id
         WHERE l.scrapbook_id = ?1
         ORDER BY l.rowid",
    )?;
    let rows = stmt.query_map(params![scrapbook_id.to_string()], SongRow::from_row)?;
    let mut songs = Vec::new();
    for row in rows {
        songs.push(row?.into_model()?);
    }
    Ok(songs)
}

// ── scrapbook_songs ──────────────────────────────────────────────

pub(crate) fn song_link_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

pub(crate) fn song_link_into_model(raw: (String, String, String, i64)) -> StoreResult<SongLink> {
    let (id, scrapbook_id, song_id, created_at) = raw;
    Ok(SongLink {
        id: parse_id("song link id", &id)?,
        scrapbook_id: parse_id("scrapbook id", &scrapbook_id)?,
        song_id: parse_id("song id", &song_id)?,
        created_at: Timestamp::from_millis(created_at),
    })
}
