//! Scrapbook CRUD, page creation and playlist links.

use crate::database::Database;
use crate::error::{StoreError, StoreResult};
use crate::ownership::{Access, EntityRef, authorize, resolve_read_on};
use crate::rows::{
    PAGE_COLUMNS, PageRow, SCRAPBOOK_COLUMNS, ScrapbookRow, load_elements, load_linked_songs, load_pages,
    load_scrapbook, song_link_from_row, song_link_into_model,
};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use scrapbook_model::{
    NewPage, NewScrapbook, Page, PageLayout, Scrapbook, ScrapbookDetail, ScrapbookPatch,
    ScrapbookSummary, SongLink, ordering,
};
use scrapbook_types::{PageId, ScrapbookId, SongId, SongLinkId, Timestamp, UserId};
use tracing::{info, warn};

/// Store for scrapbooks and the records hanging directly off them.
#[derive(Clone)]
pub struct ScrapbookStore {
    db: Database,
}

impl ScrapbookStore {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, owner: &UserId, input: &NewScrapbook) -> StoreResult<Scrapbook> {
        input.validate()?;
        let now = Timestamp::now();
        let scrapbook = Scrapbook {
            id: ScrapbookId::new(),
            owner_id: *owner,
            title: input.title.clone(),
            theme_category: input.theme_category.clone(),
            is_private: input.is_private,
            created_at: now,
            updated_at: now,
        };

        self.db.write(|tx| {
            tx.execute(
                "INSERT INTO scrapbooks
                    (id, user_id, title, theme_category, is_private, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    scrapbook.id.to_string(),
                    scrapbook.owner_id.to_string(),
                    scrapbook.title,
                    scrapbook.theme_category,
                    scrapbook.is_private,
                    now.as_millis(),
                    now.as_millis(),
                ],
            )?;
            Ok(())
        })?;

        info!(scrapbook = %scrapbook.id, owner = %owner, "created scrapbook");
        Ok(scrapbook)
    }

    /// The owner's scrapbooks, most recently updated first.
    pub fn list_for_owner(&self, owner: &UserId) -> StoreResult<Vec<ScrapbookSummary>> {
        self.db.read(|conn| {
            let sql = format!(
                "SELECT {SCRAPBOOK_COLUMNS} FROM scrapbooks
                 WHERE user_id = ?1
                 ORDER BY updated_at DESC, rowid DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![owner.to_string()], ScrapbookRow::from_row)?;

            let mut summaries = Vec::new();
            for row in rows {
                let scrapbook = row?.into_model()?;
                summaries.push(summarize(conn, scrapbook)?);
            }
            Ok(summaries)
        })
    }

    /// Reads a scrapbook with all of its content.
    ///
    /// Private scrapbooks are visible to their owner only.
    pub fn get(&self, id: &ScrapbookId, viewer: &UserId) -> StoreResult<ScrapbookDetail> {
        self.db.read(|conn| {
            let entity = EntityRef::Scrapbook(*id);
            let access = resolve_read_on(conn, id, viewer)?;
            if access == Access::Deny {
                warn!(%entity, %viewer, "read denied");
            }
            access.require(&entity)?;

            let scrapbook = load_scrapbook(conn, id)?.ok_or_else(|| StoreError::not_found("scrapbook", id))?;
            let mut pages = Vec::new();
            for page in load_pages(conn, id)? {
                let elements = ordering::render_order(load_elements(conn, &page.id)?);
                pages.push(PageLayout { page, elements });
            }
            let songs = load_linked_songs(conn, id)?;
            Ok(ScrapbookDetail {
                scrapbook,
                pages,
                songs,
            })
        })
    }

    /// Owner-scoped partial update.
    ///
    /// Matches on `(id, owner)` in a single statement, so a missing
    /// scrapbook and someone else's scrapbook both report `NotFound`.
    pub fn update(&self, id: &ScrapbookId, owner: &UserId, patch: &ScrapbookPatch) -> StoreResult<()> {
        patch.validate()?;
        let now = Timestamp::now();
        let changed = self.db.write(|tx| {
            Ok(tx.execute(
                "UPDATE scrapbooks SET
                    title = COALESCE(?1, title),
                    theme_category = COALESCE(?2, theme_category),
                    is_private = COALESCE(?3, is_private),
                    updated_at = ?4
                 WHERE id = ?5 AND user_id = ?6",
                params![
                    patch.title,
                    patch.theme_category,
                    patch.is_private,
                    now.as_millis(),
                    id.to_string(),
                    owner.to_string(),
                ],
            )?)
        })?;

        if changed == 0 {
            warn!(scrapbook = %id, %owner, "update matched no owned scrapbook");
            return Err(StoreError::not_found("scrapbook", id));
        }
        info!(scrapbook = %id, "updated scrapbook");
        Ok(())
    }

    /// Owner-scoped delete. Pages, elements and song links go with it.
    pub fn delete(&self, id: &ScrapbookId, owner: &UserId) -> StoreResult<()> {
        let removed = self.db.write(|tx| {
            Ok(tx.execute(
                "DELETE FROM scrapbooks WHERE id = ?1 AND user_id = ?2",
                params![id.to_string(), owner.to_string()],
            )?)
        })?;

        if removed == 0 {
            warn!(scrapbook = %id, %owner, "delete matched no owned scrapbook");
            return Err(StoreError::not_found("scrapbook", id));
        }
        info!(scrapbook = %id, "deleted scrapbook");
        Ok(())
    }

    /// Links a catalog song to the scrapbook's playlist.
    ///
    /// Linking a song twice returns the existing link.
    pub fn add_song(&self, id: &ScrapbookId, owner: &UserId, song: &SongId) -> StoreResult<SongLink> {
        let now = Timestamp::now();
        let link = self.db.write(|tx| {
            authorize(tx, &EntityRef::Scrapbook(*id), owner)?;

            let known: Option<i64> = tx
                .query_row("SELECT 1 FROM songs WHERE id = ?1", params![song.to_string()], |row| {
                    row.get(0)
                })
                .optional()?;
            if known.is_none() {
                return Err(StoreError::not_found("song", song));
            }

            let inserted = tx.execute(
                "INSERT OR IGNORE INTO scrapbook_songs (id, scrapbook_id, song_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    SongLinkId::new().to_string(),
                    id.to_string(),
                    song.to_string(),
                    now.as_millis(),
                ],
            )?;
            if inserted > 0 {
                touch(tx, id, now)?;
            }

            let raw = tx.query_row(
                "SELECT id, scrapbook_id, song_id, created_at FROM scrapbook_songs
                 WHERE scrapbook_id = ?1 AND song_id = ?2",
                params![id.to_string(), song.to_string()],
                song_link_from_row,
            )?;
            song_link_into_model(raw)
        })?;

        info!(scrapbook = %id, song = %song, link = %link.id, "linked song");
        Ok(link)
    }

    /// Adds a page to the scrapbook.
    pub fn create_page(&self, id: &ScrapbookId, owner: &UserId, input: &NewPage) -> StoreResult<Page> {
        input.validate()?;
        let now = Timestamp::now();
        let page = Page {
            id: PageId::new(),
            scrapbook_id: *id,
            page_order: input.page_order,
            background_color: input.background_color.clone(),
            background_image_url: input.background_image_url.clone(),
            created_at: now,
            updated_at: now,
        };

        self.db.write(|tx| {
            authorize(tx, &EntityRef::Scrapbook(*id), owner)?;
            tx.execute(
                "INSERT INTO pages
                    (id, scrapbook_id, page_order, background_color, background_image_url,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    page.id.to_string(),
                    id.to_string(),
                    page.page_order,
                    page.background_color,
                    page.background_image_url,
                    now.as_millis(),
                    now.as_millis(),
                ],
            )?;
            touch(tx, id, now)
        })?;

        info!(scrapbook = %id, page = %page.id, order = page.page_order, "created page");
        Ok(page)
    }
}

fn summarize(conn: &Connection, scrapbook: Scrapbook) -> StoreResult<ScrapbookSummary> {
    let id = scrapbook.id.to_string();
    let sql = format!(
        "SELECT {PAGE_COLUMNS} FROM pages WHERE scrapbook_id = ?1
         ORDER BY page_order, rowid LIMIT 1"
    );
    let cover_page = conn
        .query_row(
            &sql,
            params![id],
            PageRow::from_row,
        )
        .optional()?
        .map(PageRow::into_model)
        .transpose()?;
    let page_count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM pages WHERE scrapbook_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    let songs = load_linked_songs(conn, &scrapbook.id)?;
    Ok(ScrapbookSummary {
        scrapbook,
        cover_page,
        songs,
        page_count,
    })
}

fn touch(tx: &Transaction<'_>, id: &ScrapbookId, now: Timestamp) -> StoreResult<()> {
    tx.execute(
        "UPDATE scrapbooks SET updated_at = ?1 WHERE id = ?2",
        params![now.as_millis(), id.to_string()],
    )?;
    Ok(())
}
