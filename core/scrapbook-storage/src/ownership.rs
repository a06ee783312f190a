//! Ownership chain resolution.
//!
//! Every mutable entity hangs off a scrapbook, and a scrapbook belongs to
//! exactly one user. Resolving access means walking the parent references
//! up to that user: Element → Page → Scrapbook → User, SongLink → Scrapbook
//! → User. A missing link anywhere in the chain is `NotFound`.

use crate::database::Database;
use crate::error::{StoreError, StoreResult};
use crate::rows::parse_id;
use rusqlite::{Connection, OptionalExtension, params};
use scrapbook_types::{ElementId, PageId, ScrapbookId, SongLinkId, UserId};
use std::fmt;

/// Outcome of an ownership or visibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
    NotFound,
}

impl Access {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the classification into the matching store error.
    pub fn require(self, entity: &EntityRef) -> StoreResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(StoreError::Forbidden {
                entity: entity.kind(),
                id: entity.id_string(),
            }),
            Self::NotFound => Err(StoreError::not_found(entity.kind(), entity.id_string())),
        }
    }
}

/// A reference to any entity that can be authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Scrapbook(ScrapbookId),
    Page(PageId),
    Element(ElementId),
    SongLink(SongLinkId),
}

impl EntityRef {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scrapbook(_) => "scrapbook",
            Self::Page(_) => "page",
            Self::Element(_) => "element",
            Self::SongLink(_) => "song link",
        }
    }

    fn id_string(&self) -> String {
        match self {
            Self::Scrapbook(id) => id.to_string(),
            Self::Page(id) => id.to_string(),
            Self::Element(id) => id.to_string(),
            Self::SongLink(id) => id.to_string(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id_string())
    }
}

// ── chain links ──────────────────────────────────────────────────

fn scrapbook_owner(conn: &Connection, id: &ScrapbookId) -> StoreResult<Option<(UserId, bool)>> {
    let row: Option<(String, bool)> = conn
        .query_row(
            "SELECT user_id, is_private FROM scrapbooks WHERE id = ?1",
            params![id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    row.map(|(owner, private)| Ok((parse_id("user id", &owner)?, private)))
        .transpose()
}

fn parent_of(conn: &Connection, sql: &str, id: &str) -> StoreResult<Option<String>> {
    Ok(conn
        .query_row(sql, params![id], |row| row.get(0))
        .optional()?)
}

fn page_parent(conn: &Connection, id: &PageId) -> StoreResult<Option<ScrapbookId>> {
    parent_of(conn, "SELECT scrapbook_id FROM pages WHERE id = ?1", &id.to_string())?
        .map(|raw| parse_id("scrapbook id", &raw))
        .transpose()
}

fn element_parent(conn: &Connection, id: &ElementId) -> StoreResult<Option<PageId>> {
    parent_of(conn, "SELECT page_id FROM page_elements WHERE id = ?1", &id.to_string())?
        .map(|raw| parse_id("page id", &raw))
        .transpose()
}

fn link_parent(conn: &Connection, id: &SongLinkId) -> StoreResult<Option<ScrapbookId>> {
    parent_of(conn, "SELECT scrapbook_id FROM scrapbook_songs WHERE id = ?1", &id.to_string())?
        .map(|raw| parse_id("scrapbook id", &raw))
        .transpose()
}

/// Walks `entity` up to its owning scrapbook.
fn owning_scrapbook(conn: &Connection, entity: &EntityRef) -> StoreResult<Option<ScrapbookId>> {
    match entity {
        EntityRef::Scrapbook(id) => Ok(Some(*id)),
        EntityRef::Page(id) => page_parent(conn, id),
        EntityRef::Element(id) => match element_parent(conn, id)? {
            Some(page) => page_parent(conn, &page),
            None => Ok(None),
        },
        EntityRef::SongLink(id) => link_parent(conn, id),
    }
}

/// Mutation rule, evaluated on an open connection or transaction.
pub(crate) fn resolve_on(conn: &Connection, entity: &EntityRef, user: &UserId) -> StoreResult<Access> {
    let Some(scrapbook) = owning_scrapbook(conn, entity)? else {
        return Ok(Access::NotFound);
    };
    Ok(match scrapbook_owner(conn, &scrapbook)? {
        None => Access::NotFound,
        Some((owner, _)) if owner == *user => Access::Allow,
        Some(_) => Access::Deny,
    })
}

/// Resolves inside the caller's transaction and fails unless allowed.
pub(crate) fn authorize(conn: &Connection, entity: &EntityRef, user: &UserId) -> StoreResult<()> {
    let access = resolve_on(conn, entity, user)?;
    if access == Access::Deny {
        tracing::warn!(%entity, %user, "mutation denied");
    }
    access.require(entity)
}

/// Read-visibility rule for a scrapbook.
pub(crate) fn resolve_read_on(
    conn: &Connection,
    scrapbook: &ScrapbookId,
    user: &UserId,
) -> StoreResult<Access> {
    Ok(match scrapbook_owner(conn, scrapbook)? {
        None => Access::NotFound,
        Some((owner, private)) if !private || owner == *user => Access::Allow,
        Some(_) => Access::Deny,
    })
}

/// Classifies a user's access to an entity.
///
/// Never fails on a missing or foreign entity; those come back as
/// [`Access::NotFound`] and [`Access::Deny`]. Errors are storage failures only.
#[derive(Clone)]
pub struct OwnershipResolver {
    db: Database,
}

impl OwnershipResolver {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// May `user` mutate `entity`?
    pub fn resolve(&self, entity: &EntityRef, user: &UserId) -> StoreResult<Access> {
        let access = self.db.read(|conn| resolve_on(conn, entity, user))?;
        if access == Access::Deny {
            tracing::warn!(%entity, %user, "mutation denied");
        }
        Ok(access)
    }

    /// May `user` read the scrapbook?
    pub fn resolve_read(&self, scrapbook: &ScrapbookId, user: &UserId) -> StoreResult<Access> {
        self.db.read(|conn| resolve_read_on(conn, scrapbook, user))
    }
}
