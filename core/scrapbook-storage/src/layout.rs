//! Replace-all synchronization of a page's layout.

use crate::database::Database;
use crate::error::{StoreError, StoreResult};
use crate::ownership::{EntityRef, authorize, resolve_read_on};
use crate::rows::{load_elements, load_page};
use rusqlite::{Transaction, params};
use scrapbook_model::{
    Element, ElementDraft, ElementSpec, PageLayout, PagePatch, ValidationError, ordering,
};
use scrapbook_types::{ElementId, PageId, Timestamp, UserId};
use tracing::{debug, info};

/// A layout change submitted by an editor.
///
/// `elements: None` leaves the page's elements alone; `Some(vec![])`
/// deletes all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutUpdate {
    pub page: PagePatch,
    pub elements: Option<Vec<ElementDraft>>,
}

impl LayoutUpdate {
    /// Checks the whole update and returns the validated element set.
    fn validate(&self) -> Result<Option<Vec<ElementSpec>>, ValidationError> {
        self.page.validate()?;
        self.elements
            .as_ref()
            .map(|drafts| {
                drafts
                    .iter()
                    .enumerate()
                    .map(|(i, draft)| draft.validate().map_err(|e| e.within("elements", i)))
                    .collect()
            })
            .transpose()
    }
}

/// Writes page layouts under the ownership gate.
#[derive(Clone)]
pub struct LayoutSynchronizer {
    db: Database,
}

impl LayoutSynchronizer {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Atomically applies `update` to the page.
    ///
    /// The ownership check, the page patch, the element delete and every
    /// insert share one transaction. Ownership is resolved first, so a
    /// stranger gets `Forbidden` whatever the payload; the payload is then
    /// validated in full before the first write. A failure at any point
    /// leaves the page exactly as it was.
    pub fn replace_layout(
        &self,
        page_id: &PageId,
        user: &UserId,
        update: &LayoutUpdate,
    ) -> StoreResult<()> {
        let entity = EntityRef::Page(*page_id);
        let now = Timestamp::now();

        let replaced = self.db.write(|tx| {
            authorize(tx, &entity, user)?;
            let specs = update.validate()?;

            if !update.page.is_empty() || specs.is_some() {
                tx.execute(
                    "UPDATE pages SET
                        background_color = COALESCE(?1, background_color),
                        background_image_url = COALESCE(?2, background_image_url),
                        updated_at = ?3
                     WHERE id = ?4",
                    params![
                        update.page.background_color,
                        update.page.background_image_url,
                        now.as_millis(),
                        page_id.to_string(),
                    ],
                )?;
            }

            let replaced = match specs {
                Some(specs) => {
                    let removed = tx.execute(
                        "DELETE FROM page_elements WHERE page_id = ?1",
                        params![page_id.to_string()],
                    )?;
                    debug!(page = %page_id, removed, "cleared page elements");
                    let count = specs.len();
                    for spec in specs {
                        insert_element(tx, &spec.into_element(ElementId::new(), *page_id))?;
                    }
                    Some(count)
                }
                None => None,
            };

            touch_scrapbook(tx, page_id, now)?;
            Ok(replaced)
        })?;

        match replaced {
            Some(count) => info!(page = %page_id, elements = count, "replaced page layout"),
            None => info!(page = %page_id, "updated page properties"),
        }
        Ok(())
    }

    /// Adds one element to the page without touching the others.
    pub fn add_element(
        &self,
        page_id: &PageId,
        user: &UserId,
        draft: &ElementDraft,
    ) -> StoreResult<Element> {
        let entity = EntityRef::Page(*page_id);
        let now = Timestamp::now();

        let element = self.db.write(|tx| {
            authorize(tx, &entity, user)?;
            let spec = draft.validate()?;
            let element = spec.into_element(ElementId::new(), *page_id);
            insert_element(tx, &element)?;
            touch_scrapbook(tx, page_id, now)?;
            Ok(element)
        })?;

        info!(page = %page_id, element = %element.id, "added element");
        Ok(element)
    }

    /// Reads a page with its elements in render order, applying the
    /// scrapbook's visibility rule.
    pub fn page_layout(&self, page_id: &PageId, viewer: &UserId) -> StoreResult<PageLayout> {
        self.db.read(|conn| {
            let page = load_page(conn, page_id)?.ok_or_else(|| StoreError::not_found("page", page_id))?;
            resolve_read_on(conn, &page.scrapbook_id, viewer)?.require(&EntityRef::Page(*page_id))?;
            let elements = ordering::render_order(load_elements(conn, page_id)?);
            Ok(PageLayout { page, elements })
        })
    }
}

fn insert_element(tx: &Transaction<'_>, element: &Element) -> StoreResult<()> {
    let properties = serde_json::to_string(&element.properties)?;
    tx.execute(
        "INSERT INTO page_elements
            (id, page_id, element_type, x_pos, y_pos, rotation, scale, z_index, properties)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            element.id.to_string(),
            element.page_id.to_string(),
            element.element_type.as_str(),
            element.x_pos,
            element.y_pos,
            element.rotation,
            element.scale,
            element.z_index,
            properties,
        ],
    )?;
    Ok(())
}

fn touch_scrapbook(tx: &Transaction<'_>, page_id: &PageId, now: Timestamp) -> StoreResult<()> {
    tx.execute(
        "UPDATE scrapbooks SET updated_at = ?1
         WHERE id = (SELECT scrapbook_id FROM pages WHERE id = ?2)",
        params![now.as_millis(), page_id.to_string()],
    )?;
    Ok(())
}
