use crate::validate::require_url;
use crate::{Element, ValidationError};
use scrapbook_types::{PageId, ScrapbookId, Timestamp};
use serde::{Deserialize, Serialize};

/// A canvas within a scrapbook.
///
/// `page_order` is advisory: callers choose it and it is neither unique nor
/// contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub scrapbook_id: ScrapbookId,
    pub page_order: i64,
    pub background_color: Option<String>,
    pub background_image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPage {
    pub page_order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
}

impl NewPage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page_order < 0 {
            return Err(ValidationError::new(
                "pageOrder",
                format!("must be zero or greater (got {})", self.page_order),
            ));
        }
        if let Some(url) = &self.background_image_url {
            require_url("backgroundImageUrl", url)?;
        }
        Ok(())
    }
}

/// Page-level properties changed alongside a layout replacement.
///
/// Only fields that are `Some` are written; `None` leaves the stored value
/// as it was (it never clears it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
}

impl PagePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.background_color.is_none() && self.background_image_url.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.background_image_url {
            Some(url) => require_url("backgroundImageUrl", url),
            None => Ok(()),
        }
    }
}

/// A page together with its elements in render order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(flatten)]
    pub page: Page,
    pub elements: Vec<Element>,
}
