use crate::validate::require_text;
use crate::{Page, PageLayout, Song, ValidationError};
use scrapbook_types::{ScrapbookId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A user-owned container of pages and song links.
///
/// `owner_id` is fixed at creation; nothing in the service transfers
/// ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scrapbook {
    pub id: ScrapbookId,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    pub title: String,
    pub theme_category: String,
    pub is_private: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Scrapbook {
    /// Mutation rule: only the owner may change the scrapbook or anything under it.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }

    /// Read rule: public scrapbooks are visible to everyone, private ones only to the owner.
    #[must_use]
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        !self.is_private || self.is_owned_by(user)
    }
}

/// Input for creating a scrapbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScrapbook {
    pub title: String,
    pub theme_category: String,
    #[serde(default)]
    pub is_private: bool,
}

impl NewScrapbook {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}

/// Partial update of a scrapbook; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapbookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

impl ScrapbookPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) => require_text("title", title),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.theme_category.is_none() && self.is_private.is_none()
    }
}

/// One row of the owner's scrapbook listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapbookSummary {
    #[serde(flatten)]
    pub scrapbook: Scrapbook,
    /// The page with the lowest `pageOrder`, if any.
    pub cover_page: Option<Page>,
    pub songs: Vec<Song>,
    pub page_count: u32,
}

/// A scrapbook with its full content, as returned to a reader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapbookDetail {
    #[serde(flatten)]
    pub scrapbook: Scrapbook,
    /// Pages in ascending `pageOrder`, each with elements in render order.
    pub pages: Vec<PageLayout>,
    pub songs: Vec<Song>,
}
