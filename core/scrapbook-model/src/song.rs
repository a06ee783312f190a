use crate::validate::{require_text, require_url};
use crate::ValidationError;
use scrapbook_types::{ScrapbookId, SongId, SongLinkId, Timestamp};
use serde::{Deserialize, Serialize};

/// A song in the shared catalog. Songs belong to no user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub file_url: String,
    pub duration_seconds: i64,
    pub created_at: Timestamp,
}

/// Input for adding a song to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub file_url: String,
    pub duration_seconds: i64,
}

impl NewSong {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("artist", &self.artist)?;
        require_url("fileUrl", &self.file_url)?;
        if self.duration_seconds <= 0 {
            return Err(ValidationError::new(
                "durationSeconds",
                format!("must be positive (got {})", self.duration_seconds),
            ));
        }
        Ok(())
    }
}

/// Association of a song with a scrapbook's playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongLink {
    pub id: SongLinkId,
    pub scrapbook_id: ScrapbookId,
    pub song_id: SongId,
    pub created_at: Timestamp,
}
