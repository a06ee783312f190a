#![allow(dead_code)]

use scrapbook_model::{ElementDraft, NewPage, NewScrapbook, NewSong, Page, Scrapbook, Song};
use scrapbook_storage::{Database, LayoutSynchronizer, OwnershipResolver, ScrapbookStore, SongCatalog};
use scrapbook_types::UserId;
use serde_json::json;

pub struct Fixture {
    pub db: Database,
    pub scrapbooks: ScrapbookStore,
    pub layouts: LayoutSynchronizer,
    pub resolver: OwnershipResolver,
    pub songs: SongCatalog,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_db(Database::open_in_memory().unwrap())
    }

    pub fn with_db(db: Database) -> Self {
        Self {
            scrapbooks: ScrapbookStore::new(db.clone()),
            layouts: LayoutSynchronizer::new(db.clone()),
            resolver: OwnershipResolver::new(db.clone()),
            songs: SongCatalog::new(db.clone()),
            db,
        }
    }

    pub fn scrapbook(&self, owner: &UserId, private: bool) -> Scrapbook {
        self.scrapbooks
            .create(
                owner,
                &NewScrapbook {
                    title: "Summer 2024".into(),
                    theme_category: "travel".into(),
                    is_private: private,
                },
            )
            .unwrap()
    }

    pub fn page(&self, scrapbook: &Scrapbook, order: i64) -> Page {
        self.scrapbooks
            .create_page(
                &scrapbook.id,
                &scrapbook.owner_id,
                &NewPage {
                    page_order: order,
                    background_color: None,
                    background_image_url: None,
                },
            )
            .unwrap()
    }

    pub fn song(&self, title: &str, artist: &str) -> Song {
        self.songs
            .create(&NewSong {
                title: title.into(),
                artist: artist.into(),
                file_url: "https://cdn.example.com/audio/track.mp3".into(),
                duration_seconds: 180,
            })
            .unwrap()
    }
}

pub fn draft(value: serde_json::Value) -> ElementDraft {
    ElementDraft::from_json(value).unwrap()
}

pub fn text(z: i64, content: &str) -> ElementDraft {
    draft(json!({
        "type": "text",
        "xPos": 5.0,
        "yPos": 5.0,
        "zIndex": z,
        "properties": { "content": content, "font": "serif" }
    }))
}

pub fn photo(z: i64, url: &str) -> ElementDraft {
    draft(json!({
        "type": "photo",
        "xPos": 0.0,
        "yPos": 0.0,
        "rotation": 12.5,
        "zIndex": z,
        "properties": { "imageUrl": url }
    }))
}

pub fn sticker(z: i64, id: &str) -> ElementDraft {
    draft(json!({
        "type": "sticker",
        "xPos": 10.0,
        "yPos": 20.0,
        "scale": 2.0,
        "zIndex": z,
        "properties": { "stickerId": id }
    }))
}
