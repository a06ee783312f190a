//! The shared song catalog.

use crate::database::Database;
use crate::error::StoreResult;
use crate::rows::{SONG_COLUMNS, SongRow};
use rusqlite::params;
use scrapbook_model::{NewSong, Song};
use scrapbook_types::{SongId, Timestamp};
use tracing::info;

#[derive(Clone)]
pub struct SongCatalog {
    db: Database,
}

impl SongCatalog {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All songs ordered by title, optionally filtered.
    ///
    /// `search` matches case-insensitively anywhere in the title or the
    /// artist. It is a plain substring, surrounding whitespace included:
    /// `%` and `_` have no special meaning. A blank search returns everything.
    pub fn list(&self, search: Option<&str>) -> StoreResult<Vec<Song>> {
        let needle = search
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase);

        self.db.read(|conn| {
            let mut songs = Vec::new();
            match needle {
                Some(needle) => {
                    let sql = format!(
                        "SELECT {SONG_COLUMNS} FROM songs
                         WHERE instr(casefold(title), ?1) > 0 OR instr(casefold(artist), ?1) > 0
                         ORDER BY title, id"
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    for row in stmt.query_map(params![needle], SongRow::from_row)? {
                        songs.push(row?.into_model()?);
                    }
                }
                None => {
                    let sql = format!("SELECT {SONG_COLUMNS} FROM songs ORDER BY title, id");
                    let mut stmt = conn.prepare(&sql)?;
                    for row in stmt.query_map([], SongRow::from_row)? {
                        songs.push(row?.into_model()?);
                    }
                }
            }
            Ok(songs)
        })
    }

    pub fn create(&self, input: &NewSong) -> StoreResult<Song> {
        input.validate()?;
        let song = Song {
            id: SongId::new(),
            title: input.title.clone(),
            artist: input.artist.clone(),
            file_url: input.file_url.clone(),
            duration_seconds: input.duration_seconds,
            created_at: Timestamp::now(),
        };

        self.db.write(|tx| {
            tx.execute(
                "INSERT INTO songs (id, title, artist, file_url, duration_seconds, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    song.id.to_string(),
                    song.title,
                    song.artist,
                    song.file_url,
                    song.duration_seconds,
                    song.created_at.as_millis(),
                ],
            )?;
            Ok(())
        })?;

        info!(song = %song.id, title = %song.title, "added song to catalog");
        Ok(song)
    }
}
