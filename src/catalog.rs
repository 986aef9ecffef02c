//! The song catalog.
//!
//! A fixed, ordered list of songs built once at startup and shared read-only
//! afterwards. Cloning a `SongCatalog` clones the `Arc`, never the records.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single selectable song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: i64,
    pub name: String,
    pub artist: String,
}

impl SongRecord {
    pub fn new(id: i64, name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            artist: artist.into(),
        }
    }
}

/// Built-in songs used when the configuration does not supply a catalog.
const BUILTIN_SONGS: &[(i64, &str, &str)] = &[
    (1, "Teenage Dirtbag", "Wheatus"),
    (2, "Smells Like Teen Spirit", "Nirvana"),
    (3, "Mr. Brightside", "The Killers"),
    (4, "Basket Case", "Green Day"),
    (5, "All Star", "Smash Mouth"),
    (6, "Semi-Charmed Life", "Third Eye Blind"),
    (7, "Everlong", "Foo Fighters"),
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Song id must be positive, got {0}")]
    NonPositiveId(i64),

    #[error("Duplicate song id: {0}")]
    DuplicateId(i64),

    #[error("Song {0} has an empty name")]
    EmptyName(i64),

    #[error("Song {0} has an empty artist")]
    EmptyArtist(i64),
}

/// Immutable, ordered collection of songs.
#[derive(Debug, Clone)]
pub struct SongCatalog {
    songs: Arc<[SongRecord]>,
}

impl SongCatalog {
    /// Build a catalog, validating ids and text fields.
    ///
    /// An empty list is accepted; the picker reports it as `EmptyCatalog`.
    pub fn new(songs: Vec<SongRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(songs.len());
        for song in &songs {
            if song.id <= 0 {
                return Err(CatalogError::NonPositiveId(song.id));
            }
            if !seen.insert(song.id) {
                return Err(CatalogError::DuplicateId(song.id));
            }
            if song.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(song.id));
            }
            if song.artist.trim().is_empty() {
                return Err(CatalogError::EmptyArtist(song.id));
            }
        }

        Ok(Self {
            songs: songs.into(),
        })
    }

    /// The seven built-in songs.
    pub fn builtin() -> Self {
        let songs: Vec<SongRecord> = BUILTIN_SONGS
            .iter()
            .map(|&(id, name, artist)| SongRecord::new(id, name, artist))
            .collect();
        Self {
            songs: songs.into(),
        }
    }

    /// Full ordered contents.
    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SongRecord> {
        self.songs.get(index)
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.songs.iter().any(|song| song.id == id)
    }
}
