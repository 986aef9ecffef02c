//! Random song selection.
//!
//! A pick walks `Idle -> Checking -> Picked`, or ends in `Failed` when the
//! catalog is empty or the backing store does not answer. Picks are
//! independent of each other; repeats are expected.

use std::sync::Arc;

use rand::Rng;
use tracing::instrument;

use crate::catalog::{SongCatalog, SongRecord};
use crate::store::{BackingStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum PickError {
    #[error("Backing store unavailable: {0}")]
    BackingStoreUnavailable(#[from] StoreError),

    #[error("Song catalog is empty")]
    EmptyCatalog,
}

/// Answers one pick per request from a shared catalog and store.
#[derive(Clone)]
pub struct SongPicker {
    catalog: SongCatalog,
    store: Arc<dyn BackingStore>,
}

impl SongPicker {
    pub fn new(catalog: SongCatalog, store: Arc<dyn BackingStore>) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &SongCatalog {
        &self.catalog
    }

    /// Probe the backing store without picking.
    pub async fn check_liveness(&self) -> Result<(), PickError> {
        self.store.ping().await.map_err(PickError::from)
    }

    /// Probe the store, then return one song chosen uniformly at random.
    #[instrument(name = "picker::pick_random_song", skip(self), fields(catalog_size = self.catalog.len()))]
    pub async fn pick_random_song(&self) -> Result<SongRecord, PickError> {
        if self.catalog.is_empty() {
            tracing::error!("Pick requested with an empty catalog");
            return Err(PickError::EmptyCatalog);
        }

        self.check_liveness().await?;

        let song = self.select(&mut rand::rng())?;
        tracing::info!(song_id = song.id, "Picked song");
        Ok(song)
    }

    /// Choose a song with the given RNG. Does not touch the backing store.
    pub fn select<R: Rng>(&self, rng: &mut R) -> Result<SongRecord, PickError> {
        if self.catalog.is_empty() {
            return Err(PickError::EmptyCatalog);
        }

        let index = rng.random_range(0..self.catalog.len());
        self.catalog
            .get(index)
            .cloned()
            .ok_or(PickError::EmptyCatalog)
    }
}
