use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::{new_id, Playlist, PlaylistCreation, Sound, SoundCreation};
use crate::io;
use crate::similarity::features::ItemRecord;
use crate::similarity::recommender::Recommender;
use crate::store::{RocksDBCatalogStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("Invalid input")]
    InvalidInput { issues: Vec<String> },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    fn sound_not_found(id: &str) -> Self {
        CatalogError::NotFound {
            entity: "Sound",
            id: id.to_string(),
        }
    }

    fn playlist_not_found(id: &str) -> Self {
        CatalogError::NotFound {
            entity: "Playlist",
            id: id.to_string(),
        }
    }
}

/// Sounds and playlists as seen by the API: the durable store plus the
/// in-memory recommendation graph that mirrors its sounds.
pub struct Catalog {
    store: Arc<RocksDBCatalogStore>,
    recommender: Arc<Recommender>,
}

impl Catalog {
    pub fn new(store: Arc<RocksDBCatalogStore>, recommender: Arc<Recommender>) -> Self {
        Catalog { store, recommender }
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    /// Validates, persists and indexes new sounds. Nothing is stored when any
    /// of the sounds is invalid.
    pub fn create_sounds(&self, creations: Vec<SoundCreation>) -> Result<Vec<Sound>, CatalogError> {
        let issues: Vec<String> = creations
            .iter()
            .enumerate()
            .flat_map(|(position, creation)| creation.validate(&format!("data.{}", position)))
            .collect();
        if !issues.is_empty() {
            return Err(CatalogError::InvalidInput { issues });
        }

        let sounds: Vec<Sound> = creations
            .into_iter()
            .map(|creation| creation.into_sound(new_id()))
            .collect();
        self.store.insert_sounds(&sounds)?;

        let records: Vec<ItemRecord> = sounds.iter().map(ItemRecord::from).collect();
        self.recommender.ingest(&records);
        tracing::info!(qty_sounds = sounds.len(), "Created sounds");
        Ok(sounds)
    }

    pub fn find_sound(&self, sound_id: &str) -> Result<Sound, CatalogError> {
        self.store
            .find_sound(sound_id)?
            .ok_or_else(|| CatalogError::sound_not_found(sound_id))
    }

    pub fn all_sounds(&self) -> Result<Vec<Sound>, CatalogError> {
        Ok(self.store.all_sounds()?)
    }

    pub fn create_playlists(
        &self,
        creations: Vec<PlaylistCreation>,
    ) -> Result<Vec<Playlist>, CatalogError> {
        let playlists: Vec<Playlist> = creations
            .into_iter()
            .map(|creation| creation.into_playlist(new_id()))
            .collect();
        self.store.insert_playlists(&playlists)?;
        tracing::info!(qty_playlists = playlists.len(), "Created playlists");
        Ok(playlists)
    }

    pub fn find_playlist(&self, playlist_id: &str) -> Result<Playlist, CatalogError> {
        self.store
            .find_playlist(playlist_id)?
            .ok_or_else(|| CatalogError::playlist_not_found(playlist_id))
    }

    pub fn all_playlists(&self) -> Result<Vec<Playlist>, CatalogError> {
        Ok(self.store.all_playlists()?)
    }

    /// Ranked sounds similar to the sounds of a playlist, with their scores.
    pub fn recommendations_for_playlist(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<(f64, Sound)>, CatalogError> {
        let playlist = self.find_playlist(playlist_id)?;
        self.recommender
            .recommend(&playlist.sounds)
            .into_iter()
            .map(|scored| -> Result<(f64, Sound), CatalogError> {
                Ok((scored.score, self.find_sound(&scored.id)?))
            })
            .collect()
    }

    /// Loads the catalog at `seed_path` when no sounds are stored yet.
    /// Returns the number of sounds created.
    pub fn seed_if_empty<P: AsRef<Path>>(&self, seed_path: P) -> anyhow::Result<usize> {
        if self.store.count_sounds()? > 0 {
            return Ok(0);
        }
        tracing::info!(
            "Seeding sound catalog from {}",
            seed_path.as_ref().display()
        );
        let creations = io::read_catalog(seed_path)?;
        let sounds = self.create_sounds(creations)?;
        Ok(sounds.len())
    }

    /// Indexes every stored sound. Sounds already in the graph are left alone.
    pub fn warm_up(&self) -> Result<(), CatalogError> {
        let sounds = self.store.all_sounds()?;
        tracing::info!(
            qty_sounds = sounds.len(),
            "Building recommendation graph"
        );
        let records: Vec<ItemRecord> = sounds.iter().map(ItemRecord::from).collect();
        self.recommender.ingest(&records);
        Ok(())
    }
}
