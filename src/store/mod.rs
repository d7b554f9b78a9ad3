use std::path::Path;

use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Playlist, Sound};

const SOUND_PREFIX: &str = "sound/";
const PLAYLIST_PREFIX: &str = "playlist/";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rocksdb failure: {0}")]
    RocksDB(#[from] rocksdb::Error),
    #[error("could not (de)serialize stored value: {0}")]
    Codec(#[from] bincode::Error),
}

/// Durable catalog of sounds and playlists, one bincode encoded value per key.
pub struct RocksDBCatalogStore {
    rocks_db: DB,
}

impl RocksDBCatalogStore {
    pub fn new<P: AsRef<Path>>(database_path: P) -> Result<Self, StoreError> {
        let mut options = Options::default();
        options.create_if_missing(true);
        options.optimize_for_point_lookup(5000);

        let rocks_db = DB::open(&options, database_path)?;
        Ok(Self { rocks_db })
    }

    pub fn find_sound(&self, sound_id: &str) -> Result<Option<Sound>, StoreError> {
        self.find(SOUND_PREFIX, sound_id)
    }

    pub fn all_sounds(&self) -> Result<Vec<Sound>, StoreError> {
        self.scan(SOUND_PREFIX)
    }

    pub fn count_sounds(&self) -> Result<usize, StoreError> {
        let mut qty_sounds = 0;
        for entry in self.prefix_entries(SOUND_PREFIX) {
            entry?;
            qty_sounds += 1;
        }
        Ok(qty_sounds)
    }

    /// Writes all sounds in a single atomic batch.
    pub fn insert_sounds(&self, sounds: &[Sound]) -> Result<(), StoreError> {
        self.insert_all(
            SOUND_PREFIX,
            sounds.iter().map(|sound| (sound.id.as_str(), sound)),
        )
    }

    pub fn find_playlist(&self, playlist_id: &str) -> Result<Option<Playlist>, StoreError> {
        self.find(PLAYLIST_PREFIX, playlist_id)
    }

    pub fn all_playlists(&self) -> Result<Vec<Playlist>, StoreError> {
        self.scan(PLAYLIST_PREFIX)
    }

    /// Writes all playlists in a single atomic batch.
    pub fn insert_playlists(&self, playlists: &[Playlist]) -> Result<(), StoreError> {
        self.insert_all(
            PLAYLIST_PREFIX,
            playlists
                .iter()
                .map(|playlist| (playlist.id.as_str(), playlist)),
        )
    }

    fn find<T: DeserializeOwned>(&self, prefix: &str, id: &str) -> Result<Option<T>, StoreError> {
        match self.rocks_db.get(storage_key(prefix, id))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StoreError> {
        self.prefix_entries(prefix)
            .map(|entry| -> Result<T, StoreError> {
                let (_key, bytes) = entry?;
                Ok(bincode::deserialize(&bytes)?)
            })
            .collect()
    }

    fn insert_all<'a, T, I>(&self, prefix: &str, values: I) -> Result<(), StoreError>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = (&'a str, &'a T)>,
    {
        let mut batch = WriteBatch::default();
        for (id, value) in values {
            batch.put(storage_key(prefix, id), bincode::serialize(value)?);
        }
        self.rocks_db.write(batch)?;
        Ok(())
    }

    fn prefix_entries<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = Result<(Box<[u8]>, Box<[u8]>), rocksdb::Error>> + 'a {
        self.rocks_db
            .iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward))
            .take_while(move |entry| match entry {
                Ok((key, _)) => key.starts_with(prefix.as_bytes()),
                Err(_) => true,
            })
    }
}

fn storage_key(prefix: &str, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + id.len());
    key.extend_from_slice(prefix.as_bytes());
    key.extend_from_slice(id.as_bytes());
    key
}
