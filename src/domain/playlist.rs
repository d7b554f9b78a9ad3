use serde::{Deserialize, Serialize};

use crate::io::{PlaylistId, SoundId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    pub sounds: Vec<SoundId>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PlaylistCreation {
    pub title: String,
    pub sounds: Vec<SoundId>,
}

impl PlaylistCreation {
    pub fn into_playlist(self, id: PlaylistId) -> Playlist {
        Playlist {
            id,
            title: self.title,
            sounds: self.sounds,
        }
    }
}
