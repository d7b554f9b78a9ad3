use uuid::Uuid;

pub mod playlist;
pub mod sound;

pub use playlist::{Playlist, PlaylistCreation};
pub use sound::{Credit, Sound, SoundCreation};

/// Fresh identifier for a newly created sound or playlist.
pub fn new_id() -> String {
    Uuid::new_v4().to_simple().to_string()
}
