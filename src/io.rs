use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::domain::SoundCreation;

pub type SoundId = String;
pub type PlaylistId = String;
pub type FeatureToken = String;

/// Reads a seed catalog: a JSON array of sounds without ids.
pub fn read_catalog<P>(catalog_path: P) -> anyhow::Result<Vec<SoundCreation>>
where
    P: AsRef<Path>,
{
    let reader = create_buffered_reader(&catalog_path)?;
    let sounds: Vec<SoundCreation> = serde_json::from_reader(reader)?;
    Ok(sounds)
}

fn create_buffered_reader<P>(filename: P) -> io::Result<BufReader<File>>
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(BufReader::new(file))
}
