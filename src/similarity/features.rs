use sha2::{Digest, Sha256};

use crate::domain::{Credit, Sound};
use crate::io::FeatureToken;
use crate::similarity::FeatureSet;

/// Attributes of a sound the similarity engine derives features from.
///
/// Borrowed from an already validated [`Sound`]; the engine performs no
/// validation of its own.
#[derive(Debug, Clone, Copy)]
pub struct ItemRecord<'a> {
    pub id: &'a str,
    pub tempo: f64,
    pub categories: &'a [String],
    pub duration_in_seconds: f64,
    pub contributors: &'a [Credit],
}

impl<'a> From<&'a Sound> for ItemRecord<'a> {
    fn from(sound: &'a Sound) -> Self {
        ItemRecord {
            id: &sound.id,
            tempo: sound.bpm,
            categories: &sound.genres,
            duration_in_seconds: sound.duration_in_seconds,
            contributors: &sound.credits,
        }
    }
}

/// Derives the feature set of a sound.
///
/// Tempo and duration become their decimal text, every category is taken
/// verbatim and every contributor is represented by the digest of their name.
/// Roles do not contribute.
pub fn extract_features(record: &ItemRecord) -> FeatureSet {
    let mut features =
        FeatureSet::with_capacity(2 + record.categories.len() + record.contributors.len());

    features.insert(number_token(record.tempo));
    features.extend(record.categories.iter().cloned());
    features.insert(number_token(record.duration_in_seconds));
    features.extend(
        record
            .contributors
            .iter()
            .map(|contributor| contributor_token(&contributor.name)),
    );

    features
}

fn number_token(value: f64) -> FeatureToken {
    // `-0.0` and `0.0` are the same number and share a token
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Hex encoded SHA-256 of the JSON encoded name. Case and whitespace are kept
/// as is, so `"Miles"` and `"miles"` are different contributors.
pub fn contributor_token(name: &str) -> FeatureToken {
    let encoded_name = serde_json::Value::from(name).to_string();
    format!("{:x}", Sha256::digest(encoded_name.as_bytes()))
}
