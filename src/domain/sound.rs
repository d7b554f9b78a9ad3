use serde::{Deserialize, Serialize};

use crate::io::SoundId;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Credit {
    pub name: String,
    pub role: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Sound {
    pub id: SoundId,
    pub title: String,
    pub bpm: f64,
    pub genres: Vec<String>,
    pub duration_in_seconds: f64,
    pub credits: Vec<Credit>,
}

/// Payload accepted when creating sounds. Ids are always generated server side.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SoundCreation {
    pub title: String,
    pub bpm: f64,
    pub genres: Vec<String>,
    pub duration_in_seconds: f64,
    pub credits: Vec<Credit>,
}

impl SoundCreation {
    /// Returns every problem found, each prefixed with `path`. Empty means valid.
    pub fn validate(&self, path: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.bpm.is_finite() {
            issues.push(format!("{}.bpm: expected a finite number", path));
        }
        if !self.duration_in_seconds.is_finite() {
            issues.push(format!(
                "{}.duration_in_seconds: expected a finite number",
                path
            ));
        }
        if self.credits.is_empty() {
            issues.push(format!(
                "{}.credits: must contain at least 1 element(s)",
                path
            ));
        }
        issues
    }

    pub fn into_sound(self, id: SoundId) -> Sound {
        Sound {
            id,
            title: self.title,
            bpm: self.bpm,
            genres: self.genres,
            duration_in_seconds: self.duration_in_seconds,
            credits: self.credits,
        }
    }
}
