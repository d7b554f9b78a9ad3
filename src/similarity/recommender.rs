use std::sync::Arc;

use rayon::prelude::*;

use crate::io::SoundId;
use crate::similarity::features::{extract_features, ItemRecord};
use crate::similarity::graph::SimilarityGraph;
use crate::similarity::jaccard::jaccard;
use crate::similarity::{rank, SoundScore, NUM_SOUNDS_TO_RECOMMEND};

/// Builds the similarity graph from incoming sounds and answers
/// recommendation requests against it.
///
/// The graph is injected so that every caller shares one explicit instance.
pub struct Recommender {
    graph: Arc<SimilarityGraph>,
}

impl Recommender {
    pub fn new(graph: Arc<SimilarityGraph>) -> Self {
        Recommender { graph }
    }

    pub fn graph(&self) -> &SimilarityGraph {
        &self.graph
    }

    /// Adds the features of every sound to the graph. Sounds that are already
    /// part of the graph keep their original features.
    pub fn ingest(&self, items: &[ItemRecord]) {
        tracing::debug!("Adding {} sounds to the recommendation graph", items.len());
        let featurized: Vec<(SoundId, _)> = items
            .par_iter()
            .map(|item| (item.id.to_string(), extract_features(item)))
            .collect();
        let qty_inserted = self.graph.insert_many(featurized);
        tracing::debug!(
            qty_inserted,
            qty_sounds = self.graph.len(),
            "Recommendation graph updated"
        );
    }

    /// Top sounds similar to the given query sounds; query sounds are never
    /// recommended themselves.
    pub fn recommend(&self, query_sounds: &[SoundId]) -> Vec<SoundScore> {
        rank(self.graph.as_ref(), query_sounds, NUM_SOUNDS_TO_RECOMMEND)
    }

    /// Similarity of two indexed sounds, `0.0` when either one is unknown.
    pub fn compare(&self, sound_a: &str, sound_b: &str) -> f64 {
        let features_a = self.graph.get(sound_a);
        let features_b = self.graph.get(sound_b);
        jaccard(features_a.as_deref(), features_b.as_deref())
    }
}
