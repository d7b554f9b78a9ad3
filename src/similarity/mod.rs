use std::cmp::Ordering;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;
use serde::Serialize;

use crate::io::{FeatureToken, SoundId};
use crate::similarity::jaccard::jaccard;

pub mod features;
pub mod graph;
pub mod jaccard;
pub mod recommender;

/// Deduplicated feature tokens of a single sound.
pub type FeatureSet = HashSet<FeatureToken>;

/// Maximum length of a recommendation list.
pub const NUM_SOUNDS_TO_RECOMMEND: usize = 5;

/// Below this many (query, candidate) pairs scoring stays on the calling thread.
pub const MIN_PAIRS_FOR_PARALLEL_SCORING: usize = 4096;

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SoundScore {
    pub id: SoundId,
    pub score: f64,
}

impl SoundScore {
    pub fn new(id: SoundId, score: f64) -> Self {
        SoundScore { id, score }
    }
}

pub trait FeatureIndex {
    /// Snapshot of every indexed sound. The order of the returned entries is
    /// the candidate order used to break ties between equal scores.
    fn entries(&self) -> Vec<(SoundId, Arc<FeatureSet>)>;
}

/// Ranks the sounds of `index` against every sound in `query_sounds`.
///
/// Every (query sound, candidate) pair is scored separately and the pairs are
/// ranked as they are: a candidate similar to several query sounds shows up
/// once per query sound. Only strictly positive scores are kept. Equal scores
/// keep the order in which they were produced (query order, then candidate
/// order).
pub fn rank<I: FeatureIndex + Sync>(
    index: &I,
    query_sounds: &[SoundId],
    how_many: usize,
) -> Vec<SoundScore> {
    let snapshot = index.entries();
    let qty_candidates = snapshot.len().saturating_sub(query_sounds.len());
    let in_parallel = query_sounds.len() * qty_candidates >= MIN_PAIRS_FOR_PARALLEL_SCORING;
    rank_snapshot(&snapshot, query_sounds, how_many, in_parallel)
}

fn rank_snapshot(
    snapshot: &[(SoundId, Arc<FeatureSet>)],
    query_sounds: &[SoundId],
    how_many: usize,
    in_parallel: bool,
) -> Vec<SoundScore> {
    let query_ids: HashSet<&str> = query_sounds.iter().map(String::as_str).collect();
    let snapshot_features: HashMap<&str, &FeatureSet> = snapshot
        .iter()
        .map(|(sound_id, features)| (sound_id.as_str(), features.as_ref()))
        .collect();

    let candidates: Vec<(&SoundId, &FeatureSet)> = snapshot
        .iter()
        .filter(|(sound_id, _)| !query_ids.contains(sound_id.as_str()))
        .map(|(sound_id, features)| (sound_id, features.as_ref()))
        .collect();

    let mut recommendations: Vec<SoundScore> = query_sounds
        .iter()
        .flat_map(|query_sound| {
            tracing::debug!(
                "Comparing {} sounds to {}",
                candidates.len(),
                query_sound
            );
            let query_features = snapshot_features.get(query_sound.as_str()).copied();
            score_candidates(query_features, &candidates, in_parallel)
        })
        .filter(|scored| scored.score > 0.0)
        .collect();

    // `sort_by` is stable, equal scores keep their production order
    recommendations.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
    });
    recommendations.truncate(how_many);

    tracing::debug!(?recommendations, "Final recommendations for sounds");
    recommendations
}

/// Scores one query sound against all candidates, in candidate order.
fn score_candidates(
    query_features: Option<&FeatureSet>,
    candidates: &[(&SoundId, &FeatureSet)],
    in_parallel: bool,
) -> Vec<SoundScore> {
    let score = |(candidate_id, candidate_features): &(&SoundId, &FeatureSet)| {
        SoundScore::new(
            (*candidate_id).clone(),
            jaccard(query_features, Some(*candidate_features)),
        )
    };
    if in_parallel {
        candidates.par_iter().map(score).collect()
    } else {
        candidates.iter().map(score).collect()
    }
}

#[cfg(test)]
mod rank_test {
    use float_cmp::approx_eq;

    use crate::similarity::graph::SimilarityGraph;

    use super::*;

    fn feature_set(tokens: &[&str]) -> FeatureSet {
        tokens.iter().map(|token| token.to_string()).collect()
    }

    fn ids(recommendations: &[SoundScore]) -> Vec<&str> {
        recommendations
            .iter()
            .map(|scored| scored.id.as_str())
            .collect()
    }

    fn query(sound_ids: &[&str]) -> Vec<SoundId> {
        sound_ids.iter().map(|sound_id| sound_id.to_string()).collect()
    }

    #[test]
    fn should_rank_by_descending_score() {
        let graph = SimilarityGraph::new();
        graph.insert("q".to_string(), feature_set(&["a", "b", "c", "d"]));
        graph.insert("low".to_string(), feature_set(&["a", "x", "y", "z"]));
        graph.insert("high".to_string(), feature_set(&["a", "b", "c", "z"]));
        graph.insert("none".to_string(), feature_set(&["w"]));

        let recommendations = rank(&graph, &query(&["q"]), NUM_SOUNDS_TO_RECOMMEND);

        assert_eq!(vec!["high", "low"], ids(&recommendations));
        assert!(approx_eq!(f64, 0.6, recommendations[0].score, ulps = 2));
        assert!(approx_eq!(f64, 1.0 / 7.0, recommendations[1].score, ulps = 2));
    }

    #[test]
    fn should_not_merge_candidates_across_query_sounds() {
        let graph = SimilarityGraph::new();
        graph.insert("q1".to_string(), feature_set(&["a", "b"]));
        graph.insert("q2".to_string(), feature_set(&["a", "c"]));
        graph.insert("candidate".to_string(), feature_set(&["a", "b", "c"]));

        let recommendations = rank(&graph, &query(&["q1", "q2"]), NUM_SOUNDS_TO_RECOMMEND);

        assert_eq!(vec!["candidate", "candidate"], ids(&recommendations));
    }

    #[test]
    fn should_break_ties_by_production_order() {
        let graph = SimilarityGraph::new();
        graph.insert("q1".to_string(), feature_set(&["a"]));
        graph.insert("q2".to_string(), feature_set(&["b"]));
        graph.insert("c1".to_string(), feature_set(&["a", "b"]));
        graph.insert("c2".to_string(), feature_set(&["a", "b"]));

        let recommendations = rank(&graph, &query(&["q2", "q1"]), NUM_SOUNDS_TO_RECOMMEND);

        // all four pairs score 0.5: q2 pairs first, then q1 pairs, candidates in insertion order
        assert_eq!(vec!["c1", "c2", "c1", "c2"], ids(&recommendations));
    }

    #[test]
    fn should_cap_the_number_of_recommendations() {
        let graph = SimilarityGraph::new();
        graph.insert("q".to_string(), feature_set(&["shared", "q"]));
        for candidate in 0..20 {
            let own_token = format!("own-{}", candidate);
            graph.insert(
                format!("c{}", candidate),
                feature_set(&["shared", own_token.as_str()]),
            );
        }

        let recommendations = rank(&graph, &query(&["q"]), NUM_SOUNDS_TO_RECOMMEND);

        assert_eq!(NUM_SOUNDS_TO_RECOMMEND, recommendations.len());
        assert_eq!(vec!["c0", "c1", "c2", "c3", "c4"], ids(&recommendations));
    }

    #[test]
    fn should_return_nothing_for_empty_query() {
        let graph = SimilarityGraph::new();
        graph.insert("a".to_string(), feature_set(&["1"]));
        graph.insert("b".to_string(), feature_set(&["1"]));

        assert!(rank(&graph, &[], NUM_SOUNDS_TO_RECOMMEND).is_empty());
    }

    #[test]
    fn should_score_unknown_query_sounds_as_zero() {
        let graph = SimilarityGraph::new();
        graph.insert("a".to_string(), feature_set(&["1"]));

        assert!(rank(&graph, &query(&["unknown"]), NUM_SOUNDS_TO_RECOMMEND).is_empty());
    }

    #[test]
    fn should_score_large_graphs_in_parallel_with_same_result() {
        let graph = SimilarityGraph::new();
        let qty_sounds = 3 * MIN_PAIRS_FOR_PARALLEL_SCORING;
        for sound in 0..qty_sounds {
            let bucket = format!("bucket-{}", sound % 7);
            let own_token = format!("own-{}", sound);
            graph.insert(
                format!("s{}", sound),
                feature_set(&[bucket.as_str(), own_token.as_str()]),
            );
        }
        let query_sounds = query(&["s0", "s1", "s2"]);

        let first = rank(&graph, &query_sounds, NUM_SOUNDS_TO_RECOMMEND);
        let second = rank(&graph, &query_sounds, NUM_SOUNDS_TO_RECOMMEND);

        assert_eq!(first, second);
        // s7 shares the bucket of s0 and is the first such candidate
        assert_eq!("s7", first[0].id);
        assert!(approx_eq!(f64, 1.0 / 3.0, first[0].score, ulps = 2));
    }

    #[test]
    fn should_rank_identically_inline_and_in_parallel() {
        let graph = SimilarityGraph::new();
        for sound in 0..2 * MIN_PAIRS_FOR_PARALLEL_SCORING {
            let bucket = format!("bucket-{}", sound % 11);
            let shade = format!("shade-{}", sound % 5);
            let own_token = format!("own-{}", sound);
            graph.insert(
                format!("s{}", sound),
                feature_set(&[bucket.as_str(), shade.as_str(), own_token.as_str()]),
            );
        }
        let snapshot = graph.entries();

        for query_sounds in &[query(&["s0"]), query(&["s3", "s0", "s42", "unknown"])] {
            let inline = rank_snapshot(&snapshot, query_sounds, 50, false);
            let parallel = rank_snapshot(&snapshot, query_sounds, 50, true);
            assert_eq!(50, inline.len());
            assert_eq!(inline, parallel);
        }
        // a single query sound over a large graph already qualifies for parallel scoring
        assert_eq!(
            rank_snapshot(&snapshot, &query(&["s0"]), NUM_SOUNDS_TO_RECOMMEND, false),
            rank(&graph, &query(&["s0"]), NUM_SOUNDS_TO_RECOMMEND)
        );
    }
}
