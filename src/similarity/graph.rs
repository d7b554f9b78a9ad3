use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use crate::io::SoundId;
use crate::similarity::{FeatureIndex, FeatureSet};

/// In-memory mapping from sound id to its feature set.
///
/// Insert-only: the first feature set stored for an id is kept for the
/// lifetime of the graph. Feature sets are handed out as `Arc`s, so a reader
/// either sees a complete set or does not see the sound at all.
#[derive(Default)]
pub struct SimilarityGraph {
    inner: RwLock<GraphInner>,
}

#[derive(Default)]
struct GraphInner {
    sound_to_features: HashMap<SoundId, Arc<FeatureSet>>,
    insertion_order: Vec<SoundId>,
}

impl GraphInner {
    fn insert(&mut self, sound_id: SoundId, features: FeatureSet) -> bool {
        match self.sound_to_features.entry(sound_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                self.insertion_order.push(entry.key().clone());
                entry.insert(Arc::new(features));
                true
            }
        }
    }
}

impl SimilarityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `features` for `sound_id` unless the id is already present.
    /// Returns whether the graph changed.
    pub fn insert(&self, sound_id: SoundId, features: FeatureSet) -> bool {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(sound_id, features)
    }

    /// Inserts every item, returning how many ids were new.
    pub fn insert_many<T>(&self, items: T) -> usize
    where
        T: IntoIterator<Item = (SoundId, FeatureSet)>,
    {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        items
            .into_iter()
            .map(|(sound_id, features)| inner.insert(sound_id, features))
            .filter(|inserted| *inserted)
            .count()
    }

    pub fn get(&self, sound_id: &str) -> Option<Arc<FeatureSet>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sound_to_features
            .get(sound_id)
            .cloned()
    }

    /// Point-in-time copy of all entries, in insertion order.
    pub fn entries(&self) -> Vec<(SoundId, Arc<FeatureSet>)> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .insertion_order
            .iter()
            .map(|sound_id| {
                (
                    sound_id.clone(),
                    Arc::clone(&inner.sound_to_features[sound_id]),
                )
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .insertion_order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FeatureIndex for SimilarityGraph {
    fn entries(&self) -> Vec<(SoundId, Arc<FeatureSet>)> {
        SimilarityGraph::entries(self)
    }
}
