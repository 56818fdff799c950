use std::collections::BTreeMap;

use serde::Serialize;

/// Ordered index pair `(i, j)` with `i < j` into the corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairCandidate {
    pub first: usize,
    pub second: usize,
}

/// Accepted near-duplicate pair, expressed in corpus indices.
///
/// `key` is the document with fewer paragraphs, or the smaller index when
/// both have the same paragraph count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    pub key: usize,
    pub val: usize,
    pub score: f32,
}

/// One line of the aggregate map, ready for line-delimited persistence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimilarityRecord {
    pub key_id: String,
    pub val_id: String,
    pub score: f32,
}

/// Aggregate `key_id -> (val_id -> score)` mapping for a batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimilarityMap {
    entries: BTreeMap<String, BTreeMap<String, f32>>,
    len: usize,
}

impl SimilarityMap {
    /// Inserts a match, returning `false` when the pair is already present.
    pub(crate) fn insert(&mut self, key_id: &str, val_id: &str, score: f32) -> bool {
        let values = self.entries.entry(key_id.to_string()).or_default();
        if values.contains_key(val_id) {
            return false;
        }
        values.insert(val_id.to_string(), score);
        self.len += 1;
        true
    }

    pub fn get(&self, key_id: &str, val_id: &str) -> Option<f32> {
        self.entries.get(key_id)?.get(val_id).copied()
    }

    pub fn values(&self, key_id: &str) -> Option<&BTreeMap<String, f32>> {
        self.entries.get(key_id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn records(&self) -> impl Iterator<Item = SimilarityRecord> + '_ {
        self.entries.iter().flat_map(|(key_id, values)| {
            values.iter().map(move |(val_id, score)| SimilarityRecord {
                key_id: key_id.clone(),
                val_id: val_id.clone(),
                score: *score,
            })
        })
    }

    pub fn into_inner(self) -> BTreeMap<String, BTreeMap<String, f32>> {
        self.entries
    }
}

/// Documents the topic modeler placed in the same cluster.
#[derive(Clone, Debug)]
pub struct TopicGroup {
    pub topic: i64,
    pub members: Vec<usize>,
}

/// Matches found inside one topic cluster.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopicSimilarity {
    pub topic: i64,
    pub matches: Vec<SimilarityRecord>,
}
