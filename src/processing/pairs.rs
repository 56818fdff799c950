use std::collections::HashSet;

use crate::domain::similarity::{PairCandidate, TopicGroup};
use crate::errors::{SimilarityError, SimilarityResult};

/// Topic id the topic modeler assigns to outlier documents.
pub const NOISE_TOPIC: i64 = -1;

/// Every `(i, j)` with `0 <= i < j < document_count`, in row-major order.
pub fn enumerate_pairs(document_count: usize) -> Vec<PairCandidate> {
    let total = document_count * document_count.saturating_sub(1) / 2;
    let mut pairs = Vec::with_capacity(total);
    for first in 0..document_count {
        for second in first + 1..document_count {
            pairs.push(PairCandidate { first, second });
        }
    }
    pairs
}

/// Upper-triangle pairs within each topic group, skipping the noise topic.
///
/// Groups are visited in ascending topic order and members are compared in
/// ascending index order. A document listed in two groups, or an index
/// outside `0..document_count`, is rejected.
pub fn enumerate_topic_pairs(
    groups: &[TopicGroup],
    document_count: usize,
) -> SimilarityResult<Vec<PairCandidate>> {
    let mut ordered: Vec<&TopicGroup> = groups.iter().filter(|g| g.topic != NOISE_TOPIC).collect();
    ordered.sort_by_key(|group| group.topic);

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for group in ordered {
        let mut members = group.members.clone();
        members.sort_unstable();
        for &index in &members {
            if index >= document_count {
                return Err(SimilarityError::InvalidTopicMember {
                    topic: group.topic,
                    index,
                });
            }
            if !seen.insert(index) {
                return Err(SimilarityError::OverlappingTopics { index });
            }
        }

        for (offset, &first) in members.iter().enumerate() {
            for &second in &members[offset + 1..] {
                pairs.push(PairCandidate { first, second });
            }
        }
    }
    Ok(pairs)
}
