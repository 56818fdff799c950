//! Fan-out/fan-in similarity pipeline over a validated corpus.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::document::Corpus;
use crate::domain::similarity::{
    MatchResult, PairCandidate, SimilarityMap, SimilarityRecord, TopicGroup, TopicSimilarity,
};
use crate::errors::{SimilarityError, SimilarityResult};
use crate::models::config::MatcherSettings;
use crate::processing::aggregate::aggregate;
use crate::processing::pairs::{NOISE_TOPIC, enumerate_pairs, enumerate_topic_pairs};
use crate::processing::partition::partition;
use crate::processing::pool::run_shards;

async fn run_pairs(
    corpus: &Arc<Corpus>,
    pairs: Vec<PairCandidate>,
    settings: &MatcherSettings,
) -> SimilarityResult<Vec<Vec<MatchResult>>> {
    settings.validate()?;

    log::info!(
        "Running similarity: documents={}, pairs={}, workers={}",
        corpus.len(),
        pairs.len(),
        settings.worker_count
    );

    let shards = partition(pairs, settings.worker_count)?;
    let pool = run_shards(Arc::clone(corpus), shards, settings);

    match settings.timeout_secs {
        Some(seconds) => tokio::time::timeout(Duration::from_secs(seconds), pool)
            .await
            .map_err(|_| SimilarityError::Timeout(seconds))?,
        None => pool.await,
    }
}

/// Compare every pair of documents in `corpus` and merge accepted matches.
pub async fn compute_similarity(
    corpus: &Arc<Corpus>,
    settings: &MatcherSettings,
) -> SimilarityResult<SimilarityMap> {
    let results = run_pairs(corpus, enumerate_pairs(corpus.len()), settings).await?;
    aggregate(corpus, &results)
}

/// Compare documents only within their topic cluster.
///
/// Returns one entry per non-noise topic, ordered by topic id, with matches
/// ordered by corpus position of the key and then the value document.
pub async fn compute_topic_similarity(
    corpus: &Arc<Corpus>,
    groups: &[TopicGroup],
    settings: &MatcherSettings,
) -> SimilarityResult<Vec<TopicSimilarity>> {
    let pairs = enumerate_topic_pairs(groups, corpus.len())?;
    let results = run_pairs(corpus, pairs, settings).await?;

    // Surfaces duplicate pairs the same way the flat pipeline does.
    aggregate(corpus, &results)?;

    let mut topic_of: HashMap<usize, i64> = HashMap::new();
    let mut by_topic: BTreeMap<i64, Vec<MatchResult>> = BTreeMap::new();
    for group in groups.iter().filter(|group| group.topic != NOISE_TOPIC) {
        by_topic.insert(group.topic, Vec::new());
        for &index in &group.members {
            topic_of.insert(index, group.topic);
        }
    }

    for result in results.into_iter().flatten() {
        if let Some(matches) = topic_of
            .get(&result.key)
            .and_then(|topic| by_topic.get_mut(topic))
        {
            matches.push(result);
        }
    }

    let documents = corpus.documents();
    Ok(by_topic
        .into_iter()
        .map(|(topic, mut matches)| {
            matches.sort_by_key(|m| (m.key, m.val));
            TopicSimilarity {
                topic,
                matches: matches
                    .into_iter()
                    .map(|m| SimilarityRecord {
                        key_id: documents[m.key].id.clone(),
                        val_id: documents[m.val].id.clone(),
                        score: m.score,
                    })
                    .collect(),
            }
        })
        .collect())
}
