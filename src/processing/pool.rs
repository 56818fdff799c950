use std::sync::Arc;

use futures::future;

use crate::domain::document::Corpus;
use crate::domain::similarity::MatchResult;
use crate::errors::{SimilarityError, SimilarityResult};
use crate::models::config::MatcherSettings;
use crate::processing::matcher::match_documents;
use crate::processing::partition::Shard;

/// Match every pair of one shard sequentially, keeping accepted results.
pub(crate) fn process_shard(
    corpus: &Corpus,
    shard: &Shard,
    settings: &MatcherSettings,
) -> SimilarityResult<Vec<MatchResult>> {
    let mut matches = Vec::new();
    for pair in &shard.pairs {
        let (Some(first), Some(second)) = (corpus.get(pair.first), corpus.get(pair.second)) else {
            return Err(SimilarityError::Worker(format!(
                "shard {} references pair ({}, {}) outside a corpus of {} documents",
                shard.index,
                pair.first,
                pair.second,
                corpus.len()
            )));
        };
        if let Some(result) = match_documents(first, pair.first, second, pair.second, settings)? {
            matches.push(result);
        }
    }

    log::debug!(
        "Shard {} finished: pairs={}, matched={}",
        shard.index,
        shard.pairs.len(),
        matches.len()
    );
    Ok(matches)
}

/// Run one blocking task per shard and wait for all of them.
///
/// Results come back in shard order. If any task fails, the first failure
/// in shard order is returned and no results are kept.
pub async fn run_shards(
    corpus: Arc<Corpus>,
    shards: Vec<Shard>,
    settings: &MatcherSettings,
) -> SimilarityResult<Vec<Vec<MatchResult>>> {
    let tasks = shards.into_iter().map(|shard| {
        let corpus = Arc::clone(&corpus);
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || process_shard(&corpus, &shard, &settings))
    });

    let joined = future::join_all(tasks).await;

    let mut results = Vec::with_capacity(joined.len());
    for (index, outcome) in joined.into_iter().enumerate() {
        match outcome {
            Ok(Ok(matches)) => results.push(matches),
            Ok(Err(error)) => return Err(error),
            Err(error) => {
                return Err(SimilarityError::Worker(format!("shard {index}: {error}")));
            }
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{process_shard, run_shards};
    use crate::domain::document::{Corpus, Document};
    use crate::domain::similarity::PairCandidate;
    use crate::errors::SimilarityError;
    use crate::models::config::MatcherSettings;
    use crate::processing::pairs::enumerate_pairs;
    use crate::processing::partition::{Shard, partition};

    fn corpus() -> Arc<Corpus> {
        Arc::new(
            Corpus::new(vec![
                Document::new("a", vec![vec![1.0, 0.0]]),
                Document::new("b", vec![vec![1.0, 0.0]]),
                Document::new("c", vec![vec![0.0, 1.0]]),
                Document::new("d", vec![vec![0.0, 2.0]]),
            ])
            .expect("valid corpus"),
        )
    }

    #[tokio::test]
    async fn results_come_back_in_shard_order() {
        let shards = partition(enumerate_pairs(4), 3).expect("valid worker count");

        let results = run_shards(corpus(), shards, &MatcherSettings::default())
            .await
            .expect("pool should succeed");

        let keys: Vec<Vec<(usize, usize)>> = results
            .iter()
            .map(|shard| shard.iter().map(|m| (m.key, m.val)).collect())
            .collect();
        assert_eq!(keys, vec![vec![(0, 1)], vec![], vec![(2, 3)]]);
    }

    #[tokio::test]
    async fn empty_shards_are_a_no_op() {
        let shards = partition(Vec::new(), 4).expect("valid worker count");

        let results = run_shards(corpus(), shards, &MatcherSettings::default())
            .await
            .expect("pool should succeed");

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(Vec::is_empty));
    }

    #[tokio::test]
    async fn failing_shard_fails_the_batch() {
        let shards = vec![
            Shard {
                index: 0,
                pairs: vec![PairCandidate { first: 0, second: 1 }],
            },
            Shard {
                index: 1,
                pairs: vec![PairCandidate { first: 2, second: 9 }],
            },
        ];

        let result = run_shards(corpus(), shards, &MatcherSettings::default()).await;

        assert!(matches!(result, Err(SimilarityError::Worker(_))));
    }

    #[test]
    fn process_shard_skips_rejected_pairs() {
        let corpus = corpus();
        let shard = Shard {
            index: 0,
            pairs: vec![
                PairCandidate { first: 0, second: 2 },
                PairCandidate { first: 2, second: 3 },
            ],
        };

        let matches =
            process_shard(&corpus, &shard, &MatcherSettings::default()).expect("shard succeeds");

        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].key, matches[0].val), (2, 3));
    }
}
