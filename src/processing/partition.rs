use crate::MAX_WORKER_COUNT;
use crate::domain::similarity::PairCandidate;
use crate::errors::{SimilarityError, SimilarityResult};

/// Contiguous run of pair candidates handled by one worker.
#[derive(Clone, Debug, PartialEq)]
pub struct Shard {
    pub index: usize,
    pub pairs: Vec<PairCandidate>,
}

/// Split `pairs` into exactly `worker_count` contiguous shards.
///
/// Each shard receives `len / worker_count` pairs and the first
/// `len % worker_count` shards take one extra, so sizes differ by at most
/// one and concatenating the shards in order yields `pairs` again.
/// `worker_count` must lie in `1..=MAX_WORKER_COUNT`.
pub fn partition(pairs: Vec<PairCandidate>, worker_count: usize) -> SimilarityResult<Vec<Shard>> {
    if !(1..=MAX_WORKER_COUNT).contains(&worker_count) {
        return Err(SimilarityError::InvalidWorkerCount(worker_count));
    }

    let base = pairs.len() / worker_count;
    let remainder = pairs.len() % worker_count;

    let mut shards = Vec::with_capacity(worker_count);
    let mut rest = pairs.into_iter();
    for index in 0..worker_count {
        let size = base + usize::from(index < remainder);
        shards.push(Shard {
            index,
            pairs: rest.by_ref().take(size).collect(),
        });
    }
    Ok(shards)
}
