use crate::domain::document::Corpus;
use crate::domain::similarity::{MatchResult, SimilarityMap};
use crate::errors::{SimilarityError, SimilarityResult};

fn document_id(corpus: &Corpus, index: usize) -> SimilarityResult<&str> {
    match corpus.get(index) {
        Some(document) => Ok(document.id.as_str()),
        None => {
            let message = format!("match references unknown document {index}");
            Err(SimilarityError::Worker(message))
        }
    }
}

/// Merge per-shard results, in shard order, into one map keyed by document id.
///
/// A pair seen twice means the enumeration or partitioning broke coverage and
/// aborts the batch with [`SimilarityError::DuplicateMatch`].
pub fn aggregate(
    corpus: &Corpus,
    results: &[Vec<MatchResult>],
) -> SimilarityResult<SimilarityMap> {
    let mut map = SimilarityMap::default();
    for result in results.iter().flatten() {
        let key_id = document_id(corpus, result.key)?;
        let val_id = document_id(corpus, result.val)?;
        if !map.insert(key_id, val_id, result.score) {
            return Err(SimilarityError::DuplicateMatch {
                key: key_id.to_string(),
                val: val_id.to_string(),
            });
        }
    }
    Ok(map)
}
