use std::sync::Arc;

use crate::domain::document::Corpus;
use crate::errors::SimilarityResult;
use crate::models::config::MatcherSettings;
use crate::processing::similarity::compute_similarity;
use crate::repository::{CorpusReader, SimilarityWriter};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub documents: usize,
    pub empty_documents: usize,
    pub pairs: usize,
    pub shards: usize,
    pub matched: usize,
}

/// Load a batch, compute its similarity map and hand it to the writer.
pub async fn run_similarity_batch<R>(
    batch: &str,
    settings: &MatcherSettings,
    repo: &R,
) -> SimilarityResult<BatchStats>
where
    R: CorpusReader + SimilarityWriter,
{
    settings.validate()?;

    let corpus = Arc::new(Corpus::new(repo.load_corpus(batch)?)?);
    let documents = corpus.len();
    let stats = BatchStats {
        documents,
        empty_documents: corpus.empty_documents(),
        pairs: documents * documents.saturating_sub(1) / 2,
        shards: settings.worker_count,
        matched: 0,
    };

    if stats.empty_documents > 0 {
        log::warn!(
            "Batch {batch} has {} documents without paragraphs; they will not match",
            stats.empty_documents
        );
    }

    let similarities = compute_similarity(&corpus, settings).await?;
    repo.write_similarities(batch, &similarities)?;

    Ok(BatchStats {
        matched: similarities.len(),
        ..stats
    })
}

/// Handle a similarity request for `batch`, logging the outcome.
pub async fn process_similarity_message<R>(
    batch: &str,
    settings: &MatcherSettings,
    repo: R,
) -> SimilarityResult<BatchStats>
where
    R: CorpusReader + SimilarityWriter,
{
    log::info!("Received similarity batch: {batch}");

    let outcome = run_similarity_batch(batch, settings, &repo).await;
    match &outcome {
        Ok(stats) => log::info!(
            "Finished similarity batch {batch}: documents={}, empty_documents={}, pairs={}, shards={}, matched={}",
            stats.documents,
            stats.empty_documents,
            stats.pairs,
            stats.shards,
            stats.matched
        ),
        Err(error) => log::error!("Similarity batch {batch} failed: {error}"),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::{BatchStats, process_similarity_message, run_similarity_batch};
    use crate::domain::document::Document;
    use crate::domain::similarity::SimilarityMap;
    use crate::errors::{RepositoryError, RepositoryResult, SimilarityError};
    use crate::models::config::MatcherSettings;
    use crate::repository::{CorpusReader, SimilarityWriter};

    #[derive(Default)]
    struct FakeRepo {
        documents: Vec<Document>,
        fail_write: bool,
        written: Mutex<Vec<(String, SimilarityMap)>>,
    }

    impl CorpusReader for FakeRepo {
        fn load_corpus(&self, batch: &str) -> RepositoryResult<Vec<Document>> {
            if batch == "missing" {
                return Err(RepositoryError::NotFound(batch.to_string()));
            }
            Ok(self.documents.clone())
        }
    }

    impl SimilarityWriter for FakeRepo {
        fn write_similarities(
            &self,
            batch: &str,
            similarities: &SimilarityMap,
        ) -> RepositoryResult<usize> {
            if self.fail_write {
                return Err(RepositoryError::Unexpected("disk full".to_string()));
            }
            self.written
                .lock()
                .expect("written mutex poisoned")
                .push((batch.to_string(), similarities.clone()));
            Ok(similarities.len())
        }
    }

    fn documents() -> Vec<Document> {
        vec![
            Document::new("a", vec![vec![1.0, 0.0]]),
            Document::new("b", vec![vec![1.0, 0.0], vec![0.0, 1.0]]),
            Document::new("c", vec![]),
        ]
    }

    #[tokio::test]
    async fn batch_writes_map_and_reports_stats() {
        let repo = FakeRepo {
            documents: documents(),
            ..FakeRepo::default()
        };

        let stats = run_similarity_batch("2020-01-01", &MatcherSettings::default(), &repo)
            .await
            .expect("batch succeeds");

        assert_eq!(
            stats,
            BatchStats {
                documents: 3,
                empty_documents: 1,
                pairs: 3,
                shards: 4,
                matched: 1,
            }
        );
        let written = repo.written.lock().expect("written mutex poisoned");
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, "2020-01-01");
        assert_eq!(written[0].1.get("a", "b"), Some(1.0));
    }

    #[tokio::test]
    async fn missing_batch_is_a_repository_error() {
        let repo = FakeRepo::default();

        let settings = MatcherSettings::default();

        let result = process_similarity_message("missing", &settings, repo).await;

        assert!(matches!(
            result,
            Err(SimilarityError::Repository(RepositoryError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn write_failure_fails_the_batch() {
        let repo = FakeRepo {
            documents: documents(),
            fail_write: true,
            ..FakeRepo::default()
        };

        let settings = MatcherSettings::default();

        let result = process_similarity_message("2020-01-01", &settings, repo).await;

        assert!(matches!(result, Err(SimilarityError::Repository(_))));
    }

    #[tokio::test]
    async fn invalid_corpus_is_rejected_before_matching() {
        let repo = FakeRepo {
            documents: vec![
                Document::new("a", vec![vec![1.0, 0.0]]),
                Document::new("a", vec![vec![1.0, 0.0]]),
            ],
            ..FakeRepo::default()
        };

        let settings = MatcherSettings::default();

        let result = run_similarity_batch("2020-01-01", &settings, &repo).await;

        assert!(matches!(
            result,
            Err(SimilarityError::DuplicateDocumentId(_))
        ));
        let written = repo.written.lock().expect("written mutex poisoned");
        assert!(written.is_empty());
    }
}
