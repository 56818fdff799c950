//! Error types raised by the similarity engine and its collaborators.

use thiserror::Error;

/// Failures reported by upstream/downstream collaborators.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("batch not found: {0}")]
    NotFound(String),
    #[error("repository error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Every way a similarity batch can fail.
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("similarity threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("content similarity ratio must be within (0, 1], got {0}")]
    InvalidRatio(f64),
    #[error("worker count must be between 1 and 16, got {0}")]
    InvalidWorkerCount(usize),
    #[error("document {document}: {reason}")]
    Shape { document: String, reason: String },
    #[error("duplicate document id: {0}")]
    DuplicateDocumentId(String),
    #[error("topic {topic} references document index {index} outside the corpus")]
    InvalidTopicMember { topic: i64, index: usize },
    #[error("document index {index} is listed in more than one topic")]
    OverlappingTopics { index: usize },
    #[error("duplicate match {key} -> {val} during aggregation")]
    DuplicateMatch { key: String, val: String },
    #[error("worker task failed: {0}")]
    Worker(String),
    #[error("similarity batch did not finish within {0} seconds")]
    Timeout(u64),
    #[error("failed to load settings: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type SimilarityResult<T> = Result<T, SimilarityError>;
