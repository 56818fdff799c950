//! Interfaces to the pipeline stages around the similarity engine.
//!
//! The embedding stage supplies documents and the persistence stage stores
//! the aggregate map; both are implemented by the calling application.

use crate::domain::document::Document;
use crate::domain::similarity::SimilarityMap;
use crate::errors::RepositoryResult;

pub trait CorpusReader {
    fn load_corpus(&self, batch: &str) -> RepositoryResult<Vec<Document>>;
}

pub trait SimilarityWriter {
    fn write_similarities(&self, batch: &str, map: &SimilarityMap) -> RepositoryResult<usize>;
}
