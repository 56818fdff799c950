use std::collections::HashSet;

use serde::Deserialize;

use crate::errors::{SimilarityError, SimilarityResult};

/// A news article reduced to its paragraph embeddings.
#[derive(Clone, Debug, Deserialize)]
pub struct Document {
    pub id: String,
    pub embeddings: Vec<Vec<f32>>,
}

impl Document {
    pub fn new(id: impl Into<String>, embeddings: Vec<Vec<f32>>) -> Self {
        Self {
            id: id.into(),
            embeddings,
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

/// Validated, read-only batch of documents shared by every worker.
///
/// All paragraph vectors in a corpus have the same dimensionality and only
/// finite components. Document ids are unique.
#[derive(Debug)]
pub struct Corpus {
    documents: Vec<Document>,
    dimension: Option<usize>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> SimilarityResult<Self> {
        let mut seen = HashSet::with_capacity(documents.len());
        let mut dimension: Option<usize> = None;

        for document in &documents {
            if !seen.insert(document.id.as_str()) {
                return Err(SimilarityError::DuplicateDocumentId(document.id.clone()));
            }

            for (paragraph, vector) in document.embeddings.iter().enumerate() {
                if vector.is_empty() {
                    return Err(shape_error(
                        document,
                        format!("paragraph {paragraph} has a zero-length embedding"),
                    ));
                }
                if vector.iter().any(|value| !value.is_finite()) {
                    return Err(shape_error(
                        document,
                        format!("paragraph {paragraph} has a non-finite component"),
                    ));
                }
                match dimension {
                    None => dimension = Some(vector.len()),
                    Some(expected) if expected != vector.len() => {
                        return Err(shape_error(
                            document,
                            format!(
                                "paragraph {paragraph} has dimension {}, expected {expected}",
                                vector.len()
                            ),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(Self {
            documents,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Embedding dimensionality, `None` when no document has paragraphs.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn empty_documents(&self) -> usize {
        self.documents.iter().filter(|d| d.is_empty()).count()
    }
}

fn shape_error(document: &Document, reason: String) -> SimilarityError {
    SimilarityError::Shape {
        document: document.id.clone(),
        reason,
    }
}
