//! Helpers for integration tests.

use std::sync::Arc;

use news_similarity::domain::document::{Corpus, Document};

pub const STORIES: usize = 5;

/// Embedding axes reserved for each story.
const STORY_AXES: usize = 6;
const DIMENSION: usize = STORIES * STORY_AXES;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Story that document number `doc` retells.
pub fn story_of(doc: usize) -> usize {
    doc % STORIES
}

/// Builds `count` documents named `article-NNN`, each retelling one of
/// [`STORIES`] stories with 1 to 4 paragraphs.
///
/// Every story lives on its own block of axes, so documents from different
/// stories are orthogonal, while same-story paragraphs differ only by a
/// small document-specific perturbation.
pub fn news_corpus(count: usize) -> Arc<Corpus> {
    let documents = (0..count)
        .map(|doc| {
            let story = story_of(doc);
            let paragraphs = 1 + doc % 4;
            let embeddings = (0..paragraphs)
                .map(|paragraph| story_paragraph(doc, story, paragraph))
                .collect();
            Document::new(format!("article-{doc:03}"), embeddings)
        })
        .collect();

    Arc::new(Corpus::new(documents).expect("fixture corpus is valid"))
}

fn story_paragraph(doc: usize, story: usize, paragraph: usize) -> Vec<f32> {
    let mut vector = vec![0.0; DIMENSION];
    for k in 0..STORY_AXES {
        let phase = (paragraph * 3 + k) as f32 * 0.9 + story as f32;
        let noise = 0.1 * ((doc * 13 + paragraph * 5 + k) as f32).cos();
        vector[story * STORY_AXES + k] = phase.sin() + noise;
    }
    vector
}
