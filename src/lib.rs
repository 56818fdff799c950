pub mod domain;
pub mod errors;
pub mod models;
pub mod processing;
pub mod repository;

/// Default cosine-similarity threshold for paragraph matching.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Default share of the shorter document's paragraphs that must match.
pub const CONTENT_SIMILARITY_RATIO: f64 = 0.3;

/// Default number of parallel workers per batch.
pub const WORKER_COUNT: usize = 4;

/// Upper bound for worker counts derived from the topic count.
pub const MAX_WORKER_COUNT: usize = 16;
