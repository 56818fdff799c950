//! Matcher configuration loaded from external sources.

use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::errors::{SimilarityError, SimilarityResult};
use crate::{CONTENT_SIMILARITY_RATIO, MAX_WORKER_COUNT, SIMILARITY_THRESHOLD, WORKER_COUNT};

/// Rule deciding whether enough paragraphs matched for two documents to be
/// considered the same story.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// `matched >= ratio * min_length`.
    #[default]
    Ratio,
    /// One-paragraph documents need their single paragraph matched, two or
    /// three paragraphs fall back to the ratio rule, anything else needs at
    /// least three matched paragraphs.
    Tiered,
    /// `total_score >= threshold * min_length`.
    ScoreMass,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
/// Parameters shared by every worker of a similarity batch.
pub struct MatcherSettings {
    pub similarity_threshold: f64,
    pub content_similarity_ratio: f64,
    pub worker_count: usize,
    pub policy: AcceptancePolicy,
    pub timeout_secs: Option<u64>,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
            content_similarity_ratio: CONTENT_SIMILARITY_RATIO,
            worker_count: WORKER_COUNT,
            policy: AcceptancePolicy::default(),
            timeout_secs: None,
        }
    }
}

impl MatcherSettings {
    /// Load settings from an optional YAML file overlaid with `SIMILARITY_*`
    /// environment variables. A `.env` file is honoured when present.
    pub fn load(path: Option<&Path>) -> SimilarityResult<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Yaml)
                    .required(true),
            );
        }
        builder = builder.add_source(Environment::with_prefix("SIMILARITY").try_parsing(true));

        let settings: MatcherSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject out-of-range values before any work is scheduled.
    pub fn validate(&self) -> SimilarityResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(SimilarityError::InvalidThreshold(self.similarity_threshold));
        }
        if !(self.content_similarity_ratio > 0.0 && self.content_similarity_ratio <= 1.0) {
            return Err(SimilarityError::InvalidRatio(self.content_similarity_ratio));
        }
        if !(1..=MAX_WORKER_COUNT).contains(&self.worker_count) {
            return Err(SimilarityError::InvalidWorkerCount(self.worker_count));
        }
        Ok(())
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }
}

/// Worker count scaled to the number of topic clusters in a batch:
/// `min(2^(floor(log2(topics)) - 2), 16)`, at least one.
pub fn worker_count_for_topics(topic_count: usize) -> usize {
    if topic_count == 0 {
        return 1;
    }
    let exponent = topic_count.ilog2().saturating_sub(2);
    1usize
        .checked_shl(exponent)
        .unwrap_or(MAX_WORKER_COUNT)
        .min(MAX_WORKER_COUNT)
}
