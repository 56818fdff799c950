pub mod aggregate;
pub mod batch;
pub(crate) mod embedding;
pub mod matcher;
pub mod pairs;
pub mod partition;
pub mod pool;
pub mod similarity;
