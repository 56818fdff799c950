pub mod document;
pub mod similarity;
