pub mod estimator;
pub mod normalize;
pub mod splitter;
pub mod tokenizer;

pub use docslice_config::ChunkingConfig;
pub use estimator::TokenEstimator;
pub use normalize::normalize;
pub use splitter::BoundaryChunker;
pub use tokenizer::TiktokenCounter;
