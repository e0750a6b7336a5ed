// Pure pipeline services: extraction, classification, normalization, aggregation
pub mod aggregator;
pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod self_harm;
pub mod translator;

pub use aggregator::*;
pub use classifier::*;
pub use extractor::*;
pub use normalizer::*;
pub use self_harm::*;
pub use translator::*;
