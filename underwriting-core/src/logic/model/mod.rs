//! Model Module - Risk Classifier
//!
//! Random forest trained fresh per corpus config, plus an optional cache so a
//! repeated config does not pay for retraining.

pub mod tree;
pub mod forest;
pub mod cache;

#[cfg(test)]
mod tests;

pub use cache::{CacheStats, ModelCache, ModelKey};
pub use forest::{ForestConfig, ModelSummary, RandomForest, TrainError};
pub use tree::{DecisionTree, MaxFeatures, Node, Split, TreeConfig, N_CLASSES};
