//! Random Forest Classifier
//!
//! Bootstrap-aggregated CART trees. Each tree draws its bootstrap sample and
//! its split candidates from its own RNG seeded with `seed + tree_index`, so a
//! fixed config always yields the same forest.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tree::{DecisionTree, MaxFeatures, TreeConfig, N_CLASSES};
use crate::constants;
use crate::logic::dataset::TrainingCorpus;
use crate::logic::features::{ApplicationRecord, LayoutInfo, FEATURE_COUNT};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainError {
    #[error("training corpus is empty")]
    EmptyCorpus,
    #[error("training corpus contains a single class (label {label}, {count} rows); cannot fit a classifier")]
    SingleClass { label: u8, count: usize },
    #[error("invalid forest config: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: constants::DEFAULT_FOREST_TREES,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: constants::DEFAULT_FOREST_SEED,
        }
    }
}

impl ForestConfig {
    pub fn from_env() -> Self {
        Self {
            n_trees: constants::get_forest_trees(),
            max_depth: constants::get_forest_max_depth(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TrainError> {
        if self.n_trees == 0 {
            return Err(TrainError::InvalidConfig("n_trees must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(TrainError::InvalidConfig("min_samples_split must be at least 2".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(TrainError::InvalidConfig("min_samples_leaf must be at least 1".into()));
        }
        if self.max_depth == Some(0) {
            return Err(TrainError::InvalidConfig("max_depth must be at least 1".into()));
        }
        Ok(())
    }

    fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }
}

/// Shape and fit quality of a trained forest
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub n_trees: usize,
    pub n_samples: usize,
    /// `[rejected, approved]`
    pub class_counts: [usize; N_CLASSES],
    pub training_accuracy: f64,
    pub mean_depth: f64,
    pub mean_leaves: f64,
    /// Mean root distribution over trees, `[rejected, approved]`
    pub expected_value: [f64; N_CLASSES],
    pub train_time_ms: u64,
    pub layout: LayoutInfo,
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    config: ForestConfig,
    n_samples: usize,
    class_counts: [usize; N_CLASSES],
    training_accuracy: f64,
    train_time_ms: u64,
}

impl RandomForest {
    pub fn fit(corpus: &TrainingCorpus, config: &ForestConfig) -> Result<Self, TrainError> {
        config.validate()?;

        if corpus.is_empty() {
            return Err(TrainError::EmptyCorpus);
        }
        let class_counts = corpus.class_counts();
        if let Some(label) = class_counts.iter().position(|&c| c == corpus.len()) {
            return Err(TrainError::SingleClass {
                label: label as u8,
                count: corpus.len(),
            });
        }

        let start = Instant::now();
        let x = corpus.features();
        let y = corpus.labels();
        let n = corpus.len();
        let tree_config = config.tree_config();

        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let mut sample: Vec<usize> = if config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(x, y, &mut sample, &tree_config, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            config: *config,
            n_samples: n,
            class_counts,
            training_accuracy: 0.0,
            train_time_ms: 0,
        };

        let correct = (0..n)
            .filter(|&i| {
                let proba = forest.predict_proba_row(&corpus.row(i));
                (proba[1] > proba[0]) as u8 == y[i]
            })
            .count();
        forest.training_accuracy = correct as f64 / n as f64;
        forest.train_time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Trained forest: {} trees on {} rows ({} approved / {} rejected), accuracy {:.3}, {} ms",
            config.n_trees,
            n,
            class_counts[1],
            class_counts[0],
            forest.training_accuracy,
            forest.train_time_ms
        );

        Ok(forest)
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Mean leaf distribution over trees, `[rejected, approved]`
    pub fn predict_proba_row(&self, row: &[f64; FEATURE_COUNT]) -> [f64; N_CLASSES] {
        let mut total = [0.0; N_CLASSES];
        for tree in &self.trees {
            let proba = tree.predict_proba(row);
            for c in 0..N_CLASSES {
                total[c] += proba[c];
            }
        }
        total.map(|t| t / self.trees.len() as f64)
    }

    pub fn predict_proba(&self, record: &ApplicationRecord) -> [f64; N_CLASSES] {
        self.predict_proba_row(&record.to_features())
    }

    /// Expected model output over the training distribution (attribution baseline)
    pub fn expected_value(&self) -> [f64; N_CLASSES] {
        let mut total = [0.0; N_CLASSES];
        for root in self.trees.iter().filter_map(|t| t.root()) {
            for c in 0..N_CLASSES {
                total[c] += root.value[c];
            }
        }
        total.map(|t| t / self.trees.len() as f64)
    }

    pub fn summary(&self) -> ModelSummary {
        let n = self.trees.len() as f64;
        ModelSummary {
            n_trees: self.trees.len(),
            n_samples: self.n_samples,
            class_counts: self.class_counts,
            training_accuracy: self.training_accuracy,
            mean_depth: self.trees.iter().map(|t| t.depth() as f64).sum::<f64>() / n,
            mean_leaves: self.trees.iter().map(|t| t.n_leaves() as f64).sum::<f64>() / n,
            expected_value: self.expected_value(),
            train_time_ms: self.train_time_ms,
            layout: LayoutInfo::current(),
        }
    }
}
