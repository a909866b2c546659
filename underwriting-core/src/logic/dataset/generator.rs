//! Synthetic Data Generator
//!
//! Draws a labeled corpus where credit score drives income and coverage,
//! so approval-favoring credit scores also show up as approval-favoring
//! incomes. Same config ⇒ bit-identical corpus.

use ndarray::{Array1, Array2};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{LogNormal, Normal, Poisson};
use serde::{Deserialize, Serialize};

use super::corpus::{label_for, DatasetError, TrainingCorpus};
use crate::constants;
use crate::logic::features::layout::{
    AGE, CLAIMS_HISTORY, COVERAGE_AMOUNT, CREDIT_SCORE, FEATURE_COUNT, INCOME,
};
use crate::logic::features::{ApplicationRecord, RANGES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub n_samples: usize,
    pub seed: u64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            n_samples: constants::DEFAULT_CORPUS_SIZE,
            seed: constants::DEFAULT_CORPUS_SEED,
        }
    }
}

impl CorpusConfig {
    pub fn from_env() -> Self {
        Self {
            n_samples: constants::get_corpus_size(),
            seed: constants::get_corpus_seed(),
        }
    }
}

// Distribution parameters
const CREDIT_MEAN: f64 = 700.0;
const CREDIT_SD: f64 = 100.0;
const AGE_MEAN: f64 = 40.0;
const AGE_SD: f64 = 15.0;
const CLAIMS_RATE: f64 = 1.0;
const INCOME_LOG_MEAN: f64 = 11.0;
const INCOME_LOG_SD: f64 = 1.0;
const COVERAGE_MULTIPLIER_LOW: f64 = 0.5;
const COVERAGE_MULTIPLIER_HIGH: f64 = 2.0;

// Correlation strength with normalized credit score
const INCOME_CREDIT_GAIN: f64 = 2.0;
const COVERAGE_CREDIT_GAIN: f64 = 0.5;

fn clip(value: f64, feature: usize) -> f64 {
    let (min, max) = RANGES[feature];
    value.clamp(min, max)
}

fn distribution_error(e: impl std::fmt::Display) -> DatasetError {
    DatasetError::Distribution(e.to_string())
}

/// Credit score mapped onto [0, 1]
pub fn normalized_credit(credit_score: f64) -> f64 {
    let (min, max) = RANGES[CREDIT_SCORE];
    (credit_score - min) / (max - min)
}

/// Generate `n_samples` records and their labels
pub fn generate_corpus(config: &CorpusConfig) -> Result<TrainingCorpus, DatasetError> {
    let n = config.n_samples;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let credit_dist = Normal::new(CREDIT_MEAN, CREDIT_SD).map_err(distribution_error)?;
    let age_dist = Normal::new(AGE_MEAN, AGE_SD).map_err(distribution_error)?;
    let claims_dist = Poisson::new(CLAIMS_RATE).map_err(distribution_error)?;
    let income_dist = LogNormal::new(INCOME_LOG_MEAN, INCOME_LOG_SD).map_err(distribution_error)?;
    let multiplier_dist = Uniform::new(COVERAGE_MULTIPLIER_LOW, COVERAGE_MULTIPLIER_HIGH);

    // Column-wise draws keep each column's stream independent of N for the others
    let credit: Array1<f64> = (0..n)
        .map(|_| clip(credit_dist.sample(&mut rng), CREDIT_SCORE))
        .collect();
    let ages: Array1<f64> = (0..n).map(|_| clip(age_dist.sample(&mut rng), AGE)).collect();
    let claims: Array1<f64> = (0..n)
        .map(|_| clip(claims_dist.sample(&mut rng), CLAIMS_HISTORY))
        .collect();
    let base_incomes: Array1<f64> = (0..n).map(|_| income_dist.sample(&mut rng)).collect();
    let multipliers: Array1<f64> = (0..n).map(|_| multiplier_dist.sample(&mut rng)).collect();

    let scale = credit.mapv(normalized_credit);

    let incomes = (&base_incomes * &scale.mapv(|s| 1.0 + INCOME_CREDIT_GAIN * s))
        .mapv(|v| clip(v, INCOME));
    let coverage = (&incomes * &(&multipliers * &scale.mapv(|s| 1.0 + COVERAGE_CREDIT_GAIN * s)))
        .mapv(|v| clip(v, COVERAGE_AMOUNT));

    let mut features = Array2::<f64>::zeros((n, FEATURE_COUNT));
    features.column_mut(CREDIT_SCORE).assign(&credit);
    features.column_mut(AGE).assign(&ages);
    features.column_mut(INCOME).assign(&incomes);
    features.column_mut(CLAIMS_HISTORY).assign(&claims);
    features.column_mut(COVERAGE_AMOUNT).assign(&coverage);

    let mut labels = Vec::with_capacity(n);
    for (row, values) in features.outer_iter().enumerate() {
        let record = ApplicationRecord::from_features(std::array::from_fn(|j| values[j]))
            .map_err(|source| DatasetError::InvalidRow { row, source })?;
        labels.push(label_for(&record));
    }

    let corpus = TrainingCorpus::from_parts_unchecked(features, labels);
    let [rejected, approved] = corpus.class_counts();
    log::debug!(
        "Generated corpus: {} rows (seed {}), {} approved / {} rejected",
        n,
        config.seed,
        approved,
        rejected
    );

    Ok(corpus)
}
