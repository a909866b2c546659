use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::{ApplicationRecord, InputError, FEATURE_COUNT};

pub const LABEL_REJECTED: u8 = 0;
pub const LABEL_APPROVED: u8 = 1;

/// Label thresholds for the synthetic approval rule
pub const MIN_CREDIT_SCORE: f64 = 650.0;
pub const MIN_INCOME: f64 = 30_000.0;
pub const MAX_CLAIMS: u32 = 3;
pub const MAX_COVERAGE_TO_INCOME: f64 = 5.0;
pub const MAX_AGE: f64 = 40.0;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("feature matrix has {rows} rows and {columns} columns but {labels} labels (expected 5 columns)")]
    ShapeMismatch {
        rows: usize,
        columns: usize,
        labels: usize,
    },
    #[error("row {row} is not a valid application: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: InputError,
    },
    #[error("row {row} has label {label}, expected 0 or 1")]
    InvalidLabel { row: usize, label: u8 },
    #[error("invalid distribution parameters: {0}")]
    Distribution(String),
}

/// Synthetic approval rule: every condition must hold
pub fn approval_rule(record: &ApplicationRecord) -> bool {
    record.credit_score() > MIN_CREDIT_SCORE
        && record.income() > MIN_INCOME
        && record.claims_history() < MAX_CLAIMS
        && record.coverage_amount() < record.income() * MAX_COVERAGE_TO_INCOME
        && record.age() < MAX_AGE
}

pub fn label_for(record: &ApplicationRecord) -> u8 {
    if approval_rule(record) {
        LABEL_APPROVED
    } else {
        LABEL_REJECTED
    }
}

/// Ordered (record, label) pairs; rows are laid out per `FEATURE_LAYOUT`
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCorpus {
    features: Array2<f64>,
    labels: Vec<u8>,
}

impl TrainingCorpus {
    pub fn new(features: Array2<f64>, labels: Vec<u8>) -> Result<Self, DatasetError> {
        let (rows, columns) = features.dim();
        if rows != labels.len() || columns != FEATURE_COUNT {
            return Err(DatasetError::ShapeMismatch {
                rows,
                columns,
                labels: labels.len(),
            });
        }

        for (row, &label) in labels.iter().enumerate() {
            if label > LABEL_APPROVED {
                return Err(DatasetError::InvalidLabel { row, label });
            }
            let values = std::array::from_fn(|j| features[[row, j]]);
            ApplicationRecord::from_features(values)
                .map_err(|source| DatasetError::InvalidRow { row, source })?;
        }

        Ok(Self { features, labels })
    }

    /// Label every record with `approval_rule`
    pub fn from_records(records: &[ApplicationRecord]) -> Self {
        let mut features = Array2::zeros((records.len(), FEATURE_COUNT));
        for (i, record) in records.iter().enumerate() {
            for (j, value) in record.to_features().into_iter().enumerate() {
                features[[i, j]] = value;
            }
        }
        let labels = records.iter().map(label_for).collect();
        Self { features, labels }
    }

    pub(crate) fn from_parts_unchecked(features: Array2<f64>, labels: Vec<u8>) -> Self {
        Self { features, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn row(&self, index: usize) -> [f64; FEATURE_COUNT] {
        std::array::from_fn(|j| self.features[[index, j]])
    }

    /// Rows as records, paired with their labels
    pub fn records(&self) -> impl Iterator<Item = (ApplicationRecord, u8)> + '_ {
        self.labels.iter().enumerate().filter_map(|(i, &label)| {
            ApplicationRecord::from_features(self.row(i))
                .ok()
                .map(|record| (record, label))
        })
    }

    /// `[rejected, approved]`
    pub fn class_counts(&self) -> [usize; 2] {
        let approved = self.labels.iter().filter(|&&l| l == LABEL_APPROVED).count();
        [self.labels.len() - approved, approved]
    }

    pub fn approval_rate(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.class_counts()[1] as f64 / self.len() as f64
    }
}

/// One JSONL line of an exported corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusLine {
    pub index: usize,
    pub credit_score: f64,
    pub age: f64,
    pub income: f64,
    pub claims_history: u32,
    pub coverage_amount: f64,
    pub label: u8,
}

impl CorpusLine {
    pub fn new(index: usize, record: &ApplicationRecord, label: u8) -> Self {
        Self {
            index,
            credit_score: record.credit_score(),
            age: record.age(),
            income: record.income(),
            claims_history: record.claims_history(),
            coverage_amount: record.coverage_amount(),
            label,
        }
    }
}
