//! Application Record
//!
//! One applicant's risk inputs. Immutable once built; every constructor
//! checks (or clamps into) the accepted input ranges.

use serde::Serialize;
use thiserror::Error;

use super::layout::{
    FEATURE_COUNT, FEATURE_LAYOUT, AGE, CLAIMS_HISTORY, COVERAGE_AMOUNT, CREDIT_SCORE, INCOME,
};

/// Accepted `[min, max]` per feature, same order as `FEATURE_LAYOUT`
pub const RANGES: [(f64, f64); FEATURE_COUNT] = [
    (300.0, 850.0),
    (18.0, 100.0),
    (0.0, 1_000_000.0),
    (0.0, 10.0),
    (0.0, 1_000_000.0),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} = {value} is outside the accepted range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be a whole number, got {value}")]
    NotWhole { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApplicationRecord {
    credit_score: f64,
    age: f64,
    income: f64,
    claims_history: u32,
    coverage_amount: f64,
}

impl ApplicationRecord {
    /// Build a record, rejecting anything outside `RANGES`
    pub fn new(
        credit_score: f64,
        age: f64,
        income: f64,
        claims_history: u32,
        coverage_amount: f64,
    ) -> Result<Self, InputError> {
        Self::from_features([
            credit_score,
            age,
            income,
            claims_history as f64,
            coverage_amount,
        ])
    }

    /// Build a record, clamping every field into `RANGES` (NaN → range floor)
    pub fn clamped(
        credit_score: f64,
        age: f64,
        income: f64,
        claims_history: u32,
        coverage_amount: f64,
    ) -> Self {
        let clamp = |index: usize, value: f64| {
            let (min, max) = RANGES[index];
            if value.is_nan() {
                min
            } else {
                value.clamp(min, max)
            }
        };

        Self {
            credit_score: clamp(CREDIT_SCORE, credit_score),
            age: clamp(AGE, age),
            income: clamp(INCOME, income),
            claims_history: claims_history.min(RANGES[CLAIMS_HISTORY].1 as u32),
            coverage_amount: clamp(COVERAGE_AMOUNT, coverage_amount),
        }
    }

    /// Rebuild a record from a layout-ordered row
    pub fn from_features(row: [f64; FEATURE_COUNT]) -> Result<Self, InputError> {
        for (index, &value) in row.iter().enumerate() {
            let field = FEATURE_LAYOUT[index];
            if !value.is_finite() {
                return Err(InputError::NotFinite { field });
            }
            let (min, max) = RANGES[index];
            if value < min || value > max {
                return Err(InputError::OutOfRange { field, value, min, max });
            }
        }

        let claims = row[CLAIMS_HISTORY];
        if claims.fract() != 0.0 {
            return Err(InputError::NotWhole {
                field: FEATURE_LAYOUT[CLAIMS_HISTORY],
                value: claims,
            });
        }

        Ok(Self {
            credit_score: row[CREDIT_SCORE],
            age: row[AGE],
            income: row[INCOME],
            claims_history: claims as u32,
            coverage_amount: row[COVERAGE_AMOUNT],
        })
    }

    /// Row in `FEATURE_LAYOUT` order, shared by training and inference
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.credit_score,
            self.age,
            self.income,
            self.claims_history as f64,
            self.coverage_amount,
        ]
    }

    pub fn credit_score(&self) -> f64 {
        self.credit_score
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn claims_history(&self) -> u32 {
        self.claims_history
    }

    pub fn coverage_amount(&self) -> f64 {
        self.coverage_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_follow_layout_order() {
        let record = ApplicationRecord::new(750.0, 30.0, 80_000.0, 0, 50_000.0).unwrap();
        assert_eq!(record.to_features(), [750.0, 30.0, 80_000.0, 0.0, 50_000.0]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = ApplicationRecord::new(900.0, 30.0, 80_000.0, 0, 50_000.0).unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "credit_score", .. }));

        let err = ApplicationRecord::new(700.0, 30.0, 80_000.0, 11, 50_000.0).unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "claims_history", .. }));

        let err = ApplicationRecord::new(700.0, f64::NAN, 80_000.0, 0, 50_000.0).unwrap_err();
        assert_eq!(err, InputError::NotFinite { field: "age" });
    }

    #[test]
    fn test_clamped_pulls_into_range() {
        let record = ApplicationRecord::clamped(200.0, 120.0, -5.0, 40, f64::NAN);
        assert_eq!(record.credit_score(), 300.0);
        assert_eq!(record.age(), 100.0);
        assert_eq!(record.income(), 0.0);
        assert_eq!(record.claims_history(), 10);
        assert_eq!(record.coverage_amount(), 0.0);
    }

    #[test]
    fn test_fractional_claims_rejected() {
        let err = ApplicationRecord::from_features([700.0, 30.0, 1.0, 1.5, 1.0]).unwrap_err();
        assert!(matches!(err, InputError::NotWhole { .. }));
    }
}
