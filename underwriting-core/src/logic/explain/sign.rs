//! Sign Correction
//!
//! The ONLY place the rejected-class vector is negated. Everything
//! downstream (chart, ranker, letter) takes an `ApprovalAttribution`, which
//! can only be built here, so it is inverted exactly once.

use serde::Serialize;

use super::types::ClassAttributions;
use crate::logic::features::FEATURE_COUNT;

/// Attributions where positive pushes toward approval and negative toward
/// rejection. `baseline + Σ values` is the approval-class output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalAttribution {
    baseline: f64,
    values: [f64; FEATURE_COUNT],
    output: f64,
}

impl ApprovalAttribution {
    /// Expected approval output over the training distribution
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Approval-class model output for the explained record
    pub fn output(&self) -> f64 {
        self.output
    }

    /// |baseline + Σ values - output|
    pub fn completeness_gap(&self) -> f64 {
        (self.baseline + self.values.iter().sum::<f64>() - self.output).abs()
    }
}

/// Negate the rejected-class vector so positive means "favors approval"
pub fn sign_correct(attributions: &ClassAttributions) -> ApprovalAttribution {
    let rejected = &attributions.rejected;
    ApprovalAttribution {
        baseline: 1.0 - rejected.baseline,
        values: rejected.values.map(|v| -v),
        output: 1.0 - attributions.output[rejected.class.index()],
    }
}
