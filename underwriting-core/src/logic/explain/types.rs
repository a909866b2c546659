use serde::{Deserialize, Serialize};

use crate::logic::features::FEATURE_COUNT;
use crate::logic::model::N_CLASSES;

/// Classes the forest models, in label order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelClass {
    Rejected,
    Approved,
}

impl ModelClass {
    pub fn index(&self) -> usize {
        match self {
            ModelClass::Rejected => 0,
            ModelClass::Approved => 1,
        }
    }
}

/// Per-feature contributions to one class output for one record.
/// `baseline + Σ values` reconstructs the model output for `class`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionVector {
    pub class: ModelClass,
    pub baseline: f64,
    pub values: [f64; FEATURE_COUNT],
}

impl AttributionVector {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn reconstructed_output(&self) -> f64 {
        self.baseline + self.total()
    }
}

/// Raw engine output: one vector per modeled class, in the model's own signs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAttributions {
    pub rejected: AttributionVector,
    pub approved: AttributionVector,
    /// Model output `[rejected, approved]` for the explained record
    pub output: [f64; N_CLASSES],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
}

impl Impact {
    /// Zero counts as negative
    pub fn of(attribution: f64) -> Self {
        if attribution > 0.0 {
            Impact::Positive
        } else {
            Impact::Negative
        }
    }

    pub fn adverb(&self) -> &'static str {
        match self {
            Impact::Positive => "positively",
            Impact::Negative => "negatively",
        }
    }
}

/// One entry of the ranked factor list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFactor {
    pub feature: &'static str,
    pub label: &'static str,
    /// Position in the feature layout
    pub index: usize,
    /// Sign-corrected: positive favors approval
    pub attribution: f64,
    /// Raw input value
    pub value: f64,
}

impl RankedFactor {
    pub fn impact(&self) -> Impact {
        Impact::of(self.attribution)
    }

    /// Whole numbers print without decimals, everything else with two
    pub fn display_value(&self) -> String {
        format_value(self.value)
    }
}

pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
