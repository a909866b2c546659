//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! Training rows, inference rows, attribution vectors and chart bars all index
//! features by position in `FEATURE_LAYOUT`.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature keys in exact order they appear in every row
pub const FEATURE_LAYOUT: &[&str] = &[
    "credit_score",    // 0: 300-850
    "age",             // 1: 18-100 years
    "income",          // 2: annual income, 0-1,000,000
    "claims_history",  // 3: previous claims, 0-10
    "coverage_amount", // 4: requested coverage, 0-1,000,000
];

/// Human readable labels, same order as `FEATURE_LAYOUT`
pub const FEATURE_LABELS: &[&str] = &[
    "Credit Score",
    "Age",
    "Income",
    "Claims History",
    "Coverage Amount",
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 5;

pub const CREDIT_SCORE: usize = 0;
pub const AGE: usize = 1;
pub const INCOME: usize = 2;
pub const CLAIMS_HISTORY: usize = 3;
pub const COVERAGE_AMOUNT: usize = 4;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version and ordered feature keys
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub feature_labels: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            feature_labels: FEATURE_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Same version and hash as the running build
    pub fn is_current(&self) -> bool {
        self.version == FEATURE_VERSION && self.hash == layout_hash()
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

pub fn feature_label(index: usize) -> Option<&'static str> {
    FEATURE_LABELS.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
