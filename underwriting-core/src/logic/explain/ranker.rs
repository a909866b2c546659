//! Factor Ranker
//!
//! Orders features by |attribution|, largest first. The sort is stable, so
//! ties keep ascending layout order.

use super::sign::ApprovalAttribution;
use super::types::RankedFactor;
use crate::logic::features::{ApplicationRecord, FEATURE_COUNT, FEATURE_LABELS, FEATURE_LAYOUT};

/// Factors quoted in the decision letter
pub const TOP_FACTOR_COUNT: usize = 3;

/// Indices of the `k` largest |attributions|
pub fn rank_indices(attributions: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..attributions.len()).collect();
    order.sort_by(|&a, &b| attributions[b].abs().total_cmp(&attributions[a].abs()));
    order.truncate(k.min(attributions.len()));
    order
}

pub fn rank_factors(
    attribution: &ApprovalAttribution,
    record: &ApplicationRecord,
    k: usize,
) -> Vec<RankedFactor> {
    let values = record.to_features();
    let attributions = attribution.values();

    rank_indices(attributions, k.min(FEATURE_COUNT))
        .into_iter()
        .map(|index| RankedFactor {
            feature: FEATURE_LAYOUT[index],
            label: FEATURE_LABELS[index],
            index,
            attribution: attributions[index],
            value: values[index],
        })
        .collect()
}
