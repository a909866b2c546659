//! Explain Module - Attribution Engine & Factor Ranker
//!
//! `explain` produces raw per-class attributions from the forest;
//! `sign_correct` turns them into the approval view consumed by both the
//! chart and the letter.

pub mod types;
pub mod tree_shap;
pub mod engine;
pub mod sign;
pub mod ranker;
pub mod chart;

#[cfg(test)]
mod tests;

pub use chart::{chart_bars, render_text, ChartBar, CHART_TITLE};
pub use engine::explain;
pub use ranker::{rank_factors, rank_indices, TOP_FACTOR_COUNT};
pub use sign::{sign_correct, ApprovalAttribution};
pub use types::{format_value, AttributionVector, ClassAttributions, Impact, ModelClass, RankedFactor};
