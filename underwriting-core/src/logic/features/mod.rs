//! Features Module
//!
//! Feature layout (single source of truth for column order) and the
//! validated application record that flows through the pipeline.

pub mod layout;
pub mod record;

pub use layout::{
    feature_index, feature_label, feature_name, layout_hash, LayoutInfo, FEATURE_COUNT,
    FEATURE_LABELS, FEATURE_LAYOUT, FEATURE_VERSION,
};
pub use record::{ApplicationRecord, InputError, RANGES};
