//! Feature layout handler

use axum::Json;
use serde::Serialize;

use underwriting_core::logic::features::RANGES;
use underwriting_core::LayoutInfo;

#[derive(Serialize)]
pub struct FeatureRange {
    name: String,
    label: String,
    min: f64,
    max: f64,
}

#[derive(Serialize)]
pub struct FeaturesResponse {
    layout: LayoutInfo,
    ranges: Vec<FeatureRange>,
}

/// Column order and accepted input ranges
pub async fn list() -> Json<FeaturesResponse> {
    let layout = LayoutInfo::current();
    let ranges = layout
        .feature_names
        .iter()
        .zip(&layout.feature_labels)
        .zip(RANGES)
        .map(|((name, label), (min, max))| FeatureRange {
            name: name.clone(),
            label: label.clone(),
            min,
            max,
        })
        .collect();

    Json(FeaturesResponse { layout, ranges })
}
