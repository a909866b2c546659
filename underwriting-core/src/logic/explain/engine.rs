use super::tree_shap::tree_shap;
use super::types::{AttributionVector, ClassAttributions, ModelClass};
use crate::logic::features::{ApplicationRecord, FEATURE_COUNT};
use crate::logic::model::{RandomForest, N_CLASSES};

/// Exact per-feature attributions of `model` at `record`, one vector per class.
/// Forest values are the mean of per-tree values, so the baseline is the
/// mean root distribution.
pub fn explain(model: &RandomForest, record: &ApplicationRecord) -> ClassAttributions {
    let row = record.to_features();
    let mut phi = [[0.0; N_CLASSES]; FEATURE_COUNT];

    for tree in model.trees() {
        tree_shap(tree, &row, &mut phi);
    }

    let n_trees = model.trees().len().max(1) as f64;
    let baseline = model.expected_value();
    let output = model.predict_proba_row(&row);

    let vector = |class: ModelClass| AttributionVector {
        class,
        baseline: baseline[class.index()],
        values: std::array::from_fn(|f| phi[f][class.index()] / n_trees),
    };

    let attributions = ClassAttributions {
        rejected: vector(ModelClass::Rejected),
        approved: vector(ModelClass::Approved),
        output,
    };

    log::debug!(
        "Explained record: approval output {:.4}, baseline {:.4}",
        output[ModelClass::Approved.index()],
        baseline[ModelClass::Approved.index()]
    );

    attributions
}
