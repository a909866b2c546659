use once_cell::sync::Lazy;

use super::*;
use crate::logic::dataset::{generate_corpus, CorpusConfig};
use crate::logic::features::{ApplicationRecord, FEATURE_COUNT};
use crate::logic::model::{ForestConfig, RandomForest};

static FOREST: Lazy<RandomForest> = Lazy::new(|| {
    let corpus = generate_corpus(&CorpusConfig::default()).unwrap();
    RandomForest::fit(&corpus, &ForestConfig::default()).unwrap()
});

fn approved_applicant() -> ApplicationRecord {
    ApplicationRecord::new(750.0, 30.0, 80_000.0, 0, 50_000.0).unwrap()
}

fn frequent_claimant() -> ApplicationRecord {
    ApplicationRecord::new(700.0, 35.0, 60_000.0, 8, 100_000.0).unwrap()
}

#[test]
fn test_class_vectors_reconstruct_outputs() {
    for record in [approved_applicant(), frequent_claimant()] {
        let raw = explain(&FOREST, &record);
        let proba = FOREST.predict_proba(&record);

        assert!((raw.rejected.reconstructed_output() - proba[0]).abs() < 1e-6);
        assert!((raw.approved.reconstructed_output() - proba[1]).abs() < 1e-6);
    }
}

#[test]
fn test_binary_class_vectors_are_mirrored() {
    let raw = explain(&FOREST, &frequent_claimant());
    for i in 0..FEATURE_COUNT {
        assert!((raw.rejected.values[i] + raw.approved.values[i]).abs() < 1e-9);
    }
}

#[test]
fn test_sign_correction_is_the_approval_view() {
    let record = approved_applicant();
    let raw = explain(&FOREST, &record);
    let approval = sign_correct(&raw);

    for i in 0..FEATURE_COUNT {
        assert_eq!(approval.values()[i], -raw.rejected.values[i]);
        assert!((approval.values()[i] - raw.approved.values[i]).abs() < 1e-9);
    }
    assert!((approval.baseline() - (1.0 - raw.rejected.baseline)).abs() < 1e-12);
    assert!((approval.output() - FOREST.predict_proba(&record)[1]).abs() < 1e-9);
    assert!(approval.completeness_gap() < 1e-6);
}

#[test]
fn test_higher_credit_gets_higher_credit_attribution() {
    let strong = ApplicationRecord::new(800.0, 30.0, 90_000.0, 0, 60_000.0).unwrap();
    let weak = ApplicationRecord::new(500.0, 30.0, 90_000.0, 0, 60_000.0).unwrap();

    let strong = sign_correct(&explain(&FOREST, &strong));
    let weak = sign_correct(&explain(&FOREST, &weak));

    assert!(strong.values()[0] > weak.values()[0]);
    assert!(strong.values()[0] > 0.0);
    assert!(weak.values()[0] < 0.0);
}

#[test]
fn test_approved_applicant_explanation() {
    let record = approved_applicant();
    let approval = sign_correct(&explain(&FOREST, &record));

    assert!(approval.output() > approval.baseline());
    assert!(approval.values()[0] > 0.0);
    assert!(approval.values()[2] > 0.0);

    let top = rank_factors(&approval, &record, TOP_FACTOR_COUNT);
    assert_eq!(top.len(), 3);
    assert!(["credit_score", "income", "age"].contains(&top[0].feature));
}

#[test]
fn test_claims_history_drives_rejection() {
    let record = frequent_claimant();
    let approval = sign_correct(&explain(&FOREST, &record));

    assert!(approval.output() < approval.baseline());
    assert!(approval.values()[3] < 0.0);

    let top = rank_factors(&approval, &record, TOP_FACTOR_COUNT);
    let claims = top.iter().find(|f| f.feature == "claims_history").unwrap();
    assert_eq!(claims.impact(), Impact::Negative);
    assert_eq!(claims.display_value(), "8");
}

#[test]
fn test_ranked_factors_carry_record_values() {
    let record = approved_applicant();
    let approval = sign_correct(&explain(&FOREST, &record));
    let top = rank_factors(&approval, &record, 10);

    assert_eq!(top.len(), FEATURE_COUNT);
    for pair in top.windows(2) {
        assert!(pair[0].attribution.abs() >= pair[1].attribution.abs());
    }
    for factor in &top {
        assert_eq!(factor.value, record.to_features()[factor.index]);
        assert_eq!(factor.attribution, approval.values()[factor.index]);
    }
}

#[test]
fn test_chart_bars_follow_sign() {
    let approval = sign_correct(&explain(&FOREST, &frequent_claimant()));
    let bars = chart_bars(&approval);

    assert_eq!(bars.len(), FEATURE_COUNT);
    assert_eq!(bars[3].label, "Claims History");
    assert_eq!(bars[3].color, chart::REJECTION_COLOR);
    for bar in &bars {
        let expected = if bar.value > 0.0 { chart::APPROVAL_COLOR } else { chart::REJECTION_COLOR };
        assert_eq!(bar.color, expected);
    }

    let text = render_text(&bars, 20);
    assert!(text.starts_with(CHART_TITLE));
    assert_eq!(text.lines().count(), FEATURE_COUNT + 1);
}

#[test]
fn test_impact_and_value_formatting() {
    assert_eq!(Impact::of(0.1), Impact::Positive);
    assert_eq!(Impact::of(0.0), Impact::Negative);
    assert_eq!(Impact::of(-0.1).adverb(), "negatively");
    assert_eq!(format_value(700.0), "700");
    assert_eq!(format_value(1234.5), "1234.50");
}
