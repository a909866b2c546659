use std::sync::Arc;

use super::cache::{ModelCache, ModelKey};
use super::forest::{ForestConfig, RandomForest, TrainError};
use crate::logic::dataset::{generate_corpus, CorpusConfig, TrainingCorpus};
use crate::logic::features::ApplicationRecord;

fn small_forest() -> ForestConfig {
    ForestConfig { n_trees: 15, ..Default::default() }
}

fn corpus() -> TrainingCorpus {
    generate_corpus(&CorpusConfig { n_samples: 400, seed: 42 }).unwrap()
}

#[test]
fn test_empty_corpus_is_fatal() {
    let empty = generate_corpus(&CorpusConfig { n_samples: 0, seed: 42 }).unwrap();
    let err = RandomForest::fit(&empty, &small_forest()).unwrap_err();
    assert_eq!(err, TrainError::EmptyCorpus);
}

#[test]
fn test_single_class_is_fatal() {
    let rejected = ApplicationRecord::new(500.0, 60.0, 20_000.0, 4, 50_000.0).unwrap();
    let corpus = TrainingCorpus::from_records(&[rejected, rejected, rejected]);

    let err = RandomForest::fit(&corpus, &small_forest()).unwrap_err();
    assert_eq!(err, TrainError::SingleClass { label: 0, count: 3 });
    assert!(err.to_string().contains("single class"));
}

#[test]
fn test_invalid_config_rejected() {
    let config = ForestConfig { n_trees: 0, ..Default::default() };
    assert!(matches!(
        RandomForest::fit(&corpus(), &config),
        Err(TrainError::InvalidConfig(_))
    ));
}

#[test]
fn test_probabilities_are_distributions() {
    let forest = RandomForest::fit(&corpus(), &small_forest()).unwrap();
    for (record, _) in corpus().records().take(50) {
        let p = forest.predict_proba(&record);
        assert!((p[0] + p[1] - 1.0).abs() < 1e-9);
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    let base = forest.expected_value();
    assert!((base[0] + base[1] - 1.0).abs() < 1e-9);
}

#[test]
fn test_fit_is_deterministic() {
    let corpus = corpus();
    let a = RandomForest::fit(&corpus, &small_forest()).unwrap();
    let b = RandomForest::fit(&corpus, &small_forest()).unwrap();
    assert_eq!(a.trees(), b.trees());

    let other = ForestConfig { seed: 7, ..small_forest() };
    let c = RandomForest::fit(&corpus, &other).unwrap();
    assert_ne!(a.trees(), c.trees());
}

#[test]
fn test_forest_learns_the_rule() {
    let forest = RandomForest::fit(&corpus(), &small_forest()).unwrap();
    let summary = forest.summary();
    assert!(summary.training_accuracy > 0.95);
    assert_eq!(summary.n_trees, 15);
    assert!(summary.layout.is_current());

    let good = ApplicationRecord::new(780.0, 28.0, 150_000.0, 0, 100_000.0).unwrap();
    let bad = ApplicationRecord::new(450.0, 70.0, 15_000.0, 6, 60_000.0).unwrap();
    assert!(forest.predict_proba(&good)[1] > 0.5);
    assert!(forest.predict_proba(&bad)[1] < 0.5);
}

#[test]
fn test_cache_reuses_and_invalidates() {
    let cache = ModelCache::new();
    let corpus_config = CorpusConfig { n_samples: 200, seed: 42 };
    let key = ModelKey { corpus: corpus_config, forest: small_forest() };
    let train = |key: ModelKey| {
        move || {
            let corpus = generate_corpus(&key.corpus).unwrap();
            RandomForest::fit(&corpus, &key.forest)
        }
    };

    let first = cache.get_or_train(key, train(key)).unwrap();
    let second = cache.get_or_train(key, train(key)).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().misses, 1);

    let changed = ModelKey { corpus: CorpusConfig { seed: 9, ..corpus_config }, ..key };
    let third = cache.get_or_train(changed, train(changed)).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert!(cache.get(&key).is_none());
    assert!(cache.get(&changed).is_some());

    cache.invalidate();
    assert!(!cache.stats().cached);
}

#[test]
fn test_cache_does_not_store_failures() {
    let cache = ModelCache::new();
    let key = ModelKey {
        corpus: CorpusConfig { n_samples: 0, seed: 1 },
        forest: small_forest(),
    };
    let result = cache.get_or_train(key, || Err::<RandomForest, _>(TrainError::EmptyCorpus));
    assert!(result.is_err());
    assert!(!cache.stats().cached);
}
