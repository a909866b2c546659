//! Analysis Pipeline
//!
//! One run: generate corpus → train (or reuse) → explain → sign-correct →
//! chart + rank → compose letter. CPU-bound stages run on the blocking pool.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::config::PipelineConfig;
use super::dataset::{generate_corpus, DatasetError, TrainingCorpus};
use super::explain::{
    chart_bars, explain, rank_factors, sign_correct, ApprovalAttribution, ChartBar, RankedFactor,
};
use super::features::ApplicationRecord;
use super::letter::{letter_file_name, Decision, DecisionLetter, LetterComposer, LetterRequest};
use super::model::{CacheStats, ModelCache, ModelKey, ModelSummary, RandomForest, TrainError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("corpus generation failed: {0}")]
    Dataset(#[from] DatasetError),
    #[error("training failed: {0}")]
    Training(#[from] TrainError),
    #[error("worker task failed: {0}")]
    Worker(String),
}

/// One applicant to explain
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub applicant_name: String,
    pub policy_number: String,
    /// Chosen by the underwriter, echoed into the letter
    pub decision: Decision,
    pub record: ApplicationRecord,
}

/// Everything the presentation layer shows for one run
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub applicant_name: String,
    pub policy_number: String,
    pub decision: Decision,
    pub record: ApplicationRecord,
    pub approval_probability: f64,
    pub baseline: f64,
    pub attribution: ApprovalAttribution,
    pub chart: Vec<ChartBar>,
    pub factors: Vec<RankedFactor>,
    pub model: ModelSummary,
    pub letter: DecisionLetter,
    pub letter_file_name: String,
}

struct Explained {
    model: ModelSummary,
    attribution: ApprovalAttribution,
    chart: Vec<ChartBar>,
    factors: Vec<RankedFactor>,
}

pub struct Pipeline {
    config: PipelineConfig,
    composer: LetterComposer,
    cache: Arc<ModelCache>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, composer: LetterComposer) -> Self {
        Self {
            config,
            composer,
            cache: Arc::new(ModelCache::new()),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Corpus this pipeline trains on
    pub fn corpus(&self) -> Result<TrainingCorpus, DatasetError> {
        generate_corpus(&self.config.corpus)
    }

    /// Train (or fetch) the forest without explaining anything
    pub async fn train(&self) -> Result<Arc<RandomForest>, PipelineError> {
        let config = self.config;
        let cache = Arc::clone(&self.cache);

        tokio::task::spawn_blocking(move || train_model(&config, &cache))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }

    pub async fn run(&self, request: AnalysisRequest) -> Result<Analysis, PipelineError> {
        let config = self.config;
        let cache = Arc::clone(&self.cache);
        let record = request.record;

        let explained = tokio::task::spawn_blocking(move || -> Result<Explained, PipelineError> {
            let model = train_model(&config, &cache)?;
            let attribution = sign_correct(&explain(&model, &record));
            Ok(Explained {
                model: model.summary(),
                chart: chart_bars(&attribution),
                factors: rank_factors(&attribution, &record, config.top_k),
                attribution,
            })
        })
        .await
        .map_err(|e| PipelineError::Worker(e.to_string()))??;

        let letter_request = LetterRequest::new(
            request.applicant_name.clone(),
            request.policy_number.clone(),
            request.decision,
            explained.factors.clone(),
        );
        let letter = self.composer.compose(&letter_request).await;

        log::info!(
            "Analysis for policy {}: approval {:.3} (baseline {:.3}), letter via {:?}",
            request.policy_number,
            explained.attribution.output(),
            explained.attribution.baseline(),
            letter.source
        );

        Ok(Analysis {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            letter_file_name: letter_file_name(&request.policy_number),
            applicant_name: request.applicant_name,
            policy_number: request.policy_number,
            decision: request.decision,
            record,
            approval_probability: explained.attribution.output(),
            baseline: explained.attribution.baseline(),
            attribution: explained.attribution,
            chart: explained.chart,
            factors: explained.factors,
            model: explained.model,
            letter,
        })
    }
}

fn train_model(config: &PipelineConfig, cache: &ModelCache) -> Result<Arc<RandomForest>, PipelineError> {
    let train = || -> Result<RandomForest, PipelineError> {
        let corpus = generate_corpus(&config.corpus)?;
        Ok(RandomForest::fit(&corpus, &config.forest)?)
    };

    if config.cache_models {
        let key = ModelKey {
            corpus: config.corpus,
            forest: config.forest,
        };
        cache.get_or_train(key, train)
    } else {
        train().map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::CorpusConfig;
    use crate::logic::letter::LetterSource;
    use crate::logic::model::ForestConfig;

    fn small_config(cache_models: bool) -> PipelineConfig {
        PipelineConfig {
            corpus: CorpusConfig { n_samples: 500, seed: 7 },
            forest: ForestConfig { n_trees: 20, ..Default::default() },
            top_k: 3,
            cache_models,
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            applicant_name: "John Doe".to_string(),
            policy_number: "POL-2024-001".to_string(),
            decision: Decision::Approved,
            record: ApplicationRecord::new(750.0, 30.0, 80_000.0, 0, 50_000.0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_run_produces_full_analysis() {
        let pipeline = Pipeline::new(small_config(true), LetterComposer::offline());
        let analysis = pipeline.run(request()).await.unwrap();

        assert_eq!(analysis.decision, Decision::Approved);
        assert_eq!(analysis.factors.len(), 3);
        assert_eq!(analysis.chart.len(), 5);
        assert_eq!(analysis.letter.source, LetterSource::Template);
        assert_eq!(analysis.letter_file_name, "explanation_letter_POL-2024-001.txt");
        assert!(analysis.attribution.completeness_gap() < 1e-6);
        assert_eq!(analysis.model.n_trees, 20);

        // chart and letter read the same sign-corrected values
        for factor in &analysis.factors {
            assert_eq!(analysis.chart[factor.index].value, factor.attribution);
            assert!(analysis.letter.text.contains(factor.label));
        }
    }

    #[tokio::test]
    async fn test_cached_model_is_reused() {
        let pipeline = Pipeline::new(small_config(true), LetterComposer::offline());
        let first = pipeline.run(request()).await.unwrap();
        let second = pipeline.run(request()).await.unwrap();

        let stats = pipeline.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(first.attribution, second.attribution);
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn test_cache_disabled_retrains_identically() {
        let pipeline = Pipeline::new(small_config(false), LetterComposer::offline());
        let first = pipeline.run(request()).await.unwrap();
        let second = pipeline.run(request()).await.unwrap();

        assert_eq!(pipeline.cache_stats(), CacheStats::default());
        assert_eq!(first.attribution, second.attribution);
    }

    #[tokio::test]
    async fn test_train_warms_cache_for_run() {
        let pipeline = Pipeline::new(small_config(true), LetterComposer::offline());
        let model = pipeline.train().await.unwrap();
        let analysis = pipeline.run(request()).await.unwrap();

        let stats = pipeline.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(analysis.model.expected_value, model.expected_value());
    }

    #[tokio::test]
    async fn test_empty_corpus_aborts_run() {
        let mut config = small_config(true);
        config.corpus.n_samples = 0;
        let pipeline = Pipeline::new(config, LetterComposer::offline());

        let err = pipeline.run(request()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Training(TrainError::EmptyCorpus)));
        assert!(!pipeline.cache_stats().cached);
    }
}
