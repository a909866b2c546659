//! Runtime configuration assembled from `constants` and the environment

use serde::Serialize;

use crate::constants;
use crate::logic::dataset::CorpusConfig;
use crate::logic::explain::TOP_FACTOR_COUNT;
use crate::logic::model::ForestConfig;

/// Everything that shapes one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineConfig {
    pub corpus: CorpusConfig,
    pub forest: ForestConfig,
    /// Factors handed to the letter
    pub top_k: usize,
    /// Reuse a trained forest while corpus + forest settings are unchanged
    pub cache_models: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            forest: ForestConfig::default(),
            top_k: TOP_FACTOR_COUNT,
            cache_models: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self {
            corpus: CorpusConfig::from_env(),
            forest: ForestConfig::from_env(),
            top_k: TOP_FACTOR_COUNT,
            cache_models: constants::is_model_cache_enabled(),
        }
    }
}

/// Text generation service settings
#[derive(Clone, PartialEq)]
pub struct LetterConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

// Keeps the key out of logs
impl std::fmt::Debug for LetterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LetterConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for LetterConfig {
    fn default() -> Self {
        Self {
            api_base: constants::DEFAULT_LLM_API_BASE.to_string(),
            api_key: None,
            model: constants::DEFAULT_LLM_MODEL.to_string(),
            max_tokens: constants::DEFAULT_LLM_MAX_TOKENS,
            temperature: constants::DEFAULT_LLM_TEMPERATURE,
            timeout_secs: constants::DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl LetterConfig {
    pub fn from_env() -> Self {
        Self {
            api_base: constants::get_llm_api_base(),
            api_key: constants::get_llm_api_key(),
            model: constants::get_llm_model(),
            timeout_secs: constants::get_llm_timeout_secs(),
            ..Default::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_api_key() {
        let config = LetterConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.corpus.n_samples, 1000);
        assert_eq!(config.forest.n_trees, 100);
        assert!(config.cache_models);
    }
}
