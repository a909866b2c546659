//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden from the environment (or a `.env` file).

/// Default OpenAI-compatible API base
pub const DEFAULT_LLM_API_BASE: &str = "https://api.openai.com/v1";

/// Default chat model used for letter drafting
pub const DEFAULT_LLM_MODEL: &str = "gpt-4";

/// Token budget for one drafted letter
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 800;

/// Sampling temperature for letter drafting
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.7;

/// Upper bound on one generation call (seconds)
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// System role given to the text generation service
pub const LETTER_SYSTEM_ROLE: &str =
    "You are a professional underwriter writing an explanation letter.";

/// Synthetic corpus size
pub const DEFAULT_CORPUS_SIZE: usize = 1000;

/// Synthetic corpus seed
pub const DEFAULT_CORPUS_SEED: u64 = 42;

/// Trees per forest
pub const DEFAULT_FOREST_TREES: usize = 100;

/// Forest seed
pub const DEFAULT_FOREST_SEED: u64 = 42;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Underwriting XAI";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// API key for the text generation service, if any
pub fn get_llm_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

/// Get API base from environment or use default
pub fn get_llm_api_base() -> String {
    std::env::var("OPENAI_API_BASE")
        .unwrap_or_else(|_| DEFAULT_LLM_API_BASE.to_string())
}

/// Get chat model from environment or use default
pub fn get_llm_model() -> String {
    std::env::var("LETTER_MODEL")
        .unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string())
}

/// Get generation timeout from environment or use default
pub fn get_llm_timeout_secs() -> u64 {
    std::env::var("LETTER_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS)
}

/// Get corpus size from environment or use default
pub fn get_corpus_size() -> usize {
    std::env::var("CORPUS_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CORPUS_SIZE)
}

/// Get corpus seed from environment or use default
pub fn get_corpus_seed() -> u64 {
    std::env::var("CORPUS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CORPUS_SEED)
}

/// Get tree count from environment or use default
pub fn get_forest_trees() -> usize {
    std::env::var("FOREST_TREES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FOREST_TREES)
}

/// Max tree depth; unset means grow until pure
pub fn get_forest_max_depth() -> Option<usize> {
    std::env::var("FOREST_MAX_DEPTH")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Check if trained models are cached between runs
pub fn is_model_cache_enabled() -> bool {
    std::env::var("MODEL_CACHE")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}
