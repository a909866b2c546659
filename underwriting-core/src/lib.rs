//! Underwriting XAI Core
//!
//! Trains a random forest on synthetic underwriting data, explains a single
//! application with exact tree attributions, and drafts a decision letter.
//!
//! ## Layout
//! - `logic::features` - feature layout and the application record
//! - `logic::dataset` - synthetic corpus generation and JSONL export
//! - `logic::model` - decision trees, the forest and the model cache
//! - `logic::explain` - TreeSHAP, sign correction, chart bars, factor ranking
//! - `logic::letter` - prompt, text generation client, template fallback
//! - `logic::pipeline` - one full analysis run

pub mod constants;
pub mod logic;

pub use logic::config::{LetterConfig, PipelineConfig};
pub use logic::dataset::{generate_corpus, CorpusConfig, TrainingCorpus};
pub use logic::explain::{
    chart_bars, explain, rank_factors, sign_correct, ApprovalAttribution, ChartBar,
    ClassAttributions, RankedFactor, TOP_FACTOR_COUNT,
};
pub use logic::features::{ApplicationRecord, InputError, LayoutInfo, FEATURE_COUNT};
pub use logic::letter::{
    letter_file_name, Decision, DecisionLetter, LetterComposer, LetterRequest, OpenAiChatClient,
    TextGenerator,
};
pub use logic::model::{ForestConfig, ModelCache, RandomForest, TrainError};
pub use logic::pipeline::{Analysis, AnalysisRequest, Pipeline, PipelineError};
