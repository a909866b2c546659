//! Dataset Module - Synthetic Training Corpus
//!
//! Generates the labeled corpus the classifier is trained on, and exports it
//! as JSONL for offline inspection.

pub mod corpus;
pub mod generator;
pub mod writer;


use std::path::PathBuf;

pub use corpus::{approval_rule, label_for, CorpusLine, DatasetError, TrainingCorpus};
pub use generator::{generate_corpus, CorpusConfig};
pub use writer::DatasetWriter;

/// Get the base directory for corpus exports
pub fn get_dataset_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("underwriting-xai")
        .join("dataset")
}
