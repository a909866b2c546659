//! Letter Module - Decision Letter Composer
//!
//! Builds the prompt from the ranked factors, asks a `TextGenerator` for the
//! letter and falls back to a fixed template when that fails.

pub mod types;
pub mod prompt;
pub mod client;
pub mod template;
pub mod composer;


use once_cell::sync::Lazy;
use regex::Regex;

pub use client::{OfflineGenerator, OpenAiChatClient, TextGenerator};
pub use composer::LetterComposer;
pub use prompt::build_prompt;
pub use template::fallback_letter;
pub use types::{
    ChatPrompt, Decision, DecisionLetter, GenerationOutcome, LetterError, LetterRequest,
    LetterSource,
};

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));

/// Download name for a letter: `explanation_letter_<policy>.txt`
pub fn letter_file_name(policy_number: &str) -> String {
    let policy = UNSAFE_FILE_CHARS.replace_all(policy_number.trim(), "_");
    let policy = if policy.is_empty() { "unknown".into() } else { policy };
    format!("explanation_letter_{}.txt", policy)
}
