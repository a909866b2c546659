use std::sync::Arc;
use std::time::Duration;

use super::client::{OfflineGenerator, OpenAiChatClient, TextGenerator};
use super::prompt::build_prompt;
use super::template::fallback_letter;
use super::types::{DecisionLetter, GenerationOutcome, LetterError, LetterRequest};
use crate::logic::config::LetterConfig;

/// Drafts decision letters: one generation attempt, template on any failure
#[derive(Clone)]
pub struct LetterComposer {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl LetterComposer {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Composer backed by the configured chat completions service
    pub fn from_config(config: &LetterConfig) -> Result<Self, LetterError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = OpenAiChatClient::new(config.clone())?;
        Ok(Self::new(Arc::new(client), timeout))
    }

    /// Composer that only ever uses the template
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineGenerator), Duration::from_secs(1))
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn compose(&self, request: &LetterRequest) -> DecisionLetter {
        let prompt = build_prompt(request);

        let outcome = match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
            Ok(outcome) => outcome,
            Err(_) => GenerationOutcome::Failure(LetterError::Timeout(self.timeout)),
        };

        match outcome {
            GenerationOutcome::Success(text) if !text.trim().is_empty() => {
                log::info!(
                    "Letter for policy {} drafted by {}",
                    request.policy_number,
                    self.generator.name()
                );
                DecisionLetter::generated(text)
            }
            GenerationOutcome::Success(_) => self.fall_back(
                request,
                LetterError::MalformedResponse("empty letter".to_string()),
            ),
            GenerationOutcome::Failure(reason) => self.fall_back(request, reason),
        }
    }

    fn fall_back(&self, request: &LetterRequest, reason: LetterError) -> DecisionLetter {
        match reason {
            LetterError::NotConfigured => log::info!(
                "Letter for policy {} uses the template (generation not configured)",
                request.policy_number
            ),
            _ => log::warn!(
                "Letter generation via {} failed, using template: {}",
                self.generator.name(),
                reason
            ),
        }
        DecisionLetter::template(fallback_letter(request), &reason)
    }
}
