use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::logic::explain::RankedFactor;

/// Outcome chosen by the human underwriter. The model only explains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(alias = "approved", alias = "APPROVED")]
    Approved,
    #[serde(alias = "rejected", alias = "REJECTED")]
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Ok(Decision::Approved),
            "rejected" => Ok(Decision::Rejected),
            other => Err(format!("unknown decision '{}', expected Approved or Rejected", other)),
        }
    }
}

/// Everything a letter is written from
#[derive(Debug, Clone, Serialize)]
pub struct LetterRequest {
    pub applicant_name: String,
    pub policy_number: String,
    pub decision: Decision,
    /// Ranked, sign-corrected factors
    pub factors: Vec<RankedFactor>,
}

impl LetterRequest {
    pub fn new(
        applicant_name: impl Into<String>,
        policy_number: impl Into<String>,
        decision: Decision,
        factors: Vec<RankedFactor>,
    ) -> Self {
        Self {
            applicant_name: applicant_name.into(),
            policy_number: policy_number.into(),
            decision,
            factors,
        }
    }

    /// "<Label> (<value>) impacted the decision positively|negatively"
    pub fn factor_lines(&self) -> Vec<String> {
        self.factors
            .iter()
            .map(|f| {
                format!(
                    "{} ({}) impacted the decision {}",
                    f.label,
                    f.display_value(),
                    f.impact().adverb()
                )
            })
            .collect()
    }
}

/// System + user message pair for one generation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

/// Why a generation attempt did not produce a letter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LetterError {
    #[error("no API key configured")]
    NotConfigured,
    #[error("authentication rejected (HTTP {0})")]
    Auth(u16),
    #[error("rate limited or quota exhausted")]
    RateLimited,
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Explicit result of one generation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Success(String),
    Failure(LetterError),
}

impl From<Result<String, LetterError>> for GenerationOutcome {
    fn from(result: Result<String, LetterError>) -> Self {
        match result {
            Ok(text) => GenerationOutcome::Success(text),
            Err(e) => GenerationOutcome::Failure(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterSource {
    Generated,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionLetter {
    pub text: String,
    pub source: LetterSource,
    /// Set when the template stood in for the generator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl DecisionLetter {
    pub fn generated(text: String) -> Self {
        Self {
            text,
            source: LetterSource::Generated,
            fallback_reason: None,
        }
    }

    pub fn template(text: String, reason: &LetterError) -> Self {
        Self {
            text,
            source: LetterSource::Template,
            fallback_reason: Some(reason.to_string()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == LetterSource::Template
    }
}
