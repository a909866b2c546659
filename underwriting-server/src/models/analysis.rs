//! Analysis request models

use serde::Deserialize;
use validator::Validate;

use underwriting_core::{AnalysisRequest, ApplicationRecord, Decision};

use crate::AppError;

/// Form input for one analysis run
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, max = 200))]
    pub applicant_name: String,

    #[validate(length(min = 1, max = 64))]
    pub policy_number: String,

    pub decision: Decision,

    #[validate(range(min = 300.0, max = 850.0))]
    pub credit_score: f64,

    #[validate(range(min = 18.0, max = 100.0))]
    pub age: f64,

    #[validate(range(min = 0.0, max = 1000000.0))]
    pub income: f64,

    #[validate(range(max = 10))]
    pub claims_history: u32,

    #[validate(range(min = 0.0, max = 1000000.0))]
    pub coverage_amount: f64,
}

impl AnalyzeRequest {
    /// Validate ranges and build the core request
    pub fn into_analysis_request(self) -> Result<AnalysisRequest, AppError> {
        self.validate()?;

        let record = ApplicationRecord::new(
            self.credit_score,
            self.age,
            self.income,
            self.claims_history,
            self.coverage_amount,
        )?;

        Ok(AnalysisRequest {
            applicant_name: self.applicant_name,
            policy_number: self.policy_number,
            decision: self.decision,
            record,
        })
    }
}

/// A letter to hand back as a file
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LetterDownloadRequest {
    #[validate(length(min = 1, max = 64))]
    pub policy_number: String,

    #[validate(length(min = 1, max = 20000))]
    pub text: String,
}
