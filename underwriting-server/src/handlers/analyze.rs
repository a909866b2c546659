//! Analysis handler

use axum::{extract::State, Json};

use underwriting_core::Analysis;

use crate::models::AnalyzeRequest;
use crate::{AppResult, AppState};

/// Train (or reuse) the model, explain the applicant and draft the letter
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> AppResult<Json<Analysis>> {
    let request = req.into_analysis_request()?;
    tracing::debug!("Analyzing policy {}", request.policy_number);

    let analysis = state.pipeline.run(request).await?;
    tracing::info!(
        run_id = %analysis.run_id,
        policy = %analysis.policy_number,
        letter_source = ?analysis.letter.source,
        "Analysis complete"
    );

    Ok(Json(analysis))
}
