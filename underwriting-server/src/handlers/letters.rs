//! Letter download handler

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use underwriting_core::letter_file_name;

use crate::models::LetterDownloadRequest;
use crate::AppResult;

/// Return the letter as a plain-text attachment named after the policy
pub async fn download(Json(req): Json<LetterDownloadRequest>) -> AppResult<Response> {
    req.validate()?;

    let disposition = format!("attachment; filename=\"{}\"", letter_file_name(&req.policy_number));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        req.text,
    )
        .into_response())
}
