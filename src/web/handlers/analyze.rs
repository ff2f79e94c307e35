// POST /analyze: run the full pipeline for one URL.
//
// Body: { "url": "https://..." }. Returns the AnalysisResult as JSON, or
// { "error", "kind" } with 400 for a malformed body and the error's own
// status for pipeline failures.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use crate::web::{analysis_error_response, api_error, AppState};

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    url: String,
}

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return api_error(StatusCode::BAD_REQUEST, "bad_request", &rejection.body_text());
        }
    };

    match state.analyzer.analyze(&request.url).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            warn!(url = %request.url, kind = e.kind(), error = %e, "Analysis failed");
            analysis_error_response(&e)
        }
    }
}
