// POST /competitors: discover competitor URLs from seed keywords.
//
// Body: { "keywords": [...], "num_results": 10 }. 503 when search
// credentials aren't configured.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use crate::web::{analysis_error_response, api_error, AppState};

const DEFAULT_NUM_RESULTS: usize = 10;

#[derive(Deserialize)]
pub struct CompetitorsRequest {
    keywords: Vec<String>,
    num_results: Option<usize>,
}

pub async fn find_competitors(
    State(state): State<AppState>,
    body: Result<Json<CompetitorsRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return api_error(StatusCode::BAD_REQUEST, "bad_request", &rejection.body_text());
        }
    };

    let Some(search) = state.search.as_ref() else {
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "search_unavailable",
            "Competitor search is not configured (set GOOGLE_CSE_KEY and GOOGLE_CSE_ID)",
        );
    };

    if request.keywords.iter().all(|k| k.trim().is_empty()) {
        return api_error(
            StatusCode::BAD_REQUEST,
            "bad_request",
            "At least one keyword is required",
        );
    }

    let num_results = request.num_results.unwrap_or(DEFAULT_NUM_RESULTS);
    match search.search(&request.keywords, num_results).await {
        Ok(competitors) => Json(serde_json::json!({ "competitors": competitors })).into_response(),
        Err(e) => {
            warn!(error = %e, "Competitor search failed");
            analysis_error_response(&e)
        }
    }
}
