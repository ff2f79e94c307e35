// Web server: Axum JSON API plus the embedded results page.
//
// POST /analyze runs the full pipeline for one URL. POST /competitors is
// only useful when search credentials are configured; without them it
// answers 503 and analysis keeps working. Every other path serves the
// static page embedded at compile time.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use include_dir::{include_dir, Dir};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AnalysisError;
use crate::pipeline::SeoAnalyzer;
use crate::search::CompetitorSearch;

pub mod handlers;

// Results page, embedded so the binary is self-contained.
static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/web/static");

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SeoAnalyzer>,
    /// None when search credentials aren't configured
    pub search: Option<Arc<CompetitorSearch>>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("SEOLens listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(handlers::analyze::analyze))
        .route("/competitors", post(handlers::competitors::find_competitors))
        .fallback(serve_page)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check: always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Serve an embedded asset, or the results page for any unknown path.
async fn serve_page(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if !path.is_empty() {
        if let Some(file) = ASSETS.get_file(path) {
            return asset_response(file.contents(), path);
        }
    }

    match ASSETS.get_file("index.html") {
        Some(index) => asset_response(index.contents(), "index.html"),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            Body::from("Results page not embedded in this build"),
        )
            .into_response(),
    }
}

fn asset_response(contents: &'static [u8], path: &str) -> Response {
    let mime = mime_type(path);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(mime))
        .body(Body::from(contents))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// JSON error body: `{ "error": message, "kind": kind }`.
pub fn api_error(status: StatusCode, kind: &str, message: &str) -> Response {
    (
        status,
        axum::Json(serde_json::json!({ "error": message, "kind": kind })),
    )
        .into_response()
}

/// Map a pipeline failure to its status code and JSON body.
pub fn analysis_error_response(err: &AnalysisError) -> Response {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
    api_error(status, err.kind(), &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(mime_type("app.js"), "application/javascript");
        assert_eq!(mime_type("noext"), "application/octet-stream");
    }

    #[test]
    fn test_error_status_follows_kind() {
        let resp = analysis_error_response(&AnalysisError::EmptyContent);
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = analysis_error_response(&AnalysisError::external("completion API", "boom"));
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
