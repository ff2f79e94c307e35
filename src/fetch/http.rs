// HTTP page fetcher.
//
// A thin reqwest wrapper with an explicit timeout. Non-success statuses
// are failures, not pages: a 404 body is not the competitor's content.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::debug;

use super::traits::{FetchedPage, PageSource};
use crate::error::AnalysisError;

const USER_AGENT: &str = "seolens/0.1 (+seo-competitor-analysis)";

/// Fetches pages over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

/// Parse and validate a user-supplied URL. Only http and https are fetched.
pub fn parse_target_url(url: &str) -> Result<Url, AnalysisError> {
    let fail = |message: String| AnalysisError::Fetch {
        url: url.to_string(),
        message,
    };

    let parsed = Url::parse(url.trim()).map_err(|e| fail(format!("invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(fail(format!("unsupported scheme {other:?}"))),
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, AnalysisError> {
        let target = parse_target_url(url)?;
        let fail = |message: String| AnalysisError::Fetch {
            url: url.to_string(),
            message,
        };

        debug!(url = %target, "Fetching page");

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("server returned {status}")));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| fail(format!("failed to read body: {e}")))?;

        debug!(
            url = %final_url,
            bytes = body.len(),
            content_type = ?content_type,
            "Fetched page"
        );

        Ok(FetchedPage {
            url: final_url,
            content_type,
            body,
        })
    }
}
