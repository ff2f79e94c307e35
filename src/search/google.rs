// Competitor discovery through the Google Custom Search JSON API.
//
// Each seed keyword is searched separately and the result links are merged,
// keeping the first occurrence of every URL. The API serves at most 10
// results per page, so larger requests walk pages with `start`.
//
// API docs: https://developers.google.com/custom-search/v1/reference/rest/v1/cse/list

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AnalysisError;

const SERVICE: &str = "search API";
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";
const PAGE_SIZE: usize = 10;
/// The API refuses `start` beyond 91, so 100 results is the ceiling.
pub const MAX_RESULTS_PER_KEYWORD: usize = 100;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
}

/// Client for competitor URL discovery.
pub struct CompetitorSearch {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    base_url: String,
}

impl CompetitorSearch {
    pub fn new(api_key: String, engine_id: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build search API client")?;

        Ok(Self {
            client,
            api_key,
            engine_id,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point at a different endpoint (a proxy, or a local stub).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Up to `num_results` links per keyword, merged and de-duplicated in
    /// first-seen order.
    pub async fn search(
        &self,
        keywords: &[String],
        num_results: usize,
    ) -> Result<Vec<String>, AnalysisError> {
        let per_keyword = num_results.clamp(1, MAX_RESULTS_PER_KEYWORD);
        let mut links = Vec::new();

        for keyword in keywords.iter().filter(|k| !k.trim().is_empty()) {
            let found = self.search_keyword(keyword.trim(), per_keyword).await?;
            debug!(keyword = %keyword, results = found.len(), "Search page(s) fetched");
            links.extend(found);
        }

        let competitors = dedup_links(links);
        info!(
            keywords = keywords.len(),
            competitors = competitors.len(),
            "Competitor search complete"
        );
        Ok(competitors)
    }

    async fn search_keyword(
        &self,
        keyword: &str,
        wanted: usize,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut links = Vec::with_capacity(wanted);

        while links.len() < wanted {
            let start = links.len() + 1;
            let num = (wanted - links.len()).min(PAGE_SIZE);

            let response = self
                .client
                .get(&self.base_url)
                .query(&[
                    ("key", self.api_key.as_str()),
                    ("cx", self.engine_id.as_str()),
                    ("q", keyword),
                    ("num", &num.to_string()),
                    ("start", &start.to_string()),
                ])
                .send()
                .await
                .map_err(|e| AnalysisError::external(SERVICE, e))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AnalysisError::external(
                    SERVICE,
                    format!("returned {status}: {body}"),
                ));
            }

            let page: SearchResponse = response
                .json()
                .await
                .map_err(|e| AnalysisError::external(SERVICE, format!("malformed response: {e}")))?;

            let got = page.items.len();
            links.extend(page.items.into_iter().map(|item| item.link));
            if got < num {
                break;
            }
        }

        links.truncate(wanted);
        Ok(links)
    }
}

/// Drop repeated links, keeping the first occurrence of each.
pub fn dedup_links<I>(links: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let links = vec![
            "https://b.example".to_string(),
            "https://a.example".to_string(),
            "https://b.example".to_string(),
            "https://c.example".to_string(),
            "https://a.example".to_string(),
        ];
        assert_eq!(
            dedup_links(links),
            vec!["https://b.example", "https://a.example", "https://c.example"]
        );
    }

    #[test]
    fn test_response_without_items() {
        let page: SearchResponse = serde_json::from_str(r#"{"kind":"customsearch#search"}"#).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_response_links() {
        let page: SearchResponse = serde_json::from_str(
            r#"{"items":[{"link":"https://x.example","title":"X"},{"link":"https://y.example"}]}"#,
        )
        .unwrap();
        let links: Vec<String> = page.items.into_iter().map(|i| i.link).collect();
        assert_eq!(links, vec!["https://x.example", "https://y.example"]);
    }

    #[tokio::test]
    async fn test_blank_keywords_make_no_requests() {
        let search = CompetitorSearch::new("k".into(), "cx".into(), Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let links = search
            .search(&["  ".to_string(), String::new()], 10)
            .await
            .unwrap();
        assert!(links.is_empty());
    }
}
