// PageSource trait: where raw HTML comes from.

use async_trait::async_trait;

use crate::error::AnalysisError;

/// A fetched document before any parsing.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// Value of the Content-Type header, if the server sent one
    pub content_type: Option<String>,
    pub body: String,
}

/// Trait for retrieving a page's HTML. Async because the real source is
/// an HTTP call.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, AnalysisError>;
}
