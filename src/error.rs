// Typed failures for the analysis pipeline.
//
// Every stage either produces its output or one of these. The orchestrator
// surfaces the first error it sees; the web layer maps each variant to a
// status code and a stable `kind` string so clients never see a backtrace.

use thiserror::Error;

/// Errors surfaced by `SeoAnalyzer::analyze` and the stages it runs.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network failure or non-success HTTP status while fetching the page.
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The fetched resource is not an HTML document we can extract from.
    #[error("could not parse {url} as HTML: {message}")]
    Parse { url: String, message: String },

    /// No visible text (or no tokens) remained after normalization.
    #[error("no analyzable text found on the page")]
    EmptyContent,

    /// The embedding model could not be trained on this vocabulary.
    #[error("embedding training failed: {0}")]
    ModelTraining(String),

    /// A delegated service (completion API, plotting, search, worker thread) failed.
    #[error("{service} failed: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },
}

impl AnalysisError {
    pub fn external(service: &'static str, message: impl ToString) -> Self {
        Self::ExternalService {
            service,
            message: message.to_string(),
        }
    }

    /// Stable machine-readable name used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch_error",
            Self::Parse { .. } => "parse_error",
            Self::EmptyContent => "empty_content",
            Self::ModelTraining(_) => "model_training_error",
            Self::ExternalService { .. } => "external_service_error",
        }
    }

    /// HTTP status code the web layer responds with.
    ///
    /// Upstream failures (the page or a delegated API) are 502; inputs that
    /// fetched fine but can't be analyzed are 422.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Fetch { .. } | Self::ExternalService { .. } => 502,
            Self::Parse { .. } | Self::EmptyContent | Self::ModelTraining(_) => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_status_mapping() {
        let fetch = AnalysisError::Fetch {
            url: "https://example.com".into(),
            message: "connection refused".into(),
        };
        assert_eq!(fetch.kind(), "fetch_error");
        assert_eq!(fetch.http_status(), 502);

        assert_eq!(AnalysisError::EmptyContent.kind(), "empty_content");
        assert_eq!(AnalysisError::EmptyContent.http_status(), 422);

        let llm = AnalysisError::external("completion API", "429 Too Many Requests");
        assert_eq!(llm.http_status(), 502);
        assert_eq!(
            llm.to_string(),
            "completion API failed: 429 Too Many Requests"
        );
    }
}
