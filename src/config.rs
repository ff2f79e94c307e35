use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Completion model used for the SEO narrative.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Tuning knobs for the keyword pipeline.
///
/// Defaults mirror the values the analysis has always used: top-10 keywords
/// for display, top-50 for clustering into 5 groups, 100-dim embeddings
/// trained on 10-token windows.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    /// Tokens shorter than this (in chars) are dropped
    pub min_word_length: usize,
    /// How many keywords to show and send to the model
    pub top_n: usize,
    /// Length of the non-overlapping token windows used as training sentences
    pub sentence_len: usize,
    /// Embedding dimensionality
    pub vector_size: usize,
    /// Context window on each side of the target during training
    pub context_window: usize,
    /// Minimum occurrences for a token to enter the embedding vocabulary
    pub min_count: usize,
    /// Negative samples per training pair
    pub negative: usize,
    /// Passes over the training sentences
    pub epochs: usize,
    /// How many top keywords are clustered and plotted
    pub cluster_vocab: usize,
    /// Requested number of clusters (capped at the number of tokens)
    pub num_clusters: usize,
    /// Independent k-means runs; the lowest-inertia one wins
    pub kmeans_restarts: usize,
    /// Seed for training, clustering and projection
    pub seed: u64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_word_length: 3,
            top_n: 10,
            sentence_len: 10,
            vector_size: 100,
            context_window: 5,
            min_count: 1,
            negative: 5,
            epochs: 5,
            cluster_vocab: 50,
            num_clusters: 5,
            kmeans_restarts: 10,
            seed: 42,
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    /// Base URL of the completions API (override for proxies or tests)
    pub openai_api_url: String,
    pub model: String,
    pub fetch_timeout: Duration,
    pub llm_timeout: Duration,
    pub search_timeout: Duration,
    /// Replacement for the bundled English word list, one word per line
    pub wordlist_path: Option<PathBuf>,
    /// Google Custom Search credentials for competitor discovery
    pub google_cse_key: String,
    pub google_cse_id: String,
    pub port: u16,
    pub bind: String,
    pub params: AnalysisParams,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing is required here; call `require_openai` before anything
    /// that generates a narrative.
    pub fn load() -> Result<Self> {
        let mut params = AnalysisParams::default();
        if let Ok(seed) = env::var("SEOLENS_SEED") {
            params.seed = seed
                .parse()
                .with_context(|| format!("SEOLENS_SEED must be an integer, got {seed:?}"))?;
        }

        let port = match env::var("PORT") {
            Ok(p) => p
                .parse()
                .with_context(|| format!("PORT must be a port number, got {p:?}"))?,
            Err(_) => 5000,
        };

        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),
            model: env::var("SEOLENS_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            fetch_timeout: secs_var("SEOLENS_FETCH_TIMEOUT_SECS", 20)?,
            llm_timeout: secs_var("SEOLENS_LLM_TIMEOUT_SECS", 60)?,
            search_timeout: secs_var("SEOLENS_SEARCH_TIMEOUT_SECS", 20)?,
            wordlist_path: env::var("SEOLENS_WORDLIST").ok().map(PathBuf::from),
            google_cse_key: env::var("GOOGLE_CSE_KEY").unwrap_or_default(),
            google_cse_id: env::var("GOOGLE_CSE_ID").unwrap_or_default(),
            port,
            bind: env::var("SEOLENS_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            params,
        })
    }

    /// Check that the completion API key is configured.
    /// The server refuses to start without it.
    pub fn require_openai(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Whether both Google Custom Search credentials are present.
    pub fn search_enabled(&self) -> bool {
        !self.google_cse_key.is_empty() && !self.google_cse_id.is_empty()
    }

    /// Check that competitor search credentials are configured.
    pub fn require_search(&self) -> Result<()> {
        if !self.search_enabled() {
            anyhow::bail!(
                "GOOGLE_CSE_KEY and GOOGLE_CSE_ID must both be set for competitor search.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}

fn secs_var(name: &str, default: u64) -> Result<Duration> {
    match env::var(name) {
        Ok(v) => {
            let secs: u64 = v
                .parse()
                .with_context(|| format!("{name} must be a number of seconds, got {v:?}"))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config() -> Config {
        Config {
            openai_api_key: String::new(),
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            fetch_timeout: Duration::from_secs(20),
            llm_timeout: Duration::from_secs(60),
            search_timeout: Duration::from_secs(20),
            wordlist_path: None,
            google_cse_key: String::new(),
            google_cse_id: String::new(),
            port: 5000,
            bind: "0.0.0.0".to_string(),
            params: AnalysisParams::default(),
        }
    }

    #[test]
    fn test_require_openai_fails_without_key() {
        let config = bare_config();
        let err = config.require_openai().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_require_openai_passes_with_key() {
        let config = Config {
            openai_api_key: "sk-test".to_string(),
            ..bare_config()
        };
        assert!(config.require_openai().is_ok());
    }

    #[test]
    fn test_search_needs_both_credentials() {
        let half = Config {
            google_cse_key: "key".to_string(),
            ..bare_config()
        };
        assert!(!half.search_enabled());
        assert!(half.require_search().is_err());

        let full = Config {
            google_cse_id: "cx".to_string(),
            ..half
        };
        assert!(full.search_enabled());
    }

    #[test]
    fn test_default_params() {
        let p = AnalysisParams::default();
        assert_eq!(p.min_word_length, 3);
        assert_eq!(p.top_n, 10);
        assert_eq!(p.sentence_len, 10);
        assert_eq!(p.vector_size, 100);
        assert_eq!(p.cluster_vocab, 50);
        assert_eq!(p.num_clusters, 5);
    }
}
