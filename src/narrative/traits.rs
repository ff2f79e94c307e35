// NarrativeGenerator trait: the seam between the pipeline and the LLM.
//
// The hosted completion API is one implementation; tests plug in a canned
// generator so the pipeline runs without the network.

use async_trait::async_trait;

use crate::error::AnalysisError;

/// Turns a fully built prompt into free-text analysis.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Return the model's first completion for `prompt`, unmodified.
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}
