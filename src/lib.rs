// SEOLens: single-page SEO competitor analysis
//
// This is the library root. Each module is one stage of the analysis
// pipeline, plus the CLI and web surfaces that drive it.

pub mod clustering;
pub mod config;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod keywords;
pub mod narrative;
pub mod output;
pub mod pipeline;
pub mod plot;
pub mod search;

#[cfg(feature = "web")]
pub mod web;

pub use error::AnalysisError;
