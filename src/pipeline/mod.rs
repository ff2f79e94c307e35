// Analysis pipeline: fetch, extract, keywords, clusters, plots, narrative.

pub mod analyze;

pub use analyze::{AnalysisResult, KeywordAnalysis, SeoAnalyzer};
