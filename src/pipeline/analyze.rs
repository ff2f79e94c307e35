// SeoAnalyzer: runs one page through every stage.
//
// Stages run strictly forward and the first error ends the run. The
// fetch and the completion call are async; everything between them is
// CPU-bound (HTML parsing, embedding training, k-means, MDS, plotting) and
// runs on the blocking pool so the server's workers stay free.
//
// Nothing is shared between runs except read-only state: the page source,
// the narrator, and the normalizer with its stopwords and word list.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::clustering::kmeans::{cluster_words, ClusterAssignment};
use crate::clustering::projection::project_2d;
use crate::clustering::table::ClusterTable;
use crate::config::AnalysisParams;
use crate::embedding::word2vec::{sentence_windows, train, Word2VecParams};
use crate::error::AnalysisError;
use crate::extract::snapshot::PageSnapshot;
use crate::fetch::traits::{FetchedPage, PageSource};
use crate::keywords::frequency::{format_keyword_counts, FrequencyTable, KeywordCount};
use crate::keywords::normalize::TextNormalizer;
use crate::narrative::prompt::{build_seo_prompt, PromptInputs};
use crate::narrative::traits::NarrativeGenerator;
use crate::plot::{render_cluster_chart, render_keyword_chart, Figure};

/// A clustered keyword with its position on the cluster plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedWord {
    pub word: String,
    pub cluster: usize,
    pub x: f64,
    pub y: f64,
}

/// Everything computed from the page before the narrative is requested.
#[derive(Debug, Clone)]
pub struct KeywordAnalysis {
    pub url: String,
    /// `name: content` lines for description meta tags
    pub meta_tags: String,
    /// `name: content` lines for every meta tag, as sent to the narrator
    pub all_meta_tags: String,
    /// `hN: a, b` lines
    pub heading_tags: String,
    pub keywords: Vec<KeywordCount>,
    pub assignment: ClusterAssignment,
    pub projection: Vec<ProjectedWord>,
    pub cluster_table: ClusterTable,
    pub keyword_figure: Figure,
    pub cluster_figure: Figure,
}

impl KeywordAnalysis {
    pub fn top_keywords_text(&self) -> String {
        format_keyword_counts(&self.keywords)
    }

    pub fn prompt(&self) -> String {
        let top_keywords = self.top_keywords_text();
        let table = self.cluster_table.to_text();
        build_seo_prompt(&PromptInputs {
            meta_tags: &self.all_meta_tags,
            heading_tags: &self.heading_tags,
            top_keywords: &top_keywords,
            cluster_table: &table,
        })
    }
}

/// The finished analysis, as returned by `POST /analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub url: String,
    pub meta_tags: String,
    pub heading_tags: String,
    pub top_keywords: String,
    pub keywords: Vec<KeywordCount>,
    pub cluster_table_html: String,
    pub clusters: Vec<Vec<String>>,
    pub projection: Vec<ProjectedWord>,
    /// SVG data URI
    pub keyword_plot: String,
    /// SVG data URI
    pub cluster_plot: String,
    pub narrative: String,
    pub analyzed_at: DateTime<Utc>,

    #[serde(skip)]
    pub cluster_table: ClusterTable,
    #[serde(skip)]
    pub keyword_figure: Figure,
    #[serde(skip)]
    pub cluster_figure: Figure,
}

impl AnalysisResult {
    fn assemble(analysis: KeywordAnalysis, narrative: String) -> Self {
        let clusters = analysis
            .assignment
            .clusters()
            .into_iter()
            .map(|members| members.into_iter().map(str::to_string).collect())
            .collect();

        Self {
            top_keywords: analysis.top_keywords_text(),
            cluster_table_html: analysis.cluster_table.to_html(),
            keyword_plot: analysis.keyword_figure.to_data_uri(),
            cluster_plot: analysis.cluster_figure.to_data_uri(),
            url: analysis.url,
            meta_tags: analysis.meta_tags,
            heading_tags: analysis.heading_tags,
            keywords: analysis.keywords,
            clusters,
            projection: analysis.projection,
            narrative,
            analyzed_at: Utc::now(),
            cluster_table: analysis.cluster_table,
            keyword_figure: analysis.keyword_figure,
            cluster_figure: analysis.cluster_figure,
        }
    }
}

/// Runs the full pipeline for one URL at a time; cheap to share behind an `Arc`.
pub struct SeoAnalyzer {
    source: Arc<dyn PageSource>,
    narrator: Arc<dyn NarrativeGenerator>,
    normalizer: Arc<TextNormalizer>,
    params: AnalysisParams,
}

impl SeoAnalyzer {
    pub fn new(
        source: Arc<dyn PageSource>,
        narrator: Arc<dyn NarrativeGenerator>,
        normalizer: Arc<TextNormalizer>,
        params: AnalysisParams,
    ) -> Self {
        Self {
            source,
            narrator,
            normalizer,
            params,
        }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Analyze the page at `url`.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalysisError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AnalysisError::Fetch {
                url: String::new(),
                message: "no URL given".to_string(),
            });
        }

        info!(url = %url, "Starting analysis");
        let page = self.source.fetch(url).await?;

        let analysis = self.analyze_page(page).await?;
        info!(
            url = %analysis.url,
            keywords = analysis.keywords.len(),
            clusters = analysis.assignment.num_clusters,
            "Keyword analysis complete, requesting narrative"
        );

        let prompt = analysis.prompt();
        debug!(prompt_chars = prompt.len(), "Built SEO prompt");
        let narrative = self.narrator.generate(&prompt).await?;

        info!(
            url = %analysis.url,
            narrative_chars = narrative.len(),
            "Analysis complete"
        );
        Ok(AnalysisResult::assemble(analysis, narrative))
    }

    /// Run every CPU-bound stage on an already fetched page.
    pub async fn analyze_page(&self, page: FetchedPage) -> Result<KeywordAnalysis, AnalysisError> {
        let normalizer = Arc::clone(&self.normalizer);
        let params = self.params.clone();

        tokio::task::spawn_blocking(move || {
            let snapshot = PageSnapshot::from_fetched(page)?;
            analyze_snapshot(&snapshot, &normalizer, &params)
        })
        .await
        .map_err(|e| AnalysisError::external("analysis worker", e))?
    }
}

/// Keywords, clusters, projection and plots for one parsed page.
pub fn analyze_snapshot(
    snapshot: &PageSnapshot,
    normalizer: &TextNormalizer,
    params: &AnalysisParams,
) -> Result<KeywordAnalysis, AnalysisError> {
    if snapshot.visible_text.trim().is_empty() {
        return Err(AnalysisError::EmptyContent);
    }

    let tokens = normalizer.normalize(&snapshot.visible_text);
    if tokens.is_empty() {
        return Err(AnalysisError::EmptyContent);
    }

    let frequencies = FrequencyTable::from_tokens(&tokens);
    let keywords = frequencies.top_n(params.top_n);
    debug!(
        tokens = frequencies.total(),
        distinct = frequencies.distinct(),
        "Counted keywords"
    );

    let sentences = sentence_windows(&tokens, params.sentence_len);
    let model = train(&sentences, &Word2VecParams::from(params))?;

    // With min_count above 1 some frequent-enough-to-rank words may still
    // be missing from the vocabulary.
    let vocab: Vec<String> = frequencies
        .top_keywords(params.cluster_vocab)
        .into_iter()
        .filter(|w| model.contains(w))
        .collect();

    let assignment = cluster_words(
        &vocab,
        &model,
        params.num_clusters,
        params.kmeans_restarts,
        params.seed,
    )?;

    let points = project_2d(&model.matrix(&assignment.words)?, params.seed);
    let projection = assignment
        .words
        .iter()
        .zip(&assignment.labels)
        .zip(&points)
        .map(|((word, &cluster), p)| ProjectedWord {
            word: word.clone(),
            cluster,
            x: p.x,
            y: p.y,
        })
        .collect();

    let cluster_table = ClusterTable::from_assignment(&assignment);
    let keyword_figure = render_keyword_chart(&keywords)?;
    let cluster_figure = render_cluster_chart(&assignment, &points)?;

    Ok(KeywordAnalysis {
        url: snapshot.url.clone(),
        meta_tags: snapshot.meta_description_summary(),
        all_meta_tags: snapshot.meta_tags_text(),
        heading_tags: snapshot.heading_summary(),
        keywords,
        assignment,
        projection,
        cluster_table,
        keyword_figure,
        cluster_figure,
    })
}
