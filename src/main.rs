use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use seolens::config::Config;
use seolens::fetch::http::HttpFetcher;
use seolens::keywords::lexicon::Lexicon;
use seolens::keywords::normalize::TextNormalizer;
use seolens::narrative::openai::OpenAiNarrator;
use seolens::output::{markdown, terminal};
use seolens::pipeline::SeoAnalyzer;
use seolens::search::CompetitorSearch;

/// SEOLens: single-page SEO competitor analysis.
///
/// Fetches a competitor's page, ranks its keywords, clusters them by
/// learned similarity, and asks a language model for a SWOT-style review.
#[derive(Parser)]
#[command(name = "seolens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (POST /analyze, results page at /)
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: $PORT or 5000)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (default: $SEOLENS_BIND or 0.0.0.0)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Analyze one page and print the report
    Analyze {
        /// The competitor page URL
        url: String,

        /// Also write report.md and the SVG charts into this directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the result as JSON instead of the colored report
        #[arg(long)]
        json: bool,
    },

    /// Find competitor URLs for seed keywords
    Competitors {
        /// One or more seed keywords
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Results per keyword (default: 10)
        #[arg(long, default_value = "10")]
        num_results: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("seolens=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            config.require_openai()?;

            let analyzer = build_analyzer(&config)?;
            let search = if config.search_enabled() {
                Some(Arc::new(build_search(&config)?))
            } else {
                info!("GOOGLE_CSE_KEY/GOOGLE_CSE_ID not set, competitor search disabled");
                None
            };

            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            let state = seolens::web::AppState {
                analyzer: Arc::new(analyzer),
                search,
            };
            seolens::web::run_server(state, port, &bind).await?;
        }

        Commands::Analyze { url, out, json } => {
            let config = Config::load()?;
            config.require_openai()?;
            let analyzer = build_analyzer(&config)?;

            let spinner = (!json).then(|| spinner(&format!("Analyzing {url}...")));
            let outcome = analyzer.analyze(&url).await;
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }

            let result = outcome.with_context(|| format!("Analysis of {url} failed"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                terminal::display_analysis(&result);
            }

            if let Some(dir) = out {
                let report = markdown::write_report(&result, &dir)?;
                if !json {
                    println!(
                        "{} {}",
                        "Report written to".green(),
                        report.display().to_string().bold()
                    );
                }
            }
        }

        Commands::Competitors {
            keywords,
            num_results,
        } => {
            let config = Config::load()?;
            config.require_search()?;
            let search = build_search(&config)?;

            let pb = spinner("Searching...");
            let outcome = search.search(&keywords, num_results).await;
            pb.finish_and_clear();

            let competitors = outcome.context("Competitor search failed")?;
            terminal::display_competitors(&keywords, &competitors);
        }
    }

    Ok(())
}

/// Wire the pipeline from configuration. The word list is read once here
/// and shared read-only by every analysis.
fn build_analyzer(config: &Config) -> Result<SeoAnalyzer> {
    let lexicon = match &config.wordlist_path {
        Some(path) => Lexicon::load(path)?,
        None => Lexicon::english(),
    };
    let normalizer = TextNormalizer::new(config.params.min_word_length, Some(lexicon));

    let fetcher = HttpFetcher::new(config.fetch_timeout)?;
    let narrator = OpenAiNarrator::new(
        config.openai_api_key.clone(),
        &config.openai_api_url,
        config.model.clone(),
        config.llm_timeout,
    )?;

    Ok(SeoAnalyzer::new(
        Arc::new(fetcher),
        Arc::new(narrator),
        Arc::new(normalizer),
        config.params.clone(),
    ))
}

fn build_search(config: &Config) -> Result<CompetitorSearch> {
    CompetitorSearch::new(
        config.google_cse_key.clone(),
        config.google_cse_id.clone(),
        config.search_timeout,
    )
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} {elapsed}")
            .expect("valid template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
