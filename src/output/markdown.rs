// Markdown report written by `seolens analyze --out`.
//
// The report sits next to the two SVG charts and links them by file name,
// so the output directory can be opened or shared as a unit.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::pipeline::AnalysisResult;

pub const KEYWORD_PLOT_FILE: &str = "keyword_plot.svg";
pub const CLUSTER_PLOT_FILE: &str = "cluster_plot.svg";
pub const REPORT_FILE: &str = "report.md";

/// Render the analysis as a Markdown document.
pub fn render_report(result: &AnalysisResult) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# SEO Analysis: {}\n", result.url);
    let _ = writeln!(
        md,
        "_Generated {}_\n",
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    md.push_str("## Meta Tags\n\n");
    push_block(&mut md, &result.meta_tags, "No description meta tags.");

    md.push_str("## Heading Tags\n\n");
    push_block(&mut md, &result.heading_tags, "No headings.");

    md.push_str("## Top Keywords\n\n");
    if result.keywords.is_empty() {
        md.push_str("No keywords.\n\n");
    } else {
        md.push_str("| Keyword | Count |\n|---|---:|\n");
        for k in &result.keywords {
            let _ = writeln!(md, "| {} | {} |", k.keyword, k.count);
        }
        md.push('\n');
    }
    let _ = writeln!(md, "![Top Keywords]({KEYWORD_PLOT_FILE})\n");

    md.push_str("## Keyword Clusters\n\n");
    let table = &result.cluster_table;
    if table.is_empty() {
        md.push_str("No clusters.\n\n");
    } else {
        let _ = writeln!(md, "| {} |", table.headers.join(" | "));
        let _ = writeln!(md, "|{}", "---|".repeat(table.num_columns()));
        for row in &table.rows {
            let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
            let _ = writeln!(md, "| {} |", cells.join(" | "));
        }
        md.push('\n');
    }
    let _ = writeln!(md, "![Word Clusters]({CLUSTER_PLOT_FILE})\n");

    md.push_str("## SEO Analysis\n\n");
    md.push_str(result.narrative.trim());
    md.push('\n');

    md
}

fn push_block(md: &mut String, text: &str, empty: &str) {
    if text.trim().is_empty() {
        let _ = writeln!(md, "{empty}\n");
    } else {
        let _ = writeln!(md, "```\n{}\n```\n", text.trim_end());
    }
}

/// Write the report and both charts into `dir`, creating it if needed.
/// Returns the report's path.
pub fn write_report(result: &AnalysisResult, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let files = [
        (KEYWORD_PLOT_FILE, result.keyword_figure.svg.as_str()),
        (CLUSTER_PLOT_FILE, result.cluster_figure.svg.as_str()),
    ];
    for (name, svg) in files {
        let path = dir.join(name);
        fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let report_path = dir.join(REPORT_FILE);
    fs::write(&report_path, render_report(result))
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    info!(path = %report_path.display(), "Report written");
    Ok(report_path)
}
