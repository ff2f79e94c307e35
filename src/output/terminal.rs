// Colored terminal output for analysis results and competitor lists.
//
// This module handles all terminal-specific formatting. The main.rs
// commands delegate here.

use colored::Colorize;

use crate::pipeline::AnalysisResult;

/// Display a finished analysis in the terminal.
pub fn display_analysis(result: &AnalysisResult) {
    println!(
        "\n{}",
        format!("=== SEO Analysis for {} ===", result.url).bold()
    );
    println!(
        "  {}",
        format!("analyzed {}", result.analyzed_at.format("%Y-%m-%d %H:%M UTC")).dimmed()
    );

    println!("\n{}", "Meta tags".bold());
    if result.meta_tags.is_empty() {
        println!("  {}", "(no description meta tags)".dimmed());
    }
    for line in result.meta_tags.lines() {
        println!("  {}", super::truncate_chars(line, 160));
    }

    println!("\n{}", "Headings".bold());
    if result.heading_tags.is_empty() {
        println!("  {}", "(no headings)".dimmed());
    }
    for line in result.heading_tags.lines() {
        println!("  {}", super::truncate_chars(line, 160));
    }

    println!("\n{}", "Top keywords".bold());
    let widest = result
        .keywords
        .iter()
        .map(|k| k.keyword.chars().count())
        .max()
        .unwrap_or(0);
    let top_count = result.keywords.first().map_or(1, |k| k.count.max(1));
    for (i, k) in result.keywords.iter().enumerate() {
        // Bar scaled to the most frequent keyword, 30 cells wide.
        let bar = "#".repeat((k.count * 30).div_ceil(top_count));
        println!(
            "  {:>2}. {:<widest$}  {:>4}  {}",
            i + 1,
            k.keyword,
            k.count,
            bar.cyan(),
        );
    }

    println!("\n{}", "Keyword clusters".bold());
    for (i, members) in result.clusters.iter().enumerate() {
        println!(
            "  {} {}",
            format!("Cluster {i}:").yellow(),
            members.join(", ")
        );
    }

    println!("\n{}", "SEO analysis".bold());
    for line in result.narrative.trim().lines() {
        println!("  {line}");
    }
    println!();
}

/// Display discovered competitor URLs.
pub fn display_competitors(keywords: &[String], competitors: &[String]) {
    println!(
        "\n{}",
        format!(
            "=== Competitors for {} ({} found) ===",
            keywords.join(", "),
            competitors.len()
        )
        .bold()
    );

    if competitors.is_empty() {
        println!("  {}", "No results.".dimmed());
        return;
    }

    for (i, url) in competitors.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, url.green());
    }
    println!();
}
