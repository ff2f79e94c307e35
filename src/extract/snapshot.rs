// PageSnapshot: the structured view of one fetched page.
//
// Built once per analysis from the raw HTML and never mutated. Text inside
// <script>, <style>, <noscript> and <template> is not visible to a reader
// and is left out of `visible_text`.

use std::collections::BTreeMap;

use scraper::{Html, Selector};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::fetch::traits::FetchedPage;

/// Heading levels in document order.
pub const HEADING_LEVELS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Headings this short (in chars) are dropped from summaries.
const MIN_HEADING_CHARS: usize = 3;

const HIDDEN_CONTAINERS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Content types that are never HTML documents.
const NON_HTML_PREFIXES: [&str; 6] = [
    "image/",
    "audio/",
    "video/",
    "font/",
    "application/pdf",
    "application/octet-stream",
];

/// Structured fields extracted from a page.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(skip)]
    pub raw_html: String,
    /// `<meta name=.. content=..>` pairs in first-seen order. A repeated
    /// name keeps its first position and its last content.
    pub meta_tags: Vec<(String, String)>,
    /// h1..h6 → heading texts in document order. Every level is present.
    pub heading_tags: BTreeMap<String, Vec<String>>,
    pub visible_text: String,
}

impl PageSnapshot {
    /// Parse a fetched page. Fails only when the resource is clearly not HTML.
    pub fn from_fetched(page: FetchedPage) -> Result<Self, AnalysisError> {
        ensure_html(&page)?;
        Ok(Self::parse(page.url, page.body))
    }

    /// Parse raw HTML. html5ever recovers from any markup, so this can't fail.
    pub fn parse(url: String, raw_html: String) -> Self {
        let doc = Html::parse_document(&raw_html);

        let meta_tags = extract_meta_tags(&doc);
        let heading_tags = extract_heading_tags(&doc);
        let visible_text = extract_visible_text(&doc);

        Self {
            url,
            raw_html,
            meta_tags,
            heading_tags,
            visible_text,
        }
    }

    /// Meta tags whose name mentions "description", one `name: content` per line.
    pub fn meta_description_summary(&self) -> String {
        let mut out = String::new();
        for (name, content) in &self.meta_tags {
            if name.to_lowercase().contains("description") {
                out.push_str(&format!("{name}: {content}\n"));
            }
        }
        out
    }

    /// All meta tags, one `name: content` per line.
    pub fn meta_tags_text(&self) -> String {
        self.meta_tags
            .iter()
            .map(|(name, content)| format!("{name}: {content}\n"))
            .collect()
    }

    /// Headings longer than two characters, grouped by level. Levels with
    /// nothing left are omitted.
    pub fn filtered_headings(&self) -> Vec<(&str, Vec<&str>)> {
        HEADING_LEVELS
            .iter()
            .filter_map(|level| {
                let kept: Vec<&str> = self
                    .heading_tags
                    .get(*level)?
                    .iter()
                    .map(String::as_str)
                    .filter(|h| h.chars().count() >= MIN_HEADING_CHARS)
                    .collect();
                (!kept.is_empty()).then_some((*level, kept))
            })
            .collect()
    }

    /// `h2: First, Second` per level, from `filtered_headings`.
    pub fn heading_summary(&self) -> String {
        self.filtered_headings()
            .into_iter()
            .map(|(level, headings)| format!("{level}: {}\n", headings.join(", ")))
            .collect()
    }
}

/// Reject resources that are obviously not HTML documents.
fn ensure_html(page: &FetchedPage) -> Result<(), AnalysisError> {
    if let Some(ct) = page.content_type.as_deref() {
        let mime = ct.split(';').next().unwrap_or("").trim().to_lowercase();
        if NON_HTML_PREFIXES.iter().any(|p| mime.starts_with(p)) {
            return Err(AnalysisError::Parse {
                url: page.url.clone(),
                message: format!("content type {mime} is not HTML"),
            });
        }
    }

    if page.body.contains('\0') {
        return Err(AnalysisError::Parse {
            url: page.url.clone(),
            message: "body is binary data".to_string(),
        });
    }

    Ok(())
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn extract_meta_tags(doc: &Html) -> Vec<(String, String)> {
    let sel = selector("meta[name]");
    let mut tags: Vec<(String, String)> = Vec::new();

    for el in doc.select(&sel) {
        let Some(name) = el.value().attr("name") else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let content = el.value().attr("content").unwrap_or("").to_string();

        match tags.iter_mut().find(|(n, _)| n.as_str() == name) {
            Some(existing) => existing.1 = content,
            None => tags.push((name.to_string(), content)),
        }
    }

    tags
}

fn extract_heading_tags(doc: &Html) -> BTreeMap<String, Vec<String>> {
    HEADING_LEVELS
        .iter()
        .map(|level| {
            let sel = Selector::parse(level).expect("heading selector is valid");
            let texts = doc
                .select(&sel)
                .map(|el| norm_ws(&el.text().collect::<Vec<_>>().join(" ")))
                .collect();
            (level.to_string(), texts)
        })
        .collect()
}

fn extract_visible_text(doc: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in doc.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| HIDDEN_CONTAINERS.contains(&e.name()))
        });
        if !hidden {
            parts.push(&**text);
        }
    }

    norm_ws(&parts.join(" "))
}

fn norm_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
