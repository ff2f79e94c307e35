// Column-per-cluster table of keywords.
//
// Column i holds cluster i's words in keyword-rank order. Shorter columns
// are padded with empty cells so every row has one cell per cluster. The
// HTML form goes to the results page; the text form goes into the prompt.

use serde::Serialize;

use super::kmeans::ClusterAssignment;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterTable {
    pub headers: Vec<String>,
    /// Row-major; `None` marks padding
    pub rows: Vec<Vec<Option<String>>>,
}

impl ClusterTable {
    pub fn from_assignment(assignment: &ClusterAssignment) -> Self {
        let clusters = assignment.clusters();
        let headers = (0..clusters.len()).map(|i| format!("Cluster {i}")).collect();
        let depth = clusters.iter().map(Vec::len).max().unwrap_or(0);

        let rows = (0..depth)
            .map(|r| {
                clusters
                    .iter()
                    .map(|members| members.get(r).map(|w| w.to_string()))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// HTML table with a numbered index column, `None` cells rendered as "None".
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n");
        html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n      <th></th>\n");
        for header in &self.headers {
            html.push_str(&format!("      <th>{}</th>\n", escape_html(header)));
        }
        html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

        for (i, row) in self.rows.iter().enumerate() {
            html.push_str(&format!("    <tr>\n      <th>{i}</th>\n"));
            for cell in row {
                let text = cell.as_deref().map_or("None".into(), escape_html);
                html.push_str(&format!("      <td>{text}</td>\n"));
            }
            html.push_str("    </tr>\n");
        }

        html.push_str("  </tbody>\n</table>");
        html
    }

    /// Right-aligned plain-text columns, no index.
    pub fn to_text(&self) -> String {
        if self.headers.is_empty() {
            return String::new();
        }

        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(c, h)| {
                self.rows
                    .iter()
                    .map(|row| cell_text(&row[c]).chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let format_line = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:>w$}"))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let mut lines = vec![format_line(self.headers.iter().map(String::as_str).collect())];
        for row in &self.rows {
            lines.push(format_line(row.iter().map(cell_text).collect()));
        }
        lines.join("\n")
    }
}

fn cell_text(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or("None")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
