// Chart rendering.
//
// Every chart draws onto its own in-memory SVG document, so concurrent
// requests never share a canvas.

pub mod cluster_chart;
pub mod keyword_chart;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

pub use cluster_chart::render_cluster_chart;
pub use keyword_chart::render_keyword_chart;

/// One rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub svg: String,
}

impl Figure {
    /// `data:image/svg+xml;base64,...`, ready for an `<img src>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(&self.svg))
    }
}
