// Scatter of projected keywords, one colour per cluster, every point
// labelled with its word.

use std::error::Error;

use plotters::prelude::*;

use super::Figure;
use crate::clustering::kmeans::ClusterAssignment;
use crate::clustering::projection::PlanarPoint;
use crate::error::AnalysisError;

pub const CLUSTER_CHART_TITLE: &str = "Word Clusters based on Thematic Relatedness";
const SIZE: (u32, u32) = (900, 900);

/// `points[i]` is the position of `assignment.words[i]`.
pub fn render_cluster_chart(
    assignment: &ClusterAssignment,
    points: &[PlanarPoint],
) -> Result<Figure, AnalysisError> {
    if assignment.words.len() != points.len() {
        return Err(AnalysisError::external(
            "plotting",
            format!(
                "{} words but {} projected points",
                assignment.words.len(),
                points.len()
            ),
        ));
    }

    let mut svg = String::new();
    draw(&mut svg, assignment, points).map_err(|e| AnalysisError::external("plotting", e))?;
    Ok(Figure {
        title: CLUSTER_CHART_TITLE.to_string(),
        svg,
    })
}

fn draw(
    buf: &mut String,
    assignment: &ClusterAssignment,
    points: &[PlanarPoint],
) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::with_string(buf, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_range, y_range) = padded_bounds(points);
    let mut chart = ChartBuilder::on(&root)
        .caption(CLUSTER_CHART_TITLE, ("sans-serif", 24))
        .margin(30)
        .build_cartesian_2d(x_range, y_range)?;

    for cluster in 0..assignment.num_clusters {
        let color = Palette99::pick(cluster).mix(0.8);
        let members: Vec<(f64, f64, &str)> = assignment
            .words
            .iter()
            .zip(&assignment.labels)
            .zip(points)
            .filter(|((_, label), _)| **label == cluster)
            .map(|((word, _), p)| (p.x, p.y, word.as_str()))
            .collect();

        chart
            .draw_series(
                members
                    .iter()
                    .map(|&(x, y, _)| Circle::new((x, y), 6, color.filled())),
            )?
            .label(format!("Cluster {cluster}"))
            .legend(move |(x, y)| Circle::new((x, y), 6, color.filled()));

        chart.draw_series(members.iter().map(|&(x, y, word)| {
            Text::new(word.to_string(), (x, y), ("sans-serif", 14).into_font())
        }))?;
    }

    if assignment.num_clusters > 0 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Axis ranges covering every point with a 10% margin.
fn padded_bounds(points: &[PlanarPoint]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    fn span(values: impl Iterator<Item = f64> + Clone) -> std::ops::Range<f64> {
        let lo = values.clone().fold(f64::INFINITY, f64::min);
        let hi = values.fold(f64::NEG_INFINITY, f64::max);
        if !lo.is_finite() || !hi.is_finite() {
            return -1.0..1.0;
        }
        let pad = ((hi - lo) * 0.1).max(0.1);
        (lo - pad)..(hi + pad)
    }

    (
        span(points.iter().map(|p| p.x)),
        span(points.iter().map(|p| p.y)),
    )
}
