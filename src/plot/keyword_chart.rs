// Bar chart of the top keywords by frequency.
//
// Bars and their labels are drawn as plain element series in rank order,
// so the same keywords always produce the same SVG.

use std::error::Error;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::Figure;
use crate::error::AnalysisError;
use crate::keywords::frequency::KeywordCount;

pub const KEYWORD_CHART_TITLE: &str = "Top Keywords";
const SIZE: (u32, u32) = (1200, 600);
/// Gap on each side of a bar, as a fraction of its slot.
const BAR_GAP: f64 = 0.1;

pub fn render_keyword_chart(keywords: &[KeywordCount]) -> Result<Figure, AnalysisError> {
    let mut svg = String::new();
    draw(&mut svg, keywords).map_err(|e| AnalysisError::external("plotting", e))?;
    Ok(Figure {
        title: KEYWORD_CHART_TITLE.to_string(),
        svg,
    })
}

fn draw(buf: &mut String, keywords: &[KeywordCount]) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::with_string(buf, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = keywords.len().max(1) as f64;
    let y_max = keywords.iter().map(|k| k.count).max().unwrap_or(0) + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(KEYWORD_CHART_TITLE, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..slots, 0..y_max)?;

    // Keyword names are drawn per bar below; the axis itself carries no ticks.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc("Keywords")
        .y_desc("Frequency")
        .draw()?;

    let bar_style = BLUE.mix(0.7).filled();
    chart.draw_series(keywords.iter().enumerate().map(|(i, k)| {
        let left = i as f64;
        Rectangle::new(
            [(left + BAR_GAP, 0), (left + 1.0 - BAR_GAP, k.count)],
            bar_style,
        )
    }))?;

    let label_style = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(keywords.iter().enumerate().map(|(i, k)| {
        EmptyElement::at((i as f64 + 0.5, 0usize))
            + Text::new(k.keyword.clone(), (0, 8), &label_style)
    }))?;

    root.present()?;
    Ok(())
}
