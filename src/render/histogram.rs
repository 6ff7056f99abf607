use std::path::Path;

use plotters::prelude::*;

use super::{charting, create_target, render_error, DrawResult, FONT, UNPLOTTABLE};
use crate::{
    aggregate::DailyAverage,
    config::ChartSize,
    error::Result,
    time_series::{self, Measurement},
    util,
};

const TITLE: &str = "Histogram of Words Per Minute";

/// Distribution of the daily wpm averages over `bins` equal-width buckets
pub fn render(days: &[DailyAverage], path: &Path, bins: usize, size: ChartSize) -> Result<()> {
    let values = time_series::values(days, Measurement::Wpm);
    create_target(path)?;
    draw(&values, path, bins, size).map_err(render_error("histogram"))
}

fn draw(values: &[f64], path: &Path, bins: usize, size: ChartSize) -> DrawResult {
    let root = BitMapBackend::new(path, size.into()).into_drawing_area();
    root.fill(&WHITE)?;

    let buckets = util::histogram(values, bins);
    let x_range = match (buckets.first(), buckets.last()) {
        (Some(first), Some(last)) => charting::value_range(&[first.lower, last.upper]),
        _ => Some(0.0..1.0),
    }
    .ok_or(UNPLOTTABLE)?;
    let tallest = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..tallest as f64 * 1.05)?;

    chart
        .configure_mesh()
        .x_desc(Measurement::Wpm.to_string())
        .y_desc("Frequency")
        .x_label_formatter(&|v| charting::format_label(*v))
        .y_label_formatter(&|v| charting::format_label(*v))
        .draw()?;

    chart.draw_series(buckets.iter().map(|b| {
        Rectangle::new(
            [(b.lower, 0.0), (b.upper, b.count as f64)],
            BLUE.mix(0.7).filled(),
        )
    }))?;
    chart.draw_series(
        buckets
            .iter()
            .map(|b| Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], &BLACK)),
    )?;

    root.present()?;
    Ok(())
}
