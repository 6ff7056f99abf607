use std::path::Path;

use plotters::prelude::*;

use super::{charting, create_target, render_error, DrawResult, FONT, UNPLOTTABLE};
use crate::{
    aggregate::DailyAverage,
    config::ChartSize,
    error::Result,
    time_series::{self, Measurement},
};

const TITLE: &str = "Scatter Plot: WPM vs Accuracy";

/// Daily wpm against daily accuracy; days missing either value are left out
pub fn render(days: &[DailyAverage], path: &Path, size: ChartSize) -> Result<()> {
    create_target(path)?;
    draw(&time_series::pairs(days), path, size).map_err(render_error("scatter plot"))
}

fn draw(points: &[(f64, f64)], path: &Path, size: ChartSize) -> DrawResult {
    let root = BitMapBackend::new(path, size.into()).into_drawing_area();
    root.fill(&WHITE)?;

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let x_range = charting::value_range(&xs).ok_or(UNPLOTTABLE)?;
    let y_range = charting::value_range(&ys).ok_or(UNPLOTTABLE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(Measurement::Wpm.to_string())
        .y_desc(Measurement::Acc.to_string())
        .x_label_formatter(&|v| charting::format_label(*v))
        .y_label_formatter(&|v| charting::format_label(*v))
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 5, BLUE.mix(0.7).filled())),
    )?;

    root.present()?;
    Ok(())
}
