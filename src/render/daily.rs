use std::path::Path;

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{charting, create_target, render_error, DrawResult, FONT, UNPLOTTABLE};
use crate::{
    aggregate::DailyAverage,
    config::ChartSize,
    error::Result,
    time_series::{self, Measurement},
};

const TITLE: &str = "Daily Averages of Words Per Minute and Accuracy";

/// Dual-axis line chart: wpm on the left axis, accuracy on the right
pub fn render(days: &[DailyAverage], path: &Path, size: ChartSize) -> Result<()> {
    create_target(path)?;
    draw(days, path, size).map_err(render_error("daily averages chart"))
}

fn draw(days: &[DailyAverage], path: &Path, size: ChartSize) -> DrawResult {
    let root = BitMapBackend::new(path, size.into()).into_drawing_area();
    root.fill(&WHITE)?;

    let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
    let x_range = charting::date_range(&dates);
    let wpm_range = charting::value_range(&time_series::values(days, Measurement::Wpm))
        .ok_or(UNPLOTTABLE)?;
    let acc_range = charting::value_range(&time_series::values(days, Measurement::Acc))
        .ok_or(UNPLOTTABLE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), wpm_range)?
        .set_secondary_coord(x_range, acc_range);

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(Measurement::Wpm.to_string())
        .x_label_formatter(&|d| d.format("%Y-%m-%d").to_string())
        .y_label_formatter(&|v| charting::format_label(*v))
        .y_label_style((FONT, 14).into_font().color(&BLUE))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc(Measurement::Acc.to_string())
        .y_label_formatter(&|v| charting::format_label(*v))
        .label_style((FONT, 14).into_font().color(&RED))
        .draw()?;

    let wpm_runs = time_series::segments(days, Measurement::Wpm);
    let acc_runs = time_series::segments(days, Measurement::Acc);

    for (i, run) in wpm_runs.iter().enumerate() {
        let series = chart.draw_series(
            LineSeries::new(run.iter().map(|p| (p.date, p.value)), BLUE.stroke_width(2))
                .point_size(4),
        )?;
        if i == 0 {
            series
                .label(Measurement::Wpm.to_string())
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
        }
    }

    for (i, run) in acc_runs.iter().enumerate() {
        let series = chart.draw_secondary_series(DashedLineSeries::new(
            run.iter().map(|p| (p.date, p.value)),
            8,
            5,
            RED.stroke_width(2),
        ))?;
        if i == 0 {
            series
                .label(Measurement::Acc.to_string())
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
        }
        chart.draw_secondary_series(
            run.iter()
                .map(|p| Circle::new((p.date, p.value), 4, RED.filled())),
        )?;
    }

    if !wpm_runs.is_empty() || !acc_runs.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
