pub mod charting;
pub mod daily;
pub mod histogram;
pub mod scatter;

use std::{
    error::Error,
    fs::{self, File},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    aggregate::DailyAverage,
    config::ChartConfig,
    error::{Result, TrendError},
};

pub const DAILY_AVERAGES_FILE: &str = "daily_averages.png";
pub const HISTOGRAM_FILE: &str = "histogram.png";
pub const SCATTER_FILE: &str = "scatter.png";

const FONT: &str = "sans-serif";
const UNPLOTTABLE: &str = "values span more than f64 can represent";

type DrawResult = std::result::Result<(), Box<dyn Error>>;

fn render_error(chart: &'static str) -> impl FnOnce(Box<dyn Error>) -> TrendError {
    move |e| TrendError::Render {
        chart,
        message: e.to_string(),
    }
}

/// Create the chart file before drawing so a filesystem failure surfaces as
/// its `io::Error` instead of a backend message
fn create_target(path: &Path) -> Result<()> {
    File::create(path)
        .map(drop)
        .map_err(|e| TrendError::io(path, e))
}

/// Write all three charts into `out_dir`, in order, returning the written paths
pub fn render_all<P: AsRef<Path>>(
    days: &[DailyAverage],
    out_dir: P,
    cfg: &ChartConfig,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|e| TrendError::io(out_dir, e))?;

    let daily_path = out_dir.join(DAILY_AVERAGES_FILE);
    daily::render(days, &daily_path, cfg.daily_size)?;
    info!(path = %daily_path.display(), "wrote daily averages chart");

    let histogram_path = out_dir.join(HISTOGRAM_FILE);
    histogram::render(days, &histogram_path, cfg.histogram_bins, cfg.histogram_size)?;
    info!(path = %histogram_path.display(), "wrote histogram");

    let scatter_path = out_dir.join(SCATTER_FILE);
    scatter::render(days, &scatter_path, cfg.scatter_size)?;
    info!(path = %scatter_path.display(), "wrote scatter plot");

    Ok(vec![daily_path, histogram_path, scatter_path])
}
