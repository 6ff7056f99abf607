use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    aggregate::{self, DailyAverage},
    config::ChartConfig,
    error::Result,
    event::{self, LoadedEvents},
    render,
    time_series::{self, Measurement},
    util,
};

/// Overall numbers for one run, over the daily averages
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub events: usize,
    pub days: usize,
    pub skipped_cells: usize,
    pub dropped_rows: usize,
    pub wpm_mean: Option<f64>,
    pub wpm_std_dev: Option<f64>,
    pub acc_mean: Option<f64>,
    pub acc_std_dev: Option<f64>,
}

impl Summary {
    pub fn from_days(loaded: &LoadedEvents, days: &[DailyAverage]) -> Self {
        let wpm = time_series::values(days, Measurement::Wpm);
        let acc = time_series::values(days, Measurement::Acc);

        Self {
            events: loaded.events.len(),
            days: days.len(),
            skipped_cells: loaded.skipped_cells,
            dropped_rows: loaded.dropped_rows,
            wpm_mean: util::mean(&wpm),
            wpm_std_dev: util::std_dev(&wpm),
            acc_mean: util::mean(&acc),
            acc_std_dev: util::std_dev(&acc),
        }
    }
}

fn fmt_stat(mean: Option<f64>, sd: Option<f64>) -> String {
    match (mean, sd) {
        (Some(m), Some(sd)) => format!("{m:.2} (sd {sd:.2})"),
        _ => "n/a".to_string(),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sessions over {} days, daily wpm {}, daily acc {}",
            self.events,
            self.days,
            fmt_stat(self.wpm_mean, self.wpm_std_dev),
            fmt_stat(self.acc_mean, self.acc_std_dev),
        )?;
        if self.skipped_cells > 0 || self.dropped_rows > 0 {
            write!(
                f,
                " ({} non-numeric cells skipped, {} rows without timestamp)",
                self.skipped_cells, self.dropped_rows
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub days: Vec<DailyAverage>,
    pub summary: Summary,
    pub outputs: Vec<PathBuf>,
}

/// Load the log at `input`, average it per day and write the charts to `out_dir`
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    out_dir: Q,
    cfg: &ChartConfig,
) -> Result<Report> {
    let loaded = event::load_events(input)?;
    let days = aggregate::aggregate(&loaded.events)?;
    let summary = Summary::from_days(&loaded, &days);
    info!(days = days.len(), "computed daily averages");

    let outputs = render::render_all(&days, out_dir, cfg)?;

    Ok(Report {
        days,
        summary,
        outputs,
    })
}
