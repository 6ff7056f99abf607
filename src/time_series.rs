use chrono::NaiveDate;

use crate::aggregate::DailyAverage;

/// The two measured columns of a session log
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Measurement {
    #[strum(to_string = "Words Per Minute")]
    Wpm,
    #[strum(to_string = "Accuracy")]
    Acc,
}

impl Measurement {
    pub fn of(&self, day: &DailyAverage) -> Option<f64> {
        match self {
            Measurement::Wpm => day.wpm,
            Measurement::Acc => day.acc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl DailyPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

impl From<(NaiveDate, f64)> for DailyPoint {
    fn from(v: (NaiveDate, f64)) -> Self {
        DailyPoint {
            date: v.0,
            value: v.1,
        }
    }
}

impl From<DailyPoint> for (NaiveDate, f64) {
    fn from(p: DailyPoint) -> Self {
        (p.date, p.value)
    }
}

/// Contiguous runs of days that have a value; an absent day ends a run so
/// the line is drawn with a gap there
pub fn segments(days: &[DailyAverage], measurement: Measurement) -> Vec<Vec<DailyPoint>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for day in days {
        match measurement.of(day) {
            Some(value) => current.push(DailyPoint::new(day.date, value)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

pub fn values(days: &[DailyAverage], measurement: Measurement) -> Vec<f64> {
    days.iter().filter_map(|d| measurement.of(d)).collect()
}

/// (wpm, acc) for every day that has both
pub fn pairs(days: &[DailyAverage]) -> Vec<(f64, f64)> {
    days.iter()
        .filter_map(|d| Some((d.wpm?, d.acc?)))
        .collect()
}
