use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use tracing::debug;

use crate::{
    error::{Result, TrendError},
    event::RawEvent,
};

/// Mean wpm and accuracy over every sample taken on one UTC calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub wpm: Option<f64>,
    pub acc: Option<f64>,
}

/// Incremental mean for one measurement; absent samples never touch it.
/// Stays finite for any finite inputs, where a plain sum could overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RunningMean {
    mean: f64,
    count: usize,
}

impl RunningMean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.count += 1;
            let n = self.count as f64;
            let delta = v - self.mean;
            self.mean += if delta.is_finite() {
                delta / n
            } else {
                v / n - self.mean / n
            };
        }
    }

    fn finish(self) -> Option<f64> {
        match self.count {
            0 => None,
            _ => Some(self.mean),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DayAccumulator {
    wpm: RunningMean,
    acc: RunningMean,
}

/// UTC calendar date of a millisecond timestamp
pub fn date_of(millis: i64) -> Result<NaiveDate> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .ok_or(TrendError::TimestampOutOfRange { millis })
}

/// Group events by UTC date and average each measurement within the day.
///
/// One row per distinct date, ascending, with no gap filling. A day where
/// every value of a measurement was absent gets `None` for it.
pub fn aggregate(events: &[RawEvent]) -> Result<Vec<DailyAverage>> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for event in events {
        let day = days.entry(date_of(event.timestamp)?).or_default();
        day.wpm.push(event.wpm);
        day.acc.push(event.acc);
    }

    debug!(events = events.len(), days = days.len(), "aggregated events");

    Ok(days
        .into_iter()
        .map(|(date, day)| DailyAverage {
            date,
            wpm: day.wpm.finish(),
            acc: day.acc.finish(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    const DAY_MS: i64 = 86_400_000;
    // 2023-11-14T00:00:00Z
    const T0: i64 = 1_699_920_000_000;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_of() {
        assert_eq!(date_of(0).unwrap(), ymd(1970, 1, 1));
        assert_eq!(date_of(DAY_MS - 1).unwrap(), ymd(1970, 1, 1));
        assert_eq!(date_of(DAY_MS).unwrap(), ymd(1970, 1, 2));
        assert_eq!(date_of(-1).unwrap(), ymd(1969, 12, 31));
        assert_eq!(date_of(T0).unwrap(), ymd(2023, 11, 14));
    }

    #[test]
    fn test_date_of_out_of_range() {
        assert_matches!(
            date_of(i64::MAX),
            Err(TrendError::TimestampOutOfRange { millis: i64::MAX })
        );
    }

    #[test]
    fn same_day_events_are_averaged() {
        let events = [
            RawEvent::new(T0 + 1_000, Some(60.0), Some(90.0)),
            RawEvent::new(T0 + 3_600_000, Some(80.0), Some(95.0)),
        ];

        let days = aggregate(&events).unwrap();
        assert_eq!(
            days,
            vec![DailyAverage {
                date: ymd(2023, 11, 14),
                wpm: Some(70.0),
                acc: Some(92.5),
            }]
        );
    }

    #[test]
    fn each_day_averages_only_its_own_events() {
        let events = [
            RawEvent::new(T0, Some(50.0), Some(80.0)),
            RawEvent::new(T0 + DAY_MS, Some(100.0), Some(100.0)),
            RawEvent::new(T0 + 10, Some(70.0), Some(90.0)),
        ];

        let days = aggregate(&events).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, ymd(2023, 11, 14));
        assert_eq!(days[0].wpm, Some(60.0));
        assert_eq!(days[0].acc, Some(85.0));
        assert_eq!(days[1].date, ymd(2023, 11, 15));
        assert_eq!(days[1].wpm, Some(100.0));
        assert_eq!(days[1].acc, Some(100.0));
    }

    #[test]
    fn absent_values_are_skipped_not_zeroed() {
        let events = [
            RawEvent::new(T0, None, Some(90.0)),
            RawEvent::new(T0 + 5, Some(80.0), None),
            RawEvent::new(T0 + 9, Some(40.0), Some(96.0)),
        ];

        let days = aggregate(&events).unwrap();
        assert_eq!(days[0].wpm, Some(60.0));
        assert_eq!(days[0].acc, Some(93.0));
    }

    #[test]
    fn all_absent_measurement_stays_absent() {
        let events = [
            RawEvent::new(T0, None, Some(90.0)),
            RawEvent::new(T0 + 5, None, Some(94.0)),
            RawEvent::new(T0 + DAY_MS, Some(75.0), None),
        ];

        let days = aggregate(&events).unwrap();
        assert_eq!(days[0].wpm, None);
        assert_eq!(days[0].acc, Some(92.0));
        assert_eq!(days[1].wpm, Some(75.0));
        assert_eq!(days[1].acc, None);
    }

    #[test]
    fn one_row_per_distinct_date_in_order() {
        let offsets = [5, 0, 3, 5, 1, 0, 3, 3];
        let events: Vec<_> = offsets
            .iter()
            .enumerate()
            .map(|(i, days)| RawEvent::new(T0 + days * DAY_MS + i as i64, Some(50.0), Some(90.0)))
            .collect();

        let rows = aggregate(&events).unwrap();
        let distinct: HashSet<_> = offsets.iter().collect();
        assert_eq!(rows.len(), distinct.len());
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn missing_days_are_not_filled() {
        let events = [
            RawEvent::new(T0, Some(50.0), Some(90.0)),
            RawEvent::new(T0 + 7 * DAY_MS, Some(55.0), Some(91.0)),
        ];

        let dates: Vec<_> = aggregate(&events)
            .unwrap()
            .into_iter()
            .map(|d| d.date)
            .collect();
        assert_eq!(dates, vec![ymd(2023, 11, 14), ymd(2023, 11, 21)]);
    }

    #[test]
    fn huge_values_do_not_overflow_the_mean() {
        let events = [
            RawEvent::new(T0, Some(1e308), Some(-1e308)),
            RawEvent::new(T0 + 1, Some(1e308), Some(1e308)),
            RawEvent::new(T0 + 2, Some(f64::MAX), Some(-f64::MAX)),
        ];

        let days = aggregate(&events).unwrap();
        let wpm = days[0].wpm.unwrap();
        let acc = days[0].acc.unwrap();
        assert!(wpm.is_finite() && wpm >= 1e308);
        assert!(acc.is_finite() && acc < 0.0);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let events = [
            RawEvent::new(T0, Some(61.5), None),
            RawEvent::new(T0 + DAY_MS, Some(72.25), Some(97.0)),
            RawEvent::new(T0 + 2, None, Some(88.0)),
        ];

        assert_eq!(aggregate(&events).unwrap(), aggregate(&events).unwrap());
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(aggregate(&[]).unwrap().is_empty());
    }
}
