use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{Result, TrendError};

pub const TIMESTAMP: &str = "timestamp";
pub const WPM: &str = "wpm";
pub const ACC: &str = "acc";

/// One typing-test sample as read from the log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent {
    /// milliseconds since the unix epoch
    pub timestamp: i64,
    pub wpm: Option<f64>,
    pub acc: Option<f64>,
}

impl RawEvent {
    pub fn new(timestamp: i64, wpm: Option<f64>, acc: Option<f64>) -> Self {
        Self {
            timestamp,
            wpm,
            acc,
        }
    }
}

/// Events read from a log plus bookkeeping about what had to be left out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedEvents {
    pub events: Vec<RawEvent>,
    /// wpm/acc cells that did not hold a usable number
    pub skipped_cells: usize,
    /// rows with an empty timestamp, which cannot be assigned to a day
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: usize,
    wpm: usize,
    acc: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or(TrendError::MissingColumn(name))
        };

        Ok(Self {
            timestamp: find(TIMESTAMP)?,
            wpm: find(WPM)?,
            acc: find(ACC)?,
        })
    }
}

/// Read a session log from disk
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<LoadedEvents> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TrendError::io(path, e))?;
    let loaded = read_events(file)?;

    info!(
        path = %path.display(),
        events = loaded.events.len(),
        skipped_cells = loaded.skipped_cells,
        dropped_rows = loaded.dropped_rows,
        "loaded session log"
    );

    Ok(loaded)
}

/// Read a session log from any csv source. Header resolution happens before
/// the first record is touched, so a missing column fails fast.
pub fn read_events<R: io::Read>(reader: R) -> Result<LoadedEvents> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::resolve(rdr.headers()?)?;

    let mut loaded = LoadedEvents::default();

    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        let row = record
            .position()
            .map_or(index as u64 + 2, |position| position.line());

        let timestamp_cell = record.get(columns.timestamp).unwrap_or("").trim();
        if timestamp_cell.is_empty() {
            debug!(row, "dropping row without a timestamp");
            loaded.dropped_rows += 1;
            continue;
        }

        let timestamp =
            parse_timestamp(timestamp_cell).ok_or_else(|| TrendError::InvalidTimestamp {
                row,
                value: timestamp_cell.to_string(),
            })?;

        let mut cell = |index: usize, name: &'static str| {
            let raw = record.get(index).unwrap_or("");
            let value = coerce(raw);
            if value.is_none() {
                debug!(row, column = name, value = raw, "skipping non-numeric cell");
                loaded.skipped_cells += 1;
            }
            value
        };

        let wpm = cell(columns.wpm, WPM);
        let acc = cell(columns.acc, ACC);

        loaded.events.push(RawEvent::new(timestamp, wpm, acc));
    }

    Ok(loaded)
}

/// Parse a measurement cell, yielding `None` for anything that is not a finite number
pub fn coerce(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn parse_timestamp(cell: &str) -> Option<i64> {
    cell.parse::<i64>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .filter(|v| *v >= i64::MIN as f64 && *v < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("60"), Some(60.0));
        assert_eq!(coerce(" 92.5 "), Some(92.5));
        assert_eq!(coerce("-3e1"), Some(-30.0));
        assert_eq!(coerce(""), None);
        assert_eq!(coerce("fast"), None);
        assert_eq!(coerce("NaN"), None);
        assert_eq!(coerce("inf"), None);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1700000000000"), Some(1_700_000_000_000));
        assert_eq!(parse_timestamp("1700000000000.0"), Some(1_700_000_000_000));
        assert_eq!(parse_timestamp("-86400000"), Some(-86_400_000));
        assert_eq!(parse_timestamp("1700000000000.5"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("nan"), None);
    }

    #[test]
    fn reads_numeric_and_textual_cells() {
        let csv = "timestamp,wpm,acc\n1700000000000,60,90\n1700000100000,\"80\",95.5\n";
        let loaded = read_events(csv.as_bytes()).unwrap();

        assert_eq!(
            loaded.events,
            vec![
                RawEvent::new(1_700_000_000_000, Some(60.0), Some(90.0)),
                RawEvent::new(1_700_000_100_000, Some(80.0), Some(95.5)),
            ]
        );
        assert_eq!(loaded.skipped_cells, 0);
        assert_eq!(loaded.dropped_rows, 0);
    }

    #[test]
    fn malformed_cells_become_absent() {
        let csv = "timestamp,wpm,acc\n1700000000000,oops,90\n1700000100000,70,\n";
        let loaded = read_events(csv.as_bytes()).unwrap();

        assert_eq!(loaded.events[0].wpm, None);
        assert_eq!(loaded.events[0].acc, Some(90.0));
        assert_eq!(loaded.events[1].wpm, Some(70.0));
        assert_eq!(loaded.events[1].acc, None);
        assert_eq!(loaded.skipped_cells, 2);
    }

    #[test]
    fn extra_and_reordered_columns_are_ignored() {
        let csv = "mode,acc,language,wpm,timestamp\ntime,97,english,55,1700000000000\n";
        let loaded = read_events(csv.as_bytes()).unwrap();

        assert_eq!(
            loaded.events,
            vec![RawEvent::new(1_700_000_000_000, Some(55.0), Some(97.0))]
        );
    }

    #[test]
    fn short_rows_count_missing_cells_as_skipped() {
        let csv = "timestamp,wpm,acc\n1700000000000,61\n";
        let loaded = read_events(csv.as_bytes()).unwrap();

        assert_eq!(
            loaded.events,
            vec![RawEvent::new(1_700_000_000_000, Some(61.0), None)]
        );
        assert_eq!(loaded.skipped_cells, 1);
    }

    #[test]
    fn missing_acc_column_fails_before_reading_rows() {
        let csv = "timestamp,wpm\nnot-a-timestamp,60\n";
        assert_matches!(
            read_events(csv.as_bytes()),
            Err(TrendError::MissingColumn("acc"))
        );
    }

    #[test]
    fn missing_timestamp_column() {
        let csv = "wpm,acc\n60,90\n";
        assert_matches!(
            read_events(csv.as_bytes()),
            Err(TrendError::MissingColumn("timestamp"))
        );
    }

    #[test]
    fn header_whitespace_and_bom_are_tolerated() {
        let csv = "\u{feff}timestamp , wpm,acc\n1700000000000,60,90\n";
        let loaded = read_events(csv.as_bytes()).unwrap();
        assert_eq!(loaded.events.len(), 1);
    }

    #[test]
    fn empty_timestamp_drops_the_row() {
        let csv = "timestamp,wpm,acc\n,60,90\n1700000000000,70,91\n";
        let loaded = read_events(csv.as_bytes()).unwrap();

        assert_eq!(loaded.events.len(), 1);
        assert_eq!(loaded.dropped_rows, 1);
    }

    #[test]
    fn invalid_timestamp_reports_row() {
        let csv = "timestamp,wpm,acc\n1700000000000,60,90\nlater,70,91\n";
        assert_matches!(
            read_events(csv.as_bytes()),
            Err(TrendError::InvalidTimestamp { row: 3, ref value }) if value == "later"
        );
    }

    #[test]
    fn header_only_input_has_no_events() {
        let loaded = read_events("timestamp,wpm,acc\n".as_bytes()).unwrap();
        assert_eq!(loaded, LoadedEvents::default());
    }

    #[test]
    fn load_events_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert_matches!(load_events(&path), Err(TrendError::Io { path: p, .. }) if p == path);
    }
}
