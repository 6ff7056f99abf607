use std::ops::Range;

use chrono::{Days, NaiveDate};
use itertools::{Itertools, MinMaxResult};

/// Clamp an axis to the finite `f64` range. `None` when the result would be
/// empty or its span is not representable, which the tick layout can't handle.
pub fn plottable(lo: f64, hi: f64) -> Option<Range<f64>> {
    if lo.is_nan() || hi.is_nan() {
        return None;
    }
    let (lo, hi) = (lo.max(f64::MIN), hi.min(f64::MAX));
    (hi > lo && (hi - lo).is_finite()).then_some(lo..hi)
}

/// Y (or X) bounds for a value axis, padded so points don't sit on the frame.
/// The span is kept above a billionth of the magnitude so tick steps stay
/// larger than the float spacing at the axis ends.
pub fn value_range(values: &[f64]) -> Option<Range<f64>> {
    let (lo, hi) = match values.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => return Some(0.0..1.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };

    let magnitude = lo.abs().max(hi.abs());
    let pad = if lo == hi {
        (magnitude * 0.05).max(1.0)
    } else {
        ((hi - lo) * 0.05).max(magnitude * 1e-9)
    };
    plottable(lo - pad, hi + pad)
}

/// X bounds for the date axis: one spare day on each side. With no dates the
/// axis is centred on 1970-01-01.
pub fn date_range(dates: &[NaiveDate]) -> Range<NaiveDate> {
    let (first, last) = match dates.iter().minmax() {
        MinMaxResult::NoElements => {
            let epoch = NaiveDate::default();
            (epoch, epoch)
        }
        MinMaxResult::OneElement(d) => (*d, *d),
        MinMaxResult::MinMax(first, last) => (*first, *last),
    };

    let start = first.checked_sub_days(Days::new(1)).unwrap_or(first);
    let end = last.checked_add_days(Days::new(1)).unwrap_or(last);
    start..end
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if val.abs() >= 1e9 {
        format!("{val:.2e}")
    } else if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
