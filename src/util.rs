use itertools::{Itertools, MinMaxResult};

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// One histogram bar covering `[lower, upper)`; the last bar also includes `upper`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Most buckets a histogram will be split into, whatever the caller asks for
pub const MAX_BINS: usize = 1000;

/// Widen a single value into a non-empty range that stays inside `f64`
fn widen(v: f64) -> (f64, f64) {
    let pad = (v.abs() * 1e-3).max(0.5);
    ((v - pad).max(f64::MIN), (v + pad).min(f64::MAX))
}

/// Split `data` into `bins` equal-width buckets spanning its min and max.
/// A degenerate range (all values equal) is widened around the value.
pub fn histogram(data: &[f64], bins: usize) -> Vec<Bucket> {
    let bins = bins.clamp(1, MAX_BINS);
    let n = bins as f64;

    let (lo, hi) = match data.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => return Vec::new(),
        MinMaxResult::OneElement(v) => widen(v),
        MinMaxResult::MinMax(lo, hi) if lo == hi => widen(lo),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };

    // hi - lo overflows for values near opposite ends of f64
    let span_fits = (hi - lo).is_finite();
    let width = if span_fits {
        (hi - lo) / n
    } else {
        hi / n - lo / n
    };
    let edge = |i: usize| {
        if span_fits {
            lo + width * i as f64
        } else {
            let t = i as f64 / n;
            lo * (1.0 - t) + hi * t
        }
    };

    let mut buckets: Vec<Bucket> = (0..bins)
        .map(|i| Bucket {
            lower: edge(i),
            upper: if i + 1 == bins { hi } else { edge(i + 1) },
            count: 0,
        })
        .collect();

    for value in data {
        let offset = value - lo;
        let position = if offset.is_finite() {
            offset / width
        } else {
            value / width - lo / width
        };
        let index = (position as usize).min(bins - 1);
        buckets[index].count += 1;
    }

    buckets
}
