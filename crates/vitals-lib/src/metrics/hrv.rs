use crate::signal::HeartbeatSeries;
use crate::stats;
use serde::{Deserialize, Serialize};

/// Change between consecutive beat intervals above which a pair counts toward pNN50 (seconds).
pub const PNN50_THRESHOLD_S: f64 = 0.050;

/// Time-domain indicators for one window. Each is absent when the data cannot support it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HrvTime {
    pub segments: usize,
    pub differences: usize,
    pub hrv_samples: usize,
    pub sdnn: Option<f64>,
    pub rmssd: Option<f64>,
    pub pnn50: Option<f64>,
}

/// Population standard deviation of HRV readings.
pub fn sdnn(hrv_samples: &[f64]) -> Option<f64> {
    stats::standard_deviation(hrv_samples)
}

/// `sqrt(sum(d^2) / (n - 1))` over the gap-filtered beat differences.
///
/// Needs at least two differences; a single one would divide by zero.
pub fn rmssd(series: &HeartbeatSeries) -> Option<f64> {
    let squares: Vec<f64> = series
        .beat_differences()
        .into_iter()
        .map(|d| d.powi(2))
        .collect();
    let n = squares.len();
    if n < 2 {
        return None;
    }
    Some((stats::sum(&squares) / (n as f64 - 1.0)).sqrt())
}

/// Share of `|d[i] - d[i-1]|` above [`PNN50_THRESHOLD_S`], where `d` are the
/// gap-filtered beat differences flattened across segments.
///
/// This thresholds the change between successive differences of beat
/// timestamps, so the result stays comparable with historical output of this
/// engine rather than with the textbook pNN50 taken on adjacent RR intervals.
pub fn pnn50(series: &HeartbeatSeries) -> Option<f64> {
    let diffs = series.beat_differences();
    if diffs.len() < 2 {
        return None;
    }
    let changes: Vec<f64> = diffs.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let count = changes.iter().filter(|&&c| c > PNN50_THRESHOLD_S).count();
    Some(count as f64 / changes.len() as f64)
}

pub fn hrv_time(series: &HeartbeatSeries, hrv_samples: &[f64]) -> HrvTime {
    HrvTime {
        segments: series.segment_count(),
        differences: series.beat_differences().len(),
        hrv_samples: hrv_samples.len(),
        sdnn: sdnn(hrv_samples),
        rmssd: rmssd(series),
        pnn50: pnn50(series),
    }
}
