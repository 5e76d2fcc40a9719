use crate::error::{Result, VitalsError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One detected beat, timed relative to the start of its recording segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatSample {
    /// Seconds since the segment started, non-decreasing within a segment.
    #[serde(alias = "t")]
    pub time_since_series_start: f64,
    /// The interval ending at this beat is a sensor dropout, not a real beat-to-beat interval.
    #[serde(default, alias = "gap")]
    pub preceded_by_gap: bool,
}

impl HeartbeatSample {
    pub fn new(time_since_series_start: f64, preceded_by_gap: bool) -> Self {
        Self {
            time_since_series_start,
            preceded_by_gap,
        }
    }
}

/// Beat timestamps grouped into independent recording segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatSeries {
    pub segments: Vec<Vec<HeartbeatSample>>,
}

impl HeartbeatSeries {
    pub fn new(segments: Vec<Vec<HeartbeatSample>>) -> Self {
        Self { segments }
    }

    /// Single segment built from raw timestamps with no gaps.
    pub fn from_timestamps(timestamps: &[f64]) -> Self {
        let segment = timestamps
            .iter()
            .map(|&t| HeartbeatSample::new(t, false))
            .collect();
        Self {
            segments: vec![segment],
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Vec::is_empty)
    }

    pub fn sample_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    /// Signed `t[i] - t[i-1]` for every sample past the first of its segment,
    /// dropping samples flagged as gap-preceded. Flattened across segments in order.
    pub fn beat_differences(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.sample_count());
        for segment in &self.segments {
            for w in segment.windows(2) {
                if w[1].preceded_by_gap {
                    continue;
                }
                out.push(w[1].time_since_series_start - w[0].time_since_series_start);
            }
        }
        out
    }
}

/// Closed span of wall-clock time, `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = VitalsError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(VitalsError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering the `hours` leading up to `end`.
    pub fn ending_at(end: DateTime<Utc>, hours: u32) -> Result<Self> {
        let start = Duration::try_hours(i64::from(hours))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or(VitalsError::WindowOutOfRange { end, hours })?;
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// A timestamped quantity reading, e.g. heart rate in count/min.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleData {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    Awake,
    Light,
    Deep,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepPhase {
    pub interval: TimeInterval,
    pub stage: SleepStage,
}

/// Everything known about one night: boundaries, per-signal samples and staging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepSession {
    #[serde(default)]
    pub inbed_interval: Option<TimeInterval>,
    #[serde(default)]
    pub sleep_interval: Option<TimeInterval>,
    #[serde(default)]
    pub heart_data: Vec<SampleData>,
    #[serde(default)]
    pub energy_data: Vec<SampleData>,
    #[serde(default)]
    pub respiratory_data: Vec<SampleData>,
    #[serde(default)]
    pub phases: Vec<SleepPhase>,
}

impl SleepSession {
    /// Latest instant the session covers, used to rank sessions by recency.
    pub fn last_instant(&self) -> Option<DateTime<Utc>> {
        let phase_end = self.phases.iter().map(|p| p.interval.end).max();
        [
            self.inbed_interval.map(|i| i.end),
            self.sleep_interval.map(|i| i.end),
            phase_end,
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

/// Sleep-analysis classifications a caller may ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SleepCategory {
    InBed,
    Asleep,
    Awake,
    Core,
    Deep,
    Rem,
}

impl SleepCategory {
    fn as_str(&self) -> &'static str {
        match self {
            SleepCategory::InBed => "in-bed",
            SleepCategory::Asleep => "asleep",
            SleepCategory::Awake => "awake",
            SleepCategory::Core => "core",
            SleepCategory::Deep => "deep",
            SleepCategory::Rem => "rem",
        }
    }
}

impl fmt::Display for SleepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SleepCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in-bed" | "inbed" => Ok(SleepCategory::InBed),
            "asleep" => Ok(SleepCategory::Asleep),
            "awake" => Ok(SleepCategory::Awake),
            "core" => Ok(SleepCategory::Core),
            "deep" => Ok(SleepCategory::Deep),
            "rem" => Ok(SleepCategory::Rem),
            other => Err(format!("unknown sleep category: {other}")),
        }
    }
}

/// Quantity signals a health data store can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuantityKind {
    HeartRate,
    ActiveEnergyBurned,
    RespiratoryRate,
    HeartRateVariability,
    OxygenSaturation,
    StepCount,
}

impl QuantityKind {
    fn as_str(&self) -> &'static str {
        match self {
            QuantityKind::HeartRate => "heart-rate",
            QuantityKind::ActiveEnergyBurned => "active-energy-burned",
            QuantityKind::RespiratoryRate => "respiratory-rate",
            QuantityKind::HeartRateVariability => "heart-rate-variability",
            QuantityKind::OxygenSaturation => "oxygen-saturation",
            QuantityKind::StepCount => "step-count",
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heart-rate" => Ok(QuantityKind::HeartRate),
            "active-energy-burned" => Ok(QuantityKind::ActiveEnergyBurned),
            "respiratory-rate" => Ok(QuantityKind::RespiratoryRate),
            "heart-rate-variability" => Ok(QuantityKind::HeartRateVariability),
            "oxygen-saturation" => Ok(QuantityKind::OxygenSaturation),
            "step-count" => Ok(QuantityKind::StepCount),
            other => Err(format!("unknown quantity kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 12, hour, 0, 0).unwrap()
    }

    #[test]
    fn differences_skip_gap_preceded_samples() {
        let series = HeartbeatSeries::new(vec![vec![
            HeartbeatSample::new(0.0, false),
            HeartbeatSample::new(0.8, false),
            HeartbeatSample::new(3.0, true),
            HeartbeatSample::new(3.9, false),
        ]]);
        let diffs = series.beat_differences();
        assert_eq!(diffs.len(), 2);
        assert!((diffs[0] - 0.8).abs() < 1e-12);
        assert!((diffs[1] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn first_sample_of_segment_never_contributes() {
        let series = HeartbeatSeries::new(vec![
            vec![HeartbeatSample::new(0.0, true), HeartbeatSample::new(1.0, false)],
            vec![HeartbeatSample::new(5.0, false)],
        ]);
        assert_eq!(series.beat_differences(), vec![1.0]);
        assert_eq!(series.sample_count(), 3);
    }

    #[test]
    fn reversed_interval_is_rejected() {
        assert!(TimeInterval::new(at(10), at(9)).is_err());
        let interval = TimeInterval::new(at(9), at(10)).unwrap();
        assert_eq!(interval.duration(), Duration::hours(1));
        assert!(interval.contains(at(10)));
    }

    #[test]
    fn window_before_end() {
        let window = TimeInterval::ending_at(at(10), 3).unwrap();
        assert_eq!(window.start, at(7));
        assert_eq!(window.duration(), Duration::hours(3));
    }

    #[test]
    fn oversized_window_is_an_error() {
        let err = TimeInterval::ending_at(at(8), u32::MAX).unwrap_err();
        assert!(matches!(err, VitalsError::WindowOutOfRange { hours: u32::MAX, .. }));
    }

    #[test]
    fn deserializing_checks_order() {
        let ok: TimeInterval = serde_json::from_str(
            r#"{"start": "2024-03-12T07:00:00Z", "end": "2024-03-12T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(ok.duration(), Duration::hours(1));
        let reversed = serde_json::from_str::<TimeInterval>(
            r#"{"start": "2024-03-12T08:00:00Z", "end": "2024-03-12T07:00:00Z"}"#,
        );
        let err = reversed.unwrap_err().to_string();
        assert!(err.contains("precedes start"), "{err}");
    }

    #[test]
    fn segment_count_and_emptiness_agree_on_blank_segments() {
        let blank = HeartbeatSeries::new(vec![vec![]]);
        assert_eq!(blank.segment_count(), 1);
        assert_eq!(blank.sample_count(), 0);
        assert!(blank.is_empty());
        assert!(!HeartbeatSeries::from_timestamps(&[0.0]).is_empty());
    }

    #[test]
    fn categories_parse_kebab_case() {
        assert_eq!("in-bed".parse::<SleepCategory>(), Ok(SleepCategory::InBed));
        assert_eq!(
            "active-energy-burned".parse::<QuantityKind>(),
            Ok(QuantityKind::ActiveEnergyBurned)
        );
        assert!("nap".parse::<SleepCategory>().is_err());
    }

    #[test]
    fn last_instant_prefers_latest_boundary() {
        let session = SleepSession {
            inbed_interval: Some(TimeInterval::new(at(1), at(8)).unwrap()),
            sleep_interval: Some(TimeInterval::new(at(2), at(7)).unwrap()),
            ..SleepSession::default()
        };
        assert_eq!(session.last_instant(), Some(at(8)));
        assert_eq!(SleepSession::default().last_instant(), None);
    }
}
