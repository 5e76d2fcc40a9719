use crate::signal::{HeartbeatSample, HeartbeatSeries, SampleData, SleepSession, TimeInterval};
use crate::source::{HealthDataSource, SleepSessionResolver};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recording segment as stored on disk, anchored to wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSegment {
    pub start: DateTime<Utc>,
    pub samples: Vec<HeartbeatSample>,
}

/// Exported health data: beat segments, HRV readings and sleep sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthDocument {
    #[serde(default)]
    pub heartbeat_series: Vec<RecordedSegment>,
    #[serde(default)]
    pub hrv: Vec<SampleData>,
    #[serde(default)]
    pub sleep_sessions: Vec<SleepSession>,
}

/// File-backed data source that serves a [`HealthDocument`] with window filtering.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    document: HealthDocument,
}

impl FixtureSource {
    pub fn new(document: HealthDocument) -> Self {
        Self { document }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let document: HealthDocument =
            serde_json::from_str(text).context("parsing health document")?;
        if document.heartbeat_series.is_empty() {
            warn!("health document has no heartbeat series");
        }
        if document.sleep_sessions.is_empty() {
            warn!("health document has no sleep sessions");
        }
        Ok(Self::new(document))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading {}", path.display()))
    }

    pub fn document(&self) -> &HealthDocument {
        &self.document
    }
}

#[async_trait]
impl HealthDataSource for FixtureSource {
    async fn fetch_heartbeat_series(
        &self,
        interval: &TimeInterval,
    ) -> anyhow::Result<Option<HeartbeatSeries>> {
        let segments: Vec<Vec<HeartbeatSample>> = self
            .document
            .heartbeat_series
            .iter()
            .filter(|segment| interval.contains(segment.start))
            .map(|segment| segment.samples.clone())
            .collect();
        debug!(
            "{} of {} heartbeat segment(s) fall in the window",
            segments.len(),
            self.document.heartbeat_series.len()
        );
        if segments.is_empty() {
            return Ok(None);
        }
        Ok(Some(HeartbeatSeries::new(segments)))
    }

    async fn fetch_hrv_samples(&self, interval: &TimeInterval) -> anyhow::Result<Option<Vec<f64>>> {
        let values: Vec<f64> = self
            .document
            .hrv
            .iter()
            .filter(|sample| interval.contains(sample.timestamp))
            .map(|sample| sample.value)
            .collect();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values))
    }
}

#[async_trait]
impl SleepSessionResolver for FixtureSource {
    async fn resolve_last_sleep_session(&self) -> anyhow::Result<Option<SleepSession>> {
        Ok(self
            .document
            .sleep_sessions
            .iter()
            .filter(|session| session.last_instant().is_some())
            .max_by_key(|session| session.last_instant())
            .cloned())
    }
}
