use crate::{
    error::Result,
    metrics::hrv::{self, HrvTime},
    signal::{HeartbeatSeries, TimeInterval},
    source::HealthDataSource,
};
use log::debug;
use std::sync::Arc;

/// Heart-rate-variability indicators over a requested window.
///
/// The window only selects what the source fetches; once a series is in hand
/// no further filtering happens here.
pub struct HeartIndicatorProvider {
    source: Arc<dyn HealthDataSource>,
}

impl HeartIndicatorProvider {
    pub fn new(source: Arc<dyn HealthDataSource>) -> Self {
        Self { source }
    }

    /// HRV readings reported by the source for the window.
    pub async fn calculate_hrv(&self, interval: &TimeInterval) -> Result<Option<Vec<f64>>> {
        let samples = self.source.fetch_hrv_samples(interval).await?;
        debug!(
            "fetched {} hrv sample(s) for {} .. {}",
            samples.as_ref().map_or(0, Vec::len),
            interval.start,
            interval.end
        );
        Ok(samples)
    }

    /// SDNN over the window's HRV readings. Meant for day-long or longer windows.
    pub async fn calculate_sdnn(&self, interval: &TimeInterval) -> Result<Option<f64>> {
        let Some(samples) = self.calculate_hrv(interval).await? else {
            return Ok(None);
        };
        Ok(hrv::sdnn(&samples))
    }

    /// RMSSD over the window's beat series. Better suited than SDNN to short windows.
    pub async fn calculate_rmssd(&self, interval: &TimeInterval) -> Result<Option<f64>> {
        Ok(self
            .heartbeat_series(interval)
            .await?
            .and_then(|series| hrv::rmssd(&series)))
    }

    pub async fn calculate_pnn50(&self, interval: &TimeInterval) -> Result<Option<f64>> {
        Ok(self
            .heartbeat_series(interval)
            .await?
            .and_then(|series| hrv::pnn50(&series)))
    }

    /// Every time-domain indicator for the window, from one fetch of each kind.
    pub async fn summarize(&self, interval: &TimeInterval) -> Result<HrvTime> {
        let series = self.heartbeat_series(interval).await?.unwrap_or_default();
        let samples = self.calculate_hrv(interval).await?.unwrap_or_default();
        Ok(hrv::hrv_time(&series, &samples))
    }

    async fn heartbeat_series(&self, interval: &TimeInterval) -> Result<Option<HeartbeatSeries>> {
        let series = self.source.fetch_heartbeat_series(interval).await?;
        debug!(
            "fetched {} heartbeat segment(s) for {} .. {}",
            series.as_ref().map_or(0, HeartbeatSeries::segment_count),
            interval.start,
            interval.end
        );
        Ok(series)
    }
}
