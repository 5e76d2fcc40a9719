//! Capabilities the engine consumes from the outside world.
//!
//! Implementations own acquisition, permissions, windowing and any retry
//! policy. Their errors are opaque to the engine and reach the caller
//! unchanged through [`crate::VitalsError::Source`].

use crate::signal::{HeartbeatSeries, SleepSession, TimeInterval};
use async_trait::async_trait;

/// Supplies raw heart data restricted to a time window.
#[async_trait]
pub trait HealthDataSource: Send + Sync {
    /// Beat timestamps recorded inside `interval`, or `None` when there are none.
    async fn fetch_heartbeat_series(
        &self,
        interval: &TimeInterval,
    ) -> anyhow::Result<Option<HeartbeatSeries>>;

    /// Device-reported HRV readings inside `interval`.
    async fn fetch_hrv_samples(&self, interval: &TimeInterval) -> anyhow::Result<Option<Vec<f64>>>;
}

/// Finds the most recent sleep session.
#[async_trait]
pub trait SleepSessionResolver: Send + Sync {
    async fn resolve_last_sleep_session(&self) -> anyhow::Result<Option<SleepSession>>;
}
