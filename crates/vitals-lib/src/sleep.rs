use crate::{
    error::{Result, VitalsError},
    signal::{
        QuantityKind, SampleData, SleepCategory, SleepPhase, SleepSession, SleepStage,
        TimeInterval,
    },
    source::SleepSessionResolver,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::OnceCell;

/// Time spent in each stage across a session's phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    /// Seconds per stage; stages with no phases are absent.
    pub stage_seconds: BTreeMap<SleepStage, i64>,
    pub total_seconds: i64,
    pub phase_count: usize,
}

impl PhaseSummary {
    pub fn from_phases(phases: &[SleepPhase]) -> Self {
        let mut stage_seconds = BTreeMap::new();
        for phase in phases {
            let seconds = phase.interval.duration().num_seconds();
            *stage_seconds.entry(phase.stage).or_insert(0) += seconds;
        }
        Self {
            total_seconds: stage_seconds.values().sum(),
            stage_seconds,
            phase_count: phases.len(),
        }
    }

    pub fn seconds_in(&self, stage: SleepStage) -> i64 {
        self.stage_seconds.get(&stage).copied().unwrap_or(0)
    }
}

/// Serves statistics about the most recent sleep session.
///
/// The session is resolved once, on first use, and then reused for the
/// lifetime of the provider, including when no session was found. Concurrent
/// first calls share a single resolution. A failed resolution leaves the
/// provider unresolved and hands the error to the caller.
pub struct SleepStatisticsProvider {
    resolver: Arc<dyn SleepSessionResolver>,
    session: OnceCell<Option<SleepSession>>,
}

impl SleepStatisticsProvider {
    pub fn new(resolver: Arc<dyn SleepSessionResolver>) -> Self {
        Self {
            resolver,
            session: OnceCell::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.session.initialized()
    }

    /// The cached session, resolving it first if needed.
    pub async fn session(&self) -> Result<Option<&SleepSession>> {
        let session = self
            .session
            .get_or_try_init(|| async {
                debug!("resolving last sleep session");
                let session = self.resolver.resolve_last_sleep_session().await?;
                match &session {
                    Some(s) => info!(
                        "resolved sleep session with {} phase(s), {} heart sample(s)",
                        s.phases.len(),
                        s.heart_data.len()
                    ),
                    None => info!("no recent sleep session found"),
                }
                Ok::<_, VitalsError>(session)
            })
            .await?;
        Ok(session.as_ref())
    }

    /// In-bed or asleep boundaries of the session.
    pub async fn interval_for(&self, category: SleepCategory) -> Result<Option<TimeInterval>> {
        let session = self.session().await?;
        match category {
            SleepCategory::InBed => Ok(session.and_then(|s| s.inbed_interval)),
            SleepCategory::Asleep => Ok(session.and_then(|s| s.sleep_interval)),
            other => Err(VitalsError::UnsupportedCategory(other)),
        }
    }

    /// Samples of one signal recorded during the session.
    pub async fn health_data_for(&self, kind: QuantityKind) -> Result<Option<&[SampleData]>> {
        let session = self.session().await?;
        match kind {
            QuantityKind::HeartRate => Ok(session.map(|s| s.heart_data.as_slice())),
            QuantityKind::ActiveEnergyBurned => Ok(session.map(|s| s.energy_data.as_slice())),
            QuantityKind::RespiratoryRate => Ok(session.map(|s| s.respiratory_data.as_slice())),
            other => Err(VitalsError::UnsupportedQuantityKind(other)),
        }
    }

    pub async fn phases(&self) -> Result<Option<&[SleepPhase]>> {
        Ok(self.session().await?.map(|s| s.phases.as_slice()))
    }

    pub async fn phase_durations(&self) -> Result<Option<PhaseSummary>> {
        Ok(self.phases().await?.map(PhaseSummary::from_phases))
    }
}
