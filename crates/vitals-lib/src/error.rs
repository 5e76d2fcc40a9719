use crate::signal::{QuantityKind, SleepCategory};
use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VitalsError>;

#[derive(Debug, Error)]
pub enum VitalsError {
    #[error("unsupported sleep category: {0}")]
    UnsupportedCategory(SleepCategory),

    #[error("unsupported quantity kind: {0}")]
    UnsupportedQuantityKind(QuantityKind),

    #[error("interval end {end} precedes start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("a {hours} h window ending at {end} is outside the representable time range")]
    WindowOutOfRange { end: DateTime<Utc>, hours: u32 },

    /// Failure reported by a data source or session resolver, forwarded as-is.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}
