pub mod config;
pub mod error;
pub mod indicator;
pub mod io;
pub mod metrics;
pub mod signal;
pub mod sleep;
pub mod source;
pub mod stats;

pub use error::{Result, VitalsError};
pub use indicator::*;
pub use metrics::*;
pub use signal::*;
pub use sleep::*;
pub use source::*;
