use crate::signal::{HeartbeatSample, HeartbeatSeries};
use anyhow::{Context, Result};
use std::path::Path;

/// Parse newline-delimited floating point series, ignoring blank/comment lines.
pub fn parse_f64_series(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let val: f64 = trimmed
            .parse()
            .with_context(|| format!("line {} is not f64: {}", idx + 1, trimmed))?;
        out.push(val);
    }
    if out.is_empty() {
        anyhow::bail!("no numeric samples found");
    }
    Ok(out)
}

/// Read a newline-delimited floating point series from disk.
pub fn read_f64_series(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_f64_series(&text)
}

/// Parse beat timestamps, one `<seconds> [gap]` per line.
///
/// A blank line closes the current segment; `#` starts a comment line.
pub fn parse_heartbeat_series(text: &str) -> Result<HeartbeatSeries> {
    let mut segments = Vec::new();
    let mut current: Vec<HeartbeatSample> = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let t: f64 = fields
            .next()
            .unwrap_or_default()
            .parse()
            .with_context(|| format!("line {} is not a beat time: {}", idx + 1, trimmed))?;
        let gap = match fields.next() {
            None => false,
            Some(flag) if flag.eq_ignore_ascii_case("gap") => true,
            Some(flag) => anyhow::bail!("line {}: unknown beat flag {:?}", idx + 1, flag),
        };
        if let Some(prev) = current.last() {
            if t < prev.time_since_series_start {
                anyhow::bail!(
                    "line {}: beat time {} goes backwards from {}",
                    idx + 1,
                    t,
                    prev.time_since_series_start
                );
            }
        }
        current.push(HeartbeatSample::new(t, gap));
    }
    if !current.is_empty() {
        segments.push(current);
    }
    if segments.is_empty() {
        anyhow::bail!("no heartbeat samples found");
    }
    Ok(HeartbeatSeries::new(segments))
}

/// Read a heartbeat series file from disk.
pub fn read_heartbeat_series(path: &Path) -> Result<HeartbeatSeries> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_heartbeat_series(&text)
}
