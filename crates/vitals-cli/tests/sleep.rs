use assert_cmd::cargo::cargo_bin_cmd;
use serde::Deserialize;
use serde_json::Value;
use std::{error::Error, fs, path::PathBuf};

#[derive(Deserialize)]
struct IntervalOutput {
    category: String,
    interval: Option<Value>,
    duration_s: Option<i64>,
}

#[derive(Deserialize)]
struct SamplesOutput {
    kind: String,
    samples: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct Summary {
    stage_seconds: std::collections::BTreeMap<String, i64>,
    total_seconds: i64,
    phase_count: usize,
}

#[derive(Deserialize)]
struct PhasesOutput {
    phases: Option<Vec<Value>>,
    summary: Option<Summary>,
}

fn config_path() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("test_data/vitals.toml")
        .to_string_lossy()
        .to_string()
}

fn run(args: &[&str]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("vitals");
    cmd.args(args);
    Ok(cmd.assert().success().get_output().stdout.clone())
}

#[test]
fn asleep_interval_of_latest_session() -> Result<(), Box<dyn Error>> {
    let config = config_path();
    let out = run(&["sleep-interval", "--config", &config, "--category", "asleep"])?;
    let value: IntervalOutput = serde_json::from_slice(&out)?;
    assert_eq!(value.category, "asleep");
    assert!(value.interval.is_some());
    assert_eq!(value.duration_s, Some((7 * 60 + 15) * 60));
    Ok(())
}

#[test]
fn in_bed_interval_of_latest_session() -> Result<(), Box<dyn Error>> {
    let config = config_path();
    let out = run(&["sleep-interval", "--config", &config, "--category", "in-bed"])?;
    let value: IntervalOutput = serde_json::from_slice(&out)?;
    assert_eq!(value.category, "in-bed");
    assert_eq!(value.duration_s, Some((7 * 60 + 50) * 60));
    Ok(())
}

#[test]
fn unsupported_category_fails() {
    let mut cmd = cargo_bin_cmd!("vitals");
    cmd.args(["sleep-interval", "--config", &config_path(), "--category", "rem"]);
    let stderr = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("unsupported sleep category: rem"), "{stderr}");
}

#[test]
fn heart_rate_samples() -> Result<(), Box<dyn Error>> {
    let config = config_path();
    let out = run(&["sleep-data", "--config", &config, "--kind", "heart-rate"])?;
    let value: SamplesOutput = serde_json::from_slice(&out)?;
    assert_eq!(value.kind, "heart-rate");
    let samples = value.samples.expect("samples");
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["value"], 56.0);
    Ok(())
}

#[test]
fn unsupported_quantity_kind_fails() {
    let mut cmd = cargo_bin_cmd!("vitals");
    cmd.args(["sleep-data", "--config", &config_path(), "--kind", "step-count"]);
    let stderr = cmd.assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&stderr).contains("unsupported quantity kind: step-count"));
}

#[test]
fn phases_with_stage_totals() -> Result<(), Box<dyn Error>> {
    let config = config_path();
    let out = run(&["sleep-phases", "--config", &config])?;
    let value: PhasesOutput = serde_json::from_slice(&out)?;
    assert_eq!(value.phases.expect("phases").len(), 5);
    let summary = value.summary.expect("summary");
    assert_eq!(summary.phase_count, 5);
    assert_eq!(summary.stage_seconds["light"], 270 * 60);
    assert_eq!(summary.stage_seconds["deep"], 90 * 60);
    assert_eq!(summary.stage_seconds["awake"], 15 * 60);
    assert_eq!(summary.stage_seconds["rem"], 60 * 60);
    assert_eq!(summary.total_seconds, 435 * 60);
    Ok(())
}

#[test]
fn no_sessions_yields_nulls() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("empty.json"), "{}")?;
    let config = dir.path().join("vitals.toml");
    fs::write(&config, "[source]\npath = \"empty.json\"\n")?;
    let config = config.to_string_lossy().to_string();

    let out = run(&["sleep-interval", "--config", &config, "--category", "in-bed"])?;
    let value: IntervalOutput = serde_json::from_slice(&out)?;
    assert!(value.interval.is_none());
    assert!(value.duration_s.is_none());

    let out = run(&["sleep-phases", "--config", &config])?;
    let value: PhasesOutput = serde_json::from_slice(&out)?;
    assert!(value.phases.is_none());
    assert!(value.summary.is_none());
    Ok(())
}
