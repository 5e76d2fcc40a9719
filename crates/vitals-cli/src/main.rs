use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use serde::Serialize;
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
    sync::Arc,
};
use vitals_lib::{
    config::read_config,
    io::{fixture::FixtureSource, text as text_io},
    metrics::hrv::hrv_time,
    signal::{HeartbeatSeries, QuantityKind, SampleData, SleepCategory, SleepPhase, TimeInterval},
    sleep::{PhaseSummary, SleepStatisticsProvider},
    HeartIndicatorProvider, HrvTime,
};

#[derive(Parser)]
#[command(
    name = "vitals",
    version,
    about = "HRV and sleep statistics from exported health data"
)]
struct Cli {
    /// Logging verbosity (e.g., debug, info, warn)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time-domain HRV from a beat-time file (`<seconds> [gap]` per line) or stdin
    HrvTime {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Newline-delimited HRV readings used for SDNN
        #[arg(long)]
        hrv: Option<PathBuf>,
    },
    /// SDNN, RMSSD and pNN50 for a window of the configured health document
    Indicators {
        #[arg(long)]
        config: PathBuf,
        /// End of the window (RFC 3339); defaults to now
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        /// Window length, overriding the config
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        hours: Option<u32>,
    },
    /// In-bed or asleep interval of the most recent sleep session
    SleepInterval {
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value = "asleep")]
        category: SleepCategory,
    },
    /// Samples of one signal recorded during the most recent sleep session
    SleepData {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        kind: QuantityKind,
    },
    /// Sleep phases of the most recent session with per-stage totals
    SleepPhases {
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Serialize)]
struct IndicatorsOutput {
    interval: TimeInterval,
    #[serde(flatten)]
    hrv: HrvTime,
}

#[derive(Serialize)]
struct IntervalOutput {
    category: SleepCategory,
    interval: Option<TimeInterval>,
    duration_s: Option<i64>,
}

#[derive(Serialize)]
struct SamplesOutput<'a> {
    kind: QuantityKind,
    samples: Option<&'a [SampleData]>,
}

#[derive(Serialize)]
struct PhasesOutput<'a> {
    phases: Option<&'a [SleepPhase]>,
    summary: Option<PhaseSummary>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Commands::HrvTime { input, hrv } => cmd_hrv_time(input.as_deref(), hrv.as_deref())?,
        Commands::Indicators { config, end, hours } => {
            cmd_indicators(&config, end.unwrap_or_else(Utc::now), hours).await?
        }
        Commands::SleepInterval { config, category } => {
            cmd_sleep_interval(&config, category).await?
        }
        Commands::SleepData { config, kind } => cmd_sleep_data(&config, kind).await?,
        Commands::SleepPhases { config } => cmd_sleep_phases(&config).await?,
    }
    Ok(())
}

fn read_heartbeats(input: Option<&Path>) -> Result<HeartbeatSeries> {
    match input {
        Some(path) => text_io::read_heartbeat_series(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_heartbeat_series(&buf)
        }
    }
}

fn load_source(config_path: &Path) -> Result<(Arc<FixtureSource>, u32)> {
    let config = read_config(config_path)?;
    info!("loading health document {}", config.source.path.display());
    let source = FixtureSource::load(&config.source.path)?;
    Ok((Arc::new(source), config.window.hours))
}

fn sleep_provider(config_path: &Path) -> Result<SleepStatisticsProvider> {
    let (source, _) = load_source(config_path)?;
    Ok(SleepStatisticsProvider::new(source))
}

fn cmd_hrv_time(input: Option<&Path>, hrv: Option<&Path>) -> Result<()> {
    let series = read_heartbeats(input)?;
    let samples = match hrv {
        Some(path) => text_io::read_f64_series(path)?,
        None => Vec::new(),
    };
    let m = hrv_time(&series, &samples);
    println!("{}", serde_json::to_string(&m)?);
    Ok(())
}

async fn cmd_indicators(config: &Path, end: DateTime<Utc>, hours: Option<u32>) -> Result<()> {
    let (source, default_hours) = load_source(config)?;
    let interval = TimeInterval::ending_at(end, hours.unwrap_or(default_hours))?;
    let provider = HeartIndicatorProvider::new(source);
    let hrv = provider.summarize(&interval).await?;
    let out = IndicatorsOutput { interval, hrv };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

async fn cmd_sleep_interval(config: &Path, category: SleepCategory) -> Result<()> {
    let provider = sleep_provider(config)?;
    let interval = provider.interval_for(category).await?;
    let out = IntervalOutput {
        category,
        interval,
        duration_s: interval.map(|i| i.duration().num_seconds()),
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

async fn cmd_sleep_data(config: &Path, kind: QuantityKind) -> Result<()> {
    let provider = sleep_provider(config)?;
    let samples = provider.health_data_for(kind).await?;
    println!("{}", serde_json::to_string(&SamplesOutput { kind, samples })?);
    Ok(())
}

async fn cmd_sleep_phases(config: &Path) -> Result<()> {
    let provider = sleep_provider(config)?;
    let summary = provider.phase_durations().await?;
    let phases = provider.phases().await?;
    println!("{}", serde_json::to_string(&PhasesOutput { phases, summary })?);
    Ok(())
}
