//! madwatch-sim - run the robust detector over synthetic or recorded readings
//!
//! Usage:
//!   madwatch-sim run --count 5000 --seed 7 --spike-probability 0.01
//!   madwatch-sim run --window-size 1000 --threshold 0.4 --format pretty --tick-ms 50
//!   madwatch-sim score readings.txt --format json-lines
//!   cat readings.txt | madwatch-sim score -

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use madwatch_core::{Detector, DetectorConfig, ZeroMadPolicy};
use madwatch_sim::{
    GeneratorConfig, OutputFormat, RecordWriter, RunOptions, SeasonalStream, drive, read_readings,
    spawn_producer,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "madwatch-sim")]
#[command(about = "Streaming median/MAD anomaly detection over synthetic or recorded readings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    detector: DetectorArgs,

    /// Output format for scored points
    #[arg(short, long, global = true, value_enum, default_value = "json-lines")]
    format: OutputFormat,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Args)]
struct DetectorArgs {
    /// JSON detector config; flags below override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Sliding window length
    #[arg(short, long, global = true)]
    window_size: Option<usize>,

    /// Absolute modified Z-score a point must exceed
    #[arg(short, long, global = true)]
    threshold: Option<f64>,

    /// Scoring while the window's MAD is zero
    #[arg(long, global = true, value_enum)]
    zero_mad: Option<ZeroMadArg>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ZeroMadArg {
    Unbounded,
    Suppress,
}

impl From<ZeroMadArg> for ZeroMadPolicy {
    fn from(arg: ZeroMadArg) -> Self {
        match arg {
            ZeroMadArg::Unbounded => ZeroMadPolicy::Unbounded,
            ZeroMadArg::Suppress => ZeroMadPolicy::Suppress,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score a generated seasonal stream
    Run {
        /// Readings to generate (unbounded when omitted)
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// RNG seed for a reproducible stream
        #[arg(long)]
        seed: Option<u64>,

        /// Season length in readings
        #[arg(long, default_value = "100")]
        period: f64,

        /// Chance per reading of an injected spike
        #[arg(long, default_value = "0.0")]
        spike_probability: f64,

        /// Size of injected spikes
        #[arg(long, default_value = "3.0")]
        spike_magnitude: f64,

        /// Readings buffered between producer and detector
        #[arg(long, default_value = "1024")]
        channel_capacity: usize,

        /// Pause between emitted points in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },

    /// Score readings from a file, or stdin with `-`
    Score {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli.detector)?;
    let stdout = std::io::stdout();
    let mut writer = RecordWriter::new(stdout.lock(), cli.format);

    match cli.command {
        Commands::Run {
            count,
            seed,
            period,
            spike_probability,
            spike_magnitude,
            channel_capacity,
            tick_ms,
        } => {
            let stream = SeasonalStream::new(GeneratorConfig {
                period,
                spike_probability,
                spike_magnitude,
                seed,
                ..GeneratorConfig::default()
            })?;
            let (source, producer) = spawn_producer(stream, channel_capacity, count)?;
            let detector =
                Detector::new(config, source).context("failed to initialize detector")?;

            let options = RunOptions {
                tick: tick_ms.map(Duration::from_millis),
                max_points: None,
            };
            let summary = drive(detector, &mut writer, &options)?;
            let report = producer.join()?;

            info!(
                points = summary.points,
                anomalies = summary.anomalies,
                generated = report.sent,
                spikes_injected = report.spikes_injected,
                "Run complete."
            );
        }
        Commands::Score { input } => {
            let readings = read_readings(&input)?;
            info!(readings = readings.len(), input = %input.display(), "Loaded readings.");

            let detector = Detector::new(config, readings.into_iter())
                .context("failed to initialize detector")?;
            let summary = drive(detector, &mut writer, &RunOptions::default())?;

            info!(
                points = summary.points,
                anomalies = summary.anomalies,
                "Score complete."
            );
        }
    }

    Ok(())
}

/// JSON file (or defaults) first, then command-line overrides.
fn load_config(args: &DetectorArgs) -> Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DetectorConfig::default(),
    };

    if let Some(window_size) = args.window_size {
        config = config.with_window_size(window_size);
    }
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(policy) = args.zero_mad {
        config = config.with_zero_mad_policy(policy.into());
    }

    config.validate()?;
    Ok(config)
}
