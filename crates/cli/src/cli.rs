//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// AR HUD - hotspot tracker driver
#[derive(Parser, Debug)]
#[command(
    name = "ar-hud",
    author,
    version,
    about = "AR hotspot tracker driver",
    long_about = "Drives the AR hotspot tracker headlessly.\n\n\
                  Feeds orientation samples from a synthetic or recorded source, \n\
                  runs lock-on and stability scoring, and emits HUD snapshots. \n\
                  Also queries the generative content gateway directly."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "AR_HUD_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "AR_HUD_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a headless AR session
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display site and tracker configuration
    Info(InfoArgs),

    /// Query the content gateway once
    Ask(AskArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); built-in site when omitted
    #[arg(short, long, env = "AR_HUD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Orientation source
    #[arg(long, value_enum, default_value = "mock")]
    pub source: SourceKind,

    /// Recording to replay (required with `--source replay`)
    #[arg(long, required_if_eq("source", "replay"))]
    pub replay: Option<PathBuf>,

    /// Replay speed multiplier (1.0 = recorded speed)
    #[arg(long, default_value = "1.0")]
    pub replay_speed: f64,

    /// Loop replay when finished
    #[arg(long)]
    pub replay_loop: bool,

    /// Seed for the mock source jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// How the sensor permission prompt is answered
    #[arg(long, value_enum, default_value = "ambient")]
    pub consent: ConsentMode,

    /// Session length in seconds (0 = until Ctrl+C)
    #[arg(long, default_value = "10", env = "AR_HUD_DURATION")]
    pub duration: u64,

    /// HUD tick interval in milliseconds
    #[arg(long, default_value = "50")]
    pub tick_ms: u64,

    /// Write one JSON snapshot per tick to this file
    #[arg(long)]
    pub snapshots: Option<PathBuf>,

    /// Open the detail overlay of every hotspot that gets locked
    #[arg(long)]
    pub auto_tap: bool,

    /// Fetch briefings from the live backend instead of offline fallbacks
    #[arg(long)]
    pub online: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "AR_HUD_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "ar_view.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; built-in site when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show tracker tuning
    #[arg(long)]
    pub tracker: bool,
}

/// Arguments for the `ask` command
#[derive(Parser, Debug)]
pub struct AskArgs {
    #[command(subcommand)]
    pub query: AskQuery,

    /// Path to configuration file (gateway settings)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Never call the backend; print the fallback content
    #[arg(long, global = true)]
    pub offline: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Gateway operations
#[derive(Subcommand, Debug, Clone)]
pub enum AskQuery {
    /// Crowd, weather and best time to visit
    Status {
        site: String,
        #[arg(default_value = "Kota Kinabalu")]
        location: String,
    },
    /// Three travel tips for an attraction
    Tips { attraction: String },
    /// Briefing for one hotspot of the configured site
    Briefing { hotspot: String },
    /// Multi-day itinerary
    Itinerary {
        destination: String,
        #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=14))]
        days: u32,
    },
    /// One-day plan
    DayPlan { destination: String },
    /// Short description of a place
    Describe {
        name: String,
        #[arg(default_value = "Sabah")]
        location: String,
    },
}

/// Orientation source kinds
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// Synthetic handheld sway
    #[default]
    Mock,
    /// JSONL recording
    Replay,
}

/// Sensor permission behaviour
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsentMode {
    /// Platform delivers events without asking
    #[default]
    Ambient,
    /// Prompt is shown and granted
    Grant,
    /// Prompt is shown and denied
    Deny,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
