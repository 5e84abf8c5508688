//! CLI argument definitions for the place-name matcher.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use gadm_cli::logging::{LogConfig, LogFormat};
use gadm_ingest::DEFAULT_DELIMITER;
use gadm_model::DEFAULT_THRESHOLD;

#[derive(Parser)]
#[command(
    name = "gadm",
    version,
    about = "Fuzzy-match place names against GADM administrative boundary tables",
    long_about = "Fuzzy-match place names against GADM administrative boundary tables.\n\n\
                  Every query is scored against the names of each configured dataset\n\
                  version and hierarchy level. Matches at or above the threshold are\n\
                  reported grouped by query, best score first."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match place names against the reference tables.
    Match(MatchArgs),

    /// List the configured reference tables and their state.
    Tables(TablesArgs),
}

/// Where the reference tables live and which ones to load.
#[derive(Args)]
pub struct DataArgs {
    /// Directory holding `gad{version}_level{level}.csv` files.
    #[arg(long = "data-dir", value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Dataset versions to load (default: 36,41).
    #[arg(long = "versions", value_name = "VERSIONS", value_delimiter = ',')]
    pub versions: Option<Vec<String>>,

    /// Hierarchy levels to load (default: 0 through 5).
    #[arg(long = "levels", value_name = "LEVELS", value_delimiter = ',')]
    pub levels: Option<Vec<u8>>,

    /// Load every level file found in the data directory instead.
    #[arg(long = "discover", conflicts_with_all = ["versions", "levels"])]
    pub discover: bool,
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Place names to match, written `Name` or `Name|GID_0`.
    #[arg(value_name = "QUERIES")]
    pub queries: Vec<String>,

    /// Read queries from a file, one per line.
    #[arg(long = "input", short = 'i', value_name = "FILE", conflicts_with = "queries")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Separator between a name and its country code.
    #[arg(long = "delimiter", default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    /// Minimum score (0-100) for a match to be reported.
    #[arg(
        long = "threshold",
        short = 't',
        default_value_t = DEFAULT_THRESHOLD,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub threshold: u8,

    /// Lowercase and strip punctuation before comparing names.
    #[arg(long = "normalize")]
    pub normalize: bool,

    /// Scan tables on the current thread only.
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Stop starting new table scans after this many milliseconds.
    #[arg(long = "time-budget-ms", value_name = "MS")]
    pub time_budget_ms: Option<u64>,

    /// Output format (default: table, or inferred from --output).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Write matches to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TablesArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Logging configuration from the global flags.
    ///
    /// `--log-level` beats `-v`/`-q`; `RUST_LOG` applies only when neither
    /// is given.
    pub fn log_config(&self) -> LogConfig {
        let explicit = self.log_level.map(LevelFilter::from);
        LogConfig::default()
            .with_level_filter(explicit.unwrap_or_else(|| self.verbosity.tracing_level_filter()))
            .with_env_override(explicit.is_none() && !self.verbosity.is_present())
            .with_format(self.log_format.into())
            .with_log_file(self.log_file.clone())
            .with_color(self.color.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_level_beats_verbosity() {
        let cli = Cli::parse_from(["gadm", "-vv", "--log-level", "error", "tables"]);
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::ERROR);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn env_filter_applies_without_level_flags() {
        let cli = Cli::parse_from(["gadm", "--log-format", "json", "match", "Paris"]);
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn match_flags_parse() {
        let cli = Cli::parse_from([
            "gadm",
            "match",
            "New York|USA",
            "--threshold",
            "70",
            "--versions",
            "36,41",
            "--levels",
            "0,1",
        ]);
        let Command::Match(args) = cli.command else {
            panic!("expected match command");
        };
        assert_eq!(args.queries, vec!["New York|USA"]);
        assert_eq!(args.threshold, 70);
        assert_eq!(args.data.versions, Some(vec!["36".to_string(), "41".to_string()]));
        assert_eq!(args.data.levels, Some(vec![0, 1]));
    }

    #[test]
    fn threshold_above_100_is_rejected() {
        assert!(Cli::try_parse_from(["gadm", "match", "Paris", "--threshold", "101"]).is_err());
    }
}
