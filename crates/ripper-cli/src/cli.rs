//! CLI argument definitions for file-ripper.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "file-ripper",
    version,
    about = "file-ripper - extract structured records from flat and XML files",
    long_about = "Extract structured records from delimited, fixed-width and XML files\n\
                  using declarative JSON file definitions, with optional directory\n\
                  scanning and relocation of processed files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Run the batch pipeline for every definition in a definitions file.
    Exec(ExecArgs),

    /// Validate a definitions file without touching any input directory.
    Check(CheckArgs),
}

#[derive(Parser)]
pub struct ExecArgs {
    /// Path to the JSON definitions file (one definition or an array).
    #[arg(value_name = "DEFINITIONS_FILE")]
    pub definitions_file: PathBuf,

    /// Process matching files once and exit instead of running continuously.
    #[arg(long = "run-once")]
    pub run_once: bool,

    /// Minutes to sleep between passes in continuous mode.
    #[arg(
        long = "interval-minutes",
        value_name = "MINUTES",
        default_value_t = 5
    )]
    pub interval_minutes: u64,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the JSON definitions file (one definition or an array).
    #[arg(value_name = "DEFINITIONS_FILE")]
    pub definitions_file: PathBuf,
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
