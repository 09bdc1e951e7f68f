//! Command line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use exam_seating::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "exam-seating",
    version,
    about = "Exam seating planner - seat students across rooms without same-year neighbours"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate seating plans from a roster and a room/session configuration
    Generate(GenerateArgs),

    /// Serve the generation API over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Roster CSV with enrollment (and optional name) columns per year
    #[arg(long, value_name = "CSV")]
    pub students: PathBuf,

    /// JSON file with rooms and exam sessions
    #[arg(long, value_name = "JSON")]
    pub config: PathBuf,

    /// Branch name shown on the plans (overrides the configuration)
    #[arg(long)]
    pub branch: Option<String>,

    /// Directory for text plans and attendance sheets
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Do not print plans to stdout
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, env = "EXAM_SEATING_PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "EXAM_SEATING_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Directory served under /static
    #[arg(long = "static-dir", value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
