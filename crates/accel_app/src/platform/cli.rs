use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Follow mempool accelerations from the terminal.
///
/// Configuration priority: CLI args > Environment variables > config file > Defaults
#[derive(Parser, Debug)]
#[command(name = "accel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Accelerations list viewer", long_about = None)]
pub struct CliArgs {
    /// RON configuration file
    #[arg(short, long, env = "ACCEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the REST API
    #[arg(long, env = "ACCEL_API_URL")]
    pub api_url: Option<String>,

    /// Websocket URL of the push channel
    #[arg(long, env = "ACCEL_WS_URL")]
    pub ws_url: Option<String>,

    /// Follow in-flight accelerations instead of the history
    #[arg(long)]
    pub pending: bool,

    /// Show only a short preview of the list
    #[arg(long)]
    pub widget: bool,

    /// Page to open first
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Serve the list from a JSON file (bare array or {"body": [...]} envelope)
    #[arg(long, value_name = "FILE")]
    pub records_file: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
