use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod input;
pub mod prepare;
pub mod sign;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode full reports into versioned records.
    Decode(DecodeArgs),
    /// Print authentication headers for an API request.
    Sign(SignArgs),
    /// Re-encode full reports with a fee quote for on-chain verification.
    Prepare(PrepareArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Sign(args) => sign::run(args, format),
        Command::Prepare(args) => prepare::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where to read full reports from. Defaults to hex on stdin.
#[derive(Args, Debug)]
pub struct ReportInput {
    /// Full report as hex (0x prefix optional).
    #[arg(long, conflicts_with_all = ["file", "response"])]
    pub hex: Option<String>,
    /// Read a binary full report from file.
    #[arg(long, conflicts_with_all = ["hex", "response"])]
    pub file: Option<PathBuf>,
    /// Read a reports API response body, single or bulk ("-" for stdin).
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub response: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: ReportInput,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// HTTP method.
    #[arg(long, default_value = "GET")]
    pub method: String,
    #[command(flatten)]
    pub target: SignTarget,
    /// Request body.
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,
    /// Read the request body from file.
    #[arg(long)]
    pub body_file: Option<PathBuf>,
    /// Signing time in milliseconds since the Unix epoch. Default: now.
    #[arg(long)]
    pub timestamp: Option<u64>,
    /// API client ID.
    #[arg(long, env = "CHAINLINK_CLIENT_ID")]
    pub client_id: Option<String>,
    /// API client secret.
    #[arg(long, env = "CHAINLINK_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
    /// REST base URL, used to print the full request URL.
    #[arg(long, env = "CHAINLINK_API_URL")]
    pub api_url: Option<String>,
    /// Websocket base URL, used with --ws.
    #[arg(long, env = "CHAINLINK_WS_URL")]
    pub ws_url: Option<String>,
}

/// The path to sign: explicit, or built from feed IDs.
#[derive(Args, Debug)]
pub struct SignTarget {
    /// Path and query to sign as-is.
    #[arg(long, conflicts_with_all = ["feed", "at", "ws"])]
    pub path: Option<String>,
    /// Feed IDs (comma-separated). More than one selects the bulk endpoint.
    #[arg(long, value_delimiter = ',')]
    pub feed: Vec<String>,
    /// Report timestamp in Unix seconds.
    #[arg(long)]
    pub at: Option<u64>,
    /// Sign the websocket subscription path.
    #[arg(long, conflicts_with = "at")]
    pub ws: bool,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub input: ReportInput,
    /// Fee token address (20 bytes hex) to pay verification fees in.
    #[arg(long, conflicts_with = "quote", required_unless_present = "quote")]
    pub fee_token: Option<String>,
    /// Opaque quote bytes as hex.
    #[arg(long)]
    pub quote: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
