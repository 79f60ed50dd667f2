mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "datastreams", version, about = "Data Streams report CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["datastreams", "decode", "--hex", "0x00"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }

    #[test]
    fn rejects_conflicting_report_inputs() {
        let err = Cli::try_parse_from([
            "datastreams",
            "decode",
            "--hex",
            "0x00",
            "--file",
            "report.bin",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_sign_for_bulk_feeds() {
        let cli = Cli::try_parse_from([
            "datastreams",
            "sign",
            "--feed",
            "0x01,0x02",
            "--at",
            "1718885772",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
        ])
        .expect("sign args should parse");
        let Command::Sign(args) = cli.command else {
            panic!("expected sign");
        };
        assert_eq!(args.target.feed.len(), 2);
    }

    #[test]
    fn sign_path_conflicts_with_feed() {
        let err = Cli::try_parse_from([
            "datastreams",
            "sign",
            "--path",
            "/api/v1/reports",
            "--feed",
            "0x01",
        ])
        .expect_err("conflicting args should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
