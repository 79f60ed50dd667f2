use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use datastreams_auth::AuthHeaders;
use datastreams_report::{DecodedReport, Envelope, FeedId};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    schema_id: &'a str,
    #[serde(flatten)]
    report: &'a DecodedReport,
    signers: usize,
}

/// Print decoded reports; `raw` writes each report's payload bytes.
pub fn print_reports(reports: &[(DecodedReport, Envelope)], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for (report, envelope) in reports {
                let out = ReportOutput {
                    schema_id: "https://schemas.3leaps.dev/datastreams/cli/v1/decoded-report.schema.json",
                    report,
                    signers: envelope.signer_count(),
                };
                print_json(&out);
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "FEED", "VERSION", "OBSERVED", "BENCHMARK", "BID", "ASK", "EPOCH", "ROUND",
                ]);
            for (report, _) in reports {
                let (bid, ask) = bid_ask_text(report);
                table.add_row(vec![
                    report.feed_id.to_string(),
                    report.feed_version.to_string(),
                    report.payload.observations_timestamp().to_string(),
                    report.payload.benchmark_price().to_string(),
                    bid,
                    ask,
                    report.epoch.to_string(),
                    report.round.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (report, envelope) in reports {
                let (bid, ask) = bid_ask_text(report);
                println!(
                    "feed={} version={} observed={} benchmark={} bid={} ask={} epoch={} round={} signers={}",
                    report.feed_id,
                    report.feed_version,
                    report.payload.observations_timestamp(),
                    report.payload.benchmark_price(),
                    bid,
                    ask,
                    report.epoch,
                    report.round,
                    envelope.signer_count()
                );
            }
        }
        OutputFormat::Raw => {
            for (_, envelope) in reports {
                print_raw(&envelope.report_blob);
            }
        }
    }
}

/// A signed request ready to send.
#[derive(Serialize)]
pub struct SignedOutput<'a> {
    pub method: &'a str,
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    pub headers: &'a AuthHeaders,
}

#[derive(Serialize)]
struct SignedJson<'a> {
    schema_id: &'a str,
    #[serde(flatten)]
    signed: &'a SignedOutput<'a>,
}

/// Print signing headers; `raw` prints bare `Name: value` lines.
pub fn print_signed(signed: &SignedOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&SignedJson {
            schema_id: "https://schemas.3leaps.dev/datastreams/cli/v1/signed-request.schema.json",
            signed,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["HEADER", "VALUE"]);
            for (name, value) in signed.headers.pairs() {
                table.add_row(vec![name.to_string(), value]);
            }
            println!("{} {}", signed.method, signed.url.unwrap_or(signed.path));
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} {}", signed.method, signed.url.unwrap_or(signed.path));
            for (name, value) in signed.headers.pairs() {
                println!("{name}: {value}");
            }
        }
        OutputFormat::Raw => {
            for (name, value) in signed.headers.pairs() {
                println!("{name}: {value}");
            }
        }
    }
}

/// A full report re-encoded with its quote.
#[derive(Serialize)]
pub struct PreparedOutput {
    pub feed_id: FeedId,
    #[serde(serialize_with = "hex_string")]
    pub payload: Vec<u8>,
}

#[derive(Serialize)]
struct PreparedJson<'a> {
    schema_id: &'a str,
    #[serde(flatten)]
    prepared: &'a PreparedOutput,
}

pub fn print_prepared(prepared: &[PreparedOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for item in prepared {
                print_json(&PreparedJson {
                    schema_id: "https://schemas.3leaps.dev/datastreams/cli/v1/verify-payload.schema.json",
                    prepared: item,
                });
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FEED", "SIZE"]);
            for item in prepared {
                table.add_row(vec![item.feed_id.to_string(), item.payload.len().to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for item in prepared {
                println!("0x{}", hex::encode(&item.payload));
            }
        }
        OutputFormat::Raw => {
            for item in prepared {
                print_raw(&item.payload);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn bid_ask_text(report: &DecodedReport) -> (String, String) {
    match report.payload.bid_ask() {
        Some((bid, ask)) => (bid.to_string(), ask.to_string()),
        None => ("-".to_string(), "-".to_string()),
    }
}

fn hex_string<S: serde::Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}
