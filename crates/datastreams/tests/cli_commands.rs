#![cfg(feature = "cli")]

use std::process::{Command, Output};

const BTC_FULL_REPORT: &str = include_str!("fixtures/v3_btc_full_report.hex");
const BULK_RESPONSE: &str = "tests/fixtures/v3_bulk_response.json";
const BTC_FEED: &str = "0x00037da06d56d083fe599397a4769a042d63aa73dc4ef57709d31e9971a5b439";

fn datastreams(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_datastreams"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("CHAINLINK_CLIENT_ID")
        .env_remove("CHAINLINK_CLIENT_SECRET")
        .env_remove("CHAINLINK_API_URL")
        .env_remove("CHAINLINK_WS_URL")
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("datastreams should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn decode_hex_outputs_json_report() {
    let output = datastreams(&["--format", "json", "decode", "--hex", BTC_FULL_REPORT.trim()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let line = stdout(&output);
    let json: serde_json::Value = serde_json::from_str(line.trim()).expect("stdout should be JSON");
    assert_eq!(json["feedId"], BTC_FEED);
    assert_eq!(json["feedVersion"], "v3");
    assert_eq!(json["epoch"], 0x1c2);
    assert_eq!(json["round"], 3);
    assert_eq!(json["signers"], 1);
    assert_eq!(json["payload"]["version"], "v3");
    assert_eq!(json["payload"]["benchmarkPrice"], "66500120000000000000000");
    assert!(json["schema_id"]
        .as_str()
        .unwrap()
        .ends_with("decoded-report.schema.json"));
}

#[test]
fn decode_bulk_response_prints_one_line_per_report() {
    let output = datastreams(&["--format", "json", "decode", "--response", BULK_RESPONSE]);
    assert!(output.status.success());

    let out = stdout(&output);
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be JSON"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["payload"]["benchmarkPrice"], "-3512340000000000000000");
    assert_eq!(lines[1]["payload"]["bid"], "-3512500000000000000000");
}

#[test]
fn decode_pretty_is_single_line_per_report() {
    let output = datastreams(&["--format", "pretty", "decode", "--hex", BTC_FULL_REPORT.trim()]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with(&format!("feed={BTC_FEED} version=v3")));
    assert!(out.contains("bid=66498000000000000000000"));
}

#[test]
fn truncated_report_exits_60() {
    let short = &BTC_FULL_REPORT.trim()[..2 + 2 * 200];
    let output = datastreams(&["decode", "--hex", short]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("truncated"));
}

#[test]
fn malformed_hex_exits_60() {
    let output = datastreams(&["decode", "--hex", "0xnothex"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn sign_prints_known_headers() {
    let path = format!("/api/v1/reports?feedID={BTC_FEED}&timestamp=1718885772");
    let output = datastreams(&[
        "--format",
        "pretty",
        "sign",
        "--path",
        &path,
        "--timestamp",
        "1718885772000",
        "--client-id",
        "clientId",
        "--client-secret",
        "clientSecret",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let out = stdout(&output);
    assert!(out.starts_with(&format!("GET {path}\n")));
    assert!(out.contains("Authorization: clientId\n"));
    assert!(out.contains("X-Authorization-Timestamp: 1718885772000\n"));
    assert!(out.contains(
        "X-Authorization-Signature-SHA256: 6acc8f316d42dd1e81edb48f5fcdf936740a538590f86ecff76bd5cd02f9c31b"
    ));
}

#[test]
fn sign_builds_path_from_feed_and_reads_env_credentials() {
    let output = Command::new(env!("CARGO_BIN_EXE_datastreams"))
        .env("CHAINLINK_CLIENT_ID", "clientId")
        .env("CHAINLINK_CLIENT_SECRET", "clientSecret")
        .env("CHAINLINK_API_URL", "https://api.example.com")
        .args([
            "--format",
            "json",
            "sign",
            "--feed",
            BTC_FEED,
            "--at",
            "1718885772",
            "--timestamp",
            "1718885772000",
        ])
        .output()
        .expect("datastreams should run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(
        json["url"],
        format!("https://api.example.com/api/v1/reports?feedID={BTC_FEED}&timestamp=1718885772")
    );
    assert_eq!(
        json["headers"]["X-Authorization-Signature-SHA256"],
        "6acc8f316d42dd1e81edb48f5fcdf936740a538590f86ecff76bd5cd02f9c31b"
    );
    assert!(!stdout(&output).contains("clientSecret"));
}

#[test]
fn sign_without_credentials_exits_64() {
    let output = datastreams(&["sign", "--path", "/api/v1/reports"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("client ID not provided"));
}

#[test]
fn prepare_appends_fee_token_quote() {
    let fee_token = format!("0x{}", "51".repeat(20));
    let output = datastreams(&[
        "--format",
        "pretty",
        "prepare",
        "--hex",
        BTC_FULL_REPORT.trim(),
        "--fee-token",
        &fee_token,
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let payload = stdout(&output);
    let payload = payload.trim();
    // 8 head words, blob (32 + 288), one-signer rs and ss (64 each), quote (64)
    assert_eq!(payload.len(), 2 + 2 * 768);
    let tail = format!("{:064x}{}", 0x20, format!("{:0>64}", "51".repeat(20)));
    assert!(payload.ends_with(&tail));
}

#[test]
fn prepare_carries_unknown_feed_versions() {
    // retag the payload's feed ID (blob starts at byte 256) as version 4
    let mut report = BTC_FULL_REPORT.trim().to_string();
    let at = 2 + 2 * 256;
    assert_eq!(&report[at..at + 4], "0003");
    report.replace_range(at..at + 4, "0004");

    let decode = datastreams(&["decode", "--hex", &report]);
    assert_eq!(decode.status.code(), Some(60));

    let output = datastreams(&["--format", "json", "prepare", "--hex", &report, "--quote", "0x01"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(json["feed_id"], BTC_FEED.replacen("0x0003", "0x0004", 1));
    let payload = json["payload"].as_str().unwrap();
    // 768 bytes with a one-byte quote padded to a word
    assert_eq!(payload.len(), 2 + 2 * 768);
    assert!(payload[2..].contains(&report[2 + 2 * 256..2 + 2 * 256 + 64]));
}

#[test]
fn prepare_requires_a_quote() {
    let output = datastreams(&["prepare", "--hex", BTC_FULL_REPORT.trim()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn version_prints_package_version() {
    let output = datastreams(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        format!("datastreams {}", env!("CARGO_PKG_VERSION"))
    );
}
