//! Sign a report request and decode a stored response.
//!
//! Run with:
//!   cargo run --example decode-report -- path/to/response.json
//!
//! Credentials are read from `CHAINLINK_CLIENT_ID` and
//! `CHAINLINK_CLIENT_SECRET` when present.

use datastreams::auth::{self, Credentials, SignRequest};
use datastreams::report::{ReportDecoder, ReportResponse};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let feed = "0x00037da06d56d083fe599397a4769a042d63aa73dc4ef57709d31e9971a5b439";
    let path = auth::report_path(feed, 1_718_885_772);

    match Credentials::from_env() {
        Ok(credentials) => {
            let headers = credentials.sign_now(&SignRequest::get(&path)?)?;
            eprintln!("GET {path}");
            for (name, value) in headers.pairs() {
                eprintln!("{name}: {value}");
            }
        }
        Err(err) => eprintln!("skipping signing: {err}"),
    }

    let Some(file) = std::env::args().nth(1) else {
        eprintln!("usage: decode-report <response.json>");
        return Ok(());
    };
    let body = std::fs::read_to_string(file)?;
    let response = ReportResponse::from_json(&body)?;
    let decoded = response.report.decode(&ReportDecoder::new())?;

    println!("feed:      {}", decoded.feed_id);
    println!("version:   {}", decoded.feed_version);
    println!("epoch:     {} round {}", decoded.epoch, decoded.round);
    println!("observed:  {}", decoded.payload.observations_timestamp());
    println!("benchmark: {}", decoded.payload.benchmark_price());
    if let Some((bid, ask)) = decoded.payload.bid_ask() {
        println!("bid/ask:   {bid} / {ask}");
    }
    Ok(())
}
