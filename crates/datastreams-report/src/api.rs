//! Reports API response bodies.
//!
//! Only the envelope bytes matter to the decoder; the surrounding metadata is
//! kept as the service returned it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReportError, Result};
use crate::feed::FeedId;
use crate::report::{DecodedReport, ReportDecoder};
use crate::serde_util;

/// One signed report as returned by the REST and websocket endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedReport {
    #[serde(rename = "feedID")]
    pub feed_id: FeedId,
    pub valid_from_timestamp: u32,
    pub observations_timestamp: u32,
    #[serde(
        serialize_with = "serde_util::hex_bytes",
        deserialize_with = "serde_util::from_hex"
    )]
    pub full_report: Vec<u8>,
}

impl SignedReport {
    /// Parse a websocket message; it has the single-report shape.
    pub fn from_ws_message(message: &[u8]) -> Result<Self> {
        let body: Value = serde_json::from_slice(message)?;
        Ok(parse_body::<ReportResponse>(body)?.report)
    }

    pub fn decode(&self, decoder: &ReportDecoder) -> Result<DecodedReport> {
        decoder.decode(&self.full_report)
    }
}

/// Body of `GET /api/v1/reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: SignedReport,
}

impl ReportResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        parse_body(serde_json::from_str(body)?)
    }
}

/// Body of `GET /api/v1/reports/bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReportResponse {
    pub reports: Vec<SignedReport>,
}

impl BulkReportResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        parse_body(serde_json::from_str(body)?)
    }
}

/// Reports from either a single or a bulk response body.
pub fn reports_from_json(body: &str) -> Result<Vec<SignedReport>> {
    let body: Value = serde_json::from_str(body)?;
    if body.get("reports").is_some() {
        return Ok(parse_body::<BulkReportResponse>(body)?.reports);
    }
    Ok(vec![parse_body::<ReportResponse>(body)?.report])
}

/// Decode `0x`-optional hex.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    Ok(hex::decode(digits)?)
}

fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T> {
    if let Some(error) = body.get("error") {
        let message = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        return Err(ReportError::Api(message));
    }
    Ok(serde_json::from_value(body)?)
}
