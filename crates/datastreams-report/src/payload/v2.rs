use bytes::Bytes;
use datastreams_abi::{AbiError, Schema, Token, U256};
use serde::Serialize;

use super::{expect_version, Fields, PayloadDecoder, ReportPayload};
use crate::error::{ReportError, Result};
use crate::feed::{FeedId, FeedVersion};
use crate::int::Int192;
use crate::serde_util;

/// Basic report: timestamps, fees and a benchmark price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportV2 {
    pub feed_id: FeedId,
    /// Earliest observation timestamp covered by this report (seconds).
    pub valid_from_timestamp: u32,
    /// Latest observation timestamp (seconds).
    pub observations_timestamp: u32,
    /// Verification fee in the chain's native token.
    #[serde(serialize_with = "serde_util::decimal")]
    pub native_fee: U256,
    /// Verification fee in LINK.
    #[serde(serialize_with = "serde_util::decimal")]
    pub link_fee: U256,
    /// Timestamp after which the report can no longer be verified.
    pub expires_at: u32,
    pub benchmark_price: Int192,
}

impl ReportV2 {
    /// Decode with the standard V2 schema.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        V2Decoder::default().decode_report(payload)
    }

    fn from_tokens(tokens: Vec<Token>) -> std::result::Result<Self, AbiError> {
        let mut fields = Fields::new(tokens);
        let feed_id = fields.feed_id()?;
        expect_version(&feed_id, FeedVersion::V2)?;
        Ok(Self {
            feed_id,
            valid_from_timestamp: fields.u32()?,
            observations_timestamp: fields.u32()?,
            native_fee: fields.uint()?,
            link_fee: fields.uint()?,
            expires_at: fields.u32()?,
            benchmark_price: fields.int192()?,
        })
    }

    fn tokens(&self) -> Vec<Token> {
        vec![
            Token::word(*self.feed_id.as_bytes()),
            Token::Uint(self.valid_from_timestamp.into()),
            Token::Uint(self.observations_timestamp.into()),
            Token::Uint(self.native_fee),
            Token::Uint(self.link_fee),
            Token::Uint(self.expires_at.into()),
            Token::Int(self.benchmark_price.into_raw()),
        ]
    }
}

/// Decoder for [`FeedVersion::V2`] payloads.
#[derive(Debug, Clone)]
pub struct V2Decoder {
    schema: Schema,
}

impl V2Decoder {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn report_schema() -> Schema {
        Schema::parse(&[
            ("feedId", "bytes32"),
            ("validFromTimestamp", "uint32"),
            ("observationsTimestamp", "uint32"),
            ("nativeFee", "uint192"),
            ("linkFee", "uint192"),
            ("expiresAt", "uint32"),
            ("benchmarkPrice", "int192"),
        ])
        .expect("v2 report schema is well-formed")
    }

    pub fn decode_report(&self, payload: &[u8]) -> Result<ReportV2> {
        self.schema
            .decode(payload)
            .and_then(ReportV2::from_tokens)
            .map_err(|source| ReportError::PayloadSchemaMismatch {
                version: FeedVersion::V2,
                source,
            })
    }

    pub fn encode(&self, report: &ReportV2) -> Result<Bytes> {
        Ok(self.schema.encode(&report.tokens())?)
    }
}

impl Default for V2Decoder {
    fn default() -> Self {
        Self::new(Self::report_schema())
    }
}

impl PayloadDecoder for V2Decoder {
    fn version(&self) -> FeedVersion {
        FeedVersion::V2
    }

    fn decode(&self, payload: &[u8]) -> Result<ReportPayload> {
        self.decode_report(payload).map(ReportPayload::V2)
    }
}
