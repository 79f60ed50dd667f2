use bytes::Bytes;
use datastreams_abi::{AbiError, Schema, Token, Word};
use serde::Serialize;

use super::{expect_version, Fields, PayloadDecoder, ReportPayload};
use crate::error::{ReportError, Result};
use crate::feed::{FeedId, FeedVersion};
use crate::int::Int192;
use crate::serde_util;

/// Legacy report anchored to a source-chain block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportV1 {
    pub feed_id: FeedId,
    pub observations_timestamp: u32,
    pub benchmark_price: Int192,
    pub bid: Int192,
    pub ask: Int192,
    pub current_block_num: u64,
    #[serde(serialize_with = "serde_util::hex_bytes")]
    pub current_block_hash: Word,
    pub valid_from_block_num: u64,
    pub current_block_timestamp: u64,
}

impl ReportV1 {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        V1Decoder::default().decode_report(payload)
    }

    fn from_tokens(tokens: Vec<Token>) -> std::result::Result<Self, AbiError> {
        let mut fields = Fields::new(tokens);
        let feed_id = fields.feed_id()?;
        expect_version(&feed_id, FeedVersion::V1)?;
        Ok(Self {
            feed_id,
            observations_timestamp: fields.u32()?,
            benchmark_price: fields.int192()?,
            bid: fields.int192()?,
            ask: fields.int192()?,
            current_block_num: fields.u64()?,
            current_block_hash: fields.word()?,
            valid_from_block_num: fields.u64()?,
            current_block_timestamp: fields.u64()?,
        })
    }

    fn tokens(&self) -> Vec<Token> {
        vec![
            Token::word(*self.feed_id.as_bytes()),
            Token::Uint(self.observations_timestamp.into()),
            Token::Int(self.benchmark_price.into_raw()),
            Token::Int(self.bid.into_raw()),
            Token::Int(self.ask.into_raw()),
            Token::Uint(self.current_block_num.into()),
            Token::word(self.current_block_hash),
            Token::Uint(self.valid_from_block_num.into()),
            Token::Uint(self.current_block_timestamp.into()),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct V1Decoder {
    schema: Schema,
}

impl V1Decoder {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn report_schema() -> Schema {
        Schema::parse(&[
            ("feedId", "bytes32"),
            ("observationsTimestamp", "uint32"),
            ("benchmarkPrice", "int192"),
            ("bid", "int192"),
            ("ask", "int192"),
            ("currentBlockNum", "uint64"),
            ("currentBlockHash", "bytes32"),
            ("validFromBlockNum", "uint64"),
            ("currentBlockTimestamp", "uint64"),
        ])
        .expect("v1 report schema is well-formed")
    }

    pub fn decode_report(&self, payload: &[u8]) -> Result<ReportV1> {
        self.schema
            .decode(payload)
            .and_then(ReportV1::from_tokens)
            .map_err(|source| ReportError::PayloadSchemaMismatch {
                version: FeedVersion::V1,
                source,
            })
    }

    pub fn encode(&self, report: &ReportV1) -> Result<Bytes> {
        Ok(self.schema.encode(&report.tokens())?)
    }
}

impl Default for V1Decoder {
    fn default() -> Self {
        Self::new(Self::report_schema())
    }
}

impl PayloadDecoder for V1Decoder {
    fn version(&self) -> FeedVersion {
        FeedVersion::V1
    }

    fn decode(&self, payload: &[u8]) -> Result<ReportPayload> {
        self.decode_report(payload).map(ReportPayload::V1)
    }
}
