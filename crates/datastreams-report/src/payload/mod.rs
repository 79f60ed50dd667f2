//! Versioned report payloads.
//!
//! Each version has its own fixed schema starting with the `bytes32` feed ID.
//! Schemas are mutually incompatible, so the decoder is always chosen from
//! the feed ID's version and never guessed.

mod v1;
mod v2;
mod v3;

use datastreams_abi::{AbiError, Token, Word, U256};
use serde::Serialize;

use crate::feed::{FeedId, FeedVersion};
use crate::int::Int192;

pub use v1::{ReportV1, V1Decoder};
pub use v2::{ReportV2, V2Decoder};
pub use v3::{ReportV3, V3Decoder};

/// Decodes a payload body of one schema version.
pub trait PayloadDecoder: Send + Sync {
    /// The version whose schema this decoder applies.
    fn version(&self) -> FeedVersion;

    /// Parse the full payload, feed ID included.
    ///
    /// Fails with [`ReportError::PayloadSchemaMismatch`](crate::ReportError::PayloadSchemaMismatch).
    fn decode(&self, payload: &[u8]) -> crate::Result<ReportPayload>;
}

/// A decoded payload of exactly one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "version", rename_all = "lowercase")]
pub enum ReportPayload {
    V1(ReportV1),
    V2(ReportV2),
    V3(ReportV3),
}

impl ReportPayload {
    pub fn version(&self) -> FeedVersion {
        match self {
            ReportPayload::V1(_) => FeedVersion::V1,
            ReportPayload::V2(_) => FeedVersion::V2,
            ReportPayload::V3(_) => FeedVersion::V3,
        }
    }

    pub fn feed_id(&self) -> FeedId {
        match self {
            ReportPayload::V1(report) => report.feed_id,
            ReportPayload::V2(report) => report.feed_id,
            ReportPayload::V3(report) => report.feed_id,
        }
    }

    pub fn observations_timestamp(&self) -> u32 {
        match self {
            ReportPayload::V1(report) => report.observations_timestamp,
            ReportPayload::V2(report) => report.observations_timestamp,
            ReportPayload::V3(report) => report.observations_timestamp,
        }
    }

    /// The benchmark (mid) price common to every version.
    pub fn benchmark_price(&self) -> Int192 {
        match self {
            ReportPayload::V1(report) => report.benchmark_price,
            ReportPayload::V2(report) => report.benchmark_price,
            ReportPayload::V3(report) => report.benchmark_price,
        }
    }

    /// Bid and ask, for the versions that carry them.
    pub fn bid_ask(&self) -> Option<(Int192, Int192)> {
        match self {
            ReportPayload::V1(report) => Some((report.bid, report.ask)),
            ReportPayload::V2(_) => None,
            ReportPayload::V3(report) => Some((report.bid, report.ask)),
        }
    }

    pub fn as_v1(&self) -> Option<&ReportV1> {
        match self {
            ReportPayload::V1(report) => Some(report),
            _ => None,
        }
    }

    pub fn as_v2(&self) -> Option<&ReportV2> {
        match self {
            ReportPayload::V2(report) => Some(report),
            _ => None,
        }
    }

    pub fn as_v3(&self) -> Option<&ReportV3> {
        match self {
            ReportPayload::V3(report) => Some(report),
            _ => None,
        }
    }
}

/// Pulls typed fields off a decoded token list in schema order.
pub(crate) struct Fields {
    tokens: std::vec::IntoIter<Token>,
}

impl Fields {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }

    fn next(&mut self, kind: &'static str) -> Result<Token, AbiError> {
        self.tokens.next().ok_or(AbiError::InvalidValue {
            kind: kind.to_string(),
            reason: "missing field",
        })
    }

    pub(crate) fn feed_id(&mut self) -> Result<FeedId, AbiError> {
        self.word().map(FeedId::from_bytes)
    }

    pub(crate) fn word(&mut self) -> Result<Word, AbiError> {
        self.next("bytes32")?
            .into_word()
            .ok_or_else(|| mismatch("bytes32"))
    }

    pub(crate) fn uint(&mut self) -> Result<U256, AbiError> {
        self.next("uint")?.into_uint().ok_or_else(|| mismatch("uint"))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, AbiError> {
        let value = self.uint()?;
        if value.bits() > 32 {
            return Err(mismatch("uint32"));
        }
        Ok(value.low_u32())
    }

    pub(crate) fn u64(&mut self) -> Result<u64, AbiError> {
        let value = self.uint()?;
        if value.bits() > 64 {
            return Err(mismatch("uint64"));
        }
        Ok(value.low_u64())
    }

    pub(crate) fn int192(&mut self) -> Result<Int192, AbiError> {
        self.next("int192")?
            .into_int()
            .map(Int192::from_raw)
            .ok_or_else(|| mismatch("int192"))
    }
}

fn mismatch(kind: &'static str) -> AbiError {
    AbiError::InvalidValue {
        kind: kind.to_string(),
        reason: "unexpected token kind",
    }
}

/// Reject payloads whose feed ID names a different schema version.
pub(crate) fn expect_version(feed_id: &FeedId, expected: FeedVersion) -> Result<(), AbiError> {
    if feed_id.raw_version() != expected.as_u16() {
        return Err(AbiError::InvalidValue {
            kind: "feedId".to_string(),
            reason: "feed version does not match payload schema",
        });
    }
    Ok(())
}
