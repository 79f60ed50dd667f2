use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use datastreams_abi::{ParamType, Schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ReportError, Result};

/// Length of a feed ID in bytes.
pub const FEED_ID_LEN: usize = 32;

/// Bytes of the feed ID holding the big-endian schema version.
pub const VERSION_RANGE: Range<usize> = 0..2;

/// 32-byte identifier naming a data feed.
///
/// The first two bytes double as the report schema version, e.g.
/// `0x0003…` feeds publish [`FeedVersion::V3`] reports.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedId([u8; FEED_ID_LEN]);

impl FeedId {
    pub const fn from_bytes(bytes: [u8; FEED_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FEED_ID_LEN] {
        &self.0
    }

    /// The raw version tag, whether or not it is supported.
    pub fn raw_version(&self) -> u16 {
        u16::from_be_bytes([self.0[VERSION_RANGE.start], self.0[VERSION_RANGE.start + 1]])
    }

    /// The schema version this feed publishes.
    pub fn version(&self) -> Result<FeedVersion> {
        FeedVersion::try_from(self.raw_version())
    }
}

impl From<[u8; FEED_ID_LEN]> for FeedId {
    fn from(bytes: [u8; FEED_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for FeedId {
    type Err = ReportError;

    /// Parses 64 hex digits, with or without a `0x` prefix, in either case.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let mut bytes = [0u8; FEED_ID_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|err| ReportError::InvalidFeedId(format!("{s}: {err}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedId({self})")
    }
}

impl Serialize for FeedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Report schema versions. Serialized and displayed as `v1`, `v2`, `v3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u16)]
pub enum FeedVersion {
    /// Legacy block-based report.
    V1 = 1,
    /// Basic report.
    V2 = 2,
    /// Premium report with bid/ask.
    V3 = 3,
}

impl FeedVersion {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for FeedVersion {
    type Error = ReportError;

    fn try_from(version: u16) -> Result<Self> {
        match version {
            1 => Ok(FeedVersion::V1),
            2 => Ok(FeedVersion::V2),
            3 => Ok(FeedVersion::V3),
            version => Err(ReportError::UnknownFeedVersion { version }),
        }
    }
}

impl fmt::Display for FeedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u16())
    }
}

/// Reads the feed ID and version from the front of a report payload.
///
/// Only the leading `bytes32` is decoded: it is the one field every payload
/// version places at the same position.
#[derive(Debug, Clone)]
pub struct FeedResolver {
    schema: Schema,
}

impl FeedResolver {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// The one-slot `{feedId: bytes32}` schema.
    pub fn feed_id_schema() -> Schema {
        Schema::new([("feedId", ParamType::FixedBytes(FEED_ID_LEN))])
            .expect("feed ID schema is well-formed")
    }

    pub fn resolve(&self, payload: &[u8]) -> Result<(FeedId, FeedVersion)> {
        let feed_id = self.feed_id(payload)?;
        let version = feed_id.version()?;
        tracing::trace!(%feed_id, %version, "resolved feed version");
        Ok((feed_id, version))
    }

    /// Decode only the feed ID, without checking its version.
    pub fn feed_id(&self, payload: &[u8]) -> Result<FeedId> {
        let word = self
            .schema
            .decode(payload)?
            .into_iter()
            .next()
            .and_then(|token| token.into_word())
            .ok_or_else(|| ReportError::InvalidFeedId("payload has no bytes32 feed ID".into()))?;
        Ok(FeedId(word))
    }
}

impl Default for FeedResolver {
    fn default() -> Self {
        Self::new(Self::feed_id_schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastreams_abi::AbiError;

    const BTC_USD: &str = "0x00037da06d56d083fe599397a4769a042d63aa73dc4ef57709d31e9971a5b439";

    #[test]
    fn parses_and_prints_feed_id() {
        let feed: FeedId = BTC_USD.parse().unwrap();
        assert_eq!(feed.to_string(), BTC_USD);
        assert_eq!(feed.version().unwrap(), FeedVersion::V3);

        let upper: FeedId = BTC_USD[2..].to_uppercase().parse().unwrap();
        assert_eq!(upper, feed);
    }

    #[test]
    fn rejects_malformed_feed_id() {
        assert!(matches!("0x1234".parse::<FeedId>(), Err(ReportError::InvalidFeedId(_))));
        assert!(matches!(
            format!("0x{}", "zz".repeat(32)).parse::<FeedId>(),
            Err(ReportError::InvalidFeedId(_))
        ));
    }

    #[test]
    fn version_comes_from_first_two_bytes() {
        let mut bytes = [0xffu8; FEED_ID_LEN];
        bytes[0] = 0x00;
        bytes[1] = 0x02;
        assert_eq!(FeedId::from_bytes(bytes).version().unwrap(), FeedVersion::V2);

        bytes[0] = 0x01;
        let err = FeedId::from_bytes(bytes).version().unwrap_err();
        assert!(matches!(err, ReportError::UnknownFeedVersion { version: 0x0102 }));
    }

    #[test]
    fn resolve_reads_leading_word_only() {
        let mut payload = vec![0u8; 96];
        payload[1] = 0x01;
        payload[40] = 0xaa;
        let (feed, version) = FeedResolver::default().resolve(&payload).unwrap();
        assert_eq!(version, FeedVersion::V1);
        assert_eq!(feed.as_bytes()[..], payload[..32]);
    }

    #[test]
    fn resolve_short_payload_is_truncated() {
        let err = FeedResolver::default().resolve(&[0u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Abi(AbiError::TruncatedInput {
                needed: 32,
                available: 31
            })
        ));
    }

    #[test]
    fn unknown_versions_fail_closed() {
        for raw in [0u16, 4, 0x0100, u16::MAX] {
            let mut payload = [0u8; 32];
            payload[..2].copy_from_slice(&raw.to_be_bytes());
            let err = FeedResolver::default().resolve(&payload).unwrap_err();
            assert!(matches!(err, ReportError::UnknownFeedVersion { version } if version == raw));
        }
    }

    #[test]
    fn version_serializes_like_display() {
        for version in [FeedVersion::V1, FeedVersion::V2, FeedVersion::V3] {
            let json = serde_json::to_value(version).unwrap();
            assert_eq!(json, version.to_string());
        }
        assert_eq!(serde_json::to_value(FeedVersion::V3).unwrap(), "v3");
    }

    #[test]
    fn feed_id_serializes_as_hex_string() {
        let feed: FeedId = BTC_USD.parse().unwrap();
        let json = serde_json::to_string(&feed).unwrap();
        assert_eq!(json, format!("\"{BTC_USD}\""));
        let back: FeedId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, feed);
    }
}
