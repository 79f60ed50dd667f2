use datastreams_abi::Word;
use serde::Serialize;

use crate::envelope::{Envelope, EnvelopeCodec};
use crate::error::Result;
use crate::feed::{FeedId, FeedResolver, FeedVersion};
use crate::payload::{PayloadDecoder, ReportPayload, V1Decoder, V2Decoder, V3Decoder};
use crate::serde_util;

/// A fully decoded report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedReport {
    pub feed_id: FeedId,
    pub feed_version: FeedVersion,
    pub payload: ReportPayload,
    pub round: u8,
    pub epoch: u32,
    #[serde(serialize_with = "serde_util::hex_bytes")]
    pub digest: Word,
}

/// Unwraps a full report: envelope, feed version, then versioned payload.
///
/// Holds every schema it needs; build it once and share it.
#[derive(Debug, Clone, Default)]
pub struct ReportDecoder {
    envelope: EnvelopeCodec,
    resolver: FeedResolver,
    v1: V1Decoder,
    v2: V2Decoder,
    v3: V3Decoder,
}

impl ReportDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn envelope_codec(&self) -> &EnvelopeCodec {
        &self.envelope
    }

    /// Decode a full report as returned by the reports API.
    pub fn decode(&self, full_report: &[u8]) -> Result<DecodedReport> {
        let envelope = self.envelope.decode(full_report)?;
        self.decode_envelope(&envelope)
    }

    /// Decode the payload of an already unwrapped envelope.
    pub fn decode_envelope(&self, envelope: &Envelope) -> Result<DecodedReport> {
        let (feed_id, feed_version, payload) = self.decode_payload(&envelope.report_blob)?;
        tracing::debug!(
            %feed_id,
            version = %feed_version,
            epoch = envelope.epoch(),
            round = envelope.round(),
            signers = envelope.signer_count(),
            "decoded report"
        );
        Ok(DecodedReport {
            feed_id,
            feed_version,
            payload,
            round: envelope.round(),
            epoch: envelope.epoch(),
            digest: envelope.digest(),
        })
    }

    /// Resolve the version of a bare payload and decode it.
    pub fn decode_payload(&self, blob: &[u8]) -> Result<(FeedId, FeedVersion, ReportPayload)> {
        let (feed_id, version) = self.resolver.resolve(blob)?;
        let payload = self.decoder_for(version).decode(blob)?;
        Ok((feed_id, version, payload))
    }

    pub fn decoder_for(&self, version: FeedVersion) -> &dyn PayloadDecoder {
        match version {
            FeedVersion::V1 => &self.v1,
            FeedVersion::V2 => &self.v2,
            FeedVersion::V3 => &self.v3,
        }
    }
}

/// Decode a full report with the standard schemas.
pub fn decode_report(full_report: &[u8]) -> Result<DecodedReport> {
    ReportDecoder::new().decode(full_report)
}
