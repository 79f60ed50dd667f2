//! Decoding of signed Data Streams reports.
//!
//! A full report is unwrapped in three steps:
//! 1. [`EnvelopeCodec`] splits the outer tuple into report context, the
//!    opaque payload and the raw signature components
//! 2. [`FeedResolver`] reads the payload's leading feed ID and derives the
//!    [`FeedVersion`] from its first two bytes
//! 3. The [`PayloadDecoder`] for that version parses the payload body
//!
//! [`ReportDecoder`] runs all three and returns a [`DecodedReport`].

pub mod api;
pub mod envelope;
pub mod error;
pub mod feed;
pub mod int;
pub mod payload;
pub mod report;

mod serde_util;

pub use api::{reports_from_json, BulkReportResponse, ReportResponse, SignedReport};
pub use envelope::{fee_token_quote, Envelope, EnvelopeCodec};
pub use error::{ReportError, Result};
pub use feed::{FeedId, FeedResolver, FeedVersion};
pub use int::Int192;
pub use payload::{
    PayloadDecoder, ReportPayload, ReportV1, ReportV2, ReportV3, V1Decoder, V2Decoder, V3Decoder,
};
pub use report::{decode_report, DecodedReport, ReportDecoder};

pub use datastreams_abi::{AbiError, U256};
