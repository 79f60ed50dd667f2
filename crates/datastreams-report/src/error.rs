use datastreams_abi::AbiError;

use crate::feed::FeedVersion;

/// Errors that can occur while decoding a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The envelope or feed ID could not be decoded (truncated input,
    /// out-of-range offsets, non-canonical words).
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// The envelope carries a different number of r and s components.
    #[error("signature arity mismatch ({rs} r components, {ss} s components)")]
    SignatureArityMismatch { rs: usize, ss: usize },

    /// The feed ID encodes a version outside the supported set.
    #[error("unknown feed version {version}")]
    UnknownFeedVersion { version: u16 },

    /// The payload does not match the schema of its resolved version.
    #[error("payload does not match {version} schema: {source}")]
    PayloadSchemaMismatch {
        version: FeedVersion,
        #[source]
        source: AbiError,
    },

    /// A feed ID string is not 32 bytes of hex.
    #[error("invalid feed ID: {0}")]
    InvalidFeedId(String),

    /// Hex-encoded report bytes could not be decoded.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// An API response body is not the expected JSON shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with an error message instead of a report.
    #[error("api error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
