use std::ops::Range;

use bytes::Bytes;
use datastreams_abi::{AbiError, ParamType, Schema, Token, Word};
use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::serde_util;

/// Number of context words preceding every report.
pub const CONTEXT_WORDS: usize = 3;

/// Size of the envelope's static region: the 3 context words inline, then
/// one word each for the blob offset, rs offset, ss offset and `rawVs`.
pub const ENVELOPE_STATIC_SIZE: usize = (CONTEXT_WORDS + 4) * 32;

/// Context word holding the config digest.
pub const DIGEST_WORD: usize = 0;

/// Context word holding epoch and round.
pub const EPOCH_ROUND_WORD: usize = 1;

/// Big-endian epoch bytes within [`EPOCH_ROUND_WORD`].
pub const EPOCH_RANGE: Range<usize> = 27..31;

/// Round byte within [`EPOCH_ROUND_WORD`].
pub const ROUND_INDEX: usize = 31;

/// The outer structure of a full report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    #[serde(serialize_with = "serde_util::hex_words")]
    pub report_context: [Word; CONTEXT_WORDS],
    #[serde(serialize_with = "serde_util::hex_bytes")]
    pub report_blob: Vec<u8>,
    #[serde(serialize_with = "serde_util::hex_words")]
    pub raw_rs: Vec<Word>,
    #[serde(serialize_with = "serde_util::hex_words")]
    pub raw_ss: Vec<Word>,
    #[serde(serialize_with = "serde_util::hex_bytes")]
    pub raw_vs: Word,
}

impl Envelope {
    /// Config digest (context word 0).
    pub fn digest(&self) -> Word {
        self.report_context[DIGEST_WORD]
    }

    pub fn epoch(&self) -> u32 {
        let word = &self.report_context[EPOCH_ROUND_WORD];
        u32::from_be_bytes([
            word[EPOCH_RANGE.start],
            word[EPOCH_RANGE.start + 1],
            word[EPOCH_RANGE.start + 2],
            word[EPOCH_RANGE.start + 3],
        ])
    }

    pub fn round(&self) -> u8 {
        self.report_context[EPOCH_ROUND_WORD][ROUND_INDEX]
    }

    /// Number of signers (one r/s pair each).
    pub fn signer_count(&self) -> usize {
        self.raw_rs.len()
    }

    fn tokens(&self) -> Vec<Token> {
        vec![
            Token::FixedArray(self.report_context.iter().copied().map(Token::word).collect()),
            Token::Bytes(self.report_blob.clone()),
            Token::Array(self.raw_rs.iter().copied().map(Token::word).collect()),
            Token::Array(self.raw_ss.iter().copied().map(Token::word).collect()),
            Token::word(self.raw_vs),
        ]
    }
}

/// Encodes and decodes report envelopes.
#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    schema: Schema,
    quoted: Schema,
}

impl EnvelopeCodec {
    /// Build a codec from the envelope schema and its quoted variant.
    pub fn new(schema: Schema, quoted: Schema) -> Self {
        Self { schema, quoted }
    }

    /// `{reportContext: bytes32[3], reportBlob: bytes, rawRs: bytes32[],
    /// rawSs: bytes32[], rawVs: bytes32}`
    pub fn envelope_schema() -> Schema {
        Schema::parse(&[
            ("reportContext", "bytes32[3]"),
            ("reportBlob", "bytes"),
            ("rawRs", "bytes32[]"),
            ("rawSs", "bytes32[]"),
            ("rawVs", "bytes32"),
        ])
        .expect("envelope schema is well-formed")
    }

    /// The envelope schema followed by a `quote: bytes` slot.
    pub fn quoted_schema() -> Schema {
        Self::envelope_schema()
            .with_slot("quote", ParamType::Bytes)
            .expect("quoted envelope schema is well-formed")
    }

    pub fn decode(&self, data: &[u8]) -> Result<Envelope> {
        let mut tokens = self.schema.decode(data)?.into_iter();
        let mut next = || tokens.next().ok_or_else(|| shape_error("missing slot"));

        let context = words(next()?)?;
        let report_context: [Word; CONTEXT_WORDS] = context
            .try_into()
            .map_err(|_| shape_error("reportContext"))?;
        let report_blob = next()?
            .into_bytes()
            .ok_or_else(|| shape_error("reportBlob"))?;
        let raw_rs = words(next()?)?;
        let raw_ss = words(next()?)?;
        let raw_vs = next()?.into_word().ok_or_else(|| shape_error("rawVs"))?;

        if raw_rs.len() != raw_ss.len() {
            return Err(ReportError::SignatureArityMismatch {
                rs: raw_rs.len(),
                ss: raw_ss.len(),
            });
        }

        tracing::trace!(
            blob_len = report_blob.len(),
            signers = raw_rs.len(),
            "decoded envelope"
        );

        Ok(Envelope {
            report_context,
            report_blob,
            raw_rs,
            raw_ss,
            raw_vs,
        })
    }

    pub fn encode(&self, envelope: &Envelope) -> Result<Bytes> {
        Ok(self.schema.encode(&envelope.tokens())?)
    }

    /// Re-pack an envelope with an extra opaque `quote` for submission to a
    /// verifier contract.
    pub fn encode_with_quote(&self, envelope: &Envelope, quote: &[u8]) -> Result<Bytes> {
        let mut tokens = envelope.tokens();
        tokens.push(Token::Bytes(quote.to_vec()));
        Ok(self.quoted.encode(&tokens)?)
    }
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new(Self::envelope_schema(), Self::quoted_schema())
    }
}

/// The quote word for paying verification fees in `fee_token`: the 20-byte
/// address left-padded to 32 bytes.
pub fn fee_token_quote(fee_token: [u8; 20]) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&fee_token);
    word
}

fn words(token: Token) -> Result<Vec<Word>> {
    token
        .into_array()
        .ok_or_else(|| shape_error("bytes32 array"))?
        .into_iter()
        .map(|item| item.into_word().ok_or_else(|| shape_error("bytes32")))
        .collect()
}

fn shape_error(slot: &'static str) -> ReportError {
    ReportError::Abi(AbiError::InvalidValue {
        kind: "envelope".to_string(),
        reason: slot,
    })
}
