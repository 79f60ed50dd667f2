/// Errors that can occur while encoding or decoding a tuple.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// The input is shorter than the region the schema requires.
    #[error("truncated input ({available} bytes, need {needed})")]
    TruncatedInput { needed: usize, available: usize },

    /// A dynamic slot points (or extends) outside the buffer.
    #[error("dynamic data at offset {offset} with length {length} exceeds buffer of {available} bytes")]
    OffsetOutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// A static word carries non-zero padding or a bad sign extension.
    #[error("non-canonical {kind} word at byte {at}")]
    NonCanonical { kind: String, at: usize },

    /// A value does not fit the slot type it is being encoded into.
    #[error("invalid value for {kind}: {reason}")]
    InvalidValue { kind: String, reason: &'static str },

    /// The number of values differs from the number of slots.
    #[error("expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A type string or slot type is outside the supported set.
    #[error("unsupported type: {0}")]
    InvalidType(String),
}

pub type Result<T> = std::result::Result<T, AbiError>;
