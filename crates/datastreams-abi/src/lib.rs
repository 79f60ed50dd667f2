//! Fixed-schema tuple codec for Data Streams report envelopes and payloads.
//!
//! Every value occupies one or more 32-byte words:
//! - Static slots (`uintN`, `intN`, `bytesN`, `T[N]` of static `T`) are packed
//!   in declaration order
//! - Dynamic slots (`bytes`, `T[]` of static `T`) store a big-endian offset
//!   in the static region, pointing at length-prefixed data placed after it
//!
//! Array elements must be static, so decoded output never exceeds the input.
//!
//! Decoding never panics: truncated input, out-of-range offsets and
//! non-canonical padding all surface as [`AbiError`].

pub mod codec;
pub mod error;
pub mod schema;
pub mod types;

pub use codec::{decode, encode, WORD_SIZE};
pub use error::{AbiError, Result};
pub use schema::{Schema, Slot};
pub use types::{ParamType, Token, Word};

pub use primitive_types::U256;
