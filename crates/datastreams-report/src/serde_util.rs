//! JSON helpers for report fields.

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a `U256` as a decimal string.
pub(crate) fn decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Serialize raw bytes as `0x`-prefixed lower-case hex.
pub(crate) fn hex_bytes<S: Serializer, T: AsRef<[u8]>>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(value.as_ref())))
}

/// Serialize a list of words as `0x` hex strings.
pub(crate) fn hex_words<S: Serializer>(
    words: &[[u8; 32]],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(words.iter().map(|word| format!("0x{}", hex::encode(word))))
}

/// Deserialize `0x`-optional hex into bytes.
pub(crate) fn from_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    crate::api::decode_hex(&s).map_err(serde::de::Error::custom)
}
