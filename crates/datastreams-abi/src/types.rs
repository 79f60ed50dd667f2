use std::fmt;
use std::str::FromStr;

use primitive_types::U256;

use crate::codec::WORD_SIZE;
use crate::error::{AbiError, Result};

/// A single 32-byte word.
pub type Word = [u8; WORD_SIZE];

/// The type of one tuple slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint(usize),
    /// Two's complement signed integer of the given bit width.
    Int(usize),
    /// Fixed-width byte string, right-padded to one word (1..=32 bytes).
    FixedBytes(usize),
    /// Length-prefixed byte string.
    Bytes,
    /// Length-prefixed array of statically sized elements.
    Array(Box<ParamType>),
    /// Array with a length fixed by the type. Elements are statically sized.
    FixedArray(Box<ParamType>, usize),
}

impl ParamType {
    /// Whether the slot is encoded out-of-line behind an offset word.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// Bytes the slot occupies in the static region of its enclosing tuple.
    pub fn head_size(&self) -> usize {
        match self {
            ParamType::FixedArray(inner, len) if !inner.is_dynamic() => inner.head_size() * len,
            _ => WORD_SIZE,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            ParamType::Uint(bits) | ParamType::Int(bits) => {
                if *bits == 0 || *bits > 256 || bits % 8 != 0 {
                    return Err(AbiError::InvalidType(self.to_string()));
                }
            }
            ParamType::FixedBytes(width) => {
                if *width == 0 || *width > WORD_SIZE {
                    return Err(AbiError::InvalidType(self.to_string()));
                }
            }
            ParamType::Bytes => {}
            // Elements behind their own offsets could alias one another
            // and decode to far more data than the input holds.
            ParamType::Array(inner) => {
                if inner.is_dynamic() {
                    return Err(AbiError::InvalidType(self.to_string()));
                }
                inner.validate()?;
            }
            ParamType::FixedArray(inner, len) => {
                if *len == 0 || inner.is_dynamic() {
                    return Err(AbiError::InvalidType(self.to_string()));
                }
                inner.validate()?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Uint(bits) => write!(f, "uint{bits}"),
            ParamType::Int(bits) => write!(f, "int{bits}"),
            ParamType::FixedBytes(width) => write!(f, "bytes{width}"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::Array(inner) => write!(f, "{inner}[]"),
            ParamType::FixedArray(inner, len) => write!(f, "{inner}[{len}]"),
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    /// Parses type strings such as `bytes32[3]`, `bytes32[]` or `uint192`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AbiError::InvalidType(s.to_string());
        let s = s.trim();

        if let Some(open) = s.strip_suffix(']').and_then(|rest| rest.rfind('[')) {
            let inner: ParamType = s[..open].parse().map_err(|_| invalid())?;
            let len = &s[open + 1..s.len() - 1];
            let ty = if len.is_empty() {
                ParamType::Array(Box::new(inner))
            } else {
                let len = len.parse::<usize>().map_err(|_| invalid())?;
                ParamType::FixedArray(Box::new(inner), len)
            };
            ty.validate().map_err(|_| invalid())?;
            return Ok(ty);
        }

        let ty = if s == "bytes" {
            ParamType::Bytes
        } else if let Some(width) = s.strip_prefix("bytes") {
            ParamType::FixedBytes(width.parse().map_err(|_| invalid())?)
        } else if let Some(bits) = s.strip_prefix("uint") {
            ParamType::Uint(parse_bits(bits).ok_or_else(invalid)?)
        } else if let Some(bits) = s.strip_prefix("int") {
            ParamType::Int(parse_bits(bits).ok_or_else(invalid)?)
        } else {
            return Err(invalid());
        };
        ty.validate().map_err(|_| invalid())?;
        Ok(ty)
    }
}

fn parse_bits(bits: &str) -> Option<usize> {
    if bits.is_empty() {
        Some(256)
    } else {
        bits.parse().ok()
    }
}

/// A decoded (or to-be-encoded) slot value.
///
/// Signed integers are carried as their 256-bit two's complement word, so a
/// negative `int192` is sign-extended across the full `U256`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    Int(U256),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    Array(Vec<Token>),
    FixedArray(Vec<Token>),
}

impl Token {
    /// Build a `bytes32` token from a word.
    pub fn word(word: Word) -> Self {
        Token::FixedBytes(word.to_vec())
    }

    pub fn into_uint(self) -> Option<U256> {
        match self {
            Token::Uint(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<U256> {
        match self {
            Token::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_fixed_bytes(self) -> Option<Vec<u8>> {
        match self {
            Token::FixedBytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Token::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Elements of either array flavour.
    pub fn into_array(self) -> Option<Vec<Token>> {
        match self {
            Token::Array(items) | Token::FixedArray(items) => Some(items),
            _ => None,
        }
    }

    /// A `bytes32` value as a word.
    pub fn into_word(self) -> Option<Word> {
        self.into_fixed_bytes()?.try_into().ok()
    }

    /// Short name of the token kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::FixedBytes(_) => "fixed bytes",
            Token::Bytes(_) => "bytes",
            Token::Array(_) => "array",
            Token::FixedArray(_) => "fixed array",
        }
    }
}
