use bytes::{BufMut, Bytes, BytesMut};
use primitive_types::U256;

use crate::error::{AbiError, Result};
use crate::types::{ParamType, Token, Word};

/// Every slot is laid out in 32-byte words.
pub const WORD_SIZE: usize = 32;

/// Decode a tuple of `types` from `data`.
///
/// Wire format:
/// ```text
/// ┌──────────────────────────────────────┬──────────────────────────────┐
/// │ Static region (head_size per slot)   │ Dynamic data                 │
/// │ value words | offset words           │ length (32B BE) | bytes ...  │
/// └──────────────────────────────────────┴──────────────────────────────┘
/// ```
/// Offsets are relative to the start of the enclosing tuple.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>> {
    for ty in types {
        ty.validate()?;
    }
    decode_tuple(types, data, 0)
}

/// Encode `tokens` as a tuple of `types`. Exact inverse of [`decode`].
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Bytes> {
    for ty in types {
        ty.validate()?;
    }
    let mut dst = BytesMut::new();
    encode_tuple(types, tokens, &mut dst)?;
    Ok(dst.freeze())
}

fn decode_tuple(types: &[ParamType], data: &[u8], start: usize) -> Result<Vec<Token>> {
    let head: usize = types.iter().map(ParamType::head_size).sum();
    let needed = start.saturating_add(head);
    if data.len() < needed {
        return Err(AbiError::TruncatedInput {
            needed,
            available: data.len(),
        });
    }

    let mut cursor = start;
    let mut tokens = Vec::with_capacity(types.len());
    for ty in types {
        let token = if ty.is_dynamic() {
            let relative = read_offset(data, cursor)?;
            let at = start
                .checked_add(relative)
                .filter(|at| *at <= data.len())
                .ok_or(AbiError::OffsetOutOfBounds {
                    offset: relative,
                    length: 0,
                    available: data.len(),
                })?;
            tracing::trace!(slot = %ty, offset = at, "decoding dynamic slot");
            decode_dynamic(ty, data, at)?
        } else {
            decode_static(ty, data, cursor)?
        };
        cursor += ty.head_size();
        tokens.push(token);
    }
    Ok(tokens)
}

fn decode_dynamic(ty: &ParamType, data: &[u8], at: usize) -> Result<Token> {
    match ty {
        ParamType::Bytes => {
            let len = read_length(data, at)?;
            let begin = at + WORD_SIZE;
            let end = checked_end(begin, len, data.len()).ok_or(AbiError::OffsetOutOfBounds {
                offset: at,
                length: len,
                available: data.len(),
            })?;
            Ok(Token::Bytes(data[begin..end].to_vec()))
        }
        ParamType::Array(inner) => {
            let len = read_length(data, at)?;
            let begin = at + WORD_SIZE;
            len.checked_mul(inner.head_size())
                .and_then(|size| checked_end(begin, size, data.len()))
                .ok_or(AbiError::OffsetOutOfBounds {
                    offset: at,
                    length: len,
                    available: data.len(),
                })?;
            let types = vec![(**inner).clone(); len];
            Ok(Token::Array(decode_tuple(&types, data, begin)?))
        }
        static_ty => decode_static(static_ty, data, at),
    }
}

fn decode_static(ty: &ParamType, data: &[u8], at: usize) -> Result<Token> {
    match ty {
        ParamType::Uint(bits) => {
            let word = read_word(data, at)?;
            if !has_fill(&word, bits / 8, 0x00) {
                return Err(non_canonical(ty, at));
            }
            Ok(Token::Uint(U256::from_big_endian(&word)))
        }
        ParamType::Int(bits) => {
            let word = read_word(data, at)?;
            if !is_sign_extended(&word, *bits) {
                return Err(non_canonical(ty, at));
            }
            Ok(Token::Int(U256::from_big_endian(&word)))
        }
        ParamType::FixedBytes(width) => {
            let word = read_word(data, at)?;
            if word[*width..].iter().any(|b| *b != 0) {
                return Err(non_canonical(ty, at));
            }
            Ok(Token::FixedBytes(word[..*width].to_vec()))
        }
        ParamType::FixedArray(inner, len) => {
            let step = inner.head_size();
            let items = (0..*len)
                .map(|i| decode_static(inner, data, at + i * step))
                .collect::<Result<Vec<_>>>()?;
            Ok(Token::FixedArray(items))
        }
        ParamType::Bytes | ParamType::Array(_) => Err(AbiError::InvalidType(ty.to_string())),
    }
}

fn encode_tuple(types: &[ParamType], tokens: &[Token], dst: &mut BytesMut) -> Result<()> {
    if types.len() != tokens.len() {
        return Err(AbiError::ArityMismatch {
            expected: types.len(),
            actual: tokens.len(),
        });
    }

    let head_size: usize = types.iter().map(ParamType::head_size).sum();
    let mut head = BytesMut::with_capacity(head_size);
    let mut tail = BytesMut::new();

    for (ty, token) in types.iter().zip(tokens) {
        if ty.is_dynamic() {
            head.put_slice(&usize_word(head_size + tail.len()));
            encode_dynamic(ty, token, &mut tail)?;
        } else {
            encode_static(ty, token, &mut head)?;
        }
    }

    dst.reserve(head.len() + tail.len());
    dst.put(head);
    dst.put(tail);
    Ok(())
}

fn encode_dynamic(ty: &ParamType, token: &Token, dst: &mut BytesMut) -> Result<()> {
    match (ty, token) {
        (ParamType::Bytes, Token::Bytes(bytes)) => {
            dst.put_slice(&usize_word(bytes.len()));
            dst.put_slice(bytes);
            dst.put_bytes(0, padding_for(bytes.len()));
            Ok(())
        }
        (ParamType::Array(inner), Token::Array(items)) => {
            dst.put_slice(&usize_word(items.len()));
            let types = vec![(**inner).clone(); items.len()];
            encode_tuple(&types, items, dst)
        }
        _ => Err(invalid_value(ty, token.kind())),
    }
}

fn encode_static(ty: &ParamType, token: &Token, dst: &mut BytesMut) -> Result<()> {
    match (ty, token) {
        (ParamType::Uint(bits), Token::Uint(value)) => {
            if value.bits() > *bits {
                return Err(invalid_value(ty, "value exceeds bit width"));
            }
            dst.put_slice(&u256_word(value));
            Ok(())
        }
        (ParamType::Int(bits), Token::Int(value)) => {
            let word = u256_word(value);
            if !is_sign_extended(&word, *bits) {
                return Err(invalid_value(ty, "value exceeds bit width"));
            }
            dst.put_slice(&word);
            Ok(())
        }
        (ParamType::FixedBytes(width), Token::FixedBytes(bytes)) => {
            if bytes.len() != *width {
                return Err(invalid_value(ty, "wrong byte length"));
            }
            dst.put_slice(bytes);
            dst.put_bytes(0, WORD_SIZE - width);
            Ok(())
        }
        (ParamType::FixedArray(inner, len), Token::FixedArray(items)) => {
            if items.len() != *len {
                return Err(invalid_value(ty, "wrong number of elements"));
            }
            items
                .iter()
                .try_for_each(|item| encode_static(inner, item, dst))
        }
        _ => Err(invalid_value(ty, token.kind())),
    }
}

fn read_word(data: &[u8], at: usize) -> Result<Word> {
    data.get(at..at.saturating_add(WORD_SIZE))
        .and_then(|slice| slice.try_into().ok())
        .ok_or(AbiError::TruncatedInput {
            needed: at.saturating_add(WORD_SIZE),
            available: data.len(),
        })
}

/// Read an offset word from the static region.
///
/// An offset too large for `usize` is reported at the position of its word.
fn read_offset(data: &[u8], at: usize) -> Result<usize> {
    let word = read_word(data, at)?;
    word_to_usize(&word).ok_or(AbiError::OffsetOutOfBounds {
        offset: at,
        length: 0,
        available: data.len(),
    })
}

/// Read the length word that prefixes dynamic data at `at`.
fn read_length(data: &[u8], at: usize) -> Result<usize> {
    let out_of_bounds = |length| AbiError::OffsetOutOfBounds {
        offset: at,
        length,
        available: data.len(),
    };
    let word = data
        .get(at..at.saturating_add(WORD_SIZE))
        .ok_or(out_of_bounds(WORD_SIZE))?;
    word_to_usize(word).ok_or(out_of_bounds(usize::MAX))
}

fn word_to_usize(word: &[u8]) -> Option<usize> {
    let (high, low) = word.split_at(WORD_SIZE - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let low: [u8; 8] = low.try_into().ok()?;
    usize::try_from(u64::from_be_bytes(low)).ok()
}

fn checked_end(begin: usize, len: usize, available: usize) -> Option<usize> {
    begin.checked_add(len).filter(|end| *end <= available)
}

/// True if the leading `WORD_SIZE - value_bytes` bytes all equal `fill`.
fn has_fill(word: &Word, value_bytes: usize, fill: u8) -> bool {
    word[..WORD_SIZE - value_bytes].iter().all(|b| *b == fill)
}

fn is_sign_extended(word: &Word, bits: usize) -> bool {
    let value_bytes = bits / 8;
    if value_bytes == WORD_SIZE {
        return true;
    }
    let fill = if word[WORD_SIZE - value_bytes] & 0x80 != 0 {
        0xff
    } else {
        0x00
    };
    has_fill(word, value_bytes, fill)
}

fn u256_word(value: &U256) -> Word {
    let mut word = [0u8; WORD_SIZE];
    value.to_big_endian(&mut word);
    word
}

fn usize_word(value: usize) -> Word {
    u256_word(&U256::from(value as u64))
}

fn padding_for(len: usize) -> usize {
    (WORD_SIZE - len % WORD_SIZE) % WORD_SIZE
}

fn non_canonical(ty: &ParamType, at: usize) -> AbiError {
    AbiError::NonCanonical {
        kind: ty.to_string(),
        at,
    }
}

fn invalid_value(ty: &ParamType, reason: &'static str) -> AbiError {
    AbiError::InvalidValue {
        kind: ty.to_string(),
        reason,
    }
}
