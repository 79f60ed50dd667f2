use std::fmt;

use primitive_types::U256;
use serde::{Serialize, Serializer};

/// A signed `int192` report value (prices, bids, asks).
///
/// Stored as the sign-extended 256-bit two's complement word it was decoded
/// from, so encoding it back is lossless.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Int192(U256);

impl Int192 {
    pub const BITS: usize = 192;

    /// Wrap a sign-extended word as produced by the tuple codec.
    pub fn from_raw(word: U256) -> Self {
        Self(word)
    }

    pub fn into_raw(self) -> U256 {
        self.0
    }

    pub fn from_i128(value: i128) -> Self {
        let magnitude = U256::from(value.unsigned_abs());
        if value < 0 {
            Self(negate(magnitude))
        } else {
            Self(magnitude)
        }
    }

    pub fn is_negative(&self) -> bool {
        self.0.bit(255)
    }

    /// Absolute value.
    pub fn magnitude(&self) -> U256 {
        if self.is_negative() {
            negate(self.0)
        } else {
            self.0
        }
    }

    /// The value as `i128`, if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        let magnitude = self.magnitude();
        if magnitude.bits() > 127 {
            // i128::MIN has a 128-bit magnitude
            return (self.is_negative() && magnitude == U256::from(i128::MIN.unsigned_abs()))
                .then_some(i128::MIN);
        }
        let value = magnitude.low_u128() as i128;
        Some(if self.is_negative() { -value } else { value })
    }
}

fn negate(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

impl From<i128> for Int192 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl fmt::Display for Int192 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.magnitude())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for Int192 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Int192({self})")
    }
}

impl Serialize for Int192 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
