use bytes::Bytes;

use crate::codec::{self, WORD_SIZE};
use crate::error::{AbiError, Result};
use crate::types::{ParamType, Token};

/// One named slot of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: String,
    pub ty: ParamType,
}

/// An ordered, validated list of typed slots.
///
/// Schemas are plain values: build one, keep it next to the code that
/// decodes with it, and pass it around explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    slots: Vec<Slot>,
    types: Vec<ParamType>,
}

impl Schema {
    /// Build a schema from `(name, type)` pairs.
    pub fn new<N: Into<String>>(slots: impl IntoIterator<Item = (N, ParamType)>) -> Result<Self> {
        let slots: Vec<Slot> = slots
            .into_iter()
            .map(|(name, ty)| Slot {
                name: name.into(),
                ty,
            })
            .collect();
        for slot in &slots {
            slot.ty.validate()?;
        }
        let types = slots.iter().map(|slot| slot.ty.clone()).collect();
        Ok(Self { slots, types })
    }

    /// Build a schema from `(name, "type string")` pairs.
    ///
    /// ```
    /// use datastreams_abi::Schema;
    ///
    /// let schema = Schema::parse(&[("feedId", "bytes32"), ("expiresAt", "uint32")]).unwrap();
    /// assert_eq!(schema.static_size(), 64);
    /// ```
    pub fn parse(slots: &[(&str, &str)]) -> Result<Self> {
        let parsed = slots
            .iter()
            .map(|(name, ty)| Ok::<_, AbiError>((*name, ty.parse::<ParamType>()?)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(parsed)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn types(&self) -> &[ParamType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Size of the static region that precedes any dynamic data.
    pub fn static_size(&self) -> usize {
        self.types.iter().map(ParamType::head_size).sum()
    }

    /// Number of 32-byte words in the static region.
    pub fn static_words(&self) -> usize {
        self.static_size() / WORD_SIZE
    }

    /// Return a copy of this schema with an extra trailing slot.
    pub fn with_slot(&self, name: impl Into<String>, ty: ParamType) -> Result<Self> {
        ty.validate()?;
        let mut extended = self.clone();
        extended.types.push(ty.clone());
        extended.slots.push(Slot {
            name: name.into(),
            ty,
        });
        Ok(extended)
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<Token>> {
        codec::decode(&self.types, data)
    }

    pub fn encode(&self, tokens: &[Token]) -> Result<Bytes> {
        codec::encode(&self.types, tokens)
    }
}
