use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage representation an output format can hold.
///
/// The fixed-width variants are concrete quantization targets. `Float` is the
/// full-precision passthrough. `Flexible` is a request marker: "pick the
/// narrowest adequate type for my bit depth" — it is resolved through a
/// [`TypeCatalog`] and never reaches the quantizer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float,
    Flexible,
}

impl StorageType {
    /// Physical width in bits. `Flexible` has no representation of its own.
    pub fn bits(&self) -> u8 {
        match self {
            Self::Uint8 | Self::Int8 => 8,
            Self::Uint16 | Self::Int16 => 16,
            Self::Uint32 | Self::Int32 | Self::Float => 32,
            Self::Flexible => 0,
        }
    }

    /// Whether the integer code interval for this type starts below zero.
    /// Only meaningful for the fixed-width variants; `Float` bypasses code
    /// derivation entirely (it is the unclipped passthrough) and reads as
    /// unsigned here, as does `Flexible`.
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32)
    }

    /// Bytes one stored sample occupies.
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits()) / 8
    }
}

/// Ordered set of storage types a destination format supports.
///
/// Candidates rank by bit width, except `Float`, which ranks at 0 so that the
/// lower-bound search skips it for every positive bit depth: a wide float is
/// never "the narrowest integer that fits". A bit depth of 0 — a request for
/// full precision — resolves to `Float` when the catalog carries one.
#[derive(Debug)]
pub struct TypeCatalog {
    ranked: BTreeMap<u8, StorageType>,
}

impl TypeCatalog {
    /// Build a catalog from candidate types.
    ///
    /// Two candidates ranking at the same width would make selection depend
    /// on registration order, so duplicates are rejected rather than letting
    /// the later one win silently.
    pub fn new(candidates: &[StorageType]) -> Result<Self, CodecError> {
        let mut ranked = BTreeMap::new();
        for &ty in candidates {
            if ty == StorageType::Flexible {
                return Err(CodecError::NotConcrete);
            }
            let key = match ty {
                StorageType::Float => 0,
                _ => ty.bits(),
            };
            if ranked.insert(key, ty).is_some() {
                return Err(CodecError::DuplicateWidth(key));
            }
        }
        Ok(Self { ranked })
    }

    /// Smallest-capacity candidate whose rank covers `bit_depth`.
    pub fn narrowest_for(&self, bit_depth: u8) -> Result<StorageType, CodecError> {
        self.ranked
            .range(bit_depth..)
            .next()
            .map(|(_, &ty)| ty)
            .ok_or(CodecError::UnsupportedBitDepth(bit_depth))
    }

    /// Resolve a declared output type for the given bit depth.
    ///
    /// A concrete declaration passes through untouched; only the `Flexible`
    /// marker triggers the narrowest-candidate search.
    pub fn resolve(&self, declared: StorageType, bit_depth: u8) -> Result<StorageType, CodecError> {
        match declared {
            StorageType::Flexible => self.narrowest_for(bit_depth),
            concrete => Ok(concrete),
        }
    }
}
