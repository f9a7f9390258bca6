use crate::quantizer::RangeQuantizer;
use voxbit_core::{CodecError, StorageType};

/// Owned quantizer output for the runtime-dispatch path, tagged by storage
/// type. Writers that learn their target type at runtime (e.g. after catalog
/// resolution) get one of these instead of a statically-typed `Vec<T>`.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeBuffer {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
}

impl CodeBuffer {
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::U8(_) => StorageType::Uint8,
            Self::I8(_) => StorageType::Int8,
            Self::U16(_) => StorageType::Uint16,
            Self::I16(_) => StorageType::Int16,
            Self::U32(_) => StorageType::Uint32,
            Self::I32(_) => StorageType::Int32,
            Self::F32(_) => StorageType::Float,
        }
    }

    /// Flatten to little-endian bytes for container writers.
    pub fn into_le_bytes(self) -> Vec<u8> {
        match self {
            Self::U8(v) => v,
            Self::I8(v) => v.into_iter().map(|s| s as u8).collect(),
            Self::U16(v) => flatten_le(&v, |s| s.to_le_bytes()),
            Self::I16(v) => flatten_le(&v, |s| s.to_le_bytes()),
            Self::U32(v) => flatten_le(&v, |s| s.to_le_bytes()),
            Self::I32(v) => flatten_le(&v, |s| s.to_le_bytes()),
            Self::F32(v) => flatten_le(&v, |s| s.to_le_bytes()),
        }
    }
}

fn flatten_le<T: Copy, const N: usize>(samples: &[T], to_bytes: impl Fn(T) -> [u8; N]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * N);
    for &s in samples {
        bytes.extend_from_slice(&to_bytes(s));
    }
    bytes
}

impl RangeQuantizer {
    /// Quantize into a runtime-selected storage type.
    ///
    /// `Float` is the full-precision passthrough: samples are copied
    /// unchanged and nothing is clipped. `Flexible` must be resolved through
    /// a [`voxbit_core::TypeCatalog`] before reaching this call.
    pub fn quantize_dynamic(
        &self,
        samples: &[f32],
        target: StorageType,
    ) -> Result<(CodeBuffer, usize), CodecError> {
        match target {
            StorageType::Uint8 => {
                let (codes, clipped) = self.quantize::<u8>(samples)?;
                Ok((CodeBuffer::U8(codes), clipped))
            }
            StorageType::Int8 => {
                let (codes, clipped) = self.quantize::<i8>(samples)?;
                Ok((CodeBuffer::I8(codes), clipped))
            }
            StorageType::Uint16 => {
                let (codes, clipped) = self.quantize::<u16>(samples)?;
                Ok((CodeBuffer::U16(codes), clipped))
            }
            StorageType::Int16 => {
                let (codes, clipped) = self.quantize::<i16>(samples)?;
                Ok((CodeBuffer::I16(codes), clipped))
            }
            StorageType::Uint32 => {
                let (codes, clipped) = self.quantize::<u32>(samples)?;
                Ok((CodeBuffer::U32(codes), clipped))
            }
            StorageType::Int32 => {
                let (codes, clipped) = self.quantize::<i32>(samples)?;
                Ok((CodeBuffer::I32(codes), clipped))
            }
            StorageType::Float => Ok((CodeBuffer::F32(samples.to_vec()), 0)),
            StorageType::Flexible => Err(CodecError::NotConcrete),
        }
    }

    /// Restore a runtime-typed buffer back to floats through the inverse map.
    pub fn restore_dynamic(&self, codes: &CodeBuffer) -> Result<Vec<f32>, CodecError> {
        match codes {
            CodeBuffer::U8(v) => self.restore::<u8>(v),
            CodeBuffer::I8(v) => self.restore::<i8>(v),
            CodeBuffer::U16(v) => self.restore::<u16>(v),
            CodeBuffer::I16(v) => self.restore::<i16>(v),
            CodeBuffer::U32(v) => self.restore::<u32>(v),
            CodeBuffer::I32(v) => self.restore::<i32>(v),
            CodeBuffer::F32(v) => Ok(v.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxbit_core::ValueRange;

    fn quantizer(bit_depth: u8, low: f32, high: f32) -> RangeQuantizer {
        RangeQuantizer::new(bit_depth, ValueRange::new(low, high).unwrap()).unwrap()
    }

    #[test]
    fn test_dispatch_matches_static_path() {
        let q = quantizer(2, 0.0, 3.0);
        let samples = [-100_000.0, 1.0, 2.0, 100_000.0];

        let (buf, clipped) = q.quantize_dynamic(&samples, StorageType::Uint8).unwrap();
        assert_eq!(buf, CodeBuffer::U8(vec![0, 1, 2, 3]));
        assert_eq!(clipped, 2);

        let (buf, _) = q.quantize_dynamic(&samples, StorageType::Uint16).unwrap();
        assert_eq!(buf.storage_type(), StorageType::Uint16);
        assert_eq!(buf.len(), samples.len());
    }

    #[test]
    fn test_float_target_is_an_unclipped_passthrough() {
        let q = quantizer(8, 0.0, 1.0);
        let samples = [-5.0, 0.5, 5.0];
        let (buf, clipped) = q.quantize_dynamic(&samples, StorageType::Float).unwrap();
        assert_eq!(buf, CodeBuffer::F32(samples.to_vec()));
        assert_eq!(clipped, 0);
    }

    #[test]
    fn test_flexible_target_is_refused() {
        let q = quantizer(8, 0.0, 1.0);
        assert_eq!(
            q.quantize_dynamic(&[0.5], StorageType::Flexible).unwrap_err(),
            CodecError::NotConcrete
        );
    }

    #[test]
    fn test_depth_error_propagates_through_dispatch() {
        let q = quantizer(12, 0.0, 1.0);
        assert_eq!(
            q.quantize_dynamic(&[0.5], StorageType::Int8).unwrap_err(),
            CodecError::DepthExceedsStorage(12, 8)
        );
    }

    #[test]
    fn test_le_byte_flattening() {
        assert_eq!(
            CodeBuffer::U16(vec![0x0102, 0x0304]).into_le_bytes(),
            vec![0x02, 0x01, 0x04, 0x03]
        );
        assert_eq!(CodeBuffer::I8(vec![-1, 2]).into_le_bytes(), vec![0xFF, 0x02]);
        assert_eq!(
            CodeBuffer::I32(vec![-2]).into_le_bytes(),
            (-2i32).to_le_bytes().to_vec()
        );
        assert_eq!(CodeBuffer::U8(vec![7, 8]).into_le_bytes(), vec![7, 8]);
    }

    #[test]
    fn test_restore_dynamic_roundtrip_types() {
        let q = quantizer(8, -4.0, 4.0);
        let (buf, _) = q.quantize_dynamic(&[-4.0, 4.0], StorageType::Uint8).unwrap();
        assert_eq!(q.restore_dynamic(&buf).unwrap(), vec![-4.0, 4.0]);

        let (buf, _) = q.quantize_dynamic(&[-4.0, 4.0], StorageType::Float).unwrap();
        assert_eq!(q.restore_dynamic(&buf).unwrap(), vec![-4.0, 4.0]);
    }
}
