use voxbit_core::{CodecError, StorageSample, ValueRange};

/// Widest bit depth any supported storage type can hold.
const MAX_BIT_DEPTH: u8 = 32;

/// Linear requantizer from a float value range onto an integer code interval.
///
/// The code interval is derived from the effective bit depth and the
/// signedness of the output type:
/// unsigned `[0, 2^depth - 1]`, signed `[-2^(depth-1), 2^(depth-1) - 1]`.
/// The depth may be narrower than the physical storage width, in which case
/// the upper codes of the type simply go unused.
///
/// Samples at or beyond either range bound are clipped to the edge code and
/// counted; the count is the caller's diagnostic that the configured dynamic
/// range was too narrow for the data.
#[derive(Debug, Clone, Copy)]
pub struct RangeQuantizer {
    bit_depth: u8,
    range: ValueRange,
}

impl RangeQuantizer {
    pub fn new(bit_depth: u8, range: ValueRange) -> Result<Self, CodecError> {
        if bit_depth == 0 || bit_depth > MAX_BIT_DEPTH {
            return Err(CodecError::UnsupportedBitDepth(bit_depth));
        }
        Ok(Self { bit_depth, range })
    }

    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Code interval for the configured depth in storage type `T`.
    fn code_bounds<T: StorageSample>(&self) -> Result<(i64, i64), CodecError> {
        if self.bit_depth > T::BITS {
            return Err(CodecError::DepthExceedsStorage(self.bit_depth, T::BITS));
        }
        let bounds = if T::SIGNED {
            let half = 1i64 << (self.bit_depth - 1);
            (-half, half - 1)
        } else {
            (0, (1i64 << self.bit_depth) - 1)
        };
        Ok(bounds)
    }

    /// Map samples onto codes in `T`, returning the codes and how many
    /// samples reached or exceeded a range bound.
    ///
    /// Boundary tests are inclusive and run on the raw float value, so a
    /// sample exactly at a bound counts as clipped even though its linear
    /// image is the same edge code. Interior samples map as
    /// `(v - low) * (out_max - out_min) / (high - low) + out_min`,
    /// truncated toward zero. Multiplying before dividing (in f64) keeps
    /// integer samples over an integer-wide range exactly on their code,
    /// where divide-first can land one ulp under it.
    pub fn quantize<T: StorageSample>(
        &self,
        samples: &[f32],
    ) -> Result<(Vec<T>, usize), CodecError> {
        let (out_min, out_max) = self.code_bounds::<T>()?;
        let low = f64::from(self.range.low());
        let span = f64::from(self.range.high()) - low;
        let steps = (out_max - out_min) as f64;

        let mut codes = Vec::with_capacity(samples.len());
        let mut clipped = 0usize;

        for &v in samples {
            let code = if v <= self.range.low() {
                clipped += 1;
                out_min
            } else if v >= self.range.high() {
                clipped += 1;
                out_max
            } else {
                let scaled = (f64::from(v) - low) * steps / span + out_min as f64;
                // `as` truncates toward zero; the clamp absorbs float
                // overshoot at the interval edges.
                (scaled as i64).clamp(out_min, out_max)
            };
            codes.push(T::from_code(code));
        }

        Ok((codes, clipped))
    }

    /// Inverse map: codes back to floats through the same linear range.
    ///
    /// Codes outside the configured depth's interval (possible when the depth
    /// is narrower than the storage width and the buffer was produced
    /// elsewhere) are clamped to the interval before mapping.
    pub fn restore<T: StorageSample>(&self, codes: &[T]) -> Result<Vec<f32>, CodecError> {
        let (out_min, out_max) = self.code_bounds::<T>()?;
        let low = f64::from(self.range.low());
        let span = f64::from(self.range.high()) - low;
        let steps = (out_max - out_min) as f64;

        let samples = codes
            .iter()
            .map(|&c| {
                let code = c.code().clamp(out_min, out_max);
                (low + (code - out_min) as f64 * span / steps) as f32
            })
            .collect();

        Ok(samples)
    }
}
