use crate::error::CodecError;
use serde::{Deserialize, Serialize};

/// Linear mapping interval for quantization.
///
/// `low` is the float value that maps to the minimum output code, `high` the
/// value that maps to the maximum. Construction enforces `low < high` with
/// both bounds finite, so downstream scaling never divides by zero or
/// propagates NaN/Inf into the codes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    low: f32,
    high: f32,
}

impl ValueRange {
    pub fn new(low: f32, high: f32) -> Result<Self, CodecError> {
        // NaN bounds fail the ordering test and are rejected alongside
        // low >= high; infinite bounds would make the span degenerate.
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(CodecError::InvalidRange(low, high));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }

    /// Width of the interval, `high - low`. Always positive.
    pub fn width(&self) -> f32 {
        self.high - self.low
    }
}
