use thiserror::Error;

/// Errors shared by type selection and quantization.
///
/// Every operation fails fast with one of these before producing any output;
/// there are no partially-filled buffers and nothing to retry.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CodecError {
    #[error("invalid sample range: low {0} must be strictly below high {1}")]
    InvalidRange(f32, f32),

    #[error("no storage type can hold {0}-bit samples")]
    UnsupportedBitDepth(u8),

    #[error("{0}-bit samples do not fit a {1}-bit storage type")]
    DepthExceedsStorage(u8, u8),

    #[error("catalog already has a candidate ranked at {0} bits")]
    DuplicateWidth(u8),

    #[error("flexible is a request marker, not a concrete storage type")]
    NotConcrete,
}
