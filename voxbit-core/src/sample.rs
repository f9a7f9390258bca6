/// Concrete fixed-width output type for quantized samples.
///
/// The quantizer is generic over this trait and is instantiated once per
/// supported width/signedness pair. Codes travel as `i64` internally, which
/// covers the full range of every implementor (up to 32 bits either
/// signedness), so `from_code` is only called with values already clamped
/// into the implementor's code interval.
pub trait StorageSample: Copy + Send + Sync + 'static {
    /// Physical width of the storage type in bits.
    const BITS: u8;

    /// Whether the type carries a sign bit.
    const SIGNED: bool;

    fn from_code(code: i64) -> Self;

    fn code(self) -> i64;
}

impl StorageSample for u8 {
    const BITS: u8 = 8;
    const SIGNED: bool = false;

    fn from_code(code: i64) -> Self {
        code as u8
    }

    fn code(self) -> i64 {
        i64::from(self)
    }
}

impl StorageSample for i8 {
    const BITS: u8 = 8;
    const SIGNED: bool = true;

    fn from_code(code: i64) -> Self {
        code as i8
    }

    fn code(self) -> i64 {
        i64::from(self)
    }
}

impl StorageSample for u16 {
    const BITS: u8 = 16;
    const SIGNED: bool = false;

    fn from_code(code: i64) -> Self {
        code as u16
    }

    fn code(self) -> i64 {
        i64::from(self)
    }
}

impl StorageSample for i16 {
    const BITS: u8 = 16;
    const SIGNED: bool = true;

    fn from_code(code: i64) -> Self {
        code as i16
    }

    fn code(self) -> i64 {
        i64::from(self)
    }
}

impl StorageSample for u32 {
    const BITS: u8 = 32;
    const SIGNED: bool = false;

    fn from_code(code: i64) -> Self {
        code as u32
    }

    fn code(self) -> i64 {
        i64::from(self)
    }
}

impl StorageSample for i32 {
    const BITS: u8 = 32;
    const SIGNED: bool = true;

    fn from_code(code: i64) -> Self {
        code as i32
    }

    fn code(self) -> i64 {
        i64::from(self)
    }
}
