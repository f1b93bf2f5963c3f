use thiserror::Error;

/// Invalid parameters for a `DitiCodec`.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum CodecError {
    #[error("domain dimension {0} is not supported, expected 1, 2 or 3")]
    UnsupportedDimension(usize),

    #[error("{bits} bits per axis is not supported, expected 1..={max}")]
    BitWidth { bits: u32, max: u32 },
}

impl CodecError {
    pub fn code(&self) -> i32 {
        match self {
            CodecError::UnsupportedDimension(_) => 1,
            CodecError::BitWidth { .. } => 2,
        }
    }
}
