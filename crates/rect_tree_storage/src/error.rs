use rect_tree_core::CodecError;

use thiserror::Error;

/// Reasons a `RectTree` can't be constructed.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum TreeError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("bounding box has no extent on axis {axis}")]
    DegenerateDomain { axis: usize },

    #[error("range dimension must be at least 1")]
    EmptyRange,
}

impl TreeError {
    /// A stable nonzero code for callers that report failures as process exit codes.
    pub fn code(&self) -> i32 {
        match self {
            TreeError::Codec(CodecError::UnsupportedDimension(_)) => 1,
            TreeError::Codec(CodecError::BitWidth { .. }) => 2,
            TreeError::DegenerateDomain { .. } => 3,
            TreeError::EmptyRange => 4,
        }
    }
}
