use rect_tree_core::DEFAULT_BITS;

/// Construction parameters for a `RectTree`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TreeConfig {
    /// Fixed-point bits per axis. Every axis coordinate is in `[0, 2^bits]`, and the tree can be refined to level `bits - 1`.
    pub bits: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { bits: DEFAULT_BITS }
    }
}

impl TreeConfig {
    pub fn with_bits(bits: u32) -> Self {
        Self { bits }
    }
}
