#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]
#![allow(clippy::type_complexity)]

//! Adaptive rectangular trees for sampling functions over 1, 2 or 3 dimensional boxes.
//!
//! The core type is the `RectTree`, which stores only:
//!   - a set of leaf cells, each identified by the `Diti` of its center
//!   - a `SampleCache` of function values at every `Diti` the tree has ever sampled
//!
//! There are no node pointers. Parents, children, corners and neighbors are all computed from a cell's `Diti` by the
//! `DitiCodec`.
//!
//! Refinement is driven by a function (anything implementing `SampleFn`) and, optionally, a predicate over the current state
//! of the tree. The standard predicates are methods of `RectTree`, so a predicate closure reads like this:
//!
//! ```
//! use rect_tree_storage::prelude::*;
//!
//! let circle = ScalarFn(|p: [f64; 2]| p[0] * p[0] + p[1] * p[1] - 0.5);
//!
//! let mut tree = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
//! tree.refine_grid(2, &circle);
//! tree.refine_leaves_recursive_cell_pred(6, &circle, |t: &RectTree<2, 1>, c| {
//!     t.cell_cross_range_level(c, 0, 0.0)
//! });
//! tree.balance_tree(1, &circle);
//!
//! assert!(tree.num_leaves() > 16);
//! ```

pub mod config;
pub mod error;
pub mod func;
pub mod rect_tree;
pub mod sample_cache;

pub use config::TreeConfig;
pub use error::TreeError;
pub use func::{SampleFn, ScalarFn};
pub use rect_tree::RectTree;
pub use sample_cache::SampleCache;

// Hash types to use for small keys like `Diti`.
pub type SmallKeyHashMap<K, V> = ahash::AHashMap<K, V>;
pub type SmallKeyHashSet<K> = ahash::AHashSet<K>;

pub mod prelude {
    pub use super::{RectTree, SampleCache, SampleFn, ScalarFn, TreeConfig, TreeError};

    pub use rect_tree_core::prelude::*;
}
