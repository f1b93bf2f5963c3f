//! Adaptive sampling of functions over 1D, 2D and 3D boxes, and meshing of the results.
//!
//! This library is organized into several crates:
//! - **core**: interleaved fixed-point coordinates (`Diti`), domain boxes, and small vector math
//! - **storage**: the `RectTree`, which refines a grid of cells wherever a function is interesting and caches every
//!   sample it takes
//! - **mesh**: the `CellComplex`, conversion of trees into points, rectangles or crack-free fans, and VTK/PLY output
//!
//! ```
//! use rect_tree::prelude::*;
//!
//! let f = ScalarFn(|p: [f64; 2]| p[0] * p[0] - p[1] * p[1]);
//! let mut tree = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
//! tree.refine_grid(3, &f);
//!
//! let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Domain(1), ValueSource::Range(0)]);
//! let mut cplx = CellComplex::<StrictChecks>::new();
//! construct_geometry(&mut cplx, &tree, &[], CellStructure::Rectangles, 2, &recipe, Some(&f)).unwrap();
//!
//! assert_eq!(cplx.num_cells(), 64);
//! ```

pub use rect_tree_core as core;
pub use rect_tree_storage as storage;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::storage::prelude::*;

    #[cfg(feature = "mesh")]
    pub use super::mesh::prelude::*;
}

#[cfg(feature = "mesh")]
pub use rect_tree_mesh as mesh;
