#![allow(clippy::too_many_arguments)]
#![deny(
    rust_2018_compatibility,
    rust_2018_idioms,
    nonstandard_style,
    unused,
    future_incompatible
)]
#![warn(clippy::doc_markdown)]

//! Cell complexes, and the algorithms that build them from a `RectTree`.
//!
//! A `CellComplex` is a list of 3D points, a list of cells (each a list of point indices), and named per-point datasets. It
//! optionally deduplicates points and cells, and optionally rejects degenerate or self-intersecting cells. Which checks run is
//! chosen at compile time by a `ComplexConfig`.
//!
//! The converter walks the leaves of a tree and emits:
//!   - `CellStructure::Points`: a POINT cell per cell vertex
//!   - `CellStructure::Rectangles`: one segment, quad or hexahedron per leaf
//!   - `CellStructure::Fans`: segments, triangles or pyramids fanned from each leaf center to the leaf's boundary, without
//!     cracks between leaves of different levels
//!
//! Fans can "heal" edges with a NaN end by searching for the edge of the function's domain with a `NanEdgeSolver`.
//!
//! ```
//! use rect_tree_mesh::prelude::*;
//! use rect_tree_storage::prelude::*;
//!
//! let f = |p: [f64; 2]| [p[0] * p[0] + p[1] * p[1]];
//! let mut tree = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
//! tree.refine_grid(3, &f);
//!
//! let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Domain(1), ValueSource::Range(0)])
//!     .with_scalar("z", ValueSource::Range(0));
//! let mut cplx = CellComplex::<StrictChecks>::new();
//! let n = construct_geometry(&mut cplx, &tree, &[], CellStructure::Fans, 2, &recipe, Some(&f)).unwrap();
//!
//! assert_eq!(n, 64 * 4);
//! assert_eq!(cplx.num_points(), 81 + 64);
//! ```
//!
//! Complexes are written with `write_legacy_vtk`, `write_xml_vtk` or `write_ply`.

pub mod cell;
pub mod complex;
pub mod converter;
pub mod geometry;
pub mod nan_edge;
pub mod point_index;
pub mod writers;

pub use cell::*;
pub use complex::*;
pub use converter::*;
pub use geometry::SegIntersection;
pub use nan_edge::NanEdgeSolver;
pub use point_index::PointIndex;
pub use writers::*;

pub mod prelude {
    pub use super::{
        construct_geometry, construct_geometry_fans, construct_geometry_points,
        construct_geometry_rects, write_legacy_vtk, write_ply, write_xml_vtk, CellComplex,
        CellInsert, CellRejection, CellStructure, CellType, ComplexConfig, ConvertError,
        GeometryRecipe, NanEdgeSolver, NoChecks, SegIntersection, StrictChecks, ValueSource,
        WriteError,
    };
}
