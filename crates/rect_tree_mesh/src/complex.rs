//! The `CellComplex`: points, cells and per-point datasets.
//!
//! # Configuration
//!
//! Which deduplication and quality checks run is chosen by the `ComplexConfig` type parameter. The flags are associated
//! consts, so disabled checks are compiled out:
//!
//! ```
//! use rect_tree_mesh::prelude::*;
//!
//! let mut strict = CellComplex::<StrictChecks>::new();
//! let a = strict.add_point([0.0, 0.0, 0.0]).unwrap();
//! let b = strict.add_point([1.0, 0.0, 0.0]).unwrap();
//! let c = strict.add_point([2.0, 0.0, 0.0]).unwrap();
//! assert_eq!(strict.add_cell(CellType::Triangle, &[a, b, c]), Err(CellRejection::DimensionLow));
//!
//! let mut loose = CellComplex::<NoChecks>::new();
//! let a = loose.add_point([0.0, 0.0, 0.0]).unwrap();
//! let b = loose.add_point([1.0, 0.0, 0.0]).unwrap();
//! let c = loose.add_point([2.0, 0.0, 0.0]).unwrap();
//! assert_eq!(loose.add_cell(CellType::Triangle, &[a, b, c]), Ok(CellInsert::New));
//! ```
//!
//! # Datasets
//!
//! Scalar and vector datasets are keyed by name. A dataset only grows as values are added, and is padded with zeros to
//! `num_points()` when read. The vector datasets `NORMALS` and `COLORS` are treated specially by the writers.

mod checks;
mod dump;

use crate::{CellInsert, CellRejection, CellType, PointIndex};

use rect_tree_core::vec3::Vec3;
use rect_tree_storage::SmallKeyHashSet;

use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::debug;

/// Compile-time selection of the deduplication and quality checks of a `CellComplex`.
pub trait ComplexConfig {
    /// Reuse an existing point within `EPSILON` on every axis instead of adding a new one.
    const UNIQUE_POINTS: bool;
    /// Don't add a cell whose vertex set equals that of an existing cell.
    const UNIQUE_CELLS: bool;
    /// Reject cells with the wrong vertex count, out of range indexes or repeated indexes.
    const CHECK_VERTEXES: bool;
    /// Reject degenerate cells.
    const CHECK_DIMENSION: bool;
    /// Reject cells with improperly intersecting edges.
    const CHECK_EDGES: bool;
    /// Tolerance for point equality and every geometric predicate.
    const EPSILON: f64;
}

macro_rules! complex_config {
    ($(#[$doc:meta])* $name:ident, $checks:expr, $eps:expr) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
        pub struct $name;

        impl ComplexConfig for $name {
            const UNIQUE_POINTS: bool = $checks;
            const UNIQUE_CELLS: bool = $checks;
            const CHECK_VERTEXES: bool = $checks;
            const CHECK_DIMENSION: bool = $checks;
            const CHECK_EDGES: bool = $checks;
            const EPSILON: f64 = $eps;
        }
    };
}

complex_config!(
    /// Unique points and cells, and every check, with a tolerance of `1e-5`.
    StrictChecks, true, 1.0e-5
);
complex_config!(
    /// No deduplication or checks. The tolerance of `1e-5` is only used by explicit geometric queries.
    NoChecks, false, 1.0e-5
);
complex_config!(StrictChecks3, true, 1.0e-3);
complex_config!(NoChecks3, false, 1.0e-3);
complex_config!(StrictChecks9, true, 1.0e-9);
complex_config!(NoChecks9, false, 1.0e-9);

/// A list of 3D points, a list of cells over those points, and named per-point datasets.
#[derive(Clone, Debug)]
pub struct CellComplex<C: ComplexConfig = StrictChecks> {
    points: Vec<Vec3>,
    point_index: PointIndex,
    cells: Vec<(CellType, Vec<usize>)>,
    cell_keys: SmallKeyHashSet<Vec<usize>>,
    scalar_data: BTreeMap<String, Vec<f64>>,
    vector_data: BTreeMap<String, Vec<Vec3>>,
    last_point_new: bool,
    last_point_idx: Option<usize>,
    last_cell_status: Option<CellRejection>,
    last_cell_new: bool,
    marker: PhantomData<C>,
}

impl<C: ComplexConfig> Default for CellComplex<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ComplexConfig> CellComplex<C> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            point_index: PointIndex::new(C::EPSILON),
            cells: Vec::new(),
            cell_keys: SmallKeyHashSet::default(),
            scalar_data: BTreeMap::new(),
            vector_data: BTreeMap::new(),
            last_point_new: false,
            last_point_idx: None,
            last_cell_status: None,
            last_cell_new: false,
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        C::EPSILON
    }

    /// Remove all points, cells and datasets.
    pub fn clear(&mut self) {
        self.points.clear();
        self.point_index.clear();
        self.cells.clear();
        self.cell_keys.clear();
        self.scalar_data.clear();
        self.vector_data.clear();
        self.last_point_new = false;
        self.last_point_idx = None;
        self.last_cell_status = None;
        self.last_cell_new = false;
    }

    // ██████╗  ██████╗ ██╗███╗   ██╗████████╗███████╗
    // ██╔══██╗██╔═══██╗██║████╗  ██║╚══██╔══╝██╔════╝
    // ██████╔╝██║   ██║██║██╔██╗ ██║   ██║   ███████╗
    // ██╔═══╝ ██║   ██║██║██║╚██╗██║   ██║   ╚════██║
    // ██║     ╚██████╔╝██║██║ ╚████║   ██║   ███████║
    // ╚═╝      ╚═════╝ ╚═╝╚═╝  ╚═══╝   ╚═╝   ╚══════╝

    /// Add `p` and return its index, or `None` if any coordinate is NaN.
    ///
    /// With `UNIQUE_POINTS`, the index of an existing point within `EPSILON` on every axis is returned instead when there is
    /// one.
    pub fn add_point(&mut self, p: Vec3) -> Option<usize> {
        if p.iter().any(|c| c.is_nan()) {
            self.last_point_new = false;
            self.last_point_idx = None;
            return None;
        }

        if C::UNIQUE_POINTS {
            if let Some(existing) = self.point_index.find(&self.points, &p) {
                self.last_point_new = false;
                self.last_point_idx = Some(existing);
                return Some(existing);
            }
        }

        let idx = self.points.len();
        self.points.push(p);
        if C::UNIQUE_POINTS {
            self.point_index.insert(&p, idx);
        }
        self.last_point_new = true;
        self.last_point_idx = Some(idx);

        Some(idx)
    }

    /// True iff the last `add_point` appended a point.
    #[inline]
    pub fn last_point_added_was_new(&self) -> bool {
        self.last_point_new
    }

    /// The index returned by the last `add_point`.
    #[inline]
    pub fn idx_of_last_point_added(&self) -> Option<usize> {
        self.last_point_idx
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn point(&self, idx: usize) -> Option<&Vec3> {
        self.points.get(idx)
    }

    //  ██████╗███████╗██╗     ██╗     ███████╗
    // ██╔════╝██╔════╝██║     ██║     ██╔════╝
    // ██║     █████╗  ██║     ██║     ███████╗
    // ██║     ██╔══╝  ██║     ██║     ╚════██║
    // ╚██████╗███████╗███████╗███████╗███████║
    //  ╚═════╝╚══════╝╚══════╝╚══════╝╚══════╝

    /// Add a cell of type `cell_type` over the point indexes `verts`, in VTK vertex order.
    ///
    /// The enabled checks run in order (vertexes, dimension, edges) and the first failure is returned. Then, with
    /// `UNIQUE_CELLS`, a cell with the same vertex set as an existing cell is not added again.
    pub fn add_cell(&mut self, cell_type: CellType, verts: &[usize]) -> Result<CellInsert, CellRejection> {
        if let Err(rejection) = self.check_cell(cell_type, verts) {
            debug!(
                "Rejected {} {:?}: {} ({})",
                cell_type.name(),
                verts,
                rejection.name(),
                rejection.code()
            );
            self.last_cell_status = Some(rejection);
            self.last_cell_new = false;
            return Err(rejection);
        }
        self.last_cell_status = None;

        if C::UNIQUE_CELLS {
            let mut key = verts.to_vec();
            key.sort_unstable();
            if !self.cell_keys.insert(key) {
                self.last_cell_new = false;
                return Ok(CellInsert::Existing);
            }
        }
        self.cells.push((cell_type, verts.to_vec()));
        self.last_cell_new = true;

        Ok(CellInsert::New)
    }

    /// Add the parts of dimension `dimension` of the cell (for example the 12 edges of a hexahedron for `dimension == 1`).
    /// When `dimension` is at least the dimension of `cell_type`, the cell itself is added.
    ///
    /// Returns the number of parts accepted, whether new or already present.
    ///
    /// # Panics
    ///
    /// If a decomposition is requested and `verts` doesn't have exactly `cell_type.num_points()` indexes.
    pub fn add_cell_parts(&mut self, cell_type: CellType, verts: &[usize], dimension: usize) -> usize {
        if dimension >= cell_type.dimension() {
            return usize::from(self.add_cell(cell_type, verts).is_ok());
        }
        assert_eq!(
            verts.len(),
            cell_type.num_points(),
            "{} needs {} vertexes to decompose",
            cell_type.name(),
            cell_type.num_points()
        );

        let mut accepted = 0;
        for part in cell_type.structure(dimension) {
            let part_verts: Vec<usize> = part.iter().map(|&k| verts[k]).collect();
            if let Some(part_type) = CellType::from_point_count(part_verts.len()) {
                if self.add_cell(part_type, &part_verts).is_ok() {
                    accepted += 1;
                }
            }
        }

        accepted
    }

    /// The rejection of the last `add_cell`, or `None` if it was accepted.
    #[inline]
    pub fn status_of_last_cell_added(&self) -> Option<CellRejection> {
        self.last_cell_status
    }

    /// True iff the last `add_cell` was accepted and appended a cell.
    #[inline]
    pub fn last_cell_added_was_new(&self) -> bool {
        self.last_cell_new
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// The vertex indexes and type of every cell, in insertion order.
    pub fn cells(&self) -> impl '_ + ExactSizeIterator<Item = (&[usize], CellType)> {
        self.cells.iter().map(|(t, v)| (v.as_slice(), *t))
    }

    pub fn cell(&self, idx: usize) -> Option<(&[usize], CellType)> {
        self.cells.get(idx).map(|(t, v)| (v.as_slice(), *t))
    }

    // ██████╗  █████╗ ████████╗ █████╗
    // ██╔══██╗██╔══██╗╚══██╔══╝██╔══██╗
    // ██║  ██║███████║   ██║   ███████║
    // ██║  ██║██╔══██║   ██║   ██╔══██║
    // ██████╔╝██║  ██║   ██║   ██║  ██║
    // ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚═╝  ╚═╝

    /// Set the value of scalar dataset `name` at point `idx`, creating the dataset if needed.
    pub fn add_scalar_data(&mut self, name: &str, idx: usize, value: f64) {
        let data = self
            .scalar_data
            .entry(name.to_string())
            .or_insert_with(Vec::new);
        if data.len() <= idx {
            data.resize(idx + 1, 0.0);
        }
        data[idx] = value;
    }

    /// Set the value of vector dataset `name` at point `idx`, creating the dataset if needed.
    pub fn add_vector_data(&mut self, name: &str, idx: usize, value: Vec3) {
        let data = self
            .vector_data
            .entry(name.to_string())
            .or_insert_with(Vec::new);
        if data.len() <= idx {
            data.resize(idx + 1, [0.0; 3]);
        }
        data[idx] = value;
    }

    /// Set the value of scalar dataset `name` for the last point added, if that point was new. Returns true iff the value
    /// was written.
    pub fn add_scalar_data_if_new(&mut self, name: &str, value: f64) -> bool {
        match self.last_point_idx {
            Some(idx) if self.last_point_new => {
                self.add_scalar_data(name, idx, value);
                true
            }
            _ => false,
        }
    }

    /// Set the value of vector dataset `name` for the last point added, if that point was new. Returns true iff the value
    /// was written.
    pub fn add_vector_data_if_new(&mut self, name: &str, value: Vec3) -> bool {
        match self.last_point_idx {
            Some(idx) if self.last_point_new => {
                self.add_vector_data(name, idx, value);
                true
            }
            _ => false,
        }
    }

    pub fn has_scalar_data(&self, name: &str) -> bool {
        self.scalar_data.contains_key(name)
    }

    pub fn has_vector_data(&self, name: &str) -> bool {
        self.vector_data.contains_key(name)
    }

    pub fn num_scalar_datasets(&self) -> usize {
        self.scalar_data.len()
    }

    pub fn num_vector_datasets(&self) -> usize {
        self.vector_data.len()
    }

    /// Scalar dataset `name`, with one value per point.
    pub fn scalar_data(&self, name: &str) -> Option<Vec<f64>> {
        self.scalar_data
            .get(name)
            .map(|data| pad(data, self.points.len(), 0.0))
    }

    /// Vector dataset `name`, with one value per point.
    pub fn vector_data(&self, name: &str) -> Option<Vec<Vec3>> {
        self.vector_data
            .get(name)
            .map(|data| pad(data, self.points.len(), [0.0; 3]))
    }

    /// Every scalar dataset in name order, with one value per point.
    pub fn scalar_datasets(&self) -> impl '_ + Iterator<Item = (&str, Vec<f64>)> {
        let n = self.points.len();
        self.scalar_data
            .iter()
            .map(move |(name, data)| (name.as_str(), pad(data, n, 0.0)))
    }

    /// Every vector dataset in name order, with one value per point.
    pub fn vector_datasets(&self) -> impl '_ + Iterator<Item = (&str, Vec<Vec3>)> {
        let n = self.points.len();
        self.vector_data
            .iter()
            .map(move |(name, data)| (name.as_str(), pad(data, n, [0.0; 3])))
    }
}

fn pad<T: Copy>(data: &[T], len: usize, fill: T) -> Vec<T> {
    let mut padded = data.to_vec();
    padded.resize(len, fill);

    padded
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
