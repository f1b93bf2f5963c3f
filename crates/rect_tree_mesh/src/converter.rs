//! Building a `CellComplex` from the leaves of a `RectTree`.
//!
//! Every function here takes the list of cells to convert (empty for every leaf) and a `GeometryRecipe` that maps each tree
//! vertex and its sample to a complex point and its data. A tree vertex whose recipe point has a NaN coordinate is "bad" and
//! never becomes a point of the complex.
//!
//! Each function returns the number of cells that were added to the complex.

mod fans;
mod recipe;

pub use fans::construct_geometry_fans;
pub use recipe::{GeometryRecipe, ValueSource};

use crate::{CellComplex, CellType, ComplexConfig, NanEdgeSolver};

use rect_tree_core::{prelude::*, MAX_DIMENSION};
use rect_tree_storage::{RectTree, SampleFn};

use thiserror::Error;
use tracing::{debug, error, info_span, warn};

/// How leaves become cells.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CellStructure {
    /// A POINT for the center and each corner of every leaf.
    Points,
    /// One segment, quad or hexahedron per leaf.
    Rectangles,
    /// Segments, triangles or pyramids fanned from each leaf center, without cracks between leaves of different levels.
    Fans,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("domain dimension {0} is not supported")]
    UnsupportedDomainDimension(usize),
    #[error("output dimension {output_dimension} is not supported for domain dimension {domain_dimension}")]
    OutputDimension {
        output_dimension: usize,
        domain_dimension: usize,
    },
    #[error("{target} reads domain coordinate {index}, but the domain dimension is {dimension}")]
    BadDomainSource {
        target: String,
        index: usize,
        dimension: usize,
    },
    #[error("{target} reads range component {index}, but the range dimension is {dimension}")]
    BadRangeSource {
        target: String,
        index: usize,
        dimension: usize,
    },
    #[error("neither centers nor corners were requested")]
    NothingToOutput,
}

impl ConvertError {
    pub fn code(&self) -> i32 {
        match self {
            ConvertError::UnsupportedDomainDimension(_) => 1,
            ConvertError::OutputDimension { .. } => 2,
            ConvertError::BadDomainSource { .. } => 3,
            ConvertError::BadRangeSource { .. } => 4,
            ConvertError::NothingToOutput => 5,
        }
    }
}

/// Convert with any `structure`. When `func` is given, `CellStructure::Fans` heals edges with one bad end using a
/// `NanEdgeSolver` over `func`, owned by this call.
///
/// `output_dimension` selects which parts of each cell are added (see `CellComplex::add_cell_parts`). It's ignored for
/// `CellStructure::Points`.
pub fn construct_geometry<C, F, const D: usize, const R: usize>(
    cplx: &mut CellComplex<C>,
    tree: &RectTree<D, R>,
    cells: &[Diti],
    structure: CellStructure,
    output_dimension: usize,
    recipe: &GeometryRecipe,
    func: Option<&F>,
) -> Result<usize, ConvertError>
where
    C: ComplexConfig,
    F: SampleFn<D, R>,
{
    let _span = info_span!("construct_geometry", ?structure, output_dimension).entered();

    match structure {
        CellStructure::Points => construct_geometry_points(cplx, tree, cells, recipe, true, true),
        CellStructure::Rectangles => construct_geometry_rects(cplx, tree, cells, output_dimension, recipe),
        CellStructure::Fans => {
            let mut solver = func.map(NanEdgeSolver::for_complex::<C>);
            construct_geometry_fans(cplx, tree, cells, output_dimension, recipe, solver.as_mut())
        }
    }
}

/// Add a POINT cell for the center (if `output_centers`) and the corners (if `output_corners`) of each cell.
pub fn construct_geometry_points<C, const D: usize, const R: usize>(
    cplx: &mut CellComplex<C>,
    tree: &RectTree<D, R>,
    cells: &[Diti],
    recipe: &GeometryRecipe,
    output_centers: bool,
    output_corners: bool,
) -> Result<usize, ConvertError>
where
    C: ComplexConfig,
{
    if !output_centers && !output_corners {
        warn!("construct_geometry_points: nothing to output");
        return Err(ConvertError::NothingToOutput);
    }
    check_setup(recipe, D, R, None)?;

    let before = cplx.num_cells();
    for cell in selected_cells(tree, cells) {
        let mut vertexes = Vec::new();
        if output_centers {
            vertexes.push(cell);
        }
        if output_corners {
            vertexes.extend(tree.ccc_get_corners(cell));
        }
        for v in vertexes.into_iter() {
            if let Some(idx) = recipe.add_point_and_data_from_tree(cplx, tree, v) {
                // A corner shared with an earlier cell comes back as `Ok(CellInsert::Existing)`.
                if let Err(rejection) = cplx.add_cell(CellType::Point, &[idx]) {
                    debug!("POINT cell for {} rejected: {}", v, rejection);
                }
            }
        }
    }

    Ok(cplx.num_cells() - before)
}

/// Add one cell per leaf over its corners: a segment in 1D, a quad in 2D, and a hexahedron in 3D. Cells with a bad corner
/// are skipped.
///
/// Neighboring leaves of different levels leave T-junctions, so this is best suited to balanced trees.
pub fn construct_geometry_rects<C, const D: usize, const R: usize>(
    cplx: &mut CellComplex<C>,
    tree: &RectTree<D, R>,
    cells: &[Diti],
    output_dimension: usize,
    recipe: &GeometryRecipe,
) -> Result<usize, ConvertError>
where
    C: ComplexConfig,
{
    check_setup(recipe, D, R, Some(output_dimension))?;

    // Corner index order turning the bit order of `ccc_get_corners` into VTK order.
    let (cell_type, order): (CellType, &[usize]) = match D {
        1 => (CellType::Segment, &[0, 1]),
        2 => (CellType::Quad, &[0, 1, 3, 2]),
        _ => (CellType::Hexahedron, &[0, 1, 3, 2, 4, 5, 7, 6]),
    };

    let before = cplx.num_cells();
    for cell in selected_cells(tree, cells) {
        let corners = tree.ccc_get_corners(cell);
        let verts: Option<Vec<usize>> = order
            .iter()
            .map(|&k| recipe.add_point_and_data_from_tree(cplx, tree, corners[k]))
            .collect();
        if let Some(verts) = verts {
            cplx.add_cell_parts(cell_type, &verts, output_dimension);
        }
    }

    Ok(cplx.num_cells() - before)
}

/// The cells to convert: `cells`, or every leaf if it's empty.
pub(crate) fn selected_cells<const D: usize, const R: usize>(tree: &RectTree<D, R>, cells: &[Diti]) -> Vec<Diti> {
    if cells.is_empty() {
        tree.leaves().collect()
    } else {
        cells.to_vec()
    }
}

pub(crate) fn check_setup(
    recipe: &GeometryRecipe,
    domain_dimension: usize,
    range_dimension: usize,
    output_dimension: Option<usize>,
) -> Result<(), ConvertError> {
    if domain_dimension == 0 || domain_dimension > MAX_DIMENSION {
        error!("Unsupported domain dimension {}", domain_dimension);
        return Err(ConvertError::UnsupportedDomainDimension(domain_dimension));
    }
    if let Some(output_dimension) = output_dimension {
        if output_dimension > domain_dimension {
            error!(
                "Output dimension {} is above the domain dimension {}",
                output_dimension, domain_dimension
            );
            return Err(ConvertError::OutputDimension {
                output_dimension,
                domain_dimension,
            });
        }
    }
    if let Err(e) = recipe.validate(domain_dimension, range_dimension) {
        error!("Bad geometry recipe: {}", e);
        return Err(e);
    }

    Ok(())
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
