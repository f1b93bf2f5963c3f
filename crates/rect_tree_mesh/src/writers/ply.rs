use super::{check_not_empty, write_file, write_vec3, WriteError, COLORS, NORMALS};
use crate::{CellComplex, CellType, ComplexConfig};

use itertools::Itertools;
use rect_tree_core::vec3::unitize;
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info_span};

/// Write `cplx` as an ASCII PLY polygon file. Every cell must be a triangle or a quad.
///
/// `COLORS` becomes `uchar` red/green/blue properties and `NORMALS` is unitized into nx/ny/nz.
pub fn write_ply<C: ComplexConfig>(
    cplx: &CellComplex<C>,
    path: impl AsRef<Path>,
    description: &str,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    let _span = info_span!("write_ply", path = %path.display()).entered();

    check_not_empty(cplx)?;
    check_polygons(cplx)?;
    write_file(path, |w| ply_body(w, cplx, description))
}

fn check_polygons<C: ComplexConfig>(cplx: &CellComplex<C>) -> Result<(), WriteError> {
    let bad = cplx
        .cells()
        .map(|(_, cell_type)| cell_type)
        .find_position(|t| !matches!(t, CellType::Triangle | CellType::Quad));
    if let Some((index, cell_type)) = bad {
        error!("PLY only holds triangles and quads, but cell {} is {}", index, cell_type.name());
        return Err(WriteError::UnsupportedCell { index, cell_type });
    }

    Ok(())
}

fn color_byte(c: f64) -> u8 {
    (255.0 * c).max(0.0).min(255.0) as u8
}

fn ply_body<C: ComplexConfig>(w: &mut impl Write, cplx: &CellComplex<C>, description: &str) -> io::Result<()> {
    let colors = cplx.vector_data(COLORS);
    let normals = cplx.vector_data(NORMALS);

    writeln!(w, "ply")?;
    writeln!(w, "format ascii 1.0")?;
    writeln!(w, "comment software: rect_tree_mesh")?;
    writeln!(w, "comment note: {}", description)?;
    writeln!(w, "element vertex {}", cplx.num_points())?;
    for axis in ["x", "y", "z"].iter() {
        writeln!(w, "property float {}", axis)?;
    }
    if colors.is_some() {
        for channel in ["red", "green", "blue"].iter() {
            writeln!(w, "property uchar {}", channel)?;
        }
    }
    if normals.is_some() {
        for axis in ["nx", "ny", "nz"].iter() {
            writeln!(w, "property float {}", axis)?;
        }
    }
    writeln!(w, "element face {}", cplx.num_cells())?;
    writeln!(w, "property list uchar int vertex_index")?;
    writeln!(w, "end_header")?;

    for (i, p) in cplx.points().iter().enumerate() {
        write_vec3(w, p)?;
        if let Some(colors) = colors.as_ref() {
            let c = colors[i];
            write!(w, " {} {} {}", color_byte(c[0]), color_byte(c[1]), color_byte(c[2]))?;
        }
        if let Some(normals) = normals.as_ref() {
            // Leave near-zero normals alone.
            let n = unitize(&normals[i], cplx.epsilon()).unwrap_or(normals[i]);
            write!(w, " ")?;
            write_vec3(w, &n)?;
        }
        writeln!(w)?;
    }

    for (verts, _) in cplx.cells() {
        writeln!(w, "{} {}", verts.len(), verts.iter().join(" "))?;
    }

    Ok(())
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
