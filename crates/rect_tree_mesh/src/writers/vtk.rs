use super::{check_not_empty, write_file, write_vec3, WriteError, COLORS, NORMALS};
use crate::{CellComplex, ComplexConfig};

use itertools::Itertools;
use std::io::{self, Write};
use std::path::Path;
use tracing::info_span;

/// Write `cplx` as a legacy ASCII VTK unstructured grid.
///
/// `NORMALS` is written as `NORMALS`, `COLORS` as `COLOR_SCALARS` and every other vector dataset as `VECTORS`.
pub fn write_legacy_vtk<C: ComplexConfig>(
    cplx: &CellComplex<C>,
    path: impl AsRef<Path>,
    description: &str,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    let _span = info_span!("write_legacy_vtk", path = %path.display()).entered();

    check_not_empty(cplx)?;
    write_file(path, |w| legacy_vtk_body(w, cplx, description))
}

/// Write `cplx` as an XML VTK unstructured grid (`.vtu`) with ASCII data arrays. The description becomes a comment.
pub fn write_xml_vtk<C: ComplexConfig>(
    cplx: &CellComplex<C>,
    path: impl AsRef<Path>,
    description: &str,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    let _span = info_span!("write_xml_vtk", path = %path.display()).entered();

    check_not_empty(cplx)?;
    write_file(path, |w| xml_vtk_body(w, cplx, description))
}

fn legacy_vtk_body<C: ComplexConfig>(w: &mut impl Write, cplx: &CellComplex<C>, description: &str) -> io::Result<()> {
    writeln!(w, "# vtk DataFile Version 3.0")?;
    writeln!(w, "{}", description)?;
    writeln!(w, "ASCII")?;
    writeln!(w, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(w, "POINTS {} double", cplx.num_points())?;
    for p in cplx.points() {
        write_vec3(w, p)?;
        writeln!(w)?;
    }

    let total_ints: usize = cplx.cells().map(|(verts, _)| verts.len() + 1).sum();
    writeln!(w, "CELLS {} {}", cplx.num_cells(), total_ints)?;
    for (verts, _) in cplx.cells() {
        writeln!(w, "{} {}", verts.len(), verts.iter().join(" "))?;
    }
    writeln!(w, "CELL_TYPES {}", cplx.num_cells())?;
    for (_, cell_type) in cplx.cells() {
        writeln!(w, "{}", cell_type.vtk_type())?;
    }

    if cplx.num_scalar_datasets() + cplx.num_vector_datasets() > 0 {
        writeln!(w, "POINT_DATA {}", cplx.num_points())?;
        for (name, data) in cplx.scalar_datasets() {
            writeln!(w, "SCALARS {} double 1", name)?;
            writeln!(w, "LOOKUP_TABLE default")?;
            for v in data.iter() {
                writeln!(w, "{}", v)?;
            }
        }
        for (name, data) in cplx.vector_datasets() {
            match name {
                NORMALS => writeln!(w, "NORMALS {} double", name)?,
                COLORS => writeln!(w, "COLOR_SCALARS {} 3", name)?,
                _ => writeln!(w, "VECTORS {} double", name)?,
            }
            for v in data.iter() {
                write_vec3(w, v)?;
                writeln!(w)?;
            }
        }
    }

    writeln!(w)
}

fn xml_vtk_body<C: ComplexConfig>(w: &mut impl Write, cplx: &CellComplex<C>, description: &str) -> io::Result<()> {
    writeln!(
        w,
        "<VTKFile type='UnstructuredGrid' version='0.1' byte_order='LittleEndian'>"
    )?;
    writeln!(w, "<!-- {} -->", description)?;
    writeln!(w, "  <UnstructuredGrid>")?;
    writeln!(
        w,
        "    <Piece NumberOfPoints='{}' NumberOfCells='{}'>",
        cplx.num_points(),
        cplx.num_cells()
    )?;

    if cplx.num_scalar_datasets() + cplx.num_vector_datasets() > 0 {
        let mut attributes = Vec::new();
        if cplx.num_scalar_datasets() > 0 {
            attributes.push(format!(
                "Scalars='{}'",
                cplx.scalar_datasets().map(|(name, _)| name).join(" ")
            ));
        }
        if cplx.has_vector_data(NORMALS) {
            attributes.push(format!("Normals='{}'", NORMALS));
        }
        let vectors = cplx
            .vector_datasets()
            .map(|(name, _)| name)
            .filter(|&name| name != NORMALS)
            .join(" ");
        if !vectors.is_empty() {
            attributes.push(format!("Vectors='{}'", vectors));
        }
        writeln!(w, "      <PointData {}>", attributes.join(" "))?;

        for (name, data) in cplx.scalar_datasets() {
            writeln!(
                w,
                "        <DataArray Name='{}' type='Float64' format='ascii' NumberOfComponents='1'>",
                name
            )?;
            writeln!(w, "          {}", data.iter().join(" "))?;
            writeln!(w, "        </DataArray>")?;
        }
        for (name, data) in cplx.vector_datasets() {
            writeln!(
                w,
                "        <DataArray Name='{}' type='Float64' format='ascii' NumberOfComponents='3'>",
                name
            )?;
            for v in data.iter() {
                write!(w, "          ")?;
                write_vec3(w, v)?;
                writeln!(w)?;
            }
            writeln!(w, "        </DataArray>")?;
        }
        writeln!(w, "      </PointData>")?;
    }

    writeln!(w, "      <Points>")?;
    writeln!(
        w,
        "        <DataArray Name='Points' type='Float64' format='ascii' NumberOfComponents='3'>"
    )?;
    for p in cplx.points() {
        write!(w, "          ")?;
        write_vec3(w, p)?;
        writeln!(w)?;
    }
    writeln!(w, "        </DataArray>")?;
    writeln!(w, "      </Points>")?;

    writeln!(w, "      <Cells>")?;
    writeln!(w, "        <DataArray type='Int32' Name='connectivity' format='ascii'>")?;
    for (verts, _) in cplx.cells() {
        writeln!(w, "          {}", verts.iter().join(" "))?;
    }
    writeln!(w, "        </DataArray>")?;
    writeln!(w, "        <DataArray type='Int32' Name='offsets' format='ascii'>")?;
    let offsets = cplx.cells().scan(0, |end, (verts, _)| {
        *end += verts.len();
        Some(*end)
    });
    writeln!(w, "          {}", offsets.format(" "))?;
    writeln!(w, "        </DataArray>")?;
    writeln!(w, "        <DataArray type='Int8' Name='types' format='ascii'>")?;
    writeln!(
        w,
        "          {}",
        cplx.cells().map(|(_, cell_type)| cell_type.vtk_type()).format(" ")
    )?;
    writeln!(w, "        </DataArray>")?;
    writeln!(w, "      </Cells>")?;

    writeln!(w, "    </Piece>")?;
    writeln!(w, "  </UnstructuredGrid>")?;
    writeln!(w, "</VTKFile>")
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
