//! ASCII exporters for a finished `CellComplex`.
//!
//! A vector dataset named `NORMALS` is written as per-point normals, and one named `COLORS` (components in `[0, 1]`) as
//! per-point colors. Datasets without a value for every point are padded with zeros.
//!
//! Every writer checks the complex before touching the file system, so an empty complex never creates or truncates the
//! output file.

mod ply;
mod vtk;

pub use ply::write_ply;
pub use vtk::{write_legacy_vtk, write_xml_vtk};

use crate::{CellComplex, CellType, ComplexConfig};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::error;

pub const NORMALS: &str = "NORMALS";
pub const COLORS: &str = "COLORS";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("the complex has no points")]
    NoPoints,
    #[error("the complex has no cells")]
    NoCells,
    #[error("cell {index} is a {cell_type:?}, which this format can't hold")]
    UnsupportedCell { index: usize, cell_type: CellType },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WriteError {
    /// A stable nonzero status code.
    pub fn code(&self) -> i32 {
        match self {
            WriteError::NoPoints => 1,
            WriteError::NoCells => 2,
            WriteError::Io(_) => 3,
            WriteError::UnsupportedCell { .. } => 4,
        }
    }
}

pub(crate) fn check_not_empty<C: ComplexConfig>(cplx: &CellComplex<C>) -> Result<(), WriteError> {
    if cplx.num_points() == 0 {
        error!("Nothing to write: no points");
        return Err(WriteError::NoPoints);
    }
    if cplx.num_cells() == 0 {
        error!("Nothing to write: no cells");
        return Err(WriteError::NoCells);
    }

    Ok(())
}

/// Create (or truncate) `path` and fill it with `body`.
pub(crate) fn write_file<F>(path: &Path, body: F) -> Result<(), WriteError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    File::create(path)
        .and_then(|file| {
            let mut w = BufWriter::new(file);
            body(&mut w)?;
            w.flush()
        })
        .map_err(|e| {
            error!("Failed to write {}: {}", path.display(), e);
            WriteError::Io(e)
        })
}

pub(crate) fn write_vec3(w: &mut impl Write, v: &[f64; 3]) -> io::Result<()> {
    write!(w, "{} {} {}", v[0], v[1], v[2])
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝


#[cfg(test)]
mod test {
    use super::test_util::*;
    use super::*;

    use crate::StrictChecks;

    #[test]
    fn empty_complexes_leave_no_file() {
        let mut cplx = CellComplex::<StrictChecks>::new();
        let path = fresh_path("empty.vtk");

        let e = write_legacy_vtk(&cplx, &path, "empty").unwrap_err();
        assert_eq!(e.code(), 1);
        assert!(!path.exists());

        cplx.add_point([0.0; 3]);
        let e = write_xml_vtk(&cplx, &path, "no cells").unwrap_err();
        assert_eq!(e.code(), 2);
        let e = write_ply(&cplx, &path, "no cells").unwrap_err();
        assert_eq!(e.code(), 2);
        assert!(!path.exists());
    }

    #[test]
    fn open_failure_is_an_io_error() {
        let cplx = two_triangles();
        let path = std::env::temp_dir()
            .join("rect_tree_mesh_no_such_dir")
            .join("out.vtk");

        let e = write_legacy_vtk(&cplx, &path, "unreachable").unwrap_err();
        assert!(matches!(e, WriteError::Io(_)));
        assert_eq!(e.code(), 3);
    }
}
