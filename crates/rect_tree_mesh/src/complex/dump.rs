use super::{CellComplex, ComplexConfig};

use std::fmt;

impl<C: ComplexConfig> CellComplex<C> {
    /// One line per point, stopping after `max` points unless `max` is 0. Empty if there are no points.
    pub fn print_all_points(&self, max: usize) -> String {
        ComplexDump { cplx: self, max, part: Part::Points }.to_string()
    }

    /// One line per cell with its vertexes and type name, stopping after `max` cells unless `max` is 0. Empty if there are
    /// no cells.
    pub fn print_all_cells(&self, max: usize) -> String {
        ComplexDump { cplx: self, max, part: Part::Cells }.to_string()
    }

    /// Counts, followed by `print_all_points(max)` and `print_all_cells(max)`.
    pub fn dump_cplx(&self, max: usize) -> String {
        self.display_cplx(max).to_string()
    }

    /// The text of `dump_cplx`, formatted on demand into any writer.
    pub fn display_cplx(&self, max: usize) -> impl fmt::Display + '_ {
        ComplexDump { cplx: self, max, part: Part::All }
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Part {
    Points,
    Cells,
    All,
}

struct ComplexDump<'a, C: ComplexConfig> {
    cplx: &'a CellComplex<C>,
    max: usize,
    part: Part,
}

impl<'a, C: ComplexConfig> ComplexDump<'a, C> {
    fn points(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let points = &self.cplx.points;
        if points.is_empty() {
            return Ok(());
        }

        writeln!(f, "POINTS BEGIN ({})", points.len())?;
        for (i, p) in points.iter().enumerate() {
            writeln!(f, "  {}: [ {} {} {} ]", i, p[0], p[1], p[2])?;
            if self.max > 0 && i + 1 >= self.max {
                writeln!(f, "  Maximum number of points reached.")?;
                break;
            }
        }
        writeln!(f, "POINTS END")
    }

    fn cells(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = &self.cplx.cells;
        if cells.is_empty() {
            return Ok(());
        }

        writeln!(f, "CELLS BEGIN ({})", cells.len())?;
        for (i, (cell_type, verts)) in cells.iter().enumerate() {
            write!(f, "  ")?;
            for v in verts.iter() {
                write!(f, "{} ", v)?;
            }
            writeln!(f, "   {}", cell_type.name())?;
            if self.max > 0 && i + 1 >= self.max {
                writeln!(f, "  Maximum number of cells reached.")?;
                break;
            }
        }
        writeln!(f, "CELLS END")
    }

    fn meta(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cplx = self.cplx;
        writeln!(f, "Meta Data")?;
        writeln!(f, "  Points ............. {}", cplx.num_points())?;
        writeln!(f, "  Scalar Data Sets ... {}", cplx.scalar_data.len())?;
        writeln!(f, "  Vector Data Sets ... {}", cplx.vector_data.len())?;
        writeln!(f, "  Cells .............. {}", cplx.num_cells())
    }
}

impl<'a, C: ComplexConfig> fmt::Display for ComplexDump<'a, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part {
            Part::Points => self.points(f),
            Part::Cells => self.cells(f),
            Part::All => {
                self.meta(f)?;
                self.points(f)?;
                self.cells(f)
            }
        }
    }
}
