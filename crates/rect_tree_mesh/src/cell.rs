use thiserror::Error;

/// The kinds of cell a `CellComplex` can hold. Vertex order follows VTK.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CellType {
    Point,
    Segment,
    Triangle,
    Quad,
    Pyramid,
    Hexahedron,
}

impl CellType {
    pub const ALL: [CellType; 6] = [
        CellType::Point,
        CellType::Segment,
        CellType::Triangle,
        CellType::Quad,
        CellType::Pyramid,
        CellType::Hexahedron,
    ];

    /// The logical dimension. A quad is 2D even if its vertexes aren't coplanar.
    pub fn dimension(&self) -> usize {
        match self {
            CellType::Point => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quad => 2,
            CellType::Pyramid | CellType::Hexahedron => 3,
        }
    }

    pub fn num_points(&self) -> usize {
        match self {
            CellType::Point => 1,
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Quad => 4,
            CellType::Pyramid => 5,
            CellType::Hexahedron => 8,
        }
    }

    pub fn vtk_type(&self) -> u8 {
        match self {
            CellType::Point => 1,
            CellType::Segment => 3,
            CellType::Triangle => 5,
            CellType::Quad => 9,
            CellType::Hexahedron => 12,
            CellType::Pyramid => 14,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CellType::Point => "POINT",
            CellType::Segment => "SEGMENT",
            CellType::Triangle => "TRIANGLE",
            CellType::Quad => "QUAD",
            CellType::Pyramid => "PYRAMID",
            CellType::Hexahedron => "HEXAHEDRON",
        }
    }

    pub fn from_point_count(n: usize) -> Option<Self> {
        match n {
            1 => Some(CellType::Point),
            2 => Some(CellType::Segment),
            3 => Some(CellType::Triangle),
            4 => Some(CellType::Quad),
            5 => Some(CellType::Pyramid),
            8 => Some(CellType::Hexahedron),
            _ => None,
        }
    }

    /// The parts of this cell type with the given `dimension`, as lists of local vertex indexes: vertexes for 0, edges for 1,
    /// faces for 2, and the solid for 3. A `dimension` above the cell's own is clamped to it.
    ///
    /// Faces are listed in cyclic vertex order.
    pub fn structure(&self, dimension: usize) -> &'static [&'static [usize]] {
        let dimension = dimension.min(self.dimension());
        match (self, dimension) {
            (CellType::Point, _) => &[&[0]],

            (CellType::Segment, 0) => &[&[0], &[1]],
            (CellType::Segment, _) => &[&[0, 1]],

            (CellType::Triangle, 0) => &[&[0], &[1], &[2]],
            (CellType::Triangle, 1) => &[&[0, 1], &[1, 2], &[2, 0]],
            (CellType::Triangle, _) => &[&[0, 1, 2]],

            (CellType::Quad, 0) => &[&[0], &[1], &[2], &[3]],
            (CellType::Quad, 1) => &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]],
            (CellType::Quad, _) => &[&[0, 1, 2, 3]],

            (CellType::Pyramid, 0) => &[&[0], &[1], &[2], &[3], &[4]],
            (CellType::Pyramid, 1) => &[
                // Base
                &[0, 1],
                &[1, 2],
                &[2, 3],
                &[3, 0],
                // Sides
                &[0, 4],
                &[1, 4],
                &[2, 4],
                &[3, 4],
            ],
            (CellType::Pyramid, 2) => &[&[0, 1, 2, 3], &[0, 1, 4], &[1, 2, 4], &[2, 3, 4], &[3, 0, 4]],
            (CellType::Pyramid, _) => &[&[0, 1, 2, 3, 4]],

            (CellType::Hexahedron, 0) => &[&[0], &[1], &[2], &[3], &[4], &[5], &[6], &[7]],
            (CellType::Hexahedron, 1) => &[
                // Back
                &[0, 1],
                &[1, 2],
                &[2, 3],
                &[3, 0],
                // Front
                &[4, 5],
                &[5, 6],
                &[6, 7],
                &[7, 4],
                // Back to front
                &[0, 4],
                &[1, 5],
                &[2, 6],
                &[3, 7],
            ],
            (CellType::Hexahedron, 2) => &[
                &[0, 1, 2, 3],
                &[4, 5, 6, 7],
                &[0, 3, 7, 4],
                &[2, 3, 7, 6],
                &[1, 2, 6, 5],
                &[0, 1, 5, 4],
            ],
            (CellType::Hexahedron, _) => &[&[0, 1, 2, 3, 4, 5, 6, 7]],
        }
    }
}

/// Result of a successful `CellComplex::add_cell`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CellInsert {
    /// The cell was appended.
    New,
    /// An equivalent cell (same vertex set) was already present. Nothing changed.
    Existing,
}

/// Reasons a cell is rejected by `CellComplex::add_cell` and the standalone cell checks.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum CellRejection {
    #[error("TOO_FEW_PNT: fewer vertexes than the cell type requires")]
    TooFewPoints,
    #[error("TOO_MANY_PNT: more vertexes than the cell type requires")]
    TooManyPoints,
    #[error("BIG_PNT_IDX: vertex index is not on the point list")]
    BigPointIndex,
    #[error("DUP_PNT: the same vertex index appears twice")]
    DuplicatePoint,
    #[error("DIM_LOW: cell is degenerate")]
    DimensionLow,
    #[error("BAD_EDGEI: two edges of the cell intersect improperly")]
    BadEdgeIntersection,
    #[error("BAD_FACEI: a face and an edge of the cell intersect improperly")]
    BadFaceIntersection,
    #[error("FACE_BENT: a face of the cell is not planar")]
    FaceBent,
}

impl CellRejection {
    /// The short status name.
    pub fn name(&self) -> &'static str {
        match self {
            CellRejection::TooFewPoints => "TOO_FEW_PNT",
            CellRejection::TooManyPoints => "TOO_MANY_PNT",
            CellRejection::BigPointIndex => "BIG_PNT_IDX",
            CellRejection::DuplicatePoint => "DUP_PNT",
            CellRejection::DimensionLow => "DIM_LOW",
            CellRejection::BadEdgeIntersection => "BAD_EDGEI",
            CellRejection::BadFaceIntersection => "BAD_FACEI",
            CellRejection::FaceBent => "FACE_BENT",
        }
    }

    /// A stable nonzero status code. 0 is reserved for a good cell.
    pub fn code(&self) -> i32 {
        match self {
            CellRejection::TooFewPoints => 1,
            CellRejection::TooManyPoints => 2,
            CellRejection::BigPointIndex => 4,
            CellRejection::DuplicatePoint => 5,
            CellRejection::DimensionLow => 6,
            CellRejection::BadEdgeIntersection => 7,
            CellRejection::BadFaceIntersection => 8,
            CellRejection::FaceBent => 9,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn point_counts_round_trip() {
        for t in CellType::ALL.iter() {
            assert_eq!(CellType::from_point_count(t.num_points()), Some(*t));
        }
        assert_eq!(CellType::from_point_count(6), None);
    }

    #[test]
    fn structures_are_consistent() {
        for t in CellType::ALL.iter() {
            for d in 0..=3 {
                for part in t.structure(d) {
                    assert!(part.iter().all(|&i| i < t.num_points()));
                    assert!(CellType::from_point_count(part.len()).is_some());
                }
            }
            assert_eq!(t.structure(0).len(), t.num_points());
            assert_eq!(t.structure(t.dimension()).len(), 1);
        }
        assert_eq!(CellType::Hexahedron.structure(1).len(), 12);
        assert_eq!(CellType::Pyramid.structure(2).len(), 5);
    }

    #[test]
    fn hexahedron_faces_are_cycles_of_edges() {
        let edges = CellType::Hexahedron.structure(1);
        let is_edge = |a: usize, b: usize| {
            edges
                .iter()
                .any(|e| (e[0] == a && e[1] == b) || (e[0] == b && e[1] == a))
        };
        for face in CellType::Hexahedron.structure(2) {
            for k in 0..4 {
                assert!(is_edge(face[k], face[(k + 1) % 4]), "{:?}", face);
            }
        }
    }
}
