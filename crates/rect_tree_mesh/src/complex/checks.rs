use super::{CellComplex, ComplexConfig};

use crate::geometry::{
    classify_seg_pair, pnt_zero, pts_colinear, pts_coplanar, pts_coplanar_list,
    seg_tri_intersection, SegIntersection,
};
use crate::{CellRejection, CellType};

use rect_tree_core::vec3::{diff, Vec3};

impl<C: ComplexConfig> CellComplex<C> {
    /// Run the checks enabled by `C` on a prospective cell, in the order `add_cell` runs them.
    ///
    /// When `CHECK_VERTEXES` is off and the vertex list is malformed, the geometric checks are skipped.
    pub fn check_cell(&self, cell_type: CellType, verts: &[usize]) -> Result<(), CellRejection> {
        if C::CHECK_VERTEXES {
            self.check_cell_vertexes(cell_type, verts)?;
        } else if (C::CHECK_DIMENSION || C::CHECK_EDGES) && !self.well_formed(cell_type, verts) {
            return Ok(());
        }
        if C::CHECK_DIMENSION {
            self.dimension_status(cell_type, verts)?;
        }
        if C::CHECK_EDGES {
            self.edge_status(cell_type, verts)?;
        }

        Ok(())
    }

    /// Vertex count, then index range, then repeated indexes.
    pub fn check_cell_vertexes(&self, cell_type: CellType, verts: &[usize]) -> Result<(), CellRejection> {
        let required = cell_type.num_points();
        if verts.len() < required {
            return Err(CellRejection::TooFewPoints);
        }
        if verts.len() > required {
            return Err(CellRejection::TooManyPoints);
        }
        if verts.iter().any(|&i| i >= self.points.len()) {
            return Err(CellRejection::BigPointIndex);
        }
        for (k, v) in verts.iter().enumerate() {
            if verts[k + 1..].contains(v) {
                return Err(CellRejection::DuplicatePoint);
            }
        }

        Ok(())
    }

    /// `DimensionLow` if the cell's points span fewer dimensions than the cell type.
    pub fn check_cell_dimension(&self, cell_type: CellType, verts: &[usize]) -> Result<(), CellRejection> {
        self.check_cell_vertexes(cell_type, verts)?;

        self.dimension_status(cell_type, verts)
    }

    /// `BadEdgeIntersection` unless every pair of edges is disjoint or meets only at a shared endpoint.
    pub fn check_cell_edge_intersections(&self, cell_type: CellType, verts: &[usize]) -> Result<(), CellRejection> {
        self.check_cell_vertexes(cell_type, verts)?;

        self.edge_status(cell_type, verts)
    }

    /// `FaceBent` if any quadrilateral face of the cell isn't planar.
    pub fn check_cell_faces_planar(&self, cell_type: CellType, verts: &[usize]) -> Result<(), CellRejection> {
        self.check_cell_vertexes(cell_type, verts)?;

        if cell_type.dimension() < 2 {
            return Ok(());
        }
        for face in cell_type.structure(2) {
            if face.len() == 4 {
                let p = |k: usize| &self.points[verts[face[k]]];
                if !pts_coplanar(p(0), p(1), p(2), p(3), C::EPSILON) {
                    return Err(CellRejection::FaceBent);
                }
            }
        }

        Ok(())
    }

    /// `BadFaceIntersection` if an edge of a 3D cell meets a face that doesn't contain either of the edge's endpoints.
    /// Quadrilateral faces are split into two triangles.
    pub fn check_cell_face_intersections(&self, cell_type: CellType, verts: &[usize]) -> Result<(), CellRejection> {
        self.check_cell_vertexes(cell_type, verts)?;

        if cell_type.dimension() < 3 {
            return Ok(());
        }
        let p = |k: usize| &self.points[verts[k]];
        for face in cell_type.structure(2) {
            let triangles: Vec<[usize; 3]> = if face.len() == 4 {
                vec![[face[0], face[1], face[2]], [face[0], face[2], face[3]]]
            } else {
                vec![[face[0], face[1], face[2]]]
            };
            for edge in cell_type.structure(1) {
                if face.contains(&edge[0]) || face.contains(&edge[1]) {
                    continue;
                }
                for t in triangles.iter() {
                    if seg_tri_intersection(p(edge[0]), p(edge[1]), p(t[0]), p(t[1]), p(t[2]), C::EPSILON) {
                        return Err(CellRejection::BadFaceIntersection);
                    }
                }
            }
        }

        Ok(())
    }

    /// Classify the intersection of segments `a1 a2` and `b1 b2` given by point index. Endpoints are shared iff their
    /// indexes are equal.
    ///
    /// # Panics
    ///
    /// If an index is not on the point list.
    pub fn seg_isect_type_idx(&self, a1: usize, a2: usize, b1: usize, b2: usize) -> SegIntersection {
        let idx = [a1, a2, b1, b2];
        let pts = [
            self.points[a1],
            self.points[a2],
            self.points[b1],
            self.points[b2],
        ];

        classify_seg_pair(&pts, |i, j| idx[i] == idx[j], C::EPSILON)
    }

    fn well_formed(&self, cell_type: CellType, verts: &[usize]) -> bool {
        verts.len() == cell_type.num_points() && verts.iter().all(|&i| i < self.points.len())
    }

    fn cell_points(&self, verts: &[usize]) -> Vec<Vec3> {
        verts.iter().map(|&i| self.points[i]).collect()
    }

    fn dimension_status(&self, cell_type: CellType, verts: &[usize]) -> Result<(), CellRejection> {
        let eps = C::EPSILON;
        let p = self.cell_points(verts);
        let degenerate = match cell_type {
            CellType::Point => false,
            CellType::Segment => pnt_zero(&diff(&p[0], &p[1]), eps),
            CellType::Triangle => pts_colinear(&p[0], &p[1], &p[2], eps),
            CellType::Quad => {
                pts_colinear(&p[0], &p[1], &p[2], eps) && pts_colinear(&p[0], &p[1], &p[3], eps)
            }
            CellType::Pyramid | CellType::Hexahedron => pts_coplanar_list(&p, eps),
        };

        if degenerate {
            Err(CellRejection::DimensionLow)
        } else {
            Ok(())
        }
    }

    fn edge_status(&self, cell_type: CellType, verts: &[usize]) -> Result<(), CellRejection> {
        if cell_type.dimension() < 2 {
            return Ok(());
        }
        let edges = cell_type.structure(1);
        for (k, e1) in edges.iter().enumerate() {
            for e2 in edges[k + 1..].iter() {
                let (a1, a2, b1, b2) = (verts[e1[0]], verts[e1[1]], verts[e2[0]], verts[e2[1]]);
                let shared = (a1 == b1) as usize + (a1 == b2) as usize + (a2 == b1) as usize + (a2 == b2) as usize;
                let expected = if shared == 0 {
                    SegIntersection::C0_EMPTY
                } else {
                    SegIntersection::C1_VERTEX1
                };
                if self.seg_isect_type_idx(a1, a2, b1, b2) != expected {
                    return Err(CellRejection::BadEdgeIntersection);
                }
            }
        }

        Ok(())
    }
}
