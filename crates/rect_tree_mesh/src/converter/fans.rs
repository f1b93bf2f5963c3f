use super::{check_setup, selected_cells, ConvertError, GeometryRecipe};
use crate::{CellComplex, CellType, ComplexConfig, NanEdgeSolver};

use rect_tree_core::prelude::*;
use rect_tree_storage::{RectTree, SampleFn};

/// Fan each cell out from its center to its boundary.
///
/// - 1D: a segment from each corner to the center.
/// - 2D: a counter-clockwise triangle from each side to the center. A side shared with several smaller neighbors gets one
///   triangle per neighbor, so there are no cracks even in unbalanced trees.
/// - 3D: a pyramid from each face to the center, split by smaller neighbors the same way. The base is ordered so its normal
///   points at the apex.
///
/// With a `solver`, 1D and 2D cells with some bad vertexes are healed: the edges from good to bad vertexes are cut where the
/// sampled function stops being defined. Without one, and always in 3D, cells with bad vertexes are skipped.
pub fn construct_geometry_fans<C, F, const D: usize, const R: usize>(
    cplx: &mut CellComplex<C>,
    tree: &RectTree<D, R>,
    cells: &[Diti],
    output_dimension: usize,
    recipe: &GeometryRecipe,
    solver: Option<&mut NanEdgeSolver<'_, F, D, R>>,
) -> Result<usize, ConvertError>
where
    C: ComplexConfig,
    F: SampleFn<D, R>,
{
    check_setup(recipe, D, R, Some(output_dimension))?;

    let mut solver = solver;
    let before = cplx.num_cells();
    for cell in selected_cells(tree, cells) {
        let mut fan = Fan {
            cplx: &mut *cplx,
            tree,
            recipe,
            output_dimension,
        };
        match D {
            1 => fan.segments(cell, solver.as_deref_mut()),
            2 => fan.triangles(cell, solver.as_deref_mut()),
            _ => fan.pyramids(cell),
        }
    }

    Ok(cplx.num_cells() - before)
}

struct Fan<'a, C: ComplexConfig, const D: usize, const R: usize> {
    cplx: &'a mut CellComplex<C>,
    tree: &'a RectTree<D, R>,
    recipe: &'a GeometryRecipe,
    output_dimension: usize,
}

impl<'a, C: ComplexConfig, const D: usize, const R: usize> Fan<'a, C, D, R> {
    fn point(&mut self, d: Diti) -> Option<usize> {
        self.recipe.add_point_and_data_from_tree(self.cplx, self.tree, d)
    }

    fn emit(&mut self, cell_type: CellType, verts: &[usize]) {
        self.cplx.add_cell_parts(cell_type, verts, self.output_dimension);
    }

    fn heal<F: SampleFn<D, R>>(
        &mut self,
        solver: &mut NanEdgeSolver<'_, F, D, R>,
        good_idx: usize,
        good: Diti,
        sick: Diti,
    ) -> Option<usize> {
        solver.solve(self.cplx, self.tree, self.recipe, good_idx, good, sick)
    }

    /// The boundary pieces facing `(axis, dir)`: the corners of each smaller neighbor's face on that side, or the cell's own
    /// face.
    fn faces(&self, cell: Diti, axis: usize, dir: Direction) -> Vec<Vec<Diti>> {
        let neighbors = self.tree.get_existing_neighbor(cell, axis, dir);
        if neighbors.len() > 1 {
            neighbors
                .into_iter()
                .map(|n| self.tree.ccc_get_face_corners(n, axis, dir.flip()))
                .collect()
        } else {
            vec![self.tree.ccc_get_face_corners(cell, axis, dir)]
        }
    }

    fn segments<F: SampleFn<D, R>>(&mut self, cell: Diti, solver: Option<&mut NanEdgeSolver<'_, F, D, R>>) {
        let corners = self.tree.ccc_get_corners(cell);
        let ctr = self.point(cell);
        let cn0 = self.point(corners[0]);
        let cn1 = self.point(corners[1]);

        let solver = match solver {
            Some(s) => s,
            None => {
                if let (Some(c0), Some(c), Some(c1)) = (cn0, ctr, cn1) {
                    self.emit(CellType::Segment, &[c0, c]);
                    self.emit(CellType::Segment, &[c, c1]);
                }
                return;
            }
        };

        match ctr {
            None => {
                if let Some(c0) = cn0 {
                    if let Some(np) = self.heal(solver, c0, corners[0], cell) {
                        self.emit(CellType::Segment, &[c0, np]);
                    }
                }
                if let Some(c1) = cn1 {
                    if let Some(np) = self.heal(solver, c1, corners[1], cell) {
                        self.emit(CellType::Segment, &[np, c1]);
                    }
                }
            }
            Some(c) => {
                match cn0 {
                    Some(c0) => self.emit(CellType::Segment, &[c0, c]),
                    None => {
                        if let Some(np) = self.heal(solver, c, cell, corners[0]) {
                            self.emit(CellType::Segment, &[np, c]);
                        }
                    }
                }
                match cn1 {
                    Some(c1) => self.emit(CellType::Segment, &[c, c1]),
                    None => {
                        if let Some(np) = self.heal(solver, c, cell, corners[1]) {
                            self.emit(CellType::Segment, &[c, np]);
                        }
                    }
                }
            }
        }
    }

    fn triangles<F: SampleFn<D, R>>(&mut self, cell: Diti, mut solver: Option<&mut NanEdgeSolver<'_, F, D, R>>) {
        if solver.is_none() && self.point(cell).is_none() {
            return;
        }

        for face in SignedAxis::all_faces(2) {
            // Swapping these sides makes every triangle counter-clockwise.
            let swap = (face.axis == 0 && face.dir == Direction::Negative)
                || (face.axis == 1 && face.dir == Direction::Positive);
            for corners in self.faces(cell, face.axis, face.dir) {
                let triangle = if swap {
                    [corners[1], corners[0], cell]
                } else {
                    [corners[0], corners[1], cell]
                };
                self.triangle(triangle, solver.as_deref_mut());
            }
        }
    }

    fn triangle<F: SampleFn<D, R>>(&mut self, triangle: [Diti; 3], solver: Option<&mut NanEdgeSolver<'_, F, D, R>>) {
        let t = [
            self.point(triangle[0]),
            self.point(triangle[1]),
            self.point(triangle[2]),
        ];
        let num_bad = t.iter().filter(|i| i.is_none()).count();

        if let [Some(a), Some(b), Some(c)] = t {
            self.emit(CellType::Triangle, &[a, b, c]);
            return;
        }
        let solver = match solver {
            Some(s) if num_bad < 3 => s,
            _ => return,
        };

        // Rotate the odd vertex out (the bad one, or the good one) to the front.
        let first = (0..3)
            .find(|&k| t[k].is_none() == (num_bad == 1))
            .unwrap_or(0);
        let p = [first, (first + 1) % 3, (first + 2) % 3];

        if num_bad == 1 {
            if let (Some(g1), Some(g2)) = (t[p[1]], t[p[2]]) {
                let np1 = self.heal(solver, g1, triangle[p[1]], triangle[p[0]]);
                let np2 = self.heal(solver, g2, triangle[p[2]], triangle[p[0]]);
                if let (Some(np1), Some(np2)) = (np1, np2) {
                    self.emit(CellType::Triangle, &[np1, g1, g2]);
                    self.emit(CellType::Triangle, &[g2, np2, np1]);
                }
            }
        } else if let Some(g) = t[p[0]] {
            let np1 = self.heal(solver, g, triangle[p[0]], triangle[p[1]]);
            let np2 = self.heal(solver, g, triangle[p[0]], triangle[p[2]]);
            if let (Some(np1), Some(np2)) = (np1, np2) {
                self.emit(CellType::Triangle, &[g, np1, np2]);
            }
        }
    }

    fn pyramids(&mut self, cell: Diti) {
        let apex = match self.point(cell) {
            Some(a) => a,
            None => return,
        };

        for face in SignedAxis::all_faces(3) {
            // [0, 1, 3, 2] circles the face counter-clockwise about +axis, except for axis 1 where it's about -axis.
            let normal_sign = if face.axis == 1 { -1 } else { 1 };
            let order = if normal_sign == face.dir.sign() {
                [0, 2, 3, 1]
            } else {
                [0, 1, 3, 2]
            };
            for corners in self.faces(cell, face.axis, face.dir) {
                let base = [
                    self.point(corners[order[0]]),
                    self.point(corners[order[1]]),
                    self.point(corners[order[2]]),
                    self.point(corners[order[3]]),
                ];
                if let [Some(b0), Some(b1), Some(b2), Some(b3)] = base {
                    self.emit(CellType::Pyramid, &[b0, b1, b2, b3, apex]);
                }
            }
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    use crate::{StrictChecks, ValueSource};

    use rect_tree_core::vec3::{cross, diff, dot};
    use rect_tree_storage::ScalarFn;

    type NoFunc<const D: usize> = fn([f64; D]) -> [f64; 1];

    fn xy_recipe() -> GeometryRecipe {
        GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Domain(1), ValueSource::Constant(0.0)])
    }

    fn fans_2d(tree: &RectTree<2, 1>) -> CellComplex<StrictChecks> {
        let mut cplx = CellComplex::new();
        construct_geometry_fans::<_, NoFunc<2>, 2, 1>(&mut cplx, tree, &[], 2, &xy_recipe(), None).unwrap();

        cplx
    }

    fn triangle_area(cplx: &CellComplex<StrictChecks>, v: &[usize]) -> f64 {
        let p = |i: usize| *cplx.point(v[i]).unwrap();
        let n = cross(&diff(&p(1), &p(0)), &diff(&p(2), &p(0)));

        n[2] / 2.0
    }

    #[test]
    fn unbalanced_fans_cover_the_domain() {
        let f = ScalarFn(|p: [f64; 2]| p[0] * p[0] + p[1] * p[1] - 0.3);
        let mut tree = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
        tree.refine_grid(1, &f);
        tree.refine_leaves_recursive_cell_pred(4, &f, |t, c| t.cell_cross_range_level(c, 0, 0.0));

        let cplx = fans_2d(&tree);
        let mut total = 0.0;
        for (v, t) in cplx.cells() {
            assert_eq!(t, CellType::Triangle);
            let area = triangle_area(&cplx, v);
            assert!(area > 0.0, "clockwise triangle {:?}", v);
            total += area;
        }
        assert!((total - 4.0).abs() < 1e-9, "{}", total);
    }

    #[test]
    fn fan_edges_are_shared() {
        // Every interior edge between fans is used by exactly two triangles, so the mesh has no cracks.
        let f = ScalarFn(|p: [f64; 2]| p[0] - 0.3);
        let mut tree = RectTree::<2, 1>::new([0.0; 2], [1.0; 2]).unwrap();
        tree.refine_grid(1, &f);
        tree.refine_leaves_recursive_cell_pred(3, &f, |t, c| t.cell_cross_range_level(c, 0, 0.0));
        let cplx = fans_2d(&tree);

        let mut edge_uses = std::collections::HashMap::new();
        for (v, _) in cplx.cells() {
            for k in 0..3 {
                let (a, b) = (v[k], v[(k + 1) % 3]);
                *edge_uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        let on_boundary = |i: usize| {
            let p = cplx.point(i).unwrap();
            p[0] == 0.0 || p[0] == 1.0 || p[1] == 0.0 || p[1] == 1.0
        };
        for (&(a, b), &uses) in edge_uses.iter() {
            let boundary_edge = on_boundary(a) && on_boundary(b) && {
                let (pa, pb) = (cplx.point(a).unwrap(), cplx.point(b).unwrap());
                pa[0] == pb[0] || pa[1] == pb[1]
            };
            let expected = if boundary_edge { 1 } else { 2 };
            assert_eq!(uses, expected, "edge {}-{}", a, b);
        }
    }

    #[test]
    fn fans_without_solver_skip_bad_centers() {
        let f = ScalarFn(|p: [f64; 2]| if p[0] > 0.5 { f64::NAN } else { p[0] });
        let mut tree = RectTree::<2, 1>::new([0.0; 2], [1.0; 2]).unwrap();
        tree.refine_grid(1, &f);
        let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Domain(1), ValueSource::Range(0)]);

        let mut cplx = CellComplex::<StrictChecks>::new();
        let n = construct_geometry_fans::<_, NoFunc<2>, 2, 1>(&mut cplx, &tree, &[], 2, &recipe, None).unwrap();

        // The two left cells keep the triangles whose corners have x <= 0.5.
        assert_eq!(n, 2 * 4);
    }

    #[test]
    fn healed_triangles() {
        let f = ScalarFn(|p: [f64; 2]| if p[0] > 0.6 { f64::NAN } else { p[0] });
        let mut tree = RectTree::<2, 1>::new([0.0; 2], [1.0; 2]).unwrap();
        tree.refine_grid(1, &f);
        let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Domain(1), ValueSource::Range(0)]);

        let mut cplx = CellComplex::<StrictChecks>::new();
        let mut solver = NanEdgeSolver::for_complex::<StrictChecks>(&f);
        construct_geometry_fans(&mut cplx, &tree, &[], 2, &recipe, Some(&mut solver)).unwrap();

        let max_x = cplx.points().iter().map(|p| p[0]).fold(0.0, f64::max);
        assert!(max_x <= 0.6 && 0.6 - max_x < 1e-6, "{}", max_x);
        assert!(solver.num_cache_hits() > 0);
        for (v, t) in cplx.cells() {
            assert_eq!(t, CellType::Triangle);
            let p = |i: usize| *cplx.point(v[i]).unwrap();
            let n = cross(&diff(&p(1), &p(0)), &diff(&p(2), &p(0)));
            assert!(dot(&n, &[0.0, 0.0, 1.0]) > 0.0);
        }
    }

    #[test]
    fn one_dimensional_fans() {
        let mut tree = RectTree::<1, 1>::new([0.0], [1.0]).unwrap();
        tree.refine_grid(2, &ScalarFn(|p: [f64; 1]| p[0]));
        let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Range(0), ValueSource::Constant(0.0)]);

        let mut cplx = CellComplex::<StrictChecks>::new();
        let n = construct_geometry_fans::<_, NoFunc<1>, 1, 1>(&mut cplx, &tree, &[], 1, &recipe, None).unwrap();
        assert_eq!(n, 8);
        assert_eq!(cplx.num_points(), 9);

        let mut points = CellComplex::<StrictChecks>::new();
        let n = construct_geometry_fans::<_, NoFunc<1>, 1, 1>(&mut points, &tree, &[], 0, &recipe, None).unwrap();
        assert_eq!(n, 9);
    }

    #[test]
    fn pyramids_point_their_bases_at_the_apex() {
        let f = ScalarFn(|p: [f64; 3]| p[0] + p[1] + p[2] - 0.4);
        let mut tree = RectTree::<3, 1>::new([0.0; 3], [1.0; 3]).unwrap();
        tree.refine_grid(1, &f);
        tree.refine_leaves_recursive_cell_pred(2, &f, |t, c| t.cell_cross_range_level(c, 0, 0.0));
        let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Domain(1), ValueSource::Domain(2)]);

        let mut cplx = CellComplex::<StrictChecks>::new();
        let n = construct_geometry_fans::<_, NoFunc<3>, 3, 1>(&mut cplx, &tree, &[], 3, &recipe, None).unwrap();
        assert!(n > 6 * 8);

        let mut volume = 0.0;
        for (v, t) in cplx.cells() {
            assert_eq!(t, CellType::Pyramid);
            let p = |i: usize| *cplx.point(v[i]).unwrap();
            let normal = cross(&diff(&p(1), &p(0)), &diff(&p(2), &p(1)));
            let height = dot(&normal, &diff(&p(4), &p(0)));
            assert!(height > 0.0, "{:?}", v);
            // The base is a square, so |normal| is its area and height is area * distance.
            volume += height / 3.0;
        }
        assert!((volume - 1.0).abs() < 1e-9, "{}", volume);
    }
}
