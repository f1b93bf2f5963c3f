use super::RectTree;

use crate::SampleFn;

use rect_tree_core::prelude::*;

use itertools::Itertools;

impl<const D: usize, const R: usize> RectTree<D, R> {
    /// Seed an empty tree with the top cell as its only leaf, sampling the top cell's vertexes. Returns `false` and does
    /// nothing if the tree already has leaves.
    pub fn sample_cell<F>(&mut self, func: &F) -> bool
    where
        F: SampleFn<D, R>,
    {
        if !self.leaves.is_empty() {
            return false;
        }

        let top = self.codec.top_cell();
        self.sample_vertexes(top, func);
        self.leaves.insert(top);
        tracing::debug!("Seeded tree with top cell {}", top);

        true
    }

    /// Replace every leaf shallower than `level` with all of its descendants at `level`, sampling each of their vertexes.
    /// `level` is clamped to the deepest level. Returns the number of leaves that were replaced.
    ///
    /// This produces `(2^level)^D` leaves on a fresh tree, so keep `level` small in higher dimensions.
    pub fn refine_grid<F>(&mut self, level: u32, func: &F) -> usize
    where
        F: SampleFn<D, R>,
    {
        let _span = tracing::info_span!("refine_grid", level).entered();

        self.sample_cell(func);
        let level = level.min(self.codec.max_level());
        let coarse: Vec<Diti> = self
            .leaves
            .iter()
            .copied()
            .filter(|&c| self.codec.level(c) < level)
            .collect();

        let target_half = 1u32 << (self.codec.max_level() - level);
        for &cell in coarse.iter() {
            let h = self.codec.half_width(cell);
            let per_axis = h / target_half;
            let first = self.codec.dec_all_crd(cell, h - target_half);
            for offsets in (0..D).map(|_| 0..per_axis).multi_cartesian_product() {
                let child = offsets.iter().enumerate().fold(first, |d, (axis, &k)| {
                    self.codec.inc_crd(d, axis, 2 * k * target_half)
                });
                self.sample_vertexes(child, func);
                self.leaves.insert(child);
            }
            self.leaves.remove(&cell);
        }
        tracing::debug!(
            "Grid refinement replaced {} leaves; {} leaves, {} samples",
            coarse.len(),
            self.leaves.len(),
            self.samples.len()
        );

        coarse.len()
    }

    /// Split every leaf recursively until all leaves are at `level`. Same result as `refine_grid`.
    pub fn refine_recursive<F>(&mut self, level: u32, func: &F) -> usize
    where
        F: SampleFn<D, R>,
    {
        self.refine_leaves_recursive_cell_pred(level, func, |_, _| true)
    }

    /// Visit every current leaf and split it while it is shallower than `max_level` and `pred` holds, then visit its children
    /// the same way. `pred` sees the tree as it is at the moment of the visit, including cells split earlier in this call.
    /// Returns the number of cells split.
    pub fn refine_leaves_recursive_cell_pred<F, P>(&mut self, max_level: u32, func: &F, pred: P) -> usize
    where
        F: SampleFn<D, R>,
        P: Fn(&Self, Diti) -> bool,
    {
        let _span = tracing::info_span!("refine_leaves_recursive", max_level).entered();

        self.sample_cell(func);
        let mut stack: Vec<Diti> = self.leaves.iter().rev().copied().collect();
        let mut num_split = 0;
        while let Some(cell) = stack.pop() {
            if self.codec.level(cell) >= max_level || !pred(self, cell) {
                continue;
            }
            if let Some(children) = self.split_leaf(cell, func) {
                num_split += 1;
                stack.extend(children.into_iter().rev());
            }
        }
        tracing::debug!(
            "Recursive refinement split {} cells; {} leaves, {} samples",
            num_split,
            self.leaves.len(),
            self.samples.len()
        );

        num_split
    }

    /// Split, once, every leaf shallower than `max_level` where `pred` holds. All of the predicates are evaluated before any
    /// leaf is split, so new leaves never influence the decisions. Returns the number of cells split.
    pub fn refine_leaves_atomically_if_cell_pred<F, P>(&mut self, max_level: u32, func: &F, pred: P) -> usize
    where
        F: SampleFn<D, R>,
        P: Fn(&Self, Diti) -> bool,
    {
        let _span = tracing::info_span!("refine_leaves_atomically", max_level).entered();

        self.sample_cell(func);
        let marked: Vec<Diti> = self
            .leaves
            .iter()
            .copied()
            .filter(|&c| self.codec.level(c) < max_level && pred(self, c))
            .collect();
        let num_split = marked
            .into_iter()
            .filter_map(|c| self.split_leaf(c, func))
            .count();
        tracing::debug!("Atomic refinement split {} cells", num_split);

        num_split
    }

    /// Recursively split leaves with a NaN vertex sample, up to `max_level`. This tracks the boundary of the region where
    /// `func` is defined.
    pub fn refine_recursive_if_cell_vertex_is_nan<F>(&mut self, max_level: u32, func: &F) -> usize
    where
        F: SampleFn<D, R>,
    {
        self.refine_leaves_recursive_cell_pred(max_level, func, |t, c| t.cell_vertex_is_nan(c))
    }

    /// Split leaves until no leaf has an existing neighbor more than `max_level_difference` levels deeper than itself. Runs
    /// passes over the leaves until one makes no change. Returns the number of cells split.
    pub fn balance_tree<F>(&mut self, max_level_difference: u32, func: &F) -> usize
    where
        F: SampleFn<D, R>,
    {
        let _span = tracing::info_span!("balance_tree", max_level_difference).entered();

        self.sample_cell(func);
        let mut num_split = 0;
        let mut num_passes = 0;
        loop {
            let unbalanced: Vec<Diti> = self
                .leaves
                .iter()
                .copied()
                .filter(|&c| self.cell_is_unbalanced(c, max_level_difference))
                .collect();
            num_passes += 1;

            let split_this_pass = unbalanced
                .into_iter()
                .filter_map(|c| self.split_leaf(c, func))
                .count();
            tracing::debug!("Balance pass {} split {} cells", num_passes, split_this_pass);
            if split_this_pass == 0 {
                break;
            }
            num_split += split_this_pass;
        }

        num_split
    }

    fn cell_is_unbalanced(&self, cell: Diti, max_level_difference: u32) -> bool {
        let level = self.codec.level(cell);

        SignedAxis::all_faces(D).any(|face| {
            self.get_existing_neighbor(cell, face.axis, face.dir)
                .into_iter()
                .any(|n| self.codec.level(n) > level + max_level_difference)
        })
    }

    /// Replace the leaf `cell` with its children. Returns `None` if `cell` is not a leaf or is already at the deepest level.
    pub(crate) fn split_leaf<F>(&mut self, cell: Diti, func: &F) -> Option<Vec<Diti>>
    where
        F: SampleFn<D, R>,
    {
        if !self.leaves.contains(&cell) || self.codec.level(cell) >= self.codec.max_level() {
            return None;
        }

        let children = self.codec.children(cell);
        for &child in children.iter() {
            self.sample_vertexes(child, func);
        }
        self.leaves.remove(&cell);
        self.leaves.extend(children.iter().copied());

        Some(children)
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

    use crate::ScalarFn;

    use pretty_assertions::assert_eq;

    fn level_set_circle(p: [f64; 2]) -> f64 {
        p[0] * p[0] + p[1] * p[1] - 0.6
    }

    #[test]
    fn seeding_happens_once() {
        let mut tree = RectTree::<3, 1>::new([0.0; 3], [1.0; 3]).unwrap();
        let f = ScalarFn(|p: [f64; 3]| p[0]);

        assert!(tree.sample_cell(&f));
        assert!(!tree.sample_cell(&f));
        assert_eq!(tree.num_leaves(), 1);
        assert_eq!(tree.num_samples(), 9);
    }

    #[test]
    fn grid_and_recursive_refinement_agree() {
        let f = ScalarFn(level_set_circle);
        let mut grid = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
        let mut recursive = grid.clone();

        grid.refine_grid(3, &f);
        recursive.refine_recursive(3, &f);

        let grid_leaves: Vec<_> = grid.leaves().collect();
        let recursive_leaves: Vec<_> = recursive.leaves().collect();
        assert_eq!(grid_leaves.len(), 64);
        assert_eq!(grid_leaves, recursive_leaves);
        // (2^3 + 1)^2 corners plus 64 centers.
        assert_eq!(grid.num_samples(), 81 + 64);
        assert_eq!(grid.num_samples(), recursive.num_samples());
    }

    #[test]
    fn grid_refinement_of_a_partially_refined_tree() {
        let f = ScalarFn(|p: [f64; 1]| p[0]);
        let mut tree = RectTree::<1, 1>::new([0.0], [1.0]).unwrap();
        tree.refine_grid(1, &f);
        let first = tree.leaves().next().unwrap();
        tree.refine_leaves_recursive_cell_pred(3, &f, |_, c| c == first);
        assert_eq!(tree.num_leaves(), 3);

        tree.refine_grid(2, &f);
        let levels: Vec<_> = tree.leaves().map(|c| tree.ccc_cell_level(c)).collect();
        assert_eq!(levels, vec![2, 2, 2, 2]);
    }

    #[test]
    fn atomic_refinement_splits_each_leaf_at_most_once() {
        let f = ScalarFn(level_set_circle);
        let mut tree = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
        tree.sample_cell(&f);

        let n = tree.refine_leaves_atomically_if_cell_pred(10, &f, |_, _| true);
        assert_eq!(n, 1);
        assert_eq!(tree.num_leaves(), 4);

        let n = tree.refine_leaves_atomically_if_cell_pred(10, &f, |_, _| true);
        assert_eq!(n, 4);
        assert_eq!(tree.num_leaves(), 16);
    }

    #[test]
    fn recursive_refinement_follows_the_level_set() {
        let f = ScalarFn(level_set_circle);
        let mut tree = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
        tree.refine_grid(2, &f);
        tree.refine_leaves_recursive_cell_pred(5, &f, |t: &RectTree<2, 1>, c| {
            t.cell_cross_range_level(c, 0, 0.0)
        });

        for leaf in tree.leaves() {
            if tree.cell_cross_range_level(leaf, 0, 0.0) {
                assert_eq!(tree.ccc_cell_level(leaf), 5);
            }
        }
        // The center of the domain is far from the circle.
        let top = tree.ccc_get_top_cell();
        let deepest_near_center = tree
            .get_leaf_cells_pred(top, |t, c| t.cell_close_to_domain_point(&[0.0, 0.0], 0.0, c))
            .into_iter()
            .map(|c| tree.ccc_cell_level(c))
            .max();
        assert_eq!(deepest_near_center, Some(2));
    }

    #[test]
    fn nan_refinement_tracks_the_undefined_region() {
        let f = ScalarFn(|p: [f64; 1]| if p[0] > 0.3 { f64::NAN } else { p[0] });
        let mut tree = RectTree::<1, 1>::new([0.0], [1.0]).unwrap();
        tree.refine_recursive_if_cell_vertex_is_nan(6, &f);

        for leaf in tree.leaves() {
            if tree.cell_vertex_is_nan(leaf) {
                assert_eq!(tree.ccc_cell_level(leaf), 6);
            }
        }
        let boundary: Vec<_> = tree
            .leaves()
            .filter(|&c| tree.ccc_cell_level(c) == 6)
            .filter(|&c| tree.cell_cross_domain_level(c, 0, 0.3, 0.0))
            .collect();
        assert_eq!(boundary.len(), 1);
    }

    #[test]
    fn balancing_an_empty_tree_seeds_it() {
        let f = ScalarFn(|p: [f64; 2]| p[0]);
        let mut tree = RectTree::<2, 1>::new([0.0; 2], [1.0; 2]).unwrap();

        assert_eq!(tree.balance_tree(1, &f), 0);
        assert_eq!(tree.num_leaves(), 1);
    }
}
