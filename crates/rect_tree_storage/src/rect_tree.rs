//! The `RectTree` is an adaptive, hashed 2^D-tree over an axis-aligned box. It samples a function at the vertexes of its
//! cells and refines where the samples say something interesting is happening.
//!
//! Every cell is identified by the `Diti` of its center. The tree stores only the set of leaf cells and a cache of samples,
//! so parents, children, corners and neighbors are all computed from a `Diti` with no node storage at all.
//!
//! # Levels
//!
//! The top cell covers the whole domain and has level 0. A cell at level `l` has a half width of `2^(b - 1 - l)` fixed-point
//! units, where `b` is `TreeConfig::bits`. Every depth argument of a refinement method is an absolute level, so `refine_grid(3,
//! ..)` on a fresh tree leaves every leaf at level 3.
//!
//! # Vertexes
//!
//! The vertexes of a cell are its center followed by its `2^D` corners. Bit `k` of a corner index selects the max side of axis
//! `k`. Splitting a cell samples every vertex of every child, so predicates can always rely on the vertex samples of a leaf.
//!
//! # Refinement
//!
//!   - `sample_cell`: seed an empty tree with the top cell
//!   - `refine_grid`: uniform refinement to a level
//!   - `refine_recursive`: uniform refinement through the recursive machinery
//!   - `refine_leaves_recursive_cell_pred`: recursive refinement wherever a predicate holds
//!   - `refine_leaves_atomically_if_cell_pred`: one split of every leaf where a predicate holds, judged before any split
//!   - `refine_recursive_if_cell_vertex_is_nan`: recursive refinement wherever a vertex sample is NaN
//!   - `balance_tree`: split leaves until adjacent leaves differ by a bounded number of levels
//!
//! Cells are never merged.

mod dump;
mod neighbors;
mod predicates;
mod refine;

use crate::{SampleCache, SampleFn, TreeConfig, TreeError};

use rect_tree_core::prelude::*;
use rect_tree_core::MAX_DIMENSION;

use std::collections::BTreeSet;

/// An adaptive tree over a `D`-dimensional domain, sampling a function with an `R`-dimensional range.
#[derive(Clone, Debug)]
pub struct RectTree<const D: usize, const R: usize> {
    config: TreeConfig,
    codec: DitiCodec<D>,
    domain: DomainBox<D>,
    samples: SampleCache<R>,
    // Ordered so that every traversal of the leaves is deterministic.
    leaves: BTreeSet<Diti>,
}

impl<const D: usize, const R: usize> RectTree<D, R> {
    /// Make an empty tree over the box `[min, max]` with the default `TreeConfig`.
    pub fn new(min: [f64; D], max: [f64; D]) -> Result<Self, TreeError> {
        Self::with_config(TreeConfig::default(), min, max)
    }

    /// Make an empty tree over the box `[min, max]`.
    pub fn with_config(config: TreeConfig, min: [f64; D], max: [f64; D]) -> Result<Self, TreeError> {
        if D == 0 || D > MAX_DIMENSION {
            return Err(CodecError::UnsupportedDimension(D).into());
        }
        if R == 0 {
            return Err(TreeError::EmptyRange);
        }
        let codec = DitiCodec::new(config.bits)?;
        let domain = DomainBox::new(min, max);
        if let Some(axis) = domain.first_degenerate_axis() {
            return Err(TreeError::DegenerateDomain { axis });
        }

        Ok(Self {
            config,
            codec,
            domain,
            samples: SampleCache::new(),
            leaves: BTreeSet::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    #[inline]
    pub fn codec(&self) -> &DitiCodec<D> {
        &self.codec
    }

    #[inline]
    pub fn domain(&self) -> &DomainBox<D> {
        &self.domain
    }

    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    #[inline]
    pub fn is_leaf(&self, cell: Diti) -> bool {
        self.leaves.contains(&cell)
    }

    /// All leaves in ascending `Diti` order.
    pub fn leaves(&self) -> impl '_ + Iterator<Item = Diti> {
        self.leaves.iter().copied()
    }

    #[inline]
    pub fn sample_cache(&self) -> &SampleCache<R> {
        &self.samples
    }

    /// Drop every leaf and sample. The domain and config are kept.
    pub fn clear(&mut self) {
        self.leaves.clear();
        self.samples.clear();
    }

    // ████████╗ ██████╗ ██████╗  ██████╗ ██╗      ██████╗  ██████╗██╗   ██╗
    // ╚══██╔══╝██╔═══██╗██╔══██╗██╔═══██╗██║     ██╔═══██╗██╔════╝╚██╗ ██╔╝
    //    ██║   ██║   ██║██████╔╝██║   ██║██║     ██║   ██║██║  ███╗╚████╔╝
    //    ██║   ██║   ██║██╔═══╝ ██║   ██║██║     ██║   ██║██║   ██║ ╚██╔╝
    //    ██║   ╚██████╔╝██║     ╚██████╔╝███████╗╚██████╔╝╚██████╔╝  ██║
    //    ╚═╝    ╚═════╝ ╚═╝      ╚═════╝ ╚══════╝ ╚═════╝  ╚═════╝   ╚═╝

    #[inline]
    pub fn ccc_get_top_cell(&self) -> Diti {
        self.codec.top_cell()
    }

    #[inline]
    pub fn ccc_cell_level(&self, cell: Diti) -> u32 {
        self.codec.level(cell)
    }

    #[inline]
    pub fn ccc_max_level(&self) -> u32 {
        self.codec.max_level()
    }

    /// The `2^D` corners of `cell`. Bit `k` of the index selects the max side of axis `k`.
    #[inline]
    pub fn ccc_get_corners(&self, cell: Diti) -> Vec<Diti> {
        self.codec.corners(cell)
    }

    /// The `2^(D-1)` corners of the face of `cell` on the `dir` side of `axis`, in corner bit order over the remaining axes.
    #[inline]
    pub fn ccc_get_face_corners(&self, cell: Diti, axis: usize, dir: Direction) -> Vec<Diti> {
        self.codec.face_corners(cell, axis, dir)
    }

    /// The center of `cell` followed by its corners.
    pub fn ccc_get_vertexes(&self, cell: Diti) -> Vec<Diti> {
        let mut vertexes = Vec::with_capacity(1 + (1 << D));
        vertexes.push(cell);
        vertexes.extend(self.codec.corners(cell));

        vertexes
    }

    /// The leaves equal to or contained in `cell`, in ascending `Diti` order.
    pub fn get_leaf_cells(&self, cell: Diti) -> Vec<Diti> {
        self.get_leaf_cells_pred(cell, |_, _| true)
    }

    /// The leaves equal to or contained in `cell` that satisfy `pred`, in ascending `Diti` order.
    pub fn get_leaf_cells_pred<P>(&self, cell: Diti, pred: P) -> Vec<Diti>
    where
        P: Fn(&Self, Diti) -> bool,
    {
        let everything = cell == self.codec.top_cell();

        self.leaves
            .iter()
            .copied()
            .filter(|&leaf| everything || self.codec.cell_contains(cell, leaf))
            .filter(|&leaf| pred(self, leaf))
            .collect()
    }

    // ██████╗  ██████╗ ███╗   ███╗ █████╗ ██╗███╗   ██╗
    // ██╔══██╗██╔═══██╗████╗ ████║██╔══██╗██║████╗  ██║
    // ██║  ██║██║   ██║██╔████╔██║███████║██║██╔██╗ ██║
    // ██║  ██║██║   ██║██║╚██╔╝██║██╔══██║██║██║╚██╗██║
    // ██████╔╝╚██████╔╝██║ ╚═╝ ██║██║  ██║██║██║ ╚████║
    // ╚═════╝  ╚═════╝ ╚═╝     ╚═╝╚═╝  ╚═╝╚═╝╚═╝  ╚═══╝

    #[inline]
    pub fn diti_to_drpt(&self, d: Diti) -> [f64; D] {
        self.domain
            .crd_to_drpt(self.codec.decode(d), self.codec.bits())
    }

    #[inline]
    pub fn get_bbox_min(&self) -> [f64; D] {
        self.domain.min()
    }

    #[inline]
    pub fn get_bbox_max(&self) -> [f64; D] {
        self.domain.max()
    }

    /// The domain distance spanned by one fixed-point unit on each axis.
    #[inline]
    pub fn get_bbox_delta(&self) -> [f64; D] {
        self.domain.delta(self.codec.bits())
    }

    #[inline]
    pub fn cell_domain_min(&self, cell: Diti) -> [f64; D] {
        self.diti_to_drpt(self.codec.corner_min(cell))
    }

    #[inline]
    pub fn cell_domain_max(&self, cell: Diti) -> [f64; D] {
        self.diti_to_drpt(self.codec.corner_max(cell))
    }

    #[inline]
    pub fn drpt_midpoint(&self, a: &[f64; D], b: &[f64; D]) -> [f64; D] {
        drpt_midpoint(a, b)
    }

    #[inline]
    pub fn drpt_distance_inf(&self, a: &[f64; D], b: &[f64; D]) -> f64 {
        drpt_distance_inf(a, b)
    }

    #[inline]
    pub fn rrpt_is_nan(&self, p: &[f64; R]) -> bool {
        rrpt_is_nan(p)
    }

    // ███████╗ █████╗ ███╗   ███╗██████╗ ██╗     ███████╗███████╗
    // ██╔════╝██╔══██╗████╗ ████║██╔══██╗██║     ██╔════╝██╔════╝
    // ███████╗███████║██╔████╔██║██████╔╝██║     █████╗  ███████╗
    // ╚════██║██╔══██║██║╚██╔╝██║██╔═══╝ ██║     ██╔══╝  ╚════██║
    // ███████║██║  ██║██║ ╚═╝ ██║██║     ███████╗███████╗███████║
    // ╚══════╝╚═╝  ╚═╝╚═╝     ╚═╝╚═╝     ╚══════╝╚══════╝╚══════╝

    /// The sample of `func` at `d`, evaluating and caching it if this is the first request.
    ///
    /// NaN components are cached and returned like any other value.
    pub fn get_sample<F>(&mut self, d: Diti, func: &F) -> [f64; R]
    where
        F: SampleFn<D, R>,
    {
        if let Some(sample) = self.samples.get(d) {
            return *sample;
        }
        let drpt = self.diti_to_drpt(d);

        self.samples.get_or_insert_with(d, || func.sample(drpt))
    }

    /// The cached sample at `d`, if `d` has been sampled.
    #[inline]
    pub fn cached_sample(&self, d: Diti) -> Option<&[f64; R]> {
        self.samples.get(d)
    }

    /// The cached sample at `d`, or all NaN if `d` has never been sampled.
    #[inline]
    pub fn cached_sample_or_nan(&self, d: Diti) -> [f64; R] {
        self.samples.get(d).copied().unwrap_or([f64::NAN; R])
    }

    fn sample_vertexes<F>(&mut self, cell: Diti, func: &F)
    where
        F: SampleFn<D, R>,
    {
        for v in self.ccc_get_vertexes(cell) {
            self.get_sample(v, func);
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

    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn construction_errors() {
        assert_eq!(
            RectTree::<2, 1>::new([0.0, 0.0], [1.0, 0.0]).unwrap_err(),
            TreeError::DegenerateDomain { axis: 1 }
        );
        assert_eq!(
            RectTree::<2, 0>::new([0.0; 2], [1.0; 2]).unwrap_err(),
            TreeError::EmptyRange
        );
        assert_eq!(
            RectTree::<4, 1>::new([0.0; 4], [1.0; 4]).unwrap_err(),
            TreeError::Codec(CodecError::UnsupportedDimension(4))
        );
        assert_eq!(
            RectTree::<1, 1>::with_config(TreeConfig::with_bits(40), [0.0], [1.0]).unwrap_err(),
            TreeError::Codec(CodecError::BitWidth { bits: 40, max: 31 })
        );
        assert_eq!(TreeError::DegenerateDomain { axis: 0 }.code(), 3);
    }

    #[test]
    fn vertexes_are_center_then_corners() {
        let tree = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
        let top = tree.ccc_get_top_cell();
        let points: Vec<_> = tree
            .ccc_get_vertexes(top)
            .into_iter()
            .map(|v| tree.diti_to_drpt(v))
            .collect();

        assert_eq!(
            points,
            vec![
                [0.0, 0.0],
                [-1.0, -1.0],
                [1.0, -1.0],
                [-1.0, 1.0],
                [1.0, 1.0]
            ]
        );
        assert_eq!(tree.cell_domain_min(top), [-1.0, -1.0]);
        assert_eq!(tree.cell_domain_max(top), [1.0, 1.0]);
    }

    #[test]
    fn samples_are_memoized() {
        let mut tree = RectTree::<1, 1>::new([0.0], [2.0]).unwrap();
        let calls = Cell::new(0);
        let f = |p: [f64; 1]| {
            calls.set(calls.get() + 1);
            [p[0] * 10.0]
        };
        let top = tree.ccc_get_top_cell();

        assert_eq!(tree.cached_sample(top), None);
        assert_eq!(tree.get_sample(top, &f), [10.0]);
        assert_eq!(tree.get_sample(top, &f), [10.0]);
        assert_eq!(calls.get(), 1);
        assert_eq!(tree.cached_sample(top), Some(&[10.0]));
        assert!(tree.cached_sample_or_nan(tree.codec().corner_min(top))[0].is_nan());

        tree.clear();
        assert_eq!(tree.num_samples(), 0);
    }
}
