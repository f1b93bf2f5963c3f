use crate::{CellComplex, ComplexConfig, GeometryRecipe};

use rect_tree_core::prelude::*;
use rect_tree_storage::{RectTree, SampleFn, SmallKeyHashMap};

use tracing::debug;

/// Finds where a function stops being defined along a tree edge that has one good end and one NaN ("sick") end.
///
/// Solutions are cached by `(sick, good)` as the index of the resulting point in the complex. Since the cache holds point
/// indexes, a solver must only be used with one complex and one tree.
pub struct NanEdgeSolver<'f, F, const D: usize, const R: usize> {
    func: &'f F,
    epsilon: f64,
    cache: SmallKeyHashMap<(Diti, Diti), Option<usize>>,
    num_solves: usize,
    num_cache_hits: usize,
}

impl<'f, F, const D: usize, const R: usize> NanEdgeSolver<'f, F, D, R>
where
    F: SampleFn<D, R>,
{
    /// Bisect until the gap between the last good and first sick point is at most `epsilon` in the domain inf-norm.
    pub fn new(func: &'f F, epsilon: f64) -> Self {
        assert!(epsilon > 0.0, "solver epsilon must be positive");

        Self {
            func,
            epsilon,
            cache: SmallKeyHashMap::default(),
            num_solves: 0,
            num_cache_hits: 0,
        }
    }

    /// A solver with epsilon `C::EPSILON / 100`.
    pub fn for_complex<C: ComplexConfig>(func: &'f F) -> Self {
        Self::new(func, C::EPSILON / 100.0)
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn num_solves(&self) -> usize {
        self.num_solves
    }

    pub fn num_cache_hits(&self) -> usize {
        self.num_cache_hits
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Walk from `good` toward `sick` and return the index of the point where `func` is last defined.
    ///
    /// `good_idx` is the index of `good`'s point in `cplx`; it is returned when the solution is within `C::EPSILON` of
    /// `good`. Otherwise a new point is added with `recipe`. `None` means the recipe mapped the solution to a NaN point.
    pub fn solve<C: ComplexConfig>(
        &mut self,
        cplx: &mut CellComplex<C>,
        tree: &RectTree<D, R>,
        recipe: &GeometryRecipe,
        good_idx: usize,
        good: Diti,
        sick: Diti,
    ) -> Option<usize> {
        if let Some(&cached) = self.cache.get(&(sick, good)) {
            self.num_cache_hits += 1;
            debug!("NaN edge cache hit: sick={} good={}", sick, good);
            return cached;
        }
        debug!("NaN edge cache miss: sick={} good={}", sick, good);
        self.num_solves += 1;

        let start = tree.diti_to_drpt(good);
        let mut good_drpt = start;
        let mut sick_drpt = tree.diti_to_drpt(sick);
        let mut good_rrpt = tree.cached_sample_or_nan(good);
        while drpt_distance_inf(&good_drpt, &sick_drpt) > self.epsilon {
            let mid = drpt_midpoint(&good_drpt, &sick_drpt);
            let y = self.func.sample(mid);
            if rrpt_is_nan(&y) {
                sick_drpt = mid;
            } else {
                good_drpt = mid;
                good_rrpt = y;
            }
        }

        let result = if drpt_distance_inf(&good_drpt, &start) < C::EPSILON {
            Some(good_idx)
        } else {
            recipe.add_point_and_data_from_data(cplx, &good_drpt, &good_rrpt)
        };
        self.cache.insert((sick, good), result);

        result
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{StrictChecks, ValueSource};

    fn ramp(p: [f64; 1]) -> [f64; 1] {
        if p[0] > 0.3 {
            [f64::NAN]
        } else {
            [p[0]]
        }
    }

    #[test]
    fn solves_and_caches() {
        let mut tree = RectTree::<1, 1>::new([0.0], [1.0]).unwrap();
        tree.sample_cell(&ramp);
        let top = tree.ccc_get_top_cell();
        let corners = tree.ccc_get_corners(top);

        let recipe = GeometryRecipe::new([
            ValueSource::Domain(0),
            ValueSource::Range(0),
            ValueSource::Constant(0.0),
        ]);
        let mut cplx = CellComplex::<StrictChecks>::new();
        let good_idx = recipe
            .add_point_and_data_from_tree(&mut cplx, &tree, corners[0])
            .unwrap();

        let mut solver = NanEdgeSolver::for_complex::<StrictChecks>(&ramp);
        assert!((solver.epsilon() - 1e-7).abs() < 1e-15);
        let idx = solver
            .solve(&mut cplx, &tree, &recipe, good_idx, corners[0], top)
            .unwrap();
        assert_ne!(idx, good_idx);
        let x = cplx.point(idx).unwrap()[0];
        assert!(x <= 0.3 && 0.3 - x <= solver.epsilon(), "{}", x);

        let again = solver.solve(&mut cplx, &tree, &recipe, good_idx, corners[0], top);
        assert_eq!(again, Some(idx));
        assert_eq!(solver.num_solves(), 1);
        assert_eq!(solver.num_cache_hits(), 1);
        assert_eq!(cplx.num_points(), 2);
    }

    #[test]
    fn short_solutions_reuse_the_good_point() {
        // Undefined immediately to the right of the origin.
        let step = |p: [f64; 1]| if p[0] > 1e-9 { [f64::NAN] } else { [0.0] };
        let mut tree = RectTree::<1, 1>::new([0.0], [1.0]).unwrap();
        tree.sample_cell(&step);
        let top = tree.ccc_get_top_cell();
        let corners = tree.ccc_get_corners(top);

        let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Range(0), ValueSource::Constant(0.0)]);
        let mut cplx = CellComplex::<StrictChecks>::new();
        let good_idx = recipe
            .add_point_and_data_from_tree(&mut cplx, &tree, corners[0])
            .unwrap();

        let mut solver = NanEdgeSolver::for_complex::<StrictChecks>(&step);
        assert_eq!(
            solver.solve(&mut cplx, &tree, &recipe, good_idx, corners[0], corners[1]),
            Some(good_idx)
        );
        assert_eq!(cplx.num_points(), 1);
    }
}
