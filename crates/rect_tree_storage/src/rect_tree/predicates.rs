//! Standard refinement predicates.
//!
//! All of these read only cached samples, never the sampled function. Vertexes that were never sampled and NaN samples are
//! ignored by the value predicates.

use super::RectTree;

use rect_tree_core::prelude::*;

impl<const D: usize, const R: usize> RectTree<D, R> {
    /// Cached samples at the vertexes of `cell`.
    pub fn cell_vertex_samples(&self, cell: Diti) -> impl '_ + Iterator<Item = [f64; R]> {
        self.ccc_get_vertexes(cell)
            .into_iter()
            .filter_map(move |v| self.samples.get(v).copied())
    }

    fn cell_component_values(&self, cell: Diti, component: usize) -> impl '_ + Iterator<Item = f64> {
        assert!(component < R, "range component {} out of {}", component, R);

        self.cell_vertex_samples(cell)
            .map(move |s| s[component])
            .filter(|v| !v.is_nan())
    }

    /// True iff the vertex samples of `cell` for `component` include a value `< level` and a value `>= level`.
    pub fn cell_cross_range_level(&self, cell: Diti, component: usize, level: f64) -> bool {
        let mut below = false;
        let mut above = false;
        for v in self.cell_component_values(cell, component) {
            if v < level {
                below = true;
            } else {
                above = true;
            }
            if below && above {
                return true;
            }
        }

        false
    }

    /// True iff `cell` has at least one vertex sample for `component`, and every one is greater than `level + eps`.
    pub fn cell_above_range_level(&self, cell: Diti, component: usize, level: f64, eps: f64) -> bool {
        let mut any = false;
        for v in self.cell_component_values(cell, component) {
            if v <= level + eps {
                return false;
            }
            any = true;
        }

        any
    }

    /// True iff the extent of `cell` on `axis`, widened by `eps`, contains the domain coordinate `level`.
    pub fn cell_cross_domain_level(&self, cell: Diti, axis: usize, level: f64, eps: f64) -> bool {
        let min = self.cell_domain_min(cell)[axis];
        let max = self.cell_domain_max(cell)[axis];

        min - eps <= level && level <= max + eps
    }

    /// True iff the domain box of `cell`, widened by `eps` on every side, contains `point`.
    pub fn cell_close_to_domain_point(&self, point: &[f64; D], eps: f64, cell: Diti) -> bool {
        DomainBox::new(self.cell_domain_min(cell), self.cell_domain_max(cell)).contains(point, eps)
    }

    /// True iff `sdf` changes sign over the vertexes of `cell`. NaN values are ignored and zero counts as positive.
    pub fn cell_cross_sdf<S>(&self, cell: Diti, sdf: S) -> bool
    where
        S: Fn([f64; D]) -> f64,
    {
        let mut below = false;
        let mut above = false;
        for v in self.ccc_get_vertexes(cell) {
            let d = sdf(self.diti_to_drpt(v));
            if d.is_nan() {
                continue;
            }
            if d < 0.0 {
                below = true;
            } else {
                above = true;
            }
            if below && above {
                return true;
            }
        }

        false
    }

    /// True iff any vertex sample of `cell` has a NaN component.
    pub fn cell_vertex_is_nan(&self, cell: Diti) -> bool {
        self.cell_vertex_samples(cell).any(|s| rrpt_is_nan(&s))
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

    fn seeded<F: Fn([f64; 2]) -> [f64; 2]>(f: F) -> (RectTree<2, 2>, Diti) {
        let mut tree = RectTree::<2, 2>::new([0.0; 2], [2.0; 2]).unwrap();
        tree.sample_cell(&f);
        let top = tree.ccc_get_top_cell();

        (tree, top)
    }

    #[test]
    fn range_level_crossing() {
        let (tree, top) = seeded(|p| [p[0] - 1.0, 5.0]);

        assert!(tree.cell_cross_range_level(top, 0, 0.0));
        // Values are -1, 0 and 1, so 1 is both the max and "above".
        assert!(tree.cell_cross_range_level(top, 0, 1.0));
        assert!(!tree.cell_cross_range_level(top, 0, 1.5));
        assert!(!tree.cell_cross_range_level(top, 0, -1.0));
        assert!(!tree.cell_cross_range_level(top, 1, 0.0));
    }

    #[test]
    fn range_level_crossing_ignores_nan() {
        let (tree, top) = seeded(|p| if p[0] > 1.5 { [f64::NAN; 2] } else { [p[0] - 0.5; 2] });

        assert!(tree.cell_cross_range_level(top, 0, 0.0));
        assert!(!tree.cell_cross_range_level(top, 0, 2.0));
        assert!(tree.cell_vertex_is_nan(top));
    }

    #[test]
    fn above_range_level() {
        let (tree, top) = seeded(|p| [p[0] + 1.0, f64::NAN]);

        assert!(tree.cell_above_range_level(top, 0, 0.5, 0.1));
        assert!(!tree.cell_above_range_level(top, 0, 0.5, 0.5));
        assert!(!tree.cell_above_range_level(top, 0, 2.0, 0.0));
        // All samples are NaN.
        assert!(!tree.cell_above_range_level(top, 1, -100.0, 0.0));
    }

    #[test]
    fn domain_predicates() {
        let (tree, top) = seeded(|_| [0.0; 2]);
        let child = tree.codec().children(top)[0];

        assert!(tree.cell_cross_domain_level(child, 0, 1.0, 0.0));
        assert!(!tree.cell_cross_domain_level(child, 0, 1.1, 0.05));
        assert!(tree.cell_cross_domain_level(child, 0, 1.1, 0.2));

        assert!(tree.cell_close_to_domain_point(&[0.5, 0.5], 0.0, child));
        assert!(!tree.cell_close_to_domain_point(&[1.5, 0.5], 0.25, child));
        assert!(tree.cell_close_to_domain_point(&[1.5, 0.5], 0.5, child));
    }

    #[test]
    fn sdf_crossing() {
        let (tree, top) = seeded(|_| [0.0; 2]);
        let child = tree.codec().children(top)[0];
        let circle = |p: [f64; 2]| (p[0] * p[0] + p[1] * p[1]).sqrt() - 0.5;

        assert!(tree.cell_cross_sdf(child, circle));
        assert!(!tree.cell_cross_sdf(child, |p: [f64; 2]| circle(p) + 10.0));
        assert!(!tree.cell_cross_sdf(child, |_: [f64; 2]| f64::NAN));
    }
}
