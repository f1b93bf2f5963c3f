//! Mapping between tree coordinates and the real-valued domain.
//!
//! A domain point ("drpt") is a `[f64; D]`, and a range point ("rrpt") is a `[f64; R]`. A `DomainBox` maps the fixed-point
//! axis range `[0, 2^b]` linearly onto `[min, max]` for every axis.

/// An axis-aligned box in the domain of a sampled function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainBox<const D: usize> {
    min: [f64; D],
    max: [f64; D],
}

impl<const D: usize> DomainBox<D> {
    pub fn new(min: [f64; D], max: [f64; D]) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn min(&self) -> [f64; D] {
        self.min
    }

    #[inline]
    pub fn max(&self) -> [f64; D] {
        self.max
    }

    /// The first axis on which the box has no positive extent, or has a non-finite bound.
    pub fn first_degenerate_axis(&self) -> Option<usize> {
        (0..D).find(|&i| {
            !self.min[i].is_finite() || !self.max[i].is_finite() || self.min[i] >= self.max[i]
        })
    }

    /// The size of one fixed-point unit on every axis, for a tree with `bits` bits per axis.
    pub fn delta(&self, bits: u32) -> [f64; D] {
        let steps = (1u64 << bits) as f64;
        let mut delta = [0.0; D];
        for (i, d) in delta.iter_mut().enumerate() {
            *d = (self.max[i] - self.min[i]) / steps;
        }

        delta
    }

    /// Map fixed-point coordinates onto the domain.
    pub fn crd_to_drpt(&self, crd: [u32; D], bits: u32) -> [f64; D] {
        let delta = self.delta(bits);
        let mut drpt = [0.0; D];
        for (i, p) in drpt.iter_mut().enumerate() {
            *p = self.min[i] + crd[i] as f64 * delta[i];
        }

        drpt
    }

    pub fn contains(&self, p: &[f64; D], eps: f64) -> bool {
        (0..D).all(|i| p[i] >= self.min[i] - eps && p[i] <= self.max[i] + eps)
    }
}

#[inline]
pub fn drpt_midpoint<const D: usize>(a: &[f64; D], b: &[f64; D]) -> [f64; D] {
    let mut mid = [0.0; D];
    for (i, m) in mid.iter_mut().enumerate() {
        *m = (a[i] + b[i]) / 2.0;
    }

    mid
}

/// The infinity norm of `a - b`.
#[inline]
pub fn drpt_distance_inf<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

#[inline]
pub fn rrpt_is_nan<const R: usize>(p: &[f64; R]) -> bool {
    p.iter().any(|v| v.is_nan())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_point_maps_onto_domain() {
        let b = DomainBox::new([-1.0; 3], [1.0; 3]);

        assert_eq!(b.delta(15), [1.0 / 16384.0; 3]);
        assert_eq!(b.crd_to_drpt([0; 3], 15), [-1.0; 3]);
        assert_eq!(b.crd_to_drpt([0x2000; 3], 15), [-0.5; 3]);
        assert_eq!(b.crd_to_drpt([0x4000; 3], 15), [0.0; 3]);
        assert_eq!(b.crd_to_drpt([0x8000; 3], 15), [1.0; 3]);
        assert_eq!(
            b.crd_to_drpt([0x2000, 0x4000, 0x8000], 15),
            [-0.5, 0.0, 1.0]
        );
    }

    #[test]
    fn degenerate_boxes() {
        assert_eq!(DomainBox::new([0.0, 0.0], [1.0, 1.0]).first_degenerate_axis(), None);
        assert_eq!(DomainBox::new([0.0, 1.0], [1.0, 1.0]).first_degenerate_axis(), Some(1));
        assert_eq!(
            DomainBox::new([f64::NAN, 0.0], [1.0, 1.0]).first_degenerate_axis(),
            Some(0)
        );
    }

    #[test]
    fn point_helpers() {
        assert_eq!(drpt_midpoint(&[0.0, 2.0], &[1.0, 4.0]), [0.5, 3.0]);
        assert_eq!(drpt_distance_inf(&[0.0, 2.0], &[1.0, 5.0]), 3.0);
        assert!(rrpt_is_nan(&[1.0, f64::NAN]));
        assert!(!rrpt_is_nan(&[1.0, 2.0]));
    }
}
