//! Functions that can be sampled by a `RectTree`.
//!
//! Any closure `Fn([f64; D]) -> [f64; R]` is a `SampleFn`. Scalar functions can be wrapped in `ScalarFn` so they don't need to
//! build a one-element array themselves.
//!
//! ```
//! use rect_tree_storage::prelude::*;
//!
//! let mut tree = RectTree::<2, 1>::new([-1.0; 2], [1.0; 2]).unwrap();
//! tree.refine_grid(2, &ScalarFn(|p: [f64; 2]| p[0] * p[0] + p[1] * p[1] - 0.25));
//! assert_eq!(tree.num_leaves(), 16);
//! ```
//!
//! A sampled function must be pure: samples are memoized, so only the first evaluation at any point is ever seen. Returning
//! NaN in any component marks the function as undefined at that point.

/// A function from domain points to range points.
pub trait SampleFn<const D: usize, const R: usize> {
    fn sample(&self, p: [f64; D]) -> [f64; R];
}

impl<F, const D: usize, const R: usize> SampleFn<D, R> for F
where
    F: Fn([f64; D]) -> [f64; R],
{
    #[inline]
    fn sample(&self, p: [f64; D]) -> [f64; R] {
        (self)(p)
    }
}

/// Adapts a scalar function into a `SampleFn` with a one-dimensional range.
pub struct ScalarFn<F>(pub F);

impl<F, const D: usize> SampleFn<D, 1> for ScalarFn<F>
where
    F: Fn([f64; D]) -> f64,
{
    #[inline]
    fn sample(&self, p: [f64; D]) -> [f64; 1] {
        [(self.0)(p)]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn eval<F: SampleFn<2, 1>>(f: &F, p: [f64; 2]) -> f64 {
        f.sample(p)[0]
    }

    #[test]
    fn closures_and_scalar_wrappers_sample_alike() {
        let plain = |p: [f64; 2]| [p[0] - p[1]];
        let wrapped = ScalarFn(|p: [f64; 2]| p[0] - p[1]);

        assert_eq!(eval(&plain, [3.0, 1.0]), 2.0);
        assert_eq!(eval(&wrapped, [3.0, 1.0]), 2.0);
    }
}
