//! Functions and SDFs for sampling in tests and benches.

use rect_tree_core::vec3::{cross, two_norm, Vec3};

/// `|p|^2 - r^2`, negative inside the sphere of radius `r`.
pub fn sphere_level_set<const D: usize>(p: [f64; D], r: f64) -> f64 {
    p.iter().map(|x| x * x).sum::<f64>() - r * r
}

/// Signed distance to the sphere of radius `r` at the origin.
pub fn sphere_sdf<const D: usize>(p: [f64; D], r: f64) -> f64 {
    p.iter().map(|x| x * x).sum::<f64>().sqrt() - r
}

/// The paraboloid `z = x^2 + y^2`, as a range point `[x, y, z]` with its unit normal in the last three components.
pub fn paraboloid_with_normal(p: [f64; 2]) -> [f64; 6] {
    let z = p[0] * p[0] + p[1] * p[1];
    let du: Vec3 = [1.0, 0.0, 2.0 * p[0]];
    let dv: Vec3 = [0.0, 1.0, 2.0 * p[1]];
    let n = cross(&du, &dv);
    let len = two_norm(&n);

    [p[0], p[1], z, n[0] / len, n[1] / len, n[2] / len]
}

/// The upper hemisphere of radius `r`, which is NaN outside the disk of radius `r`.
pub fn hemisphere(p: [f64; 2], r: f64) -> f64 {
    let h = r * r - p[0] * p[0] - p[1] * p[1];
    if h < 0.0 {
        f64::NAN
    } else {
        h.sqrt()
    }
}

/// `x - cut`, but NaN for `x > cut`.
pub fn clipped_ramp(x: f64, cut: f64) -> f64 {
    if x > cut {
        f64::NAN
    } else {
        x - cut
    }
}

/// A sphere of radius 0.6 with a small ripple on its surface.
pub fn wavy_sphere_level_set(p: [f64; 3]) -> f64 {
    sphere_level_set(p, 0.6) + 0.05 * (8.0 * p[0]).sin() * (8.0 * p[1]).sin() * (8.0 * p[2]).sin()
}
