//! Arithmetic on `[f64; 3]`, the point type of a cell complex.

pub type Vec3 = [f64; 3];

#[inline]
pub fn self_dot(v: &Vec3) -> f64 {
    dot(v, v)
}

#[inline]
pub fn two_norm(v: &Vec3) -> f64 {
    self_dot(v).sqrt()
}

#[inline]
pub fn inf_norm(v: &Vec3) -> f64 {
    v.iter().map(|c| c.abs()).fold(0.0, f64::max)
}

#[inline]
pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// `a - b`
#[inline]
pub fn diff(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// `a . (b x c)`
#[inline]
pub fn scalar_triple(a: &Vec3, b: &Vec3, c: &Vec3) -> f64 {
    dot(a, &cross(b, c))
}

/// `s1 * a + s2 * b`
#[inline]
pub fn linear_combination(s1: f64, a: &Vec3, s2: f64, b: &Vec3) -> Vec3 {
    [
        s1 * a[0] + s2 * b[0],
        s1 * a[1] + s2 * b[1],
        s1 * a[2] + s2 * b[2],
    ]
}

/// The unit vector in the direction of `v`, or `None` if `v` is shorter than `eps`.
#[inline]
pub fn unitize(v: &Vec3, eps: f64) -> Option<Vec3> {
    let len = two_norm(v);
    if len > eps {
        Some([v[0] / len, v[1] / len, v[2] / len])
    } else {
        None
    }
}

/// Determinant of the 3x3 matrix with rows `a`, `b`, `c`.
#[inline]
pub fn det3(a: &Vec3, b: &Vec3, c: &Vec3) -> f64 {
    a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
        + a[2] * (b[0] * c[1] - b[1] * c[0])
}
