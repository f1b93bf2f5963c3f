//! Geometric predicates and distances over `[f64; 3]` points.
//!
//! Every tolerance is passed explicitly. A `CellComplex` passes its `ComplexConfig::EPSILON`.

use rect_tree_core::vec3::*;

/// Classification of how two segments intersect.
///
/// The `C*` prefix is the dimension of the intersection: `C0` nothing, `C1` a single point, `CI` infinitely many points. The
/// `VERTEX` suffix counts the endpoints the two segments share.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SegIntersection {
    /// Disjoint.
    C0_EMPTY,
    /// They touch only at the one shared endpoint.
    C1_VERTEX1,
    /// They cross at a single point interior to at least one of them, and share no endpoint.
    C1_INTERIOR,
    /// Both endpoints are shared, i.e. the segments are the same.
    CI_VERTEX2,
    /// They share one endpoint and overlap along a stretch.
    CI_VERTEX1,
    /// They overlap along a stretch and share no endpoint.
    CI_VERTEX0,
    /// One of the segments has zero length.
    BAD_SEGMENT,
}

/// Euclidean distance.
#[inline]
pub fn pnt_pnt_distance(a: &Vec3, b: &Vec3) -> f64 {
    two_norm(&diff(a, b))
}

/// Distance from `p` to the line through `l1` and `l2`, or to the segment `l1 l2` when `segment` is true.
///
/// If `l1` and `l2` coincide, the distance to `l1` is returned.
pub fn pnt_line_distance(l1: &Vec3, l2: &Vec3, p: &Vec3, segment: bool, eps: f64) -> f64 {
    let d = diff(l2, l1);
    let len2 = self_dot(&d);
    if len2 < eps * eps {
        return pnt_pnt_distance(l1, p);
    }
    let mut t = dot(&diff(p, l1), &d) / len2;
    if segment {
        t = t.clamp(0.0, 1.0);
    }
    let closest = linear_combination(1.0, l1, t, &d);

    pnt_pnt_distance(&closest, p)
}

/// `(p1 - p2) x (p3 - p2)`, optionally normalized. A degenerate triangle gives the zero vector.
pub fn tri_normal(p1: &Vec3, p2: &Vec3, p3: &Vec3, unit: bool, eps: f64) -> Vec3 {
    let n = cross(&diff(p1, p2), &diff(p3, p2));
    if unit {
        unitize(&n, eps).unwrap_or([0.0; 3])
    } else {
        n
    }
}

/// Distance from `p` to the plane through `p1`, `p2`, `p3`. Returns `None` if the three points don't span a plane.
pub fn pnt_pln_distance(p1: &Vec3, p2: &Vec3, p3: &Vec3, p: &Vec3, eps: f64) -> Option<f64> {
    let n = unitize(&cross(&diff(p1, p2), &diff(p3, p2)), eps)?;

    Some((dot(&n, p) - dot(&n, p2)).abs())
}

/// Distance from `p` to the solid triangle `p1 p2 p3`.
///
/// A degenerate triangle is treated as the union of its edges.
pub fn pnt_tri_distance(p1: &Vec3, p2: &Vec3, p3: &Vec3, p: &Vec3, eps: f64) -> f64 {
    let edge_distance = || {
        pnt_line_distance(p1, p2, p, true, eps)
            .min(pnt_line_distance(p2, p3, p, true, eps))
            .min(pnt_line_distance(p3, p1, p, true, eps))
    };

    let n = match unitize(&cross(&diff(p2, p1), &diff(p3, p1)), eps) {
        Some(n) => n,
        None => return edge_distance(),
    };
    let height = dot(&n, &diff(p, p1));
    let q = linear_combination(1.0, p, -height, &n);

    // Barycentric coordinates of the projection.
    let v0 = diff(p2, p1);
    let v1 = diff(p3, p1);
    let v2 = diff(&q, p1);
    let d00 = dot(&v0, &v0);
    let d01 = dot(&v0, &v1);
    let d11 = dot(&v1, &v1);
    let d20 = dot(&v2, &v0);
    let d21 = dot(&v2, &v1);
    let denom = d00 * d11 - d01 * d01;
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;

    if u >= 0.0 && v >= 0.0 && w >= 0.0 {
        height.abs()
    } else {
        edge_distance()
    }
}

/// True iff every coordinate of `p` is within `eps` of zero.
#[inline]
pub fn pnt_zero(p: &Vec3, eps: f64) -> bool {
    inf_norm(p) < eps
}

#[inline]
pub fn pts_colinear(p1: &Vec3, p2: &Vec3, p3: &Vec3, eps: f64) -> bool {
    pnt_zero(&cross(&diff(p1, p2), &diff(p1, p3)), eps)
}

#[inline]
pub fn pts_coplanar(p1: &Vec3, p2: &Vec3, p3: &Vec3, p4: &Vec3, eps: f64) -> bool {
    scalar_triple(&diff(p3, p1), &diff(p2, p1), &diff(p4, p1)).abs() < eps
}

/// True iff every point of `pts` lies on the plane of the first three. Lists shorter than 4 are trivially coplanar.
pub fn pts_coplanar_list(pts: &[Vec3], eps: f64) -> bool {
    if pts.len() < 4 {
        return true;
    }

    pts[3..]
        .iter()
        .all(|p| pts_coplanar(&pts[0], &pts[1], &pts[2], p, eps))
}

/// True iff the segments `a1 a2` and `b1 b2` meet at a point. Parallel segments never do.
pub fn seg_isect1(a1: &Vec3, a2: &Vec3, b1: &Vec3, b2: &Vec3, eps: f64) -> bool {
    let u = diff(a2, a1);
    let v = diff(b2, b1);
    let w = diff(a1, b1);
    let a = dot(&u, &u);
    let b = dot(&u, &v);
    let c = dot(&v, &v);
    let d = dot(&u, &w);
    let e = dot(&v, &w);
    let denom = a * c - b * b;
    if denom.abs() < eps * eps * a.max(c).max(1.0) {
        return false;
    }

    // Parameters of the closest points on the two lines.
    let s = (b * e - c * d) / denom;
    let t = (a * e - b * d) / denom;
    let s_tol = eps / a.sqrt();
    let t_tol = eps / c.sqrt();
    if s < -s_tol || s > 1.0 + s_tol || t < -t_tol || t > 1.0 + t_tol {
        return false;
    }
    let pa = linear_combination(1.0, a1, s.clamp(0.0, 1.0), &u);
    let pb = linear_combination(1.0, b1, t.clamp(0.0, 1.0), &v);

    pnt_pnt_distance(&pa, &pb) < eps
}

/// Classify the intersection of segments `a1 a2` and `b1 b2`, comparing endpoints by coordinates.
pub fn seg_isect_type(a1: &Vec3, a2: &Vec3, b1: &Vec3, b2: &Vec3, eps: f64) -> SegIntersection {
    let pts = [*a1, *a2, *b1, *b2];

    classify_seg_pair(&pts, |i, j| pnt_zero(&diff(&pts[i], &pts[j]), eps), eps)
}

/// Classify the segments `pts[0] pts[1]` and `pts[2] pts[3]`. `same(i, j)` decides whether endpoints `i` and `j` are the
/// same vertex.
pub(crate) fn classify_seg_pair<S>(pts: &[Vec3; 4], same: S, eps: f64) -> SegIntersection
where
    S: Fn(usize, usize) -> bool,
{
    if same(0, 1) || same(2, 3) {
        return SegIntersection::BAD_SEGMENT;
    }

    let mut shared = Vec::new();
    for i in 0..2 {
        for j in 2..4 {
            if same(i, j) {
                shared.push((i, j));
            }
        }
    }

    match shared.len() {
        0 => {
            let [a1, a2, b1, b2] = pts;
            if pts_colinear(a1, a2, b1, eps) && pts_colinear(a1, a2, b2, eps) {
                let overlap = pnt_line_distance(b1, b2, a1, true, eps) < eps
                    || pnt_line_distance(b1, b2, a2, true, eps) < eps
                    || pnt_line_distance(a1, a2, b1, true, eps) < eps
                    || pnt_line_distance(a1, a2, b2, true, eps) < eps;
                if overlap {
                    SegIntersection::CI_VERTEX0
                } else {
                    SegIntersection::C0_EMPTY
                }
            } else if seg_isect1(a1, a2, b1, b2, eps) {
                SegIntersection::C1_INTERIOR
            } else {
                SegIntersection::C0_EMPTY
            }
        }
        1 => {
            let (i, j) = shared[0];
            let c = &pts[i];
            let p1 = &pts[1 - i];
            let p2 = &pts[5 - j];
            let folded = pts_colinear(p1, p2, c, eps)
                && (pnt_line_distance(p1, c, p2, true, eps) < eps
                    || pnt_line_distance(p2, c, p1, true, eps) < eps);
            if folded {
                SegIntersection::CI_VERTEX1
            } else {
                SegIntersection::C1_VERTEX1
            }
        }
        _ => SegIntersection::CI_VERTEX2,
    }
}

/// True iff the segment `s1 s2` meets the solid triangle `t1 t2 t3`.
pub fn seg_tri_intersection(s1: &Vec3, s2: &Vec3, t1: &Vec3, t2: &Vec3, t3: &Vec3, eps: f64) -> bool {
    let dir = diff(s2, s1);
    let e1 = diff(t2, t1);
    let e2 = diff(t3, t1);
    let h = cross(&dir, &e2);
    let a = dot(&e1, &h);
    if a.abs() < eps * eps {
        // Parallel. Only an edge crossing inside the triangle's plane remains.
        return pnt_tri_distance(t1, t2, t3, s1, eps) < eps
            || pnt_tri_distance(t1, t2, t3, s2, eps) < eps
            || seg_isect1(s1, s2, t1, t2, eps)
            || seg_isect1(s1, s2, t2, t3, eps)
            || seg_isect1(s1, s2, t3, t1, eps);
    }
    let f = 1.0 / a;
    let s = diff(s1, t1);
    let u = f * dot(&s, &h);
    let q = cross(&s, &e1);
    let v = f * dot(&dir, &q);
    let t = f * dot(&e2, &q);
    let tol = eps / two_norm(&dir).max(eps);

    u >= -tol && v >= -tol && u + v <= 1.0 + tol && t >= -tol && t <= 1.0 + tol
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
