use rect_tree_core::vec3::Vec3;
use rect_tree_storage::SmallKeyHashMap;

/// A uniform spatial hash over 3D points, used to find a stored point within `eps` of a query in every coordinate.
///
/// Buckets are cubes of width `eps`, so any match lies in one of the 27 buckets around the query's bucket. Bucket keys
/// saturate, so huge and infinite coordinates share the outermost buckets, and equal coordinates always match even when
/// they are infinite.
#[derive(Clone, Debug)]
pub struct PointIndex {
    eps: f64,
    buckets: SmallKeyHashMap<[i64; 3], Vec<usize>>,
}

impl PointIndex {
    pub fn new(eps: f64) -> Self {
        assert!(eps > 0.0, "point index epsilon must be positive");

        Self {
            eps,
            buckets: SmallKeyHashMap::default(),
        }
    }

    #[inline]
    pub fn eps(&self) -> f64 {
        self.eps
    }

    // Float to int `as` casts saturate, and send NaN to 0.
    fn bucket_key(&self, p: &Vec3) -> [i64; 3] {
        [
            (p[0] / self.eps).floor() as i64,
            (p[1] / self.eps).floor() as i64,
            (p[2] / self.eps).floor() as i64,
        ]
    }

    /// Record that `points[index] == p`.
    pub fn insert(&mut self, p: &Vec3, index: usize) {
        let key = self.bucket_key(p);
        self.buckets.entry(key).or_insert_with(Vec::new).push(index);
    }

    /// The smallest index of a point in `points` that is within `eps` of `p` on every axis.
    pub fn find(&self, points: &[Vec3], p: &Vec3) -> Option<usize> {
        let [kx, ky, kz] = self.bucket_key(p);
        let mut best = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = match (kx.checked_add(dx), ky.checked_add(dy), kz.checked_add(dz)) {
                        (Some(x), Some(y), Some(z)) => [x, y, z],
                        _ => continue,
                    };
                    let bucket = match self.buckets.get(&key) {
                        Some(b) => b,
                        None => continue,
                    };
                    for &i in bucket.iter() {
                        if self.close(&points[i], p) && best.map_or(true, |b| i < b) {
                            best = Some(i);
                        }
                    }
                }
            }
        }

        best
    }

    /// Within `eps` on every axis. `inf - inf` is NaN, so equal coordinates are accepted first.
    fn close(&self, a: &Vec3, b: &Vec3) -> bool {
        (0..3).all(|k| a[k] == b[k] || (a[k] - b[k]).abs() < self.eps)
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use rand::prelude::*;

    #[test]
    fn finds_near_points_only() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.5e-5, 0.0, 0.0]];
        let mut index = PointIndex::new(1e-5);
        for (i, p) in points.iter().enumerate() {
            index.insert(p, i);
        }

        assert_eq!(index.find(&points, &[0.9e-5, 0.0, 0.0]), Some(0));
        assert_eq!(index.find(&points, &[1.4e-5, 0.0, 0.0]), Some(2));
        assert_eq!(index.find(&points, &[1.0, 1.0, 1.0 - 0.5e-5]), Some(1));
        assert_eq!(index.find(&points, &[0.5, 0.5, 0.5]), None);
        assert_eq!(index.find(&points, &[-0.9e-5, -0.9e-5, 0.9e-5]), Some(0));
    }

    #[test]
    fn huge_and_infinite_coordinates() {
        let inf = f64::INFINITY;
        let points = vec![
            [1.0e15, 0.0, 0.0],
            [-1.0e300, 0.0, 0.0],
            [inf, 0.0, 0.0],
            [-inf, 0.0, 0.0],
            [inf, inf, -inf],
            [f64::MAX, f64::MIN, 0.0],
        ];
        let mut index = PointIndex::new(1e-5);
        for (i, p) in points.iter().enumerate() {
            index.insert(p, i);
        }

        for (i, p) in points.iter().enumerate() {
            assert_eq!(index.find(&points, p), Some(i));
        }
        assert_eq!(index.find(&points, &[inf, 0.5e-5, 0.0]), Some(2));
        assert_eq!(index.find(&points, &[1.0e16, 0.0, 0.0]), None);
        assert_eq!(index.find(&points, &[f64::MAX, 0.0, 0.0]), None);
        assert_eq!(index.find(&points, &[-inf, inf, -inf]), None);
    }

    #[test]
    fn straddles_negative_bucket_edges() {
        let points = vec![[-0.999, -4.7e18, 0.0]];
        let mut index = PointIndex::new(0.5);
        index.insert(&points[0], 0);

        // -0.999 lies in bucket -2 and -1.001 in bucket -3. The second coordinate saturates to `i64::MIN`.
        assert_eq!(index.find(&points, &[-1.001, -4.7e18, 0.0]), Some(0));
        assert_eq!(index.find(&points, &[-1.6, -4.7e18, 0.0]), None);
    }

    #[test]
    fn extreme_values_agree_with_linear_scan() {
        let eps = 1e-5;
        let values = [
            0.0,
            -0.5e-5,
            1.0e15,
            -1.0e300,
            f64::MAX,
            f64::MIN,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        let mut rng = StdRng::seed_from_u64(11);
        let mut pick = || [0, 1, 2].map(|_| values[rng.gen_range(0..values.len())]);
        let points: Vec<Vec3> = (0..200).map(|_| pick()).collect();
        let mut index = PointIndex::new(eps);
        for (i, p) in points.iter().enumerate() {
            index.insert(p, i);
        }

        for _ in 0..200 {
            let q = pick();
            let expected = points
                .iter()
                .position(|p| (0..3).all(|k| p[k] == q[k] || (p[k] - q[k]).abs() < eps));
            assert_eq!(index.find(&points, &q), expected);
        }
    }

    #[test]
    fn agrees_with_linear_scan() {
        let eps = 1e-2;
        let mut rng = StdRng::seed_from_u64(7);
        let points: Vec<Vec3> = (0..500)
            .map(|_| [rng.gen_range(-0.1..0.1), rng.gen_range(-0.1..0.1), 0.0])
            .collect();
        let mut index = PointIndex::new(eps);
        for (i, p) in points.iter().enumerate() {
            index.insert(p, i);
        }

        for _ in 0..500 {
            let q = [rng.gen_range(-0.1..0.1), rng.gen_range(-0.1..0.1), 0.0];
            let expected = points
                .iter()
                .position(|p| (0..3).all(|k| (p[k] - q[k]).abs() < eps));
            assert_eq!(index.find(&points, &q), expected);
        }
    }
}
