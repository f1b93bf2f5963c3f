//! Composite tree coordinates.
//!
//! A [`Diti`] packs `D` fixed-point axis coordinates into a single integer by interleaving their bits (Morton or "Z" order).
//! Axis 0 owns the least significant bit of every interleaved group, so a 3D diti reads `... z1 y1 x1 z0 y0 x0` from the most
//! significant end.
//!
//! Every axis coordinate lives in the closed range `[0, 2^b]`, where `b` is the bit width of the [`DitiCodec`]. The upper
//! value `2^b` is needed by the max corner of the top cell, so each axis really uses `b + 1` bits.
//!
//! # Cells
//!
//! A diti whose axis coordinates all have exactly `t < b` trailing zeros names the center of a cell with half width `2^t`.
//! That cell lives at level `b - 1 - t`, so the top cell (all coordinates `2^(b-1)`) is level 0 and the deepest cells have a
//! half width of 1. Nothing about a cell is stored besides its center; corners, parents and children are all computed.
//!
//! # Stepping
//!
//! Moving along one axis does not decode the diti. Instead the step is "dilated" into the bit positions owned by that axis
//! and added using the usual dilated-integer trick:
//!
//! ```text
//! sum  = ((d | !mask) + step) & mask
//! diff = ((d & mask) - step) & mask
//! ```
//!
//! The other axes are carried over untouched. Stepping outside of `[0, 2^b]` is a caller bug and panics.

use crate::{CodecError, Direction};

use morton_encoding::{morton_decode, morton_encode};
use std::fmt;

/// Largest supported domain dimension.
pub const MAX_DIMENSION: usize = 3;

/// Largest supported number of bits per axis. Coordinates go up to `2^b`, which must fit in a `u32`.
pub const MAX_BITS: u32 = 31;

/// The bit width used by `TreeConfig::default()`.
pub const DEFAULT_BITS: u32 = 15;

/// A bit-interleaved composite tree coordinate.
///
/// <https://en.wikipedia.org/wiki/Z-order_curve>
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Diti(pub u128);

impl fmt::Debug for Diti {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:#x} = {:b}", self.0, self.0)
    }
}

impl fmt::Display for Diti {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:#x}", self.0)
    }
}

/// Interleave raw axis coordinates. No range checking is done here; see `DitiCodec::encode`.
#[inline]
pub fn interleave<const D: usize>(crd: [u32; D]) -> Diti {
    assert!(D >= 1 && D <= MAX_DIMENSION, "unsupported dimension {}", D);

    let mut c = [0u32; MAX_DIMENSION];
    c[..D].copy_from_slice(&crd);

    match D {
        1 => Diti(c[0] as u128),
        2 => {
            let key: u64 = morton_encode([c[1], c[0]]);
            Diti(key as u128)
        }
        _ => Diti(morton_encode([c[2], c[1], c[0]])),
    }
}

/// The inverse of `interleave`.
#[inline]
pub fn deinterleave<const D: usize>(d: Diti) -> [u32; D] {
    assert!(D >= 1 && D <= MAX_DIMENSION, "unsupported dimension {}", D);

    let mut c = [0u32; MAX_DIMENSION];
    match D {
        1 => c[0] = d.0 as u32,
        2 => {
            let yx: [u32; 2] = morton_decode(d.0 as u64);
            c[0] = yx[1];
            c[1] = yx[0];
        }
        _ => {
            let zyx: [u32; 3] = morton_decode(d.0);
            c[0] = zyx[2];
            c[1] = zyx[1];
            c[2] = zyx[0];
        }
    }

    let mut out = [0u32; D];
    out.copy_from_slice(&c[..D]);

    out
}

/// Encodes, decodes and steps [`Diti`]s for a fixed dimension `D` and bit width `b`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DitiCodec<const D: usize> {
    bits: u32,
    // Bits owned by each axis.
    axis_masks: [u128; D],
    // `2^b` dilated onto each axis.
    axis_limits: [u128; D],
}

impl<const D: usize> DitiCodec<D> {
    pub fn new(bits: u32) -> Result<Self, CodecError> {
        if D == 0 || D > MAX_DIMENSION {
            return Err(CodecError::UnsupportedDimension(D));
        }
        if bits == 0 || bits > MAX_BITS {
            return Err(CodecError::BitWidth {
                bits,
                max: MAX_BITS,
            });
        }

        let mut axis_masks = [0; D];
        let mut axis_limits = [0; D];
        for (axis, (mask, limit)) in axis_masks.iter_mut().zip(axis_limits.iter_mut()).enumerate() {
            *mask = dilate::<D>(axis, u32::MAX);
            *limit = dilate::<D>(axis, 1 << bits);
        }

        Ok(Self {
            bits,
            axis_masks,
            axis_limits,
        })
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// The largest coordinate value on any axis, `2^b`.
    #[inline]
    pub fn max_crd(&self) -> u32 {
        1 << self.bits
    }

    #[inline]
    pub fn encode(&self, crd: [u32; D]) -> Diti {
        for (axis, &c) in crd.iter().enumerate() {
            assert!(
                c <= self.max_crd(),
                "coordinate {:#x} on axis {} exceeds {:#x}",
                c,
                axis,
                self.max_crd()
            );
        }

        interleave(crd)
    }

    #[inline]
    pub fn decode(&self, d: Diti) -> [u32; D] {
        deinterleave(d)
    }

    #[inline]
    pub fn get_crd(&self, d: Diti, axis: usize) -> u32 {
        self.decode(d)[axis]
    }

    /// A diti with every axis coordinate equal to `value`.
    #[inline]
    pub fn set_all_crd(&self, value: u32) -> Diti {
        self.encode([value; D])
    }

    /// Add `step` to the coordinate on `axis`.
    ///
    /// # Panics
    ///
    /// If the result would be larger than `2^b`.
    #[inline]
    pub fn inc_crd(&self, d: Diti, axis: usize, step: u32) -> Diti {
        let mask = self.axis_masks[axis];
        let current = d.0 & mask;
        let moved = (d.0 | !mask).wrapping_add(dilate::<D>(axis, step)) & mask;
        assert!(
            moved >= current && moved <= self.axis_limits[axis],
            "stepping {:?} by +{:#x} on axis {} leaves the tree",
            d,
            step,
            axis
        );

        Diti(moved | (d.0 & !mask))
    }

    /// Subtract `step` from the coordinate on `axis`.
    ///
    /// # Panics
    ///
    /// If the result would be negative.
    #[inline]
    pub fn dec_crd(&self, d: Diti, axis: usize, step: u32) -> Diti {
        let mask = self.axis_masks[axis];
        let current = d.0 & mask;
        let dilated_step = dilate::<D>(axis, step);
        assert!(
            dilated_step <= current,
            "stepping {:?} by -{:#x} on axis {} leaves the tree",
            d,
            step,
            axis
        );

        Diti(((current - dilated_step) & mask) | (d.0 & !mask))
    }

    /// Step the coordinate on `axis` in direction `dir`.
    #[inline]
    pub fn step_crd(&self, d: Diti, axis: usize, dir: Direction, step: u32) -> Diti {
        match dir {
            Direction::Negative => self.dec_crd(d, axis, step),
            Direction::Positive => self.inc_crd(d, axis, step),
        }
    }

    /// True iff stepping `d` along `axis` by `step` in direction `dir` stays inside `[0, 2^b]`.
    #[inline]
    pub fn can_step_crd(&self, d: Diti, axis: usize, dir: Direction, step: u32) -> bool {
        let c = self.get_crd(d, axis) as u64;
        match dir {
            Direction::Negative => c >= step as u64,
            Direction::Positive => c + step as u64 <= self.max_crd() as u64,
        }
    }

    #[inline]
    pub fn inc_all_crd(&self, d: Diti, step: u32) -> Diti {
        (0..D).fold(d, |d, axis| self.inc_crd(d, axis, step))
    }

    #[inline]
    pub fn dec_all_crd(&self, d: Diti, step: u32) -> Diti {
        (0..D).fold(d, |d, axis| self.dec_crd(d, axis, step))
    }

    // ███████╗███████╗██╗     ██╗     ███████╗
    // ██╔════╝██╔════╝██║     ██║     ██╔════╝
    // ██║     █████╗  ██║     ██║     ███████╗
    // ██║     ██╔══╝  ██║     ██║     ╚════██║
    // ╚██████╗███████╗███████╗███████╗███████║
    //  ╚═════╝╚══════╝╚══════╝╚══════╝╚══════╝

    /// The center of the single level 0 cell.
    #[inline]
    pub fn top_cell(&self) -> Diti {
        self.set_all_crd(1 << (self.bits - 1))
    }

    /// The deepest level a cell can have. Cells at this level have a half width of 1 and can't be split.
    #[inline]
    pub fn max_level(&self) -> u32 {
        self.bits - 1
    }

    // For a cell center, every axis has the same number of trailing zeros `t`, and the interleaved value then has exactly
    // `t * D` of them. For other grid points this gives the smallest per-axis count.
    #[inline]
    fn width_exponent(&self, center: Diti) -> u32 {
        let t = center.0.trailing_zeros() / D as u32;
        assert!(t < self.bits, "{:?} is not a cell center", center);

        t
    }

    #[inline]
    pub fn level(&self, center: Diti) -> u32 {
        self.bits - 1 - self.width_exponent(center)
    }

    /// Half the width of the cell at `center`; zero for the deepest cells.
    #[inline]
    pub fn quarter_width(&self, center: Diti) -> u32 {
        self.half_width(center) >> 1
    }

    #[inline]
    pub fn half_width(&self, center: Diti) -> u32 {
        1 << self.width_exponent(center)
    }

    #[inline]
    pub fn full_width(&self, center: Diti) -> u32 {
        self.half_width(center) << 1
    }

    #[inline]
    pub fn corner_min(&self, center: Diti) -> Diti {
        self.dec_all_crd(center, self.half_width(center))
    }

    #[inline]
    pub fn corner_max(&self, center: Diti) -> Diti {
        self.inc_all_crd(center, self.half_width(center))
    }

    /// All `2^D` corners of the cell at `center`. Bit `k` of a corner's index selects the max side of axis `k`, so for a
    /// 2D cell the order is `(min, min), (max, min), (min, max), (max, max)`.
    pub fn corners(&self, center: Diti) -> Vec<Diti> {
        let h = self.half_width(center);

        self.offsets(center, h)
    }

    /// The `2^(D-1)` corners on the face of `center` pointing along `axis` in direction `dir`. They are ordered by the
    /// remaining axes, using the same bit convention as `corners`.
    pub fn face_corners(&self, center: Diti, axis: usize, dir: Direction) -> Vec<Diti> {
        self.corners(center)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| ((i >> axis) & 1 == 1) == (dir == Direction::Positive))
            .map(|(_, c)| c)
            .collect()
    }

    /// The `2^D` children of the cell at `center`, in the same order as `corners`.
    ///
    /// # Panics
    ///
    /// If the cell is already at `max_level`.
    pub fn children(&self, center: Diti) -> Vec<Diti> {
        let q = self.quarter_width(center);
        assert!(q > 0, "{:?} is at the deepest level", center);

        self.offsets(center, q)
    }

    /// The cell containing the cell at `center`, or `None` for the top cell.
    pub fn parent(&self, center: Diti) -> Option<Diti> {
        if self.level(center) == 0 {
            return None;
        }

        let h = self.half_width(center);
        let low_bits = self.set_all_crd(4 * h - 1);
        let parent_offset = self.set_all_crd(2 * h);

        Some(Diti((center.0 & !low_bits.0) | parent_offset.0))
    }

    /// The same-level cell adjacent to `center` along `axis` in `dir`, if it is inside the tree.
    pub fn sibling(&self, center: Diti, axis: usize, dir: Direction) -> Option<Diti> {
        let w = self.full_width(center);
        if self.can_step_crd(center, axis, dir, w) {
            Some(self.step_crd(center, axis, dir, w))
        } else {
            None
        }
    }

    /// True iff the cell at `inner` is the cell at `outer` or one of its descendants.
    pub fn cell_contains(&self, outer: Diti, inner: Diti) -> bool {
        if self.level(inner) < self.level(outer) {
            return false;
        }

        let h = self.half_width(outer) as i64;
        let o = self.decode(outer);
        let i = self.decode(inner);

        o.iter()
            .zip(i.iter())
            .all(|(&o, &i)| (i as i64 - o as i64).abs() < h)
    }

    fn offsets(&self, center: Diti, step: u32) -> Vec<Diti> {
        (0..1usize << D)
            .map(|i| {
                (0..D).fold(center, |d, axis| {
                    if (i >> axis) & 1 == 1 {
                        self.inc_crd(d, axis, step)
                    } else {
                        self.dec_crd(d, axis, step)
                    }
                })
            })
            .collect()
    }
}

#[inline]
fn dilate<const D: usize>(axis: usize, value: u32) -> u128 {
    let mut crd = [0u32; D];
    crd[axis] = value;

    interleave(crd).0
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
    use rand::Rng;

    fn codec3() -> DitiCodec<3> {
        DitiCodec::new(15).unwrap()
    }

    // The 15 bit, 3D values below are written with the axes packed side by side (0xZZZZYYYYXXXX), the way they are easiest
    // to read. This helper moves them into interleaved form.
    fn packed(v: u64) -> Diti {
        interleave([
            (v & 0xFFFF) as u32,
            ((v >> 16) & 0xFFFF) as u32,
            ((v >> 32) & 0xFFFF) as u32,
        ])
    }

    #[test]
    fn axis_zero_is_least_significant() {
        assert_eq!(interleave([1u32, 0, 0]), Diti(0b001));
        assert_eq!(interleave([0u32, 1, 0]), Diti(0b010));
        assert_eq!(interleave([0u32, 0, 1]), Diti(0b100));
        assert_eq!(interleave([1u32, 0]), Diti(0b01));
        assert_eq!(interleave([0u32, 1]), Diti(0b10));
        assert_eq!(interleave([7u32]), Diti(7));
    }

    #[test]
    fn decode_inverts_encode_for_random_points() {
        let mut rng = rand::thread_rng();
        let c1 = DitiCodec::<1>::new(31).unwrap();
        let c2 = DitiCodec::<2>::new(31).unwrap();
        let c3 = DitiCodec::<3>::new(31).unwrap();
        for _ in 0..1000 {
            let max = 1u32 << 31;
            let p1 = [rng.gen_range(0..=max)];
            let p2 = [rng.gen_range(0..=max), rng.gen_range(0..=max)];
            let p3 = [
                rng.gen_range(0..=max),
                rng.gen_range(0..=max),
                rng.gen_range(0..=max),
            ];
            assert_eq!(c1.decode(c1.encode(p1)), p1);
            assert_eq!(c2.decode(c2.encode(p2)), p2);
            assert_eq!(c3.decode(c3.encode(p3)), p3);

            let d = c3.encode(p3);
            assert_eq!(c3.encode(c3.decode(d)), d);
        }
    }

    #[test]
    fn bad_configurations_are_rejected() {
        assert!(matches!(
            DitiCodec::<4>::new(15),
            Err(CodecError::UnsupportedDimension(4))
        ));
        assert!(matches!(
            DitiCodec::<2>::new(0),
            Err(CodecError::BitWidth { bits: 0, .. })
        ));
        assert!(matches!(
            DitiCodec::<2>::new(32),
            Err(CodecError::BitWidth { bits: 32, .. })
        ));
    }

    #[test]
    fn top_cell_geometry_15_bits() {
        let c = codec3();
        let top = c.top_cell();

        assert_eq!(top, packed(0x4000_4000_4000));
        assert_eq!(c.level(top), 0);
        assert_eq!(c.quarter_width(top), 0x2000);
        assert_eq!(c.half_width(top), 0x4000);
        assert_eq!(c.full_width(top), 0x8000);
        assert_eq!(c.corner_min(top), packed(0x0000_0000_0000));
        assert_eq!(c.corner_max(top), packed(0x8000_8000_8000));
        assert_eq!(c.parent(top), None);
    }

    #[test]
    fn single_axis_stepping() {
        // One extra bit so that every packed coordinate below is in range.
        let c = DitiCodec::<3>::new(16).unwrap();
        let d = packed(0xCCC1_BBB1_AAA1);

        assert_eq!(c.get_crd(d, 0), 0xAAA1);
        assert_eq!(c.get_crd(d, 1), 0xBBB1);
        assert_eq!(c.get_crd(d, 2), 0xCCC1);

        assert_eq!(c.inc_crd(d, 0, 1), packed(0xCCC1_BBB1_AAA2));
        assert_eq!(c.dec_crd(d, 0, 1), packed(0xCCC1_BBB1_AAA0));
        assert_eq!(c.inc_crd(d, 1, 1), packed(0xCCC1_BBB2_AAA1));
        assert_eq!(c.dec_crd(d, 1, 1), packed(0xCCC1_BBB0_AAA1));
        assert_eq!(c.inc_crd(d, 2, 1), packed(0xCCC2_BBB1_AAA1));
        assert_eq!(c.dec_crd(d, 2, 1), packed(0xCCC0_BBB1_AAA1));
        assert_eq!(c.dec_all_crd(d, 1), packed(0xCCC0_BBB0_AAA0));
        assert_eq!(c.inc_all_crd(d, 1), packed(0xCCC2_BBB2_AAA2));
        assert_eq!(c.set_all_crd(0xAAA1), packed(0xAAA1_AAA1_AAA1));
    }

    #[test]
    fn stepping_carries_across_interleaved_bits() {
        let c = DitiCodec::<2>::new(15).unwrap();
        let d = c.encode([0x0FFF, 0x1234]);

        assert_eq!(c.decode(c.inc_crd(d, 0, 1)), [0x1000, 0x1234]);
        assert_eq!(c.decode(c.dec_crd(c.inc_crd(d, 0, 0x123), 0, 0x123)), [0x0FFF, 0x1234]);
        assert_eq!(c.decode(c.inc_crd(d, 1, 0x6DCC)), [0x0FFF, 0x8000]);
    }

    #[test]
    #[should_panic]
    fn stepping_past_max_panics() {
        let c = codec3();
        c.inc_crd(c.corner_max(c.top_cell()), 1, 1);
    }

    #[test]
    #[should_panic]
    fn stepping_below_zero_panics() {
        let c = codec3();
        c.dec_crd(c.corner_min(c.top_cell()), 2, 1);
    }

    #[test]
    fn parents_and_children_agree() {
        let c = DitiCodec::<2>::new(6).unwrap();
        let top = c.top_cell();
        for child in c.children(top) {
            assert_eq!(c.level(child), 1);
            assert_eq!(c.parent(child), Some(top));
            for grandchild in c.children(child) {
                assert_eq!(c.level(grandchild), 2);
                assert_eq!(c.parent(grandchild), Some(child));
                assert!(c.cell_contains(top, grandchild));
                assert!(c.cell_contains(child, grandchild));
                assert!(!c.cell_contains(grandchild, child));
            }
        }
    }

    #[test]
    fn corners_follow_axis_bit_order() {
        let c = DitiCodec::<2>::new(4).unwrap();
        let top = c.top_cell();
        let corners: Vec<_> = c.corners(top).into_iter().map(|d| c.decode(d)).collect();

        assert_eq!(corners, vec![[0, 0], [16, 0], [0, 16], [16, 16]]);

        let left: Vec<_> = c
            .face_corners(top, 0, Direction::Negative)
            .into_iter()
            .map(|d| c.decode(d))
            .collect();
        assert_eq!(left, vec![[0, 0], [0, 16]]);

        let top_face: Vec<_> = c
            .face_corners(top, 1, Direction::Positive)
            .into_iter()
            .map(|d| c.decode(d))
            .collect();
        assert_eq!(top_face, vec![[0, 16], [16, 16]]);
    }

    #[test]
    fn siblings_stay_inside_the_tree() {
        let c = DitiCodec::<2>::new(4).unwrap();
        let top = c.top_cell();
        assert_eq!(c.sibling(top, 0, Direction::Positive), None);

        let children = c.children(top);
        assert_eq!(c.sibling(children[0], 0, Direction::Positive), Some(children[1]));
        assert_eq!(c.sibling(children[0], 1, Direction::Positive), Some(children[2]));
        assert_eq!(c.sibling(children[0], 0, Direction::Negative), None);
        assert_eq!(c.sibling(children[3], 1, Direction::Negative), Some(children[1]));
    }
}
