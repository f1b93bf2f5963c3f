use super::RectTree;

use rect_tree_core::prelude::*;

impl<const D: usize, const R: usize> RectTree<D, R> {
    /// The leaves sharing the face of `cell` on the `dir` side of `axis`.
    ///
    /// - If the same-level neighbor is a leaf, it's the only result.
    /// - If the neighbor region is coarser, the single leaf containing it is returned.
    /// - If the neighbor region is finer, every leaf inside it touching the shared face is returned, in ascending `Diti`
    ///   order.
    ///
    /// The result is empty when the face is on the boundary of the domain.
    pub fn get_existing_neighbor(&self, cell: Diti, axis: usize, dir: Direction) -> Vec<Diti> {
        let sibling = match self.codec.sibling(cell, axis, dir) {
            Some(s) => s,
            None => return Vec::new(),
        };
        if self.leaves.contains(&sibling) {
            return vec![sibling];
        }

        let mut ancestor = sibling;
        while let Some(parent) = self.codec.parent(ancestor) {
            if self.leaves.contains(&parent) {
                return vec![parent];
            }
            ancestor = parent;
        }
        if self.leaves.is_empty() {
            return Vec::new();
        }

        // The sibling is a branch. Its children on the side facing `cell` have the `axis` bit set iff `cell` is on the
        // positive side, i.e. we stepped in the negative direction.
        let facing_max_side = dir == Direction::Negative;
        let mut found = Vec::new();
        let mut stack = vec![sibling];
        while let Some(region) = stack.pop() {
            if self.leaves.contains(&region) {
                found.push(region);
            } else if self.codec.level(region) < self.codec.max_level() {
                stack.extend(
                    self.codec
                        .children(region)
                        .into_iter()
                        .enumerate()
                        .filter(|(i, _)| ((i >> axis) & 1 == 1) == facing_max_side)
                        .map(|(_, child)| child),
                );
            }
        }
        found.sort();

        found
    }
}
