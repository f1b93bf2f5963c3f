use super::RectTree;

use std::fmt;

impl<const D: usize, const R: usize> RectTree<D, R> {
    /// Render the leaves, with their levels, domain centers and center samples, one per line. Stops after `max` leaves unless
    /// `max` is 0.
    pub fn dump_tree(&self, max: usize) -> String {
        self.display_leaves(max).to_string()
    }

    /// Like `dump_tree`, but formats straight into any writer.
    pub fn display_leaves(&self, max: usize) -> impl fmt::Display + '_ {
        LeafDump { tree: self, max }
    }
}

struct LeafDump<'a, const D: usize, const R: usize> {
    tree: &'a RectTree<D, R>,
    max: usize,
}

impl<'a, const D: usize, const R: usize> fmt::Display for LeafDump<'a, D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree;
        writeln!(f, "{}", tree)?;
        for (i, leaf) in tree.leaves.iter().enumerate() {
            if self.max > 0 && i >= self.max {
                return writeln!(f, "  ... {} more", tree.leaves.len() - self.max);
            }
            write!(
                f,
                "  {} level={} center={:?} ",
                leaf,
                tree.codec.level(*leaf),
                tree.diti_to_drpt(*leaf)
            )?;
            match tree.samples.get(*leaf) {
                Some(sample) => writeln!(f, "sample={:?}", sample)?,
                None => writeln!(f, "sample=none")?,
            }
        }

        Ok(())
    }
}

impl<const D: usize, const R: usize> fmt::Display for RectTree<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RectTree<{}, {}> bits={} min={:?} max={:?} leaves={} samples={}",
            D,
            R,
            self.codec.bits(),
            self.domain.min(),
            self.domain.max(),
            self.leaves.len(),
            self.samples.len()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::ScalarFn;

    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn dump_is_truncated() {
        let f = ScalarFn(|p: [f64; 1]| p[0]);
        let mut tree = RectTree::<1, 1>::new([0.0], [1.0]).unwrap();
        tree.refine_grid(2, &f);

        let full = tree.dump_tree(0);
        assert_eq!(full.lines().count(), 5);
        assert!(full.starts_with("RectTree<1, 1> bits=15"));
        assert!(full.contains("center=[0.125] sample=[0.125]"));

        let short = tree.dump_tree(2);
        assert_eq!(short.lines().count(), 4);
        assert!(short.ends_with("... 2 more\n"));
    }

    #[test]
    fn leaves_format_into_any_writer() {
        let f = ScalarFn(|p: [f64; 1]| p[0]);
        let mut tree = RectTree::<1, 1>::new([0.0], [1.0]).unwrap();
        tree.refine_grid(1, &f);

        let mut out = Vec::new();
        write!(out, "{}", tree.display_leaves(1)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), tree.dump_tree(1));
        assert_eq!(tree.dump_tree(1).lines().count(), 3);
    }
}
