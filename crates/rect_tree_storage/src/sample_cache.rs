use crate::SmallKeyHashMap;

use rect_tree_core::Diti;

/// Memoized samples of a function, keyed by the `Diti` where the function was evaluated.
///
/// The first value stored for a key is never replaced, so a cache can be bypassed and rebuilt without changing results as long
/// as the sampled function is pure.
#[derive(Clone, Debug)]
pub struct SampleCache<const R: usize> {
    store: SmallKeyHashMap<Diti, [f64; R]>,
}

impl<const R: usize> Default for SampleCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const R: usize> SampleCache<R> {
    pub fn new() -> Self {
        Self {
            store: SmallKeyHashMap::default(),
        }
    }

    /// Fetch the sample at `key`.
    #[inline]
    pub fn get(&self, key: Diti) -> Option<&[f64; R]> {
        self.store.get(&key)
    }

    /// Fetch the sample at `key`. If it's not here, call `f` to compute it.
    #[inline]
    pub fn get_or_insert_with(&mut self, key: Diti, f: impl FnOnce() -> [f64; R]) -> [f64; R] {
        *self.store.entry(key).or_insert_with(f)
    }

    #[inline]
    pub fn contains(&self, key: Diti) -> bool {
        self.store.contains_key(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Iterate over all (key, sample) pairs in no particular order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (Diti, &[f64; R])> {
        self.store.iter().map(|(k, v)| (*k, v))
    }

    /// Consume and iterate over all (key, sample) pairs.
    pub fn drain_iter(&mut self) -> impl '_ + Iterator<Item = (Diti, [f64; R])> {
        self.store.drain()
    }
}
