//! Bucketed `isnap -> istep` index.
//!
//! Snapshot numbers are discovered one at a time and in no particular
//! order. Keys are spread over a fixed number of buckets by integer
//! division, and each bucket is a short sorted run searched by bisection.
//! Inserting only ever shifts entries of one bucket.

use sd_core::{ISnap, IStep, Resolution};

pub const DEFAULT_BUCKETS: usize = 400;

/// Key span covered by the buckets; larger keys all land in the last one.
pub const DEFAULT_KEY_SPAN: u64 = 100_000;

#[derive(Debug, Clone)]
pub struct SparseIndex {
    bucket_width: u64,
    /// Each bucket sorted by isnap. `None` records a snapshot known to be missing.
    buckets: Vec<Vec<(ISnap, Option<IStep>)>>,
    len: usize,
}

impl Default for SparseIndex {
    fn default() -> Self {
        Self::with_layout(DEFAULT_BUCKETS, DEFAULT_KEY_SPAN)
    }
}

impl SparseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index with `buckets` buckets sharing `key_span` evenly.
    pub fn with_layout(buckets: usize, key_span: u64) -> Self {
        let buckets = buckets.max(1);
        let bucket_width = (key_span / buckets as u64).max(1);
        Self {
            bucket_width,
            buckets: vec![Vec::new(); buckets],
            len: 0,
        }
    }

    fn bucket_of(&self, isnap: ISnap) -> usize {
        let idx = (isnap / self.bucket_width).min(self.buckets.len() as u64 - 1);
        idx as usize
    }

    fn locate(&self, isnap: ISnap) -> (usize, Result<usize, usize>) {
        let bucket = self.bucket_of(isnap);
        let pos = self.buckets[bucket].binary_search_by_key(&isnap, |&(key, _)| key);
        (bucket, pos)
    }

    /// `Resolved(istep)`, `Absent` for a snapshot recorded as missing, or
    /// `Unresolved` when nothing is known about `isnap` yet.
    pub fn lookup(&self, isnap: ISnap) -> Resolution<IStep> {
        match self.locate(isnap) {
            (bucket, Ok(pos)) => Resolution::from_option(self.buckets[bucket][pos].1),
            (_, Err(_)) => Resolution::Unresolved,
        }
    }

    /// Record what `isnap` maps to. The first insert for a key wins; later
    /// ones are ignored and return `false`.
    pub fn insert(&mut self, isnap: ISnap, istep: Option<IStep>) -> bool {
        match self.locate(isnap) {
            (_, Ok(_)) => false,
            (bucket, Err(pos)) => {
                self.buckets[bucket].insert(pos, (isnap, istep));
                self.len += 1;
                true
            }
        }
    }

    pub fn contains(&self, isnap: ISnap) -> bool {
        !self.lookup(isnap).is_unresolved()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Known pairs in increasing isnap order, missing snapshots included.
    pub fn iter(&self) -> impl Iterator<Item = (ISnap, Option<IStep>)> + '_ {
        self.buckets.iter().flatten().copied()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    proptest! {
        #[test]
        fn behaves_like_first_writer_map(
            pairs in prop::collection::vec((0_u64..200_000, prop::option::of(0_u64..1_000_000)), 0..300)
        ) {
            let mut index = SparseIndex::new();
            let mut reference: HashMap<u64, Option<u64>> = HashMap::new();
            for &(isnap, istep) in &pairs {
                let fresh = !reference.contains_key(&isnap);
                reference.entry(isnap).or_insert(istep);
                prop_assert_eq!(index.insert(isnap, istep), fresh);
            }
            prop_assert_eq!(index.len(), reference.len());
            for (isnap, istep) in &reference {
                prop_assert_eq!(index.lookup(*isnap), Resolution::from_option(*istep));
            }
            let keys: Vec<u64> = index.iter().map(|(k, _)| k).collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            prop_assert_eq!(keys, sorted);
        }
    }
}
