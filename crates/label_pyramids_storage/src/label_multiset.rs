//! Label multisets: per-voxel histograms of the labels that were aggregated into a voxel.
//!
//! When a segmentation is downsampled by aggregation instead of by majority vote, each coarse voxel remembers every label
//! that contributed to it, together with how many fine voxels carried that label. Merging two multisets sums the counts of
//! shared labels, so aggregating level `k` into level `k + 1` gives the same result as aggregating level 0 directly.
//!
//! ```
//! use label_pyramids_storage::prelude::*;
//!
//! let fine: Vec<LabelMultiset> = [5, 5, 5, 4].iter().map(|&l| LabelMultiset::singleton(l)).collect();
//! let coarse = fine.iter().fold(LabelMultiset::new(), |acc, m| acc.merge(m));
//!
//! assert_eq!(coarse.count(5), 3);
//! assert_eq!(coarse.count(4), 1);
//! assert_eq!(coarse.total_count(), 4);
//! assert_eq!(coarse.arg_max(), Some(5));
//! ```

mod codec;

pub use codec::{decode_multisets, encode_multisets};

use core::cmp::Ordering;
use core::iter::FromIterator;

/// Names a segment. The width is fixed at 64 bits.
pub type LabelId = u64;

/// The label of unlabeled voxels.
pub const BACKGROUND: LabelId = 0;

/// Never a real label. Stands in for the argmax of an empty multiset.
pub const INVALID: LabelId = u64::MAX;

/// One label of a multiset and the number of contributing voxels that carried it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Entry {
    pub id: LabelId,
    pub count: u64,
}

impl Entry {
    #[inline]
    pub const fn new(id: LabelId, count: u64) -> Self {
        Self { id, count }
    }
}

/// A multiset of labels in canonical form: entries sorted by strictly increasing id, and every count is nonzero. Because the
/// form is canonical, two multisets are equal iff they describe the same histogram.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct LabelMultiset {
    entries: Vec<Entry>,
}

impl LabelMultiset {
    /// The empty multiset.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// `{id: 1}`, the multiset that a single source voxel stands for.
    #[inline]
    pub fn singleton(id: LabelId) -> Self {
        Self {
            entries: vec![Entry::new(id, 1)],
        }
    }

    /// Builds a multiset from entries in any order. Duplicate ids have their counts summed and zero counts are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut entries: Vec<Entry> = entries.into_iter().filter(|e| e.count > 0).collect();
        entries.sort_unstable_by_key(|e| e.id);
        entries.dedup_by(|next, kept| {
            if next.id == kept.id {
                kept.count += next.count;
                true
            } else {
                false
            }
        });

        Self { entries }
    }

    /// Accepts `entries` only if they are already canonical.
    pub fn try_from_canonical(entries: Vec<Entry>) -> Result<Self, &'static str> {
        if entries.iter().any(|e| e.count == 0) {
            return Err("zero count");
        }
        if entries.windows(2).any(|w| w[0].id >= w[1].id) {
            return Err("ids not strictly increasing");
        }

        Ok(Self { entries })
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The number of distinct labels.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The distinct labels in increasing order.
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// The sum of all counts, i.e. the number of voxels aggregated into this multiset.
    #[inline]
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// The count of `id`, which is 0 if it's absent.
    #[inline]
    pub fn count(&self, id: LabelId) -> u64 {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .map_or(0, |i| self.entries[i].count)
    }

    #[inline]
    pub fn contains(&self, id: LabelId) -> bool {
        self.count(id) > 0
    }

    /// Adds `count` occurrences of `id`.
    pub fn insert(&mut self, id: LabelId, count: u64) {
        if count == 0 {
            return;
        }
        match self.entries.binary_search_by_key(&id, |e| e.id) {
            Ok(i) => {
                let entry = &mut self.entries[i];
                entry.count += count;
            }
            Err(i) => self.entries.insert(i, Entry::new(id, count)),
        }
    }

    /// Sums the counts of ids present in both, and keeps ids present in only one unchanged. Merging is associative and
    /// commutative, so the order in which voxels are aggregated never shows in the result.
    pub fn merge(&self, other: &Self) -> Self {
        let (a, b) = (&self.entries, &other.entries);
        let mut entries = Vec::with_capacity(a.len().max(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].id.cmp(&b[j].id) {
                Ordering::Less => {
                    entries.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    entries.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    entries.push(Entry::new(a[i].id, a[i].count + b[j].count));
                    i += 1;
                    j += 1;
                }
            }
        }
        entries.extend_from_slice(&a[i..]);
        entries.extend_from_slice(&b[j..]);

        Self { entries }
    }

    /// In-place `merge`.
    pub fn merge_from(&mut self, other: &Self) {
        match other.entries.as_slice() {
            [] => {}
            [single] => self.insert(single.id, single.count),
            _ => *self = self.merge(other),
        }
    }

    /// The label with the greatest count. Among labels with equal counts, the smallest id wins. `None` iff empty.
    pub fn arg_max(&self) -> Option<LabelId> {
        let mut best: Option<Entry> = None;
        // Entries are visited in increasing id order, so only a strictly greater count may replace the current best.
        for &entry in self.entries.iter() {
            if best.map_or(true, |b| entry.count > b.count) {
                best = Some(entry);
            }
        }

        best.map(|e| e.id)
    }
}

/// Histogram of a sequence of labels.
impl FromIterator<LabelId> for LabelMultiset {
    fn from_iter<I: IntoIterator<Item = LabelId>>(iter: I) -> Self {
        let mut ids: Vec<LabelId> = iter.into_iter().collect();
        ids.sort_unstable();

        let mut entries: Vec<Entry> = Vec::new();
        for id in ids {
            match entries.last_mut() {
                Some(last) if last.id == id => last.count += 1,
                _ => entries.push(Entry::new(id, 1)),
            }
        }

        Self { entries }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_multiset(rng: &mut StdRng) -> LabelMultiset {
        let len = rng.gen_range(0..6);
        LabelMultiset::from_entries(
            (0..len).map(|_| Entry::new(rng.gen_range(0..8), rng.gen_range(1..5))),
        )
    }

    #[test]
    fn merge_sums_shared_and_keeps_the_rest() {
        let a = LabelMultiset::from_entries(vec![Entry::new(5, 3), Entry::new(1, 2)]);
        let b = LabelMultiset::from_entries(vec![Entry::new(5, 1), Entry::new(9, 4)]);

        let merged = a.merge(&b);

        assert_eq!(
            merged.entries(),
            &[Entry::new(1, 2), Entry::new(5, 4), Entry::new(9, 4)]
        );
        assert_eq!(merged.total_count(), a.total_count() + b.total_count());
    }

    #[test]
    fn merge_is_associative_and_commutative() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..500 {
            let a = random_multiset(&mut rng);
            let b = random_multiset(&mut rng);
            let c = random_multiset(&mut rng);

            assert_eq!(a.merge(&b), b.merge(&a));
            assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));

            let mut in_place = a.clone();
            in_place.merge_from(&b);
            assert_eq!(in_place, a.merge(&b));
        }
    }

    #[test]
    fn merge_never_creates_or_drops_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = random_multiset(&mut rng);
            let b = random_multiset(&mut rng);
            let merged = a.merge(&b);

            let mut union: Vec<_> = a.ids().chain(b.ids()).collect();
            union.sort_unstable();
            union.dedup();

            assert_eq!(merged.ids().collect::<Vec<_>>(), union);
            assert!(merged.entries().iter().all(|e| e.count > 0));
        }
    }

    #[test]
    fn arg_max_of_singleton_is_its_label() {
        assert_eq!(LabelMultiset::singleton(42).arg_max(), Some(42));
        assert_eq!(LabelMultiset::new().arg_max(), None);
    }

    #[test]
    fn arg_max_ties_go_to_the_smallest_id() {
        let tie: LabelMultiset = vec![4, 5, 5, 4].into_iter().collect();
        assert_eq!(tie.arg_max(), Some(4));

        let tie: LabelMultiset = vec![4, 1, 4, 1].into_iter().collect();
        assert_eq!(tie.arg_max(), Some(1));

        let clear_winner: LabelMultiset = vec![5, 5, 5, 4].into_iter().collect();
        assert_eq!(clear_winner.arg_max(), Some(5));
    }

    #[test]
    fn from_entries_canonicalizes() {
        let m = LabelMultiset::from_entries(vec![
            Entry::new(3, 1),
            Entry::new(1, 0),
            Entry::new(3, 2),
            Entry::new(2, 1),
        ]);

        assert_eq!(m.entries(), &[Entry::new(2, 1), Entry::new(3, 3)]);
        assert!(!m.contains(1));
    }

    #[test]
    fn try_from_canonical_rejects_unsorted_and_zero() {
        assert!(LabelMultiset::try_from_canonical(vec![Entry::new(2, 1), Entry::new(1, 1)]).is_err());
        assert!(LabelMultiset::try_from_canonical(vec![Entry::new(1, 1), Entry::new(1, 1)]).is_err());
        assert!(LabelMultiset::try_from_canonical(vec![Entry::new(1, 0)]).is_err());
        assert!(LabelMultiset::try_from_canonical(vec![Entry::new(1, 2), Entry::new(3, 1)]).is_ok());
    }

    #[test]
    fn insert_keeps_canonical_form() {
        let mut m = LabelMultiset::singleton(10);
        m.insert(3, 2);
        m.insert(10, 1);
        m.insert(7, 0);

        assert_eq!(m.entries(), &[Entry::new(3, 2), Entry::new(10, 2)]);
    }

    #[test]
    fn counts_add_up_past_32_bits() {
        let half = LabelMultiset::from_entries(vec![Entry::new(1, u32::MAX as u64), Entry::new(2, 1)]);

        let merged = half.merge(&half);
        let mut inserted = half.clone();
        inserted.insert(1, u32::MAX as u64);

        assert_eq!(merged.count(1), 2 * u32::MAX as u64);
        assert_eq!(inserted.count(1), 2 * u32::MAX as u64);
        assert_eq!(merged.total_count(), 2 * u32::MAX as u64 + 2);
        assert_eq!(merged.arg_max(), Some(1));
    }
}
