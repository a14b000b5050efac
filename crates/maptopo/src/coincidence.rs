use ahash::AHashMap;
use geo::Coord;
use smallvec::SmallVec;

/// Exact coordinate key: the bit patterns of both coordinates, with `-0.0`
/// folded onto `0.0` so that the key agrees with `==`.
#[inline]
pub(crate) fn coord_key(c: Coord<f64>) -> (u64, u64) {
    ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
}

/// A read-only CSR (Compressed Sparse Row) index of coincident vertices.
///
/// `offsets[i]..offsets[i+1]` indexes into `mates` to give the sorted list of
/// the *other* vertices at exactly the same coordinate as vertex `i`.
/// Supports O(log deg) membership tests via binary search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoincidenceIndex {
    /// CSR row offsets; length = `num_vertices + 1`.
    offsets: Vec<u32>,
    /// Flattened mate lists; sorted within each row.
    mates:   Vec<u32>,
}

impl CoincidenceIndex {
    /// Group vertices by hashing their exact coordinates.
    pub fn from_points(points: &[Coord<f64>]) -> Self {
        let mut groups: AHashMap<(u64, u64), SmallVec<[u32; 4]>> = AHashMap::with_capacity(points.len());
        for (i, &p) in points.iter().enumerate() {
            groups.entry(coord_key(p)).or_default().push(i as u32);
        }

        Self::from_rows(points.len(), |i| groups[&coord_key(points[i])].as_slice())
    }

    /// Group vertices by sorting on their exact coordinates.
    ///
    /// Produces the same index as [`CoincidenceIndex::from_points`] without
    /// relying on hashing.
    pub fn from_points_sorted(points: &[Coord<f64>]) -> Self {
        let mut order: Vec<u32> = (0..points.len() as u32).collect();
        order.sort_unstable_by_key(|&i| (coord_key(points[i as usize]), i));

        // Each vertex maps to the bounds of its run in `order`.
        let mut group_of: Vec<(usize, usize)> = vec![(0, 0); points.len()];
        let mut start = 0;
        for run in order.chunk_by(|&a, &b| coord_key(points[a as usize]) == coord_key(points[b as usize])) {
            for &i in run {
                group_of[i as usize] = (start, start + run.len());
            }
            start += run.len();
        }

        Self::from_rows(points.len(), |i| {
            let (a, b) = group_of[i];
            &order[a..b]
        })
    }

    /// Assemble the CSR arrays; `group(i)` yields the sorted group of `i`,
    /// `i` included.
    fn from_rows<'a>(n: usize, group: impl Fn(usize) -> &'a [u32]) -> Self {
        let mut offsets = Vec::with_capacity(n + 1);
        let mut mates = Vec::new();
        offsets.push(0u32);
        for i in 0..n {
            mates.extend(group(i).iter().copied().filter(|&j| j as usize != i));
            offsets.push(mates.len() as u32);
        }
        Self { offsets, mates }
    }

    /// Number of vertices covered by this index.
    #[inline] pub fn len(&self) -> usize { self.offsets.len() - 1 }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    #[inline]
    fn range(&self, i: usize) -> std::ops::Range<usize> {
        self.offsets[i] as usize..self.offsets[i + 1] as usize
    }

    /// Sorted slice of the vertices coincident with `i` (never contains `i`).
    #[inline] pub fn raw_mates(&self, i: usize) -> &[u32] { &self.mates[self.range(i)] }

    /// Iterate over the vertices coincident with `i`.
    #[inline]
    pub fn mates(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.raw_mates(i).iter().map(|&j| j as usize)
    }

    /// Iterate over `i` and its mates.
    #[inline]
    pub fn group(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(i).chain(self.mates(i))
    }

    /// Number of mates of `i`.
    #[inline] pub fn degree(&self, i: usize) -> usize { self.range(i).len() }

    /// Returns `true` if `i` shares its coordinate with another vertex.
    #[inline] pub fn is_shared(&self, i: usize) -> bool { self.degree(i) > 0 }

    /// Returns `true` if `j` is a mate of `i` (binary search).
    #[inline]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.raw_mates(i).binary_search(&(j as u32)).is_ok()
    }

    /// Smallest vertex index in the group of `i`; equal for all members.
    #[inline]
    pub fn representative(&self, i: usize) -> usize {
        self.raw_mates(i).first().map_or(i, |&j| i.min(j as usize))
    }

    /// Number of groups of size two or more.
    pub fn num_shared_groups(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_shared(i) && self.representative(i) == i).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    fn sample() -> Vec<Coord<f64>> {
        coords(&[
            (0.0, 0.0),  // 0
            (1.0, 0.0),  // 1
            (1.0, 1.0),  // 2
            (1.0, 0.0),  // 3 ~ 1
            (2.0, 0.0),  // 4
            (1.0, 1.0),  // 5 ~ 2
            (1.0, 1.0),  // 6 ~ 2, 5
            (-0.0, 0.0), // 7 ~ 0
        ])
    }

    #[test]
    fn groups_exact_coordinates() {
        let index = CoincidenceIndex::from_points(&sample());

        assert_eq!(index.len(), 8);
        assert_eq!(index.raw_mates(0), &[7]);
        assert_eq!(index.raw_mates(1), &[3]);
        assert_eq!(index.raw_mates(2), &[5, 6]);
        assert_eq!(index.raw_mates(4), &[] as &[u32]);
        assert_eq!(index.raw_mates(6), &[2, 5]);
        assert_eq!(index.group(5).collect::<Vec<_>>(), vec![5, 2, 6]);
        assert_eq!(index.num_shared_groups(), 3);
    }

    #[test]
    fn mates_are_symmetric_and_exclude_self() {
        let index = CoincidenceIndex::from_points(&sample());
        for i in 0..index.len() {
            assert!(!index.contains(i, i));
            for j in index.mates(i) {
                assert!(index.contains(j, i));
            }
        }
    }

    #[test]
    fn sorted_fallback_matches_hash_grouping() {
        let points = sample();
        assert_eq!(CoincidenceIndex::from_points(&points), CoincidenceIndex::from_points_sorted(&points));
    }

    #[test]
    fn no_tolerance_is_applied() {
        let index = CoincidenceIndex::from_points(&coords(&[(0.0, 0.0), (1e-12, 0.0)]));
        assert!(!index.is_shared(0));
        assert!(!index.is_shared(1));
    }

    #[test]
    fn representative_is_group_minimum() {
        let index = CoincidenceIndex::from_points(&sample());
        assert_eq!(index.representative(6), 2);
        assert_eq!(index.representative(2), 2);
        assert_eq!(index.representative(7), 0);
        assert_eq!(index.representative(4), 4);
    }

    #[test]
    fn empty_index() {
        let index = CoincidenceIndex::from_points(&[]);
        assert!(index.is_empty());
        assert_eq!(index.num_shared_groups(), 0);
    }
}
