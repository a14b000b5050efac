use std::ops::Range;

use geo::Coord;

use crate::error::{MapError, Result};
use crate::ring::signed_area;

/// The vertex stream of a polygon map: every ring's vertices concatenated
/// into one flat array.
///
/// Rings are pushed region by region, shell first and then its holes. Ring
/// `r` occupies `offsets[r]..offsets[r + 1]`. Shells are stored
/// counter-clockwise and holes clockwise, whatever the input orientation.
#[derive(Clone, Debug, Default)]
pub struct PointStream {
    points:   Vec<Coord<f64>>,
    /// Ring start offsets; length = `num_rings + 1`.
    offsets:  Vec<usize>,
    is_shell: Vec<bool>,
    /// Index of the region owning each ring.
    owner:    Vec<usize>,
}

impl PointStream {
    /// Build the stream from open rings (no closing duplicate), one entry per
    /// region holding its shell followed by its holes.
    pub fn build(regions: &[Vec<Vec<Coord<f64>>>]) -> Result<Self> {
        let num_rings = regions.iter().map(Vec::len).sum::<usize>();
        let mut stream = Self {
            points:   Vec::with_capacity(regions.iter().flatten().map(Vec::len).sum()),
            offsets:  Vec::with_capacity(num_rings + 1),
            is_shell: Vec::with_capacity(num_rings),
            owner:    Vec::with_capacity(num_rings),
        };
        stream.offsets.push(0);

        for (region, rings) in regions.iter().enumerate() {
            if rings.is_empty() {
                return Err(MapError::invalid(format!("region {region} has no shell")));
            }
            for (k, ring) in rings.iter().enumerate() {
                stream.push_ring(ring, k == 0, region)?;
            }
        }

        Ok(stream)
    }

    fn push_ring(&mut self, ring: &[Coord<f64>], is_shell: bool, owner: usize) -> Result<()> {
        let index = self.num_rings();
        if ring.len() < 3 {
            return Err(MapError::invalid_ring(
                format!("ring has {} points, at least 3 are required", ring.len()),
                index,
            ));
        }

        let area = signed_area(ring);
        if area == 0.0 {
            return Err(MapError::invalid_ring("ring has zero area", index));
        }

        // Shells counter-clockwise, holes clockwise.
        if (area > 0.0) == is_shell {
            self.points.extend_from_slice(ring);
        } else {
            self.points.extend(ring.iter().rev());
        }
        self.offsets.push(self.points.len());
        self.is_shell.push(is_shell);
        self.owner.push(owner);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline] pub fn len(&self) -> usize { self.points.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.points.is_empty() }

    #[inline] pub fn num_rings(&self) -> usize { self.is_shell.len() }

    #[inline] pub fn points(&self) -> &[Coord<f64>] { &self.points }

    #[inline] pub fn point(&self, i: usize) -> Coord<f64> { self.points[i] }

    #[inline] pub fn offsets(&self) -> &[usize] { &self.offsets }

    #[inline] pub fn is_shell(&self, ring: usize) -> bool { self.is_shell[ring] }

    /// Index of the region that owns `ring`.
    #[inline] pub fn owner(&self, ring: usize) -> usize { self.owner[ring] }

    /// Half-open vertex range of `ring`.
    #[inline]
    pub fn ring_range(&self, ring: usize) -> Range<usize> {
        self.offsets[ring]..self.offsets[ring + 1]
    }

    /// The ring containing vertex `i`: the largest `r` with `offsets[r] <= i`.
    #[inline]
    pub fn ring_of(&self, i: usize) -> usize {
        self.offsets.partition_point(|&o| o <= i) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    fn square(x: f64, y: f64, size: f64) -> Vec<Coord<f64>> {
        coords(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
    }

    #[test]
    fn offsets_and_ring_membership() {
        let stream = PointStream::build(&[
            vec![square(0.0, 0.0, 10.0), square(3.0, 3.0, 4.0)],
            vec![coords(&[(20.0, 0.0), (21.0, 0.0), (20.0, 1.0)])],
        ]).unwrap();

        assert_eq!(stream.len(), 11);
        assert_eq!(stream.num_rings(), 3);
        assert_eq!(stream.offsets(), &[0, 4, 8, 11]);
        assert!(stream.is_shell(0));
        assert!(!stream.is_shell(1));
        assert!(stream.is_shell(2));
        assert_eq!(stream.owner(1), 0);
        assert_eq!(stream.owner(2), 1);

        assert_eq!(stream.ring_of(0), 0);
        assert_eq!(stream.ring_of(3), 0);
        assert_eq!(stream.ring_of(4), 1);
        assert_eq!(stream.ring_of(7), 1);
        assert_eq!(stream.ring_of(8), 2);
        assert_eq!(stream.ring_of(10), 2);
        assert_eq!(stream.ring_range(1), 4..8);
    }

    #[test]
    fn orientation_is_normalized() {
        let cw_shell: Vec<_> = square(0.0, 0.0, 10.0).into_iter().rev().collect();
        let ccw_hole = square(3.0, 3.0, 4.0);
        let stream = PointStream::build(&[vec![cw_shell, ccw_hole]]).unwrap();

        assert!(signed_area(&stream.points()[stream.ring_range(0)]) > 0.0);
        assert!(signed_area(&stream.points()[stream.ring_range(1)]) < 0.0);
    }

    #[test]
    fn rejects_empty_and_degenerate_regions() {
        assert!(matches!(
            PointStream::build(&[vec![]]),
            Err(MapError::InvalidInput { .. })
        ));
        assert!(matches!(
            PointStream::build(&[vec![coords(&[(0.0, 0.0), (1.0, 0.0)])]]),
            Err(MapError::InvalidInput { ring: Some(0), .. })
        ));
        assert!(matches!(
            PointStream::build(&[vec![square(0.0, 0.0, 1.0)], vec![coords(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])]]),
            Err(MapError::InvalidInput { ring: Some(1), .. })
        ));
    }

    #[test]
    fn empty_map_gives_empty_stream() {
        let stream = PointStream::build(&[]).unwrap();
        assert!(stream.is_empty());
        assert_eq!(stream.num_rings(), 0);
        assert_eq!(stream.offsets(), &[0]);
    }
}
