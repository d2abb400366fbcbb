//! Nearest-paint lookup behind a swappable index trait.
//!
//! `LinearScan` computes every distance and keeps the best K in a bounded
//! max-heap. It is adequate for catalogs up to the low thousands; a spatial
//! index (k-d tree, BK-tree) can implement `PaintIndex` without changing the
//! search contract.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::catalog::CatalogEntry;
use crate::color::{Lab, delta_e76};
use crate::error::Result;

/// One hit from a [`PaintIndex`] query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the entry in the catalog slice the index was built from
    pub index: usize,
    /// ΔE76 from the query color
    pub distance: f64,
}

impl Neighbor {
    fn cmp_rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.index.cmp(&other.index))
    }
}

// Heap ordering: larger distance, then later catalog position, ranks worse.
#[derive(Debug, Clone, Copy)]
struct Ranked(Neighbor);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_rank(&other.0)
    }
}

/// Index over a catalog snapshot answering top-K nearest queries.
///
/// Implementations must return at most `k` neighbors, ascending by distance,
/// with equal distances ordered by catalog position.
pub trait PaintIndex {
    /// Number of indexed entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` entries closest to `target`.
    fn nearest(&self, target: Lab, k: usize) -> Vec<Neighbor>;
}

/// Exhaustive scan over Lab values computed once per snapshot.
///
/// The Lab values live only as long as this value; nothing is cached across
/// snapshots.
#[derive(Debug, Clone, Default)]
pub struct LinearScan {
    labs: Vec<Lab>,
}

impl LinearScan {
    /// Convert every entry's color to Lab.
    ///
    /// Fails on the first entry whose hex color is malformed.
    pub fn build(entries: &[CatalogEntry]) -> Result<Self> {
        let labs = entries
            .iter()
            .map(CatalogEntry::lab)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { labs })
    }

    /// Build from precomputed Lab values, in catalog order.
    pub fn from_labs(labs: Vec<Lab>) -> Self {
        Self { labs }
    }
}

impl PaintIndex for LinearScan {
    fn len(&self) -> usize {
        self.labs.len()
    }

    fn nearest(&self, target: Lab, k: usize) -> Vec<Neighbor> {
        let k = k.min(self.labs.len());
        if k == 0 {
            return Vec::new();
        }

        let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(k + 1);
        for (index, lab) in self.labs.iter().enumerate() {
            let candidate = Ranked(Neighbor {
                index,
                distance: delta_e76(target, *lab),
            });
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        heap.into_sorted_vec().into_iter().map(|r| r.0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(l: f64) -> Lab {
        Lab::new(l, 0.0, 0.0)
    }

    #[test]
    fn test_nearest_orders_by_distance() {
        let index = LinearScan::from_labs(vec![gray(90.0), gray(10.0), gray(50.0), gray(45.0)]);
        let hits = index.nearest(gray(48.0), 3);
        let order: Vec<_> = hits.iter().map(|n| n.index).collect();
        assert_eq!(order, [2, 3, 1]);
        assert!((hits[0].distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        // Entries 1, 2 and 4 are all 5.0 away from the target.
        let index = LinearScan::from_labs(vec![
            gray(80.0),
            gray(55.0),
            gray(45.0),
            gray(0.0),
            gray(55.0),
        ]);
        let hits = index.nearest(gray(50.0), 2);
        let order: Vec<_> = hits.iter().map(|n| n.index).collect();
        assert_eq!(order, [1, 2]);

        let all = index.nearest(gray(50.0), 5);
        let order: Vec<_> = all.iter().map(|n| n.index).collect();
        assert_eq!(order, [1, 2, 4, 0, 3]);
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = LinearScan::from_labs(vec![gray(1.0), gray(2.0)]);
        assert_eq!(index.nearest(gray(0.0), 10).len(), 2);
    }

    #[test]
    fn test_empty_index() {
        let index = LinearScan::default();
        assert!(index.is_empty());
        assert!(index.nearest(gray(0.0), 3).is_empty());
    }

    #[test]
    fn test_k_zero_returns_nothing() {
        let index = LinearScan::from_labs(vec![gray(1.0)]);
        assert!(index.nearest(gray(0.0), 0).is_empty());
    }

    #[test]
    fn test_build_rejects_bad_entry() {
        let entries = vec![
            CatalogEntry::new("a", "A", "B", "#000000"),
            CatalogEntry::new("b", "B", "B", "#zzzzzz"),
        ];
        assert!(LinearScan::build(&entries).is_err());
    }
}
