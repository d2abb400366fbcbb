//! Ranked catalog search.
//!
//! Given a target hex color and a catalog snapshot, returns the K perceptually
//! closest entries ascending by ΔE76. Equal distances keep catalog order.
//! Searches are pure: nothing is cached between calls and the catalog is
//! never mutated, so concurrent calls need no coordination.

mod index;

pub use index::{LinearScan, Neighbor, PaintIndex};

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::color::{Lab, MatchBand, hex_to_rgb};
use crate::error::{MatchError, Result};

/// A ranked hit borrowing its entry from the searched snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    /// The matched catalog entry
    pub entry: &'a CatalogEntry,
    /// ΔE76 from the target; 0.0 is an exact sRGB match
    pub distance: f64,
    /// Whether the requesting user owns this paint
    pub owned: bool,
}

impl<'a> MatchResult<'a> {
    pub fn new(entry: &'a CatalogEntry, distance: f64) -> Self {
        Self {
            entry,
            distance,
            owned: false,
        }
    }

    /// Presentation band for this distance.
    pub fn band(&self) -> MatchBand {
        MatchBand::from_distance(self.distance)
    }

    /// Detach from the snapshot by cloning the entry.
    pub fn to_owned_match(&self) -> PaintMatch {
        PaintMatch {
            entry: self.entry.clone(),
            distance: self.distance,
            owned: self.owned,
        }
    }
}

/// An owned ranked hit, for results that outlive the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintMatch {
    pub entry: CatalogEntry,
    pub distance: f64,
    pub owned: bool,
}

impl PaintMatch {
    pub fn band(&self) -> MatchBand {
        MatchBand::from_distance(self.distance)
    }
}

/// Find the `k` catalog entries closest to `target_hex`.
///
/// Returns `min(k, catalog.len())` results ascending by distance, ties in
/// catalog order, all with `owned == false`.
///
/// # Errors
/// * [`MatchError::InvalidColorFormat`] if `target_hex` or any entry's color
///   is not `#RRGGBB`
/// * [`MatchError::InvalidTopK`] if `k` is zero
///
/// An empty catalog is not an error and yields an empty list.
pub fn find_top_matches<'a>(
    target_hex: &str,
    catalog: &'a [CatalogEntry],
    k: usize,
) -> Result<Vec<MatchResult<'a>>> {
    let target = hex_to_rgb(target_hex)?.to_lab();
    if k == 0 {
        return Err(MatchError::InvalidTopK);
    }
    if catalog.is_empty() {
        log::debug!("Search for {}: empty catalog", target_hex);
        return Ok(Vec::new());
    }

    let index = LinearScan::build(catalog)?;
    let results = rank_with_index(&index, catalog, target, k)?;

    log::debug!(
        "Search for {}: {} entries, k={}, best ΔE {:.2}",
        target_hex,
        catalog.len(),
        k,
        results.first().map_or(f64::NAN, |m| m.distance)
    );
    Ok(results)
}

/// Rank through a caller-supplied index built over `catalog`.
///
/// This is the seam for hosts that keep a prebuilt index (for example a
/// spatial index, or Lab values memoised per catalog version). The index must
/// have been built from this exact slice.
///
/// # Errors
/// [`MatchError::InvalidTopK`] if `k` is zero.
pub fn rank_with_index<'a, I: PaintIndex + ?Sized>(
    index: &I,
    catalog: &'a [CatalogEntry],
    target: Lab,
    k: usize,
) -> Result<Vec<MatchResult<'a>>> {
    if k == 0 {
        return Err(MatchError::InvalidTopK);
    }
    debug_assert_eq!(index.len(), catalog.len(), "index built from another snapshot");

    let mut results = Vec::with_capacity(k.min(catalog.len()));
    for neighbor in index.nearest(target, k) {
        let Some(entry) = catalog.get(neighbor.index) else {
            log::warn!(
                "Index returned position {} outside a catalog of {} entries",
                neighbor.index,
                catalog.len()
            );
            continue;
        };
        log::trace!("  {} ({}) ΔE {:.3}", entry.id, entry.hex_color, neighbor.distance);
        results.push(MatchResult::new(entry, neighbor.distance));
        if results.len() == k {
            break;
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests;
