//! paintmatch - Perceptual paint-color matching
//!
//! Finds the commercial paints closest to a sampled color. A hex target is
//! converted to CIE L*a*b* (D65), every catalog entry is scored by CIE76 ΔE,
//! the K nearest are returned in ascending order, and each is tagged with
//! whether the user already owns it.
//!
//! ```rust,ignore
//! use paintmatch::{Catalog, OwnershipSet, match_paints};
//!
//! let catalog = Catalog::from_json(&catalog_json)?;
//! let owned: OwnershipSet = ["citadel-abaddon-black"].into_iter().collect();
//! for m in match_paints("#1a1a1a", catalog.entries(), &owned, 5)? {
//!     println!("{} {} ΔE {:.1} {}", m.entry.brand, m.entry.name, m.distance, m.band().label());
//! }
//! ```
//!
//! The engine is synchronous and performs no I/O. [`PaintMatcher`] wraps it
//! for hosts: it applies [`MatcherConfig`] and moves large catalogs onto a
//! [`dispatch::MatchWorker`] thread.

pub mod catalog;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod matcher;
pub mod ownership;
pub mod sampler;
pub mod search;

pub use catalog::{Catalog, CatalogEntry, PaintSource};
pub use color::{Lab, MatchBand, Rgb, delta_e76, hex_to_rgb, rgb_to_hex, rgb_to_lab};
pub use config::MatcherConfig;
pub use error::{MatchError, Result};
pub use matcher::{PaintMatcher, Pick};
pub use ownership::{OwnershipSet, annotate_ownership};
pub use search::{MatchResult, PaintMatch, find_top_matches};

/// Rank the catalog against `target_hex` and tag owned paints.
///
/// Equivalent to [`find_top_matches`] followed by [`annotate_ownership`].
pub fn match_paints<'a>(
    target_hex: &str,
    catalog: &'a [CatalogEntry],
    owned: &OwnershipSet,
    k: usize,
) -> Result<Vec<MatchResult<'a>>> {
    let matches = find_top_matches(target_hex, catalog, k)?;
    Ok(annotate_ownership(matches, owned))
}
