//! Catalog snapshots handed to the matching engine.
//!
//! The catalog is owned by an external paint database. This module only
//! provides:
//! - `CatalogEntry`: the single canonical paint shape
//! - `PaintRecord`: the raw global/custom record union, resolved at the boundary
//! - `Catalog`: an immutable, ordered snapshot of entries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paintmatch::catalog::Catalog;
//!
//! let catalog = Catalog::from_json(&json)?.filter_brands(&["Citadel"]);
//! let matches = paintmatch::find_top_matches("#9a1115", catalog.entries(), 5)?;
//! ```

mod entry;
mod record;

pub use entry::{CatalogEntry, PaintSource};
pub use record::{CUSTOM_BRAND, CustomPaintRecord, GlobalPaintRecord, PaintRecord};

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Errors raised while building a catalog snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Payload is not valid JSON, or not an array of records
    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// An entry's color is not `#RRGGBB`
    #[error("Catalog entry '{id}' has an invalid color: {source}")]
    InvalidEntryColor {
        /// Identifier of the offending entry
        id: String,
        /// Underlying parse error
        source: MatchError,
    },
}

/// Immutable, ordered snapshot of catalog entries.
///
/// Order is significant: it is the tie-break for equal distances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create a snapshot from canonical entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Resolve raw records into a snapshot, preserving order.
    pub fn from_records(records: impl IntoIterator<Item = PaintRecord>) -> Self {
        Self {
            entries: records.into_iter().map(PaintRecord::resolve).collect(),
        }
    }

    /// Parse a JSON array of global and custom paint records.
    ///
    /// Array elements matching neither record shape are skipped with a
    /// warning; a payload that is not an array is an error.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let total = values.len();

        let mut entries = Vec::with_capacity(total);
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<PaintRecord>(value) {
                Ok(record) => entries.push(record.resolve()),
                Err(e) => log::warn!("Skipping catalog record {}: {}", index, e),
            }
        }

        log::debug!("Loaded catalog: {} of {} records", entries.len(), total);
        Ok(Self { entries })
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by identifier.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// New snapshot holding only entries of the given brands (case-insensitive).
    ///
    /// An empty brand list keeps nothing.
    pub fn filter_brands(&self, brands: &[&str]) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|e| brands.iter().any(|b| b.eq_ignore_ascii_case(&e.brand)))
            .cloned()
            .collect();
        Self { entries }
    }

    /// Distinct brand names in first-seen order.
    pub fn brands(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !brands.contains(&entry.brand.as_str()) {
                brands.push(&entry.brand);
            }
        }
        brands
    }

    /// Check that every entry carries a well-formed color.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for entry in &self.entries {
            entry
                .rgb()
                .map_err(|source| CatalogError::InvalidEntryColor {
                    id: entry.id.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl AsRef<[CatalogEntry]> for Catalog {
    fn as_ref(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl From<Vec<CatalogEntry>> for Catalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
