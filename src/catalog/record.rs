//! Raw paint records as delivered by the catalog collaborator.
//!
//! Global catalog paints and user custom paints arrive in different shapes.
//! They are resolved here, once, into [`CatalogEntry`] so the matching engine
//! only ever sees one canonical type.

use serde::Deserialize;

use super::entry::{CatalogEntry, PaintSource};

/// Brand assigned to custom paints that carry none.
pub const CUSTOM_BRAND: &str = "Custom";

/// A paint from the shared multi-brand catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPaintRecord {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub hex_color: String,
}

/// A paint a user defined themselves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPaintRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub color: String,
    pub is_custom: bool,
}

/// Either record shape, distinguished by its fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PaintRecord {
    Custom(CustomPaintRecord),
    Global(GlobalPaintRecord),
}

impl PaintRecord {
    /// Resolve into the canonical entry shape.
    pub fn resolve(self) -> CatalogEntry {
        match self {
            PaintRecord::Global(record) => {
                CatalogEntry::new(record.id, record.name, record.brand, record.hex_color)
            }
            PaintRecord::Custom(record) => {
                let source = if record.is_custom {
                    PaintSource::Custom
                } else {
                    PaintSource::Global
                };
                let brand = record
                    .brand
                    .filter(|b| !b.trim().is_empty())
                    .unwrap_or_else(|| CUSTOM_BRAND.to_string());
                CatalogEntry::new(record.id, record.name, brand, record.color).with_source(source)
            }
        }
    }
}

impl From<PaintRecord> for CatalogEntry {
    fn from(record: PaintRecord) -> Self {
        record.resolve()
    }
}
