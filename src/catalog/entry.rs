//! Canonical catalog entry shape.

use serde::{Deserialize, Serialize};

use crate::color::{Lab, Rgb, hex_to_rgb};
use crate::error::Result;

/// Where a paint entry originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintSource {
    /// Shared multi-brand catalog
    #[default]
    Global,
    /// A user-defined paint
    Custom,
}

/// A single paint as seen by the matching engine.
///
/// The hex color is the source of truth; Lab is recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Opaque identifier, unique within a catalog
    pub id: String,
    /// Display name
    pub name: String,
    /// Brand or manufacturer
    pub brand: String,
    /// `#RRGGBB` color
    pub hex_color: String,
    /// Origin of the entry
    #[serde(default)]
    pub source: PaintSource,
}

impl CatalogEntry {
    /// Create a global catalog entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        brand: impl Into<String>,
        hex_color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            hex_color: hex_color.into(),
            source: PaintSource::Global,
        }
    }

    /// Set the source of this entry.
    pub fn with_source(mut self, source: PaintSource) -> Self {
        self.source = source;
        self
    }

    /// Whether this entry is a user-defined paint.
    pub fn is_custom(&self) -> bool {
        self.source == PaintSource::Custom
    }

    /// Parse the entry's hex color.
    pub fn rgb(&self) -> Result<Rgb> {
        hex_to_rgb(&self.hex_color)
    }

    /// Lab value of the entry's color.
    pub fn lab(&self) -> Result<Lab> {
        self.rgb().map(Lab::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    #[test]
    fn test_new_defaults_to_global() {
        let entry = CatalogEntry::new("v-001", "Dead White", "Vallejo", "#FFFFFF");
        assert_eq!(entry.source, PaintSource::Global);
        assert!(!entry.is_custom());
    }

    #[test]
    fn test_with_source_custom() {
        let entry = CatalogEntry::new("c-1", "Mix", "Custom", "#102030")
            .with_source(PaintSource::Custom);
        assert!(entry.is_custom());
    }

    #[test]
    fn test_rgb_parses_hex() {
        let entry = CatalogEntry::new("a", "A", "B", "#FE0000");
        assert_eq!(entry.rgb().unwrap(), Rgb::new(254, 0, 0));
    }

    #[test]
    fn test_bad_hex_reports_invalid_color() {
        let entry = CatalogEntry::new("a", "A", "B", "crimson");
        assert!(matches!(
            entry.lab(),
            Err(MatchError::InvalidColorFormat { .. })
        ));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let entry = CatalogEntry::new("a", "A", "B", "#000000");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["hexColor"], "#000000");
        assert_eq!(json["source"], "global");
    }

    #[test]
    fn test_deserialize_without_source() {
        let json = r##"{"id":"x","name":"Black","brand":"Citadel","hexColor":"#000000"}"##;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.source, PaintSource::Global);
        assert_eq!(entry.brand, "Citadel");
    }
}
