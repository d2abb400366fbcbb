//! CIE76 color difference and the qualitative bands built on it.

use serde::{Deserialize, Serialize};

use super::Lab;

/// CIE76 ΔE: Euclidean distance in Lab space.
///
/// Symmetric, non-negative, and zero only for identical Lab triples. No
/// weighting is applied.
pub fn delta_e76(lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Qualitative reading of a ΔE76 distance for presentation.
///
/// The engine never filters on these; thresholds are fixed so every consumer
/// labels the same distance the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBand {
    /// ΔE below 5
    Perfect,
    /// ΔE from 5 up to 10
    Close,
    /// ΔE from 10 up to 20
    Similar,
    /// ΔE of 20 or more
    Distant,
}

impl MatchBand {
    pub const PERFECT_BELOW: f64 = 5.0;
    pub const CLOSE_BELOW: f64 = 10.0;
    pub const SIMILAR_BELOW: f64 = 20.0;

    /// Band for a distance. NaN reads as `Distant`.
    pub fn from_distance(distance: f64) -> Self {
        if distance < Self::PERFECT_BELOW {
            Self::Perfect
        } else if distance < Self::CLOSE_BELOW {
            Self::Close
        } else if distance < Self::SIMILAR_BELOW {
            Self::Similar
        } else {
            Self::Distant
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            MatchBand::Perfect => "Perfect",
            MatchBand::Close => "Close",
            MatchBand::Similar => "Similar",
            MatchBand::Distant => "Distant",
        }
    }

    /// All bands from closest to farthest.
    pub fn all() -> &'static [MatchBand] {
        &[
            MatchBand::Perfect,
            MatchBand::Close,
            MatchBand::Similar,
            MatchBand::Distant,
        ]
    }
}
