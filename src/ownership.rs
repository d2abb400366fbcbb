//! Tagging ranked matches with the user's owned paints.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::search::MatchResult;

/// Catalog-entry identifiers a user has recorded as owned.
///
/// Supplied per call; the engine never caches or mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnershipSet {
    ids: HashSet<String>,
}

impl OwnershipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for OwnershipSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Set `owned` on every match whose entry id is in `owned`.
///
/// Order, count and distances are unchanged. Matches not in the set keep
/// their current flag, which is `false` for fresh search results.
pub fn annotate_ownership<'a>(
    matches: Vec<MatchResult<'a>>,
    owned: &OwnershipSet,
) -> Vec<MatchResult<'a>> {
    matches
        .into_iter()
        .map(|mut m| {
            if owned.contains(&m.entry.id) {
                m.owned = true;
            }
            m
        })
        .collect()
}
