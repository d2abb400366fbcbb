//! Tests for ranked catalog search.
//!
//! Scenario tests pin concrete search outcomes; property tests check ordering,
//! bounds and ownership invariants over generated catalogs.


use crate::catalog::CatalogEntry;

/// Route engine logging to the test harness; set RUST_LOG to see it.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a global entry whose name mirrors its id.
fn entry(id: &str, hex: &str) -> CatalogEntry {
    CatalogEntry::new(id, id.to_uppercase(), "TestBrand", hex)
}

fn ids<'a>(matches: &'a [crate::search::MatchResult<'_>]) -> Vec<&'a str> {
    matches.iter().map(|m| m.entry.id.as_str()).collect()
}
