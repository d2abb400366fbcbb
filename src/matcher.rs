//! Host-facing entry point tying settings, snapshot and dispatch together.
//!
//! `PaintMatcher` answers small catalogs inline and hands large ones to a
//! [`MatchWorker`], choosing by [`MatcherConfig::should_offload`]. Picks use
//! the configured top-K unless the caller asks for another count.

use std::io;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::MatcherConfig;
use crate::dispatch::{MatchResponse, MatchWorker};
use crate::error::Result;
use crate::ownership::OwnershipSet;
use crate::search::{MatchResult, PaintMatch};

/// Result of a pick.
#[derive(Debug, Clone, PartialEq)]
pub enum Pick {
    /// Ranked inline
    Ready(Result<Vec<PaintMatch>>),
    /// Sent to the worker; collect with [`PaintMatcher::poll`] or
    /// [`PaintMatcher::wait`]
    Queued(u64),
}

/// Paint matching over one catalog and ownership snapshot.
pub struct PaintMatcher {
    config: MatcherConfig,
    catalog: Arc<Catalog>,
    owned: Arc<OwnershipSet>,
    /// Spawned once the catalog outgrows the offload threshold
    worker: Option<MatchWorker>,
}

impl PaintMatcher {
    /// Create a matcher and apply the configured log level.
    pub fn new(
        config: MatcherConfig,
        catalog: Arc<Catalog>,
        owned: Arc<OwnershipSet>,
    ) -> io::Result<Self> {
        config.apply_log_level();
        let mut matcher = Self {
            config,
            catalog,
            owned,
            worker: None,
        };
        matcher.ensure_worker()?;
        Ok(matcher)
    }

    /// Create a matcher from the settings in the user config directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_user_config(
        catalog: Arc<Catalog>,
        owned: Arc<OwnershipSet>,
    ) -> io::Result<Self> {
        Self::new(MatcherConfig::load_user(), catalog, owned)
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Whether picks currently go to the background worker.
    pub fn is_offloaded(&self) -> bool {
        self.worker.is_some()
    }

    /// Rank `target_hex` with the configured top-K.
    pub fn pick(&mut self, target_hex: &str) -> Pick {
        self.pick_top(target_hex, self.config.effective_top_k())
    }

    /// Rank `target_hex`, returning up to `k` matches.
    pub fn pick_top(&mut self, target_hex: &str, k: usize) -> Pick {
        match &mut self.worker {
            Some(worker) => Pick::Queued(worker.request(target_hex, k)),
            None => Pick::Ready(
                crate::match_paints(target_hex, self.catalog.entries(), &self.owned, k)
                    .map(|matches| matches.iter().map(MatchResult::to_owned_match).collect()),
            ),
        }
    }

    /// Swap in a new catalog and ownership set for later picks.
    ///
    /// A worker already running keeps serving, so queued picks are still
    /// answered; one is spawned if the new catalog crosses the threshold.
    pub fn set_snapshot(
        &mut self,
        catalog: Arc<Catalog>,
        owned: Arc<OwnershipSet>,
    ) -> io::Result<()> {
        if let Some(worker) = &self.worker {
            worker.update_snapshot(Arc::clone(&catalog), Arc::clone(&owned));
        }
        self.catalog = catalog;
        self.owned = owned;
        self.ensure_worker()
    }

    /// Next worker response, if one is ready. Always `None` when inline.
    pub fn poll(&mut self) -> Option<MatchResponse> {
        self.worker.as_mut()?.take_one_result()
    }

    /// Block for the next worker response. `None` when nothing is queued.
    pub fn wait(&mut self) -> Option<MatchResponse> {
        self.worker.as_mut()?.wait_result()
    }

    fn ensure_worker(&mut self) -> io::Result<()> {
        if self.worker.is_none() && self.config.should_offload(self.catalog.len()) {
            log::info!(
                "Catalog of {} entries exceeds {}, ranking in background",
                self.catalog.len(),
                self.config.offload_threshold
            );
            self.worker = Some(MatchWorker::spawn(
                Arc::clone(&self.catalog),
                Arc::clone(&self.owned),
            )?);
        }
        Ok(())
    }
}
