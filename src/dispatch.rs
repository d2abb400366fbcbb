//! Background thread for off-loading searches from a responsive host.
//!
//! `MatchWorker` owns a thread that runs [`match_paints`](crate::match_paints)
//! against a shared catalog snapshot. When picks arrive faster than they can
//! be ranked, only the newest queued request runs; older ones are answered
//! with [`MatchOutcome::Superseded`]. The engine itself stays synchronous.

use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::catalog::Catalog;
use crate::error::MatchError;
use crate::ownership::OwnershipSet;
use crate::search::PaintMatch;

/// What became of a search request.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Search ran; owned, annotated matches
    Ranked(Vec<PaintMatch>),
    /// Search rejected its input
    Failed(MatchError),
    /// A newer request replaced this one before it ran
    Superseded,
}

/// Response for one request, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResponse {
    /// Id returned by [`MatchWorker::request`]
    pub id: u64,
    /// Target color as requested
    pub target_hex: String,
    pub outcome: MatchOutcome,
}

/// Request to rank a target color, sent to the background thread.
#[derive(Debug)]
struct MatchRequest {
    id: u64,
    target_hex: String,
    k: usize,
}

impl MatchRequest {
    fn superseded(self) -> MatchResponse {
        MatchResponse {
            id: self.id,
            target_hex: self.target_hex,
            outcome: MatchOutcome::Superseded,
        }
    }
}

/// Catalog and ownership data shared with the thread.
#[derive(Debug, Clone)]
struct Snapshot {
    catalog: Arc<Catalog>,
    owned: Arc<OwnershipSet>,
}

/// Message sent to the worker thread.
enum ThreadMessage {
    /// Rank a target color
    Search(MatchRequest),
    /// Replace the snapshot for subsequent searches
    UpdateSnapshot(Snapshot),
    /// Shutdown the thread
    Shutdown,
}

/// Outcome of draining the queue behind one request.
struct Coalesced {
    latest: MatchRequest,
    superseded: Vec<MatchRequest>,
    /// Snapshot sent after `latest`; applies once `latest` has run
    next_snapshot: Option<Snapshot>,
    shutdown: bool,
}

/// Drain searches already queued behind `first`, keeping only the newest.
///
/// Draining stops at the first snapshot update or shutdown, so a request is
/// always ranked against the snapshot in force when it was sent.
fn coalesce(first: MatchRequest, rx: &Receiver<ThreadMessage>) -> Coalesced {
    let mut latest = first;
    let mut superseded = Vec::new();
    let mut next_snapshot = None;
    let mut shutdown = false;

    loop {
        match rx.try_recv() {
            Ok(ThreadMessage::Search(newer)) => {
                superseded.push(std::mem::replace(&mut latest, newer));
            }
            Ok(ThreadMessage::UpdateSnapshot(next)) => {
                next_snapshot = Some(next);
                break;
            }
            Ok(ThreadMessage::Shutdown) => {
                shutdown = true;
                break;
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        }
    }

    Coalesced {
        latest,
        superseded,
        next_snapshot,
        shutdown,
    }
}

/// Manages a background thread for paint matching.
pub struct MatchWorker {
    /// Sender for requests to the background thread
    request_tx: Sender<ThreadMessage>,
    /// Receiver for responses from the background thread
    result_rx: Receiver<MatchResponse>,
    /// Handle to the background thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
    /// Counter for generating unique request IDs
    next_id: u64,
    /// Ids sent but not yet answered
    pending: HashSet<u64>,
}

impl MatchWorker {
    /// Spawn a worker over the given snapshot.
    pub fn spawn(catalog: Arc<Catalog>, owned: Arc<OwnershipSet>) -> io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<MatchResponse>();
        let snapshot = Snapshot { catalog, owned };

        let thread_handle = thread::Builder::new()
            .name("paint-matcher".to_string())
            .spawn(move || {
                log::info!("Paint matcher thread started");
                Self::thread_loop(snapshot, request_rx, result_tx);
                log::info!("Paint matcher thread exiting");
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            next_id: 0,
            pending: HashSet::new(),
        })
    }

    /// Background thread main loop.
    fn thread_loop(
        mut snapshot: Snapshot,
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<MatchResponse>,
    ) {
        while let Ok(message) = request_rx.recv() {
            let first = match message {
                ThreadMessage::Search(request) => request,
                ThreadMessage::UpdateSnapshot(next) => {
                    log::debug!("Snapshot updated: {} entries", next.catalog.len());
                    snapshot = next;
                    continue;
                }
                ThreadMessage::Shutdown => {
                    log::debug!("Received shutdown signal");
                    return;
                }
            };

            let batch = coalesce(first, &request_rx);
            if !batch.superseded.is_empty() {
                log::debug!(
                    "Coalesced {} stale requests into request {}",
                    batch.superseded.len(),
                    batch.latest.id
                );
            }

            let responses = batch
                .superseded
                .into_iter()
                .map(MatchRequest::superseded)
                .chain(std::iter::once(Self::run_search(&snapshot, batch.latest)));
            for response in responses {
                if result_tx.send(response).is_err() {
                    log::warn!("Result channel closed, matcher thread exiting");
                    return;
                }
            }

            if let Some(next) = batch.next_snapshot {
                log::debug!("Snapshot updated: {} entries", next.catalog.len());
                snapshot = next;
            }
            if batch.shutdown {
                log::debug!("Received shutdown signal");
                return;
            }
        }
        log::debug!("Request channel closed, matcher thread exiting");
    }

    fn run_search(snapshot: &Snapshot, request: MatchRequest) -> MatchResponse {
        let outcome = match crate::match_paints(
            &request.target_hex,
            snapshot.catalog.entries(),
            &snapshot.owned,
            request.k,
        ) {
            Ok(matches) => {
                MatchOutcome::Ranked(matches.iter().map(|m| m.to_owned_match()).collect())
            }
            Err(e) => {
                log::debug!("Request {} failed: {}", request.id, e);
                MatchOutcome::Failed(e)
            }
        };
        MatchResponse {
            id: request.id,
            target_hex: request.target_hex,
            outcome,
        }
    }

    /// Queue a search and return its id.
    pub fn request(&mut self, target_hex: impl Into<String>, k: usize) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let request = MatchRequest {
            id,
            target_hex: target_hex.into(),
            k,
        };

        if self.request_tx.send(ThreadMessage::Search(request)).is_err() {
            log::error!("Failed to send match request: channel closed");
        } else {
            self.pending.insert(id);
            log::debug!("Sent match request {}", id);
        }
        id
    }

    /// Replace the catalog and ownership snapshot for later requests.
    pub fn update_snapshot(&self, catalog: Arc<Catalog>, owned: Arc<OwnershipSet>) {
        let message = ThreadMessage::UpdateSnapshot(Snapshot { catalog, owned });
        if self.request_tx.send(message).is_err() {
            log::error!("Failed to send snapshot update: channel closed");
        }
    }

    /// Take one completed response, if any. Non-blocking.
    pub fn take_one_result(&mut self) -> Option<MatchResponse> {
        match self.result_rx.try_recv() {
            Ok(response) => {
                self.pending.remove(&response.id);
                Some(response)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Matcher thread disconnected");
                None
            }
        }
    }

    /// Block until the next response arrives.
    ///
    /// Returns `None` when nothing is pending or the thread has gone away.
    pub fn wait_result(&mut self) -> Option<MatchResponse> {
        if self.pending.is_empty() {
            return None;
        }
        match self.result_rx.recv() {
            Ok(response) => {
                self.pending.remove(&response.id);
                Some(response)
            }
            Err(_) => {
                log::warn!("Matcher thread disconnected");
                None
            }
        }
    }

    /// Number of requests sent but not yet answered.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if a specific request is still unanswered.
    pub fn is_pending(&self, id: u64) -> bool {
        self.pending.contains(&id)
    }
}

impl Drop for MatchWorker {
    fn drop(&mut self) {
        log::debug!("Shutting down paint matcher thread");

        let _ = self.request_tx.send(ThreadMessage::Shutdown);

        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Matcher thread panicked: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::color::MatchBand;

    fn snapshot() -> (Arc<Catalog>, Arc<OwnershipSet>) {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("black", "Black", "Citadel", "#000000"),
            CatalogEntry::new("white", "White", "Citadel", "#FFFFFF"),
            CatalogEntry::new("red", "Red", "Vallejo", "#FE0000"),
        ]);
        let owned = OwnershipSet::from_iter(["red"]);
        (Arc::new(catalog), Arc::new(owned))
    }

    fn request(id: u64, target_hex: &str) -> MatchRequest {
        MatchRequest {
            id,
            target_hex: target_hex.to_string(),
            k: 1,
        }
    }

    fn ranked_ids(response: &MatchResponse) -> Vec<String> {
        match &response.outcome {
            MatchOutcome::Ranked(matches) => matches.iter().map(|m| m.entry.id.clone()).collect(),
            other => panic!("Expected Ranked, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_ranks_and_annotates() {
        let (catalog, owned) = snapshot();
        let mut worker = MatchWorker::spawn(catalog, owned).unwrap();

        let id = worker.request("#FF0000", 2);
        assert!(worker.is_pending(id));

        let response = worker.wait_result().unwrap();
        assert_eq!(response.id, id);
        assert_eq!(response.target_hex, "#FF0000");
        match response.outcome {
            MatchOutcome::Ranked(matches) => {
                assert_eq!(matches.len(), 2);
                assert_eq!(matches[0].entry.id, "red");
                assert!(matches[0].owned);
                assert_eq!(matches[0].band(), MatchBand::Perfect);
            }
            other => panic!("Expected Ranked, got {:?}", other),
        }
        assert_eq!(worker.pending_count(), 0);
    }

    #[test]
    fn test_worker_reports_invalid_input() {
        let (catalog, owned) = snapshot();
        let mut worker = MatchWorker::spawn(catalog, owned).unwrap();

        worker.request("red", 1);
        let response = worker.wait_result().unwrap();
        assert_eq!(
            response.outcome,
            MatchOutcome::Failed(MatchError::invalid_color("red"))
        );

        worker.request("#000000", 0);
        let response = worker.wait_result().unwrap();
        assert_eq!(response.outcome, MatchOutcome::Failed(MatchError::InvalidTopK));
    }

    #[test]
    fn test_every_request_answered_in_order() {
        let (catalog, owned) = snapshot();
        let mut worker = MatchWorker::spawn(catalog, owned).unwrap();

        let ids: Vec<u64> = ["#000000", "#ffffff", "#ff0000", "#010101"]
            .into_iter()
            .map(|hex| worker.request(hex, 1))
            .collect();

        let mut answered = Vec::new();
        let mut last = None;
        while let Some(response) = worker.wait_result() {
            answered.push(response.id);
            last = Some(response);
        }

        assert_eq!(answered, ids);
        // The newest request is never superseded.
        assert_eq!(ranked_ids(&last.unwrap()), ["black"]);
    }

    #[test]
    fn test_snapshot_update_applies_to_later_requests() {
        let (catalog, owned) = snapshot();
        let mut worker = MatchWorker::spawn(catalog, owned).unwrap();

        let replacement = Catalog::new(vec![CatalogEntry::new("navy", "Navy", "P3", "#000080")]);
        worker.update_snapshot(Arc::new(replacement), Arc::new(OwnershipSet::new()));
        worker.request("#000000", 1);

        let response = worker.wait_result().unwrap();
        assert_eq!(ranked_ids(&response), ["navy"]);
    }

    #[test]
    fn test_take_one_result_without_requests() {
        let (catalog, owned) = snapshot();
        let mut worker = MatchWorker::spawn(catalog, owned).unwrap();
        assert!(worker.take_one_result().is_none());
        assert!(worker.wait_result().is_none());
    }

    #[test]
    fn test_coalesce_keeps_newest_search() {
        let (tx, rx) = mpsc::channel();
        tx.send(ThreadMessage::Search(request(1, "#111111"))).unwrap();
        tx.send(ThreadMessage::Search(request(2, "#222222"))).unwrap();

        let batch = coalesce(request(0, "#000000"), &rx);

        assert_eq!(batch.latest.id, 2);
        let stale: Vec<u64> = batch.superseded.iter().map(|r| r.id).collect();
        assert_eq!(stale, [0, 1]);
        assert!(batch.next_snapshot.is_none());
        assert!(!batch.shutdown);
    }

    #[test]
    fn test_coalesce_stops_at_snapshot_update() {
        let (tx, rx) = mpsc::channel();
        tx.send(ThreadMessage::Search(request(1, "#111111"))).unwrap();
        tx.send(ThreadMessage::UpdateSnapshot(Snapshot {
            catalog: Arc::new(Catalog::default()),
            owned: Arc::new(OwnershipSet::new()),
        }))
        .unwrap();
        tx.send(ThreadMessage::Search(request(2, "#222222"))).unwrap();

        let batch = coalesce(request(0, "#000000"), &rx);

        assert_eq!(batch.latest.id, 1);
        let stale: Vec<u64> = batch.superseded.iter().map(|r| r.id).collect();
        assert_eq!(stale, [0]);
        assert!(batch.next_snapshot.is_some());
        // The search sent after the update stays queued for the next batch.
        match rx.try_recv() {
            Ok(ThreadMessage::Search(next)) => assert_eq!(next.id, 2),
            _ => panic!("Expected request 2 to remain queued"),
        }
    }

    #[test]
    fn test_request_before_update_uses_old_snapshot() {
        let (catalog, owned) = snapshot();
        let old = Snapshot { catalog, owned };
        let (tx, rx) = mpsc::channel();
        let replacement = Catalog::new(vec![CatalogEntry::new("navy", "Navy", "P3", "#000080")]);
        tx.send(ThreadMessage::UpdateSnapshot(Snapshot {
            catalog: Arc::new(replacement),
            owned: Arc::new(OwnershipSet::new()),
        }))
        .unwrap();

        let batch = coalesce(request(0, "#000000"), &rx);
        let response = MatchWorker::run_search(&old, batch.latest);
        assert_eq!(ranked_ids(&response), ["black"]);

        let next = batch.next_snapshot.expect("update held for later requests");
        let response = MatchWorker::run_search(&next, request(1, "#000000"));
        assert_eq!(ranked_ids(&response), ["navy"]);
    }

    #[test]
    fn test_worker_answers_from_snapshot_in_force_at_request() {
        let (catalog, owned) = snapshot();
        let mut worker = MatchWorker::spawn(catalog, owned).unwrap();

        let replacement = Catalog::new(vec![CatalogEntry::new("navy", "Navy", "P3", "#000080")]);
        let before = worker.request("#000000", 1);
        worker.update_snapshot(Arc::new(replacement), Arc::new(OwnershipSet::new()));
        let after = worker.request("#000000", 1);

        let first = worker.wait_result().unwrap();
        assert_eq!(first.id, before);
        assert_eq!(ranked_ids(&first), ["black"]);
        let second = worker.wait_result().unwrap();
        assert_eq!(second.id, after);
        assert_eq!(ranked_ids(&second), ["navy"]);
    }

    #[test]
    fn test_coalesce_stops_at_shutdown() {
        let (tx, rx) = mpsc::channel();
        tx.send(ThreadMessage::Shutdown).unwrap();
        tx.send(ThreadMessage::Search(request(9, "#999999"))).unwrap();

        let batch = coalesce(request(3, "#333333"), &rx);
        assert_eq!(batch.latest.id, 3);
        assert!(batch.superseded.is_empty());
        assert!(batch.shutdown);
    }

    #[test]
    fn test_superseded_response_keeps_target() {
        let response = request(5, "#abcdef").superseded();
        assert_eq!(response.id, 5);
        assert_eq!(response.target_hex, "#abcdef");
        assert_eq!(response.outcome, MatchOutcome::Superseded);
    }
}
