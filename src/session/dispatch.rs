//! Backend queries for `SearchSession`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use super::{SearchResponse, SearchSession};
use crate::net::{Match, SearchError, SearchErrorKind};
use crate::schedule::TaskSlot;
use crate::viewer::Viewer;

impl SearchSession {
    /// Query the backend across all documents.
    pub fn search(&mut self, query: &str) {
        self.dispatch(query, None);
    }

    /// Query the backend within one document.
    pub fn search_in(&mut self, query: &str, document_id: &str) {
        self.dispatch(query, Some(document_id));
    }

    /// Send the request on a worker thread. The response is applied by the
    /// next `poll` (or `finish_searches`) after it arrives. Overlapping
    /// requests are not cancelled: responses apply in arrival order.
    fn dispatch(&mut self, query: &str, document_id: Option<&str>) {
        self.state.query = query.to_string();
        self.in_flight += 1;

        let backend = Arc::clone(&self.backend);
        let tx = self.results_tx.clone();
        let query = query.to_string();
        let document_id = document_id.map(str::to_string);

        std::thread::spawn(move || {
            // A panicking backend still answers, so `in_flight` always drains
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                backend.search(&query, document_id.as_deref())
            }))
            .unwrap_or_else(|_| {
                Err(SearchError::new(
                    SearchErrorKind::Transport,
                    "Search backend panicked",
                ))
            });
            let _ = tx.send(SearchResponse { query, result });
        });
    }

    /// Apply every response that has already arrived. Returns how many.
    pub(crate) fn drain_responses(&mut self, viewer: &mut dyn Viewer, now: Instant) -> usize {
        let mut applied = 0;
        while let Ok(response) = self.results_rx.try_recv() {
            self.apply_response(response, viewer, now);
            applied += 1;
        }
        applied
    }

    /// Block until every in-flight request has been answered and applied.
    pub fn finish_searches(&mut self, viewer: &mut dyn Viewer, now: Instant) {
        while self.in_flight > 0 {
            match self.results_rx.recv() {
                Ok(response) => self.apply_response(response, viewer, now),
                Err(_) => break,
            }
        }
    }

    fn apply_response(&mut self, response: SearchResponse, viewer: &mut dyn Viewer, now: Instant) {
        self.in_flight = self.in_flight.saturating_sub(1);
        log::debug!("Search response for {:?}", response.query);
        self.apply_results(response.result, viewer, now);
    }

    /// Store a backend result and show its first match.
    ///
    /// Keeps at most `max_matches` hits and resets the index to 0. An empty
    /// result or a failed request clears every mark and reports `(0, 0)`.
    pub fn apply_results(
        &mut self,
        result: Result<Vec<Match>, SearchError>,
        viewer: &mut dyn Viewer,
        now: Instant,
    ) {
        let mut matches = match result {
            Ok(matches) => matches,
            Err(e) => {
                log::error!("Backend search error: {}", e);
                Vec::new()
            }
        };
        matches.truncate(self.config.max_matches);
        log::info!("{} matches for {:?}", matches.len(), self.state.query);

        self.state.matches = matches;
        self.state.current_index = 0;

        if self.state.matches.is_empty() {
            self.clear_highlights(viewer);
            self.report(0, 0);
            return;
        }

        self.highlight_current(viewer, now);
    }

    /// Drop pending highlight work and every mark in the document.
    pub fn clear_highlights(&mut self, viewer: &mut dyn Viewer) {
        self.tasks.cancel(TaskSlot::Locate);
        self.tasks.cancel(TaskSlot::Scroll);
        self.highlights.clear(viewer.document_mut());
    }
}
