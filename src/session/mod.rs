//! `SearchSession`: the search state of one viewer and everything that
//! mutates it.
//!
//! The methods are split across two sub-modules:
//!
//! - `dispatch`: backend queries and applying their results
//! - `navigation`: showing the current match, next/previous, deferred tasks
//!
//! Backend requests run on worker threads and report back over a channel;
//! all state changes happen on the thread that owns the session, inside
//! `poll`, `finish_searches` or the navigation calls.

pub mod dispatch;
pub mod navigation;

use std::sync::{mpsc, Arc};

use crate::config::SearchConfig;
use crate::dom::NodePath;
use crate::highlight::HighlightSession;
use crate::net::{Match, SearchBackend, SearchError};
use crate::schedule::Scheduler;

/// Receives "match X of Y" updates; `(0, 0)` means no matches.
pub type MatchCounter = Box<dyn FnMut(usize, usize)>;

/// Search state of the session.
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    /// Last submitted query
    pub query: String,
    /// At most `max_matches` hits in backend order, which is also navigation order
    pub matches: Vec<Match>,
    /// Index into `matches`; meaningless while `matches` is empty
    pub current_index: usize,
    /// Fragment most recently scrolled into view
    pub last_highlighted: Option<NodePath>,
}

impl SearchState {
    pub fn current(&self) -> Option<&Match> {
        self.matches.get(self.current_index)
    }
}

/// Continuations run later by `poll`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Deferred {
    Locate { page: u32, phrase: String },
    Scroll { fragment: NodePath },
}

/// Outcome of one backend request, sent from its worker thread.
pub(crate) struct SearchResponse {
    query: String,
    result: Result<Vec<Match>, SearchError>,
}

pub struct SearchSession {
    config: SearchConfig,
    backend: Arc<dyn SearchBackend>,
    state: SearchState,
    highlights: HighlightSession,
    tasks: Scheduler<Deferred>,
    results_tx: mpsc::Sender<SearchResponse>,
    results_rx: mpsc::Receiver<SearchResponse>,
    in_flight: usize,
    counter: MatchCounter,
}

impl SearchSession {
    pub fn new(
        config: SearchConfig,
        backend: Arc<dyn SearchBackend>,
        counter: impl FnMut(usize, usize) + 'static,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            config,
            backend,
            state: SearchState::default(),
            highlights: HighlightSession::new(),
            tasks: Scheduler::new(),
            results_tx,
            results_rx,
            in_flight: 0,
            counter: Box::new(counter),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Fragments currently carrying the active mark.
    pub fn highlighted(&self) -> &[NodePath] {
        self.highlights.marked()
    }

    /// Backend requests sent but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Nothing in flight and no deferred task pending.
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0 && self.tasks.is_idle()
    }

    fn report(&mut self, current: usize, total: usize) {
        (self.counter)(current, total);
    }
}
