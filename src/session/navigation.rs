//! Match navigation and deferred highlight work for `SearchSession`.
//!
//! Showing a match is split in three steps so the viewer can render in
//! between: scroll the page into view now, locate and mark once the page has
//! settled, then scroll the first marked fragment into view if it is not
//! already visible. The last two are scheduled tasks; showing another match
//! cancels whichever of them is still pending.

use std::time::Instant;

use super::{Deferred, SearchSession};
use crate::locate::locate_and_highlight;
use crate::schedule::TaskSlot;
use crate::viewer::Viewer;

impl SearchSession {
    /// Show the match at the current index. No-op without matches.
    pub fn highlight_current(&mut self, viewer: &mut dyn Viewer, now: Instant) {
        let Some(current) = self.state.current().cloned() else {
            return;
        };

        viewer.scroll_page_into_view(current.page);

        let phrase = self.config.phrase_for(&current.text);
        self.tasks.cancel(TaskSlot::Scroll);
        let superseded = self.tasks.schedule(
            TaskSlot::Locate,
            now,
            self.config.render_settle_delay,
            Deferred::Locate {
                page: current.page,
                phrase,
            },
        );
        if superseded {
            log::debug!("Dropped a pending locate for an earlier match");
        }

        let (index, total) = (self.state.current_index, self.state.matches.len());
        self.report(index + 1, total);
    }

    /// Advance to the next match, wrapping to the first.
    pub fn next(&mut self, viewer: &mut dyn Viewer, now: Instant) {
        let total = self.state.matches.len();
        if total == 0 {
            return;
        }
        self.state.current_index = (self.state.current_index + 1) % total;
        self.highlight_current(viewer, now);
    }

    /// Step back to the previous match, wrapping to the last.
    pub fn previous(&mut self, viewer: &mut dyn Viewer, now: Instant) {
        let total = self.state.matches.len();
        if total == 0 {
            return;
        }
        self.state.current_index = (self.state.current_index + total - 1) % total;
        self.highlight_current(viewer, now);
    }

    /// Jump to match `index` if it exists. Returns whether it did.
    pub fn select(&mut self, index: usize, viewer: &mut dyn Viewer, now: Instant) -> bool {
        if index >= self.state.matches.len() {
            return false;
        }
        self.state.current_index = index;
        self.highlight_current(viewer, now);
        true
    }

    /// Apply arrived backend responses, then run every task due by `now`.
    /// Call from the host's event loop.
    pub fn poll(&mut self, viewer: &mut dyn Viewer, now: Instant) {
        self.drain_responses(viewer, now);
        while let Some((_, task)) = self.tasks.take_due(now) {
            self.run_task(task, viewer, now);
        }
    }

    /// When the next deferred task is due, if any.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.next_due()
    }

    /// Drive the session on the wall clock until no request or task is
    /// left. Blocks the calling thread.
    pub fn settle(&mut self, viewer: &mut dyn Viewer) {
        loop {
            self.finish_searches(viewer, Instant::now());
            let Some(due) = self.tasks.next_due() else {
                break;
            };
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
            self.poll(viewer, Instant::now());
        }
    }

    fn run_task(&mut self, task: Deferred, viewer: &mut dyn Viewer, now: Instant) {
        match task {
            Deferred::Locate { page, phrase } => {
                let first = locate_and_highlight(
                    viewer,
                    &mut self.highlights,
                    page,
                    &phrase,
                    self.config.window_chars,
                );
                if let Some(fragment) = first {
                    self.tasks.schedule(
                        TaskSlot::Scroll,
                        now,
                        self.config.scroll_delay,
                        Deferred::Scroll { fragment },
                    );
                }
            }
            Deferred::Scroll { fragment } => {
                if viewer.document().get(&fragment).is_none() {
                    log::debug!("Fragment {} re-rendered before scroll", fragment);
                    return;
                }
                if !viewer.is_fully_visible(&fragment) {
                    viewer.scroll_into_view(&fragment);
                    self.state.last_highlighted = Some(fragment);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::testing::{marked_by_page, session, snapshot, viewer, CannedBackend};
    use super::*;
    use crate::highlight::marked_count;
    use crate::net::Match;
    use crate::viewer::ScrollRequest;

    const SETTLE: Duration = Duration::from_millis(200);
    const SCROLL: Duration = Duration::from_millis(100);

    fn three_pages() -> Vec<Match> {
        vec![
            Match::new(1, "first hit on one"),
            Match::new(2, "second hit on two"),
            Match::new(3, "third hit on three"),
        ]
    }

    fn pages_viewer() -> crate::viewer::SnapshotViewer {
        viewer(&[
            (1, &["first hit ", "on one"]),
            (2, &["second ", "hit on two"]),
            (3, &["third hit on three"]),
        ])
    }

    #[test]
    fn highlight_current_without_matches_is_noop() {
        let (mut s, counts) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        s.highlight_current(&mut v, Instant::now());
        assert!(v.scrolls().is_empty());
        assert!(counts.borrow().is_empty());
        assert!(s.is_idle());
    }

    #[test]
    fn next_and_previous_wrap() {
        let (mut s, counts) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(three_pages()), &mut v, t0);
        s.next(&mut v, t0);
        s.next(&mut v, t0);
        s.next(&mut v, t0);
        s.previous(&mut v, t0);
        assert_eq!(s.state().current_index, 2);
        assert_eq!(
            *counts.borrow(),
            vec![(1, 3), (2, 3), (3, 3), (1, 3), (3, 3)]
        );
        let pages: Vec<ScrollRequest> = [1, 2, 3, 1, 3].into_iter().map(ScrollRequest::Page).collect();
        assert_eq!(v.scrolls(), pages.as_slice());
    }

    #[test]
    fn select_rejects_out_of_range() {
        let (mut s, _) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(three_pages()), &mut v, t0);
        assert!(!s.select(3, &mut v, t0));
        assert!(s.select(1, &mut v, t0));
        assert_eq!(s.state().current_index, 1);
    }

    #[test]
    fn navigating_moves_the_highlight() {
        let (mut s, _) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(three_pages()), &mut v, t0);
        s.poll(&mut v, t0 + SETTLE);
        assert_eq!(marked_by_page(&v)[&1], vec!["first hit ", "on one"]);

        let t1 = t0 + SETTLE;
        s.next(&mut v, t1);
        s.poll(&mut v, t1 + SETTLE);
        let marked = marked_by_page(&v);
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[&2], vec!["second ", "hit on two"]);
    }

    #[test]
    fn rapid_navigation_runs_only_latest_locate() {
        let (mut s, _) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(three_pages()), &mut v, t0);
        s.next(&mut v, t0 + Duration::from_millis(50));
        s.next(&mut v, t0 + Duration::from_millis(100));

        s.poll(&mut v, t0 + SETTLE);
        assert_eq!(marked_count(v.document()), 0);
        s.poll(&mut v, t0 + Duration::from_millis(100) + SETTLE);
        let marked = marked_by_page(&v);
        assert_eq!(marked.keys().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn scrolls_first_fragment_after_delay() {
        let (mut s, _) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(vec![Match::new(2, "hit on two")]), &mut v, t0);

        let located_at = t0 + SETTLE;
        s.poll(&mut v, located_at);
        assert_eq!(v.scrolls().len(), 1);
        s.poll(&mut v, located_at + SCROLL);

        let first = s.highlighted()[0].clone();
        assert_eq!(v.document().get(&first).unwrap().text_content(), "hit on two");
        assert_eq!(v.scrolls().last(), Some(&ScrollRequest::Fragment(first.clone())));
        assert_eq!(s.state().last_highlighted.as_ref(), Some(&first));
        assert!(s.is_idle());
    }

    #[test]
    fn visible_fragment_is_not_scrolled_again() {
        let (mut s, _) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(vec![Match::new(3, "third hit on three")]), &mut v, t0);
        s.poll(&mut v, t0 + SETTLE + SCROLL);
        s.poll(&mut v, t0 + SETTLE + SCROLL * 2);

        let t1 = t0 + SETTLE * 3;
        s.highlight_current(&mut v, t1);
        s.poll(&mut v, t1 + SETTLE);
        s.poll(&mut v, t1 + SETTLE + SCROLL);

        let fragment_scrolls = v
            .scrolls()
            .iter()
            .filter(|r| matches!(r, ScrollRequest::Fragment(_)))
            .count();
        assert_eq!(fragment_scrolls, 1);
    }

    #[test]
    fn already_visible_fragment_is_not_recorded() {
        let (mut s, _) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let layer = v.document().text_layer(2).unwrap();
        v.scroll_page_into_view(2);
        v.scroll_into_view(&layer.child(1));

        let t0 = Instant::now();
        s.apply_results(Ok(vec![Match::new(2, "hit on two")]), &mut v, t0);
        s.poll(&mut v, t0 + SETTLE);
        s.poll(&mut v, t0 + SETTLE + SCROLL);

        assert_eq!(s.highlighted(), &[layer.child(1)]);
        assert_eq!(v.scrolls().len(), 3);
        assert!(s.state().last_highlighted.is_none());
        assert!(s.is_idle());
    }

    #[test]
    fn rerender_before_scroll_drops_the_scroll() {
        let (mut s, _) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(vec![Match::new(2, "hit on two")]), &mut v, t0);
        s.poll(&mut v, t0 + SETTLE);
        assert_eq!(s.highlighted().len(), 1);

        // Page 2 comes back as a single fragment; the marked one is gone
        v.rerender(snapshot(&[
            (1, &["first hit ", "on one"]),
            (2, &["second hit on two"]),
            (3, &["third hit on three"]),
        ]));
        s.poll(&mut v, t0 + SETTLE + SCROLL);

        assert_eq!(v.scrolls(), &[ScrollRequest::Page(2)]);
        assert!(s.state().last_highlighted.is_none());
        assert!(s.is_idle());
    }

    #[test]
    fn phrase_missing_from_page_marks_nothing() {
        let (mut s, counts) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(vec![Match::new(1, "nowhere to be found")]), &mut v, t0);
        s.poll(&mut v, t0 + SETTLE + SCROLL);
        assert_eq!(*counts.borrow(), vec![(1, 1)]);
        assert_eq!(marked_count(v.document()), 0);
        assert!(s.is_idle());
    }

    #[test]
    fn unrendered_page_is_skipped_quietly() {
        let (mut s, _) = session(CannedBackend::ok(Vec::new()));
        let mut v = pages_viewer();
        let t0 = Instant::now();
        s.apply_results(Ok(vec![Match::new(9, "first hit")]), &mut v, t0);
        s.poll(&mut v, t0 + SETTLE + SCROLL);
        assert_eq!(v.scrolls(), &[ScrollRequest::Page(9)]);
        assert_eq!(marked_count(v.document()), 0);
    }

    #[test]
    fn settle_runs_everything_on_the_wall_clock() {
        let backend = CannedBackend::ok(vec![Match::new(2, "second hit on two")]);
        let (mut s, counts) = session(backend);
        let mut v = pages_viewer();
        s.search("second");
        s.settle(&mut v);
        assert!(s.is_idle());
        assert_eq!(*counts.borrow(), vec![(1, 1)]);
        assert_eq!(marked_by_page(&v)[&2], vec!["second ", "hit on two"]);
        assert!(s.state().last_highlighted.is_some());
    }
}
