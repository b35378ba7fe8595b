//! The page viewer the locator drives.
//!
//! A viewer owns the rendered document, can bring a page into view, and can
//! scroll an individual fragment into the viewport. `SnapshotViewer` is an
//! in-memory viewer over a parsed HTML snapshot; it records every scroll
//! request so callers can replay or inspect them.

use crate::dom::{DomTree, NodePath};

pub trait Viewer {
    /// Ask the viewer to bring `page` (1-based) into view, rendering it if needed.
    fn scroll_page_into_view(&mut self, page: u32);

    fn document(&self) -> &DomTree;

    fn document_mut(&mut self) -> &mut DomTree;

    /// Whether the fragment is entirely inside the current viewport.
    fn is_fully_visible(&self, fragment: &NodePath) -> bool;

    /// Scroll so the fragment sits in the middle of the viewport.
    fn scroll_into_view(&mut self, fragment: &NodePath);
}

/// A scroll the viewer was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollRequest {
    Page(u32),
    Fragment(NodePath),
}

/// Viewer over a static document snapshot.
///
/// Only the fragment most recently scrolled to counts as fully visible, so a
/// repeated highlight of the same match does not move the view again.
pub struct SnapshotViewer {
    doc: DomTree,
    current_page: Option<u32>,
    centered: Option<NodePath>,
    scrolls: Vec<ScrollRequest>,
}

impl SnapshotViewer {
    pub fn new(doc: DomTree) -> Self {
        Self {
            doc,
            current_page: None,
            centered: None,
            scrolls: Vec::new(),
        }
    }

    pub fn current_page(&self) -> Option<u32> {
        self.current_page
    }

    pub fn scrolls(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    /// Replace the document, as a viewer does when it re-renders pages.
    /// Anything centered in the old document is no longer on screen.
    pub fn rerender(&mut self, doc: DomTree) {
        self.doc = doc;
        self.centered = None;
    }
}

impl Viewer for SnapshotViewer {
    fn scroll_page_into_view(&mut self, page: u32) {
        if self.current_page != Some(page) {
            self.centered = None;
        }
        self.current_page = Some(page);
        self.scrolls.push(ScrollRequest::Page(page));
    }

    fn document(&self) -> &DomTree {
        &self.doc
    }

    fn document_mut(&mut self) -> &mut DomTree {
        &mut self.doc
    }

    fn is_fully_visible(&self, fragment: &NodePath) -> bool {
        self.centered.as_ref() == Some(fragment)
    }

    fn scroll_into_view(&mut self, fragment: &NodePath) {
        self.centered = Some(fragment.clone());
        self.scrolls.push(ScrollRequest::Fragment(fragment.clone()));
    }
}
