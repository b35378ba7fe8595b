//! Highlight marks on text-layer fragments.
//!
//! Two marker classes exist: the active mark applied to the current match and
//! a settled mark some hosts use for previously visited matches. Both are
//! removed together whenever a new highlight begins, across the whole
//! document, so at most one highlighted region is ever shown.

use crate::dom::{DomNode, DomTree, NodePath};

/// Class applied to fragments of the current match.
pub const ACTIVE_CLASS: &str = "backend-highlight";

/// Class for previously visited matches. Only ever cleared here.
pub const SETTLED_CLASS: &str = "post-match-highlight";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Active,
    Settled,
}

impl MarkKind {
    pub const ALL: [MarkKind; 2] = [MarkKind::Active, MarkKind::Settled];

    pub fn class(self) -> &'static str {
        match self {
            MarkKind::Active => ACTIVE_CLASS,
            MarkKind::Settled => SETTLED_CLASS,
        }
    }
}

/// Remove every mark of either kind from the subtree. Returns how many
/// class entries were removed.
pub fn clear_marks(node: &mut DomNode) -> usize {
    let mut removed = 0;
    node.for_each_element_mut(&mut |el| {
        for kind in MarkKind::ALL {
            if el.remove_class(kind.class()) {
                removed += 1;
            }
        }
    });
    removed
}

/// Document-wide clear of both mark kinds.
pub fn clear_all(doc: &mut DomTree) -> usize {
    clear_marks(&mut doc.root)
}

/// Number of elements in the document carrying any mark.
pub fn marked_count(doc: &DomTree) -> usize {
    MarkKind::ALL
        .iter()
        .map(|k| doc.root.count_class(k.class()))
        .sum()
}

/// The set of fragments currently carrying the active mark.
///
/// Starting a session clears whatever the previous one marked, plus any
/// stray marks elsewhere in the document (pages the user has since left,
/// settled marks set by the host).
#[derive(Debug, Default)]
pub struct HighlightSession {
    marked: Vec<NodePath>,
}

impl HighlightSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the previous session's marks and start an empty one.
    pub fn begin(&mut self, doc: &mut DomTree) {
        for path in self.marked.drain(..) {
            // Paths may be stale after a re-render; the sweep below covers them.
            if let Some(node) = doc.get_mut(&path) {
                node.remove_class(ACTIVE_CLASS);
            }
        }
        let swept = clear_all(doc);
        if swept > 0 {
            log::debug!("Cleared {} stray highlight marks", swept);
        }
    }

    /// Apply the active mark to each fragment. Duplicate paths are marked once.
    pub fn mark(&mut self, doc: &mut DomTree, fragments: &[NodePath]) {
        for path in fragments {
            if self.marked.contains(path) {
                continue;
            }
            match doc.get_mut(path) {
                Some(node) => {
                    node.add_class(ACTIVE_CLASS);
                    self.marked.push(path.clone());
                }
                None => log::warn!("Fragment {} vanished before it could be marked", path),
            }
        }
    }

    /// End the session, clearing its marks document-wide.
    pub fn clear(&mut self, doc: &mut DomTree) {
        self.begin(doc);
    }

    pub fn marked(&self) -> &[NodePath] {
        &self.marked
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    const DOC: &str = r#"<body>
        <div data-page-number="1"><div class="textLayer"><span>one</span><span class="post-match-highlight">two</span></div></div>
        <div data-page-number="2"><div class="textLayer"><span>three</span><span>four</span></div></div>
    </body>"#;

    fn spans(doc: &DomTree, page: u32) -> Vec<NodePath> {
        let layer = doc.text_layer(page).unwrap();
        let node = doc.get(&layer).unwrap();
        (0..node.children.len()).map(|i| layer.child(i)).collect()
    }

    #[test]
    fn begin_sweeps_both_kinds_everywhere() {
        let mut doc = parse_html(DOC);
        let page1 = spans(&doc, 1);
        doc.get_mut(&page1[0]).unwrap().add_class(ACTIVE_CLASS);
        assert_eq!(marked_count(&doc), 2);

        let mut session = HighlightSession::new();
        session.begin(&mut doc);
        assert_eq!(marked_count(&doc), 0);
        assert!(session.is_empty());
    }

    #[test]
    fn new_session_replaces_previous_marks() {
        let mut doc = parse_html(DOC);
        let page1 = spans(&doc, 1);
        let page2 = spans(&doc, 2);

        let mut session = HighlightSession::new();
        session.begin(&mut doc);
        session.mark(&mut doc, &page1);
        assert_eq!(doc.root.count_class(ACTIVE_CLASS), 2);

        session.begin(&mut doc);
        session.mark(&mut doc, &page2[1..]);
        assert_eq!(doc.root.count_class(ACTIVE_CLASS), 1);
        assert_eq!(session.marked(), &page2[1..]);
        assert!(doc.get(&page2[1]).unwrap().has_class(ACTIVE_CLASS));
    }

    #[test]
    fn marking_twice_is_idempotent() {
        let mut doc = parse_html(DOC);
        let page2 = spans(&doc, 2);
        let mut session = HighlightSession::new();
        session.begin(&mut doc);
        session.mark(&mut doc, &[page2[0].clone(), page2[0].clone()]);
        session.mark(&mut doc, &page2[..1]);
        assert_eq!(session.marked().len(), 1);
        assert_eq!(doc.get(&page2[0]).unwrap().attr("class"), Some(ACTIVE_CLASS));
    }

    #[test]
    fn stale_paths_are_skipped() {
        let mut doc = parse_html(DOC);
        let mut session = HighlightSession::new();
        session.mark(&mut doc, &[NodePath::from(vec![9, 9])]);
        assert!(session.is_empty());
        session.clear(&mut doc);
        assert_eq!(marked_count(&doc), 0);
    }
}
