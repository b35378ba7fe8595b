//! Locate a backend phrase inside a page's fragmented text layer.
//!
//! The backend searches a flat string per page; the viewer shows the same text
//! split over many small fragments. `locate` rebuilds the flat text from the
//! fragments, finds the phrase case-insensitively and returns the fragments
//! covering a bounded window from the match start. `locate_and_highlight`
//! runs that against a viewer's live document and marks the result.

pub mod fragment_map;

use std::ops::Range;

use crate::dom::{DomNode, NodePath};
use crate::highlight::HighlightSession;
use crate::viewer::Viewer;

pub use fragment_map::{fold_case, FragmentMap, FragmentRun};

/// A phrase found in a text layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Char range of the phrase itself in the flat text
    pub matched: Range<usize>,
    /// Char range selected for highlighting: match start plus up to the
    /// window size, clamped to the end of the flat text
    pub window: Range<usize>,
    /// Fragments owning any char of the window, in document order, each once
    pub fragments: Vec<NodePath>,
}

impl Located {
    pub fn first_fragment(&self) -> Option<&NodePath> {
        self.fragments.first()
    }
}

/// Find `phrase` in the text layer `layer` (whose own path is `base`).
///
/// Returns `None` when the phrase does not occur; there is no fuzzy or
/// partial-phrase fallback. An empty phrase matches at offset 0.
pub fn locate(layer: &DomNode, base: &NodePath, phrase: &str, window_chars: usize) -> Option<Located> {
    let map = FragmentMap::build(layer, base);
    let start = map.find(phrase)?;
    let matched = start..start + phrase.chars().count();
    let window = start..start + window_chars.min(map.len() - start);

    let fragments = map
        .owners_in(window.clone())
        .into_iter()
        .filter_map(|idx| map.fragment_path(idx).cloned())
        .collect();

    Some(Located {
        matched,
        window,
        fragments,
    })
}

/// Locate `phrase` on `page` and give its fragments the active mark.
///
/// Returns the first marked fragment, which the caller should bring into
/// view. A page that is not rendered yet, or has no text layer, is skipped
/// without touching existing marks. Otherwise all marks are cleared first,
/// even when the phrase then turns out to be missing.
pub fn locate_and_highlight(
    viewer: &mut dyn Viewer,
    session: &mut HighlightSession,
    page: u32,
    phrase: &str,
    window_chars: usize,
) -> Option<NodePath> {
    let Some(layer_path) = viewer.document().text_layer(page) else {
        log::debug!("Page {} has no rendered text layer yet", page);
        return None;
    };

    session.begin(viewer.document_mut());

    let located = {
        let layer = viewer.document().get(&layer_path)?;
        locate(layer, &layer_path, phrase, window_chars)
    };
    let Some(located) = located else {
        log::debug!("Phrase {:?} not found on page {}", phrase, page);
        return None;
    };

    log::debug!(
        "Page {}: phrase at {:?}, marking {} fragments over {:?}",
        page,
        located.matched,
        located.fragments.len(),
        located.window
    );
    session.mark(viewer.document_mut(), &located.fragments);
    located.fragments.into_iter().next()
}
