//! Flat-text view of a fragmented text layer.
//!
//! A page's text layer is a sequence of small elements whose boundaries do not
//! follow word boundaries. `FragmentMap` concatenates their text in document
//! order and keeps one `(fragment, start, len)` run per stretch of text a
//! fragment owns.
//! Run starts are prefix sums, so mapping a flat-text offset back to the
//! fragment that produced it is a binary search instead of a per-character
//! table.
//!
//! All offsets are counted in `char`s.

use std::collections::HashSet;
use std::ops::Range;

use crate::dom::{DomNode, NodePath};

/// Contiguous stretch of flat text produced by a single fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentRun {
    /// Index into `FragmentMap::fragments`
    pub fragment: usize,
    /// Flat-text offset of the first char
    pub start: usize,
    pub len: usize,
}

impl FragmentRun {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Flat text of one text layer plus the run index mapping it back to fragments.
///
/// Built per locate call and dropped afterwards; the viewer may re-render the
/// page between calls.
#[derive(Debug, Clone, Default)]
pub struct FragmentMap {
    fragments: Vec<NodePath>,
    runs: Vec<FragmentRun>,
    text: String,
    char_len: usize,
}

impl FragmentMap {
    /// Enumerate the fragments under `layer` (whose own path is `base`).
    ///
    /// A fragment is an element that owns text directly. Leaf elements own
    /// their whole text; an element mixing text and element children owns
    /// only its direct text nodes, and its element children are fragments of
    /// their own. Every char of the layer's text is owned exactly once.
    pub fn build(layer: &DomNode, base: &NodePath) -> Self {
        let mut map = Self::default();
        for (i, child) in layer.children.iter().enumerate() {
            map.collect(child, base.child(i));
        }
        map
    }

    fn collect(&mut self, node: &DomNode, path: NodePath) {
        if !node.is_element() {
            return;
        }
        if !node.has_element_children() {
            let fragment = self.fragments.len();
            self.fragments.push(path);
            self.push_run(fragment, &node.text_content());
            return;
        }

        let mut own = None;
        for (i, child) in node.children.iter().enumerate() {
            if child.is_element() {
                self.collect(child, path.child(i));
                continue;
            }
            if child.text.is_empty() {
                continue;
            }
            let fragment = match own {
                Some(fragment) => fragment,
                None => {
                    self.fragments.push(path.clone());
                    let fragment = self.fragments.len() - 1;
                    own = Some(fragment);
                    fragment
                }
            };
            self.push_run(fragment, &child.text);
        }
    }

    fn push_run(&mut self, fragment: usize, text: &str) {
        let len = text.chars().count();
        if len == 0 {
            return;
        }
        self.runs.push(FragmentRun {
            fragment,
            start: self.char_len,
            len,
        });
        self.text.push_str(text);
        self.char_len += len;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Flat text length in chars.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    pub fn fragments(&self) -> &[NodePath] {
        &self.fragments
    }

    pub fn runs(&self) -> &[FragmentRun] {
        &self.runs
    }

    pub fn fragment_path(&self, fragment: usize) -> Option<&NodePath> {
        self.fragments.get(fragment)
    }

    /// Fragment owning the char at `offset`. O(log runs).
    pub fn owner_at(&self, offset: usize) -> Option<usize> {
        let idx = self.runs.partition_point(|r| r.end() <= offset);
        self.runs
            .get(idx)
            .filter(|r| r.start <= offset)
            .map(|r| r.fragment)
    }

    /// Distinct fragments owning any char in `range`, in document order.
    pub fn owners_in(&self, range: Range<usize>) -> Vec<usize> {
        let mut owners = Vec::new();
        if range.start >= range.end {
            return owners;
        }
        let mut seen = HashSet::new();
        let first = self.runs.partition_point(|r| r.end() <= range.start);
        for run in self.runs[first..]
            .iter()
            .take_while(|r| r.start < range.end)
        {
            if seen.insert(run.fragment) {
                owners.push(run.fragment);
            }
        }
        owners
    }

    /// Case-insensitive position of `phrase` in the flat text, as a char offset.
    ///
    /// An empty phrase matches at 0.
    pub fn find(&self, phrase: &str) -> Option<usize> {
        let haystack = fold_case(&self.text);
        let needle = fold_case(phrase);
        let byte = haystack.find(&needle)?;
        Some(haystack[..byte].chars().count())
    }
}

/// Lowercase char by char, keeping one output char per input char so folded
/// offsets line up with flat-text offsets. Chars whose lowercase form expands
/// to several chars are left as they are.
pub fn fold_case(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}
