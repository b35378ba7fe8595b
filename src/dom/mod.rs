pub mod parser;

use std::collections::HashMap;

/// Attribute carrying the 1-based page number on a rendered page container.
pub const PAGE_NUMBER_ATTR: &str = "data-page-number";

/// Class of the element holding a page's text fragments.
pub const TEXT_LAYER_CLASS: &str = "textLayer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
}

/// Child-index path from the tree root down to a node.
///
/// A path is a handle, not a reference: it does not keep the node alive and
/// silently stops resolving once the page is re-rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `idx`-th child of this node.
    pub fn child(&self, idx: usize) -> Self {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.extend_from_slice(&self.0);
        steps.push(idx);
        Self(steps)
    }

    pub fn steps(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(steps: Vec<usize>) -> Self {
        Self(steps)
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Owned DOM node of a rendered viewer page.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

impl DomNode {
    pub fn document(children: Vec<DomNode>) -> Self {
        Self {
            tag: "#document".into(),
            attributes: HashMap::new(),
            text: String::new(),
            children,
            node_type: NodeType::Document,
        }
    }

    pub fn element(
        tag: impl Into<String>,
        attrs: HashMap<String, String>,
        children: Vec<DomNode>,
    ) -> Self {
        Self {
            tag: tag.into(),
            attributes: attrs,
            text: String::new(),
            children,
            node_type: NodeType::Element,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: content.into(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Concatenated text of every descendant text node, in document order,
    /// with no separators added (the DOM's `textContent`).
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.text_content_inner(&mut buf);
        buf
    }

    fn text_content_inner(&self, buf: &mut String) {
        if self.node_type == NodeType::Text {
            buf.push_str(&self.text);
        }
        for child in &self.children {
            child.text_content_inner(buf);
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add `class` to the class list. Returns `false` if it was already present.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let entry = self.attributes.entry("class".to_string()).or_default();
        if !entry.trim().is_empty() {
            entry.push(' ');
        }
        entry.push_str(class);
        true
    }

    /// Remove `class` from the class list. Returns `true` if it was present.
    pub fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = kept.join(" ");
        if joined.is_empty() {
            self.attributes.remove("class");
        } else {
            self.attributes.insert("class".to_string(), joined);
        }
        true
    }

    /// Whether any child is an element (text-only nodes are leaves).
    pub fn has_element_children(&self) -> bool {
        self.children.iter().any(|c| c.is_element())
    }

    /// Resolve a path relative to this node.
    pub fn get(&self, path: &NodePath) -> Option<&DomNode> {
        let mut node = self;
        for &idx in path.steps() {
            node = node.children.get(idx)?;
        }
        Some(node)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut DomNode> {
        let mut node = self;
        for &idx in path.steps() {
            node = node.children.get_mut(idx)?;
        }
        Some(node)
    }

    /// First node in pre-order (this node included) matching `pred`.
    /// `base` is this node's own path; the returned path extends it.
    pub fn find<F>(&self, base: &NodePath, pred: &F) -> Option<NodePath>
    where
        F: Fn(&DomNode) -> bool,
    {
        if pred(self) {
            return Some(base.clone());
        }
        self.children
            .iter()
            .enumerate()
            .find_map(|(i, child)| child.find(&base.child(i), pred))
    }

    /// Visit every element of this subtree mutably, in pre-order.
    pub fn for_each_element_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut DomNode),
    {
        if self.is_element() {
            f(self);
        }
        for child in &mut self.children {
            child.for_each_element_mut(f);
        }
    }

    /// Count elements of this subtree carrying `class`.
    pub fn count_class(&self, class: &str) -> usize {
        let own = usize::from(self.is_element() && self.has_class(class));
        own + self
            .children
            .iter()
            .map(|c| c.count_class(class))
            .sum::<usize>()
    }
}

/// Parsed viewer document with metadata
#[derive(Debug, Clone)]
pub struct DomTree {
    pub root: DomNode,
    pub title: String,
}

impl DomTree {
    /// Path of the rendered container for `page`, if the viewer has rendered it.
    pub fn page_container(&self, page: u32) -> Option<NodePath> {
        let wanted = page.to_string();
        self.root.find(&NodePath::root(), &|n: &DomNode| {
            n.is_element() && n.attr(PAGE_NUMBER_ATTR) == Some(wanted.as_str())
        })
    }

    /// Path of the text layer inside the container for `page`.
    pub fn text_layer(&self, page: u32) -> Option<NodePath> {
        let container = self.page_container(page)?;
        let node = self.root.get(&container)?;
        node.find(&container, &|n: &DomNode| {
            n.is_element() && n.has_class(TEXT_LAYER_CLASS)
        })
    }

    pub fn get(&self, path: &NodePath) -> Option<&DomNode> {
        self.root.get(path)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut DomNode> {
        self.root.get_mut(path)
    }
}
