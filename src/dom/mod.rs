//! Document tree model.
//!
//! Every node of a [`Document`] lives in one arena and is addressed by a
//! [`NodeId`] handle. Parent and child links are stored as handles, so the
//! tree can be restructured freely (move, detach, rename, replace) without
//! shared ownership. Detached nodes stay in the arena until the document is
//! dropped and can be attached again.
//!
//! Handles are never reused inside one document. Cloning a `Document`
//! produces an independent tree in which every handle still refers to the
//! corresponding node, which the extraction engine relies on when it retries
//! a pass on a fresh copy.

mod attributes;
#[cfg(feature = "dom-query")]
mod import;
mod serialize;
mod traverse;

pub use attributes::{Attribute, Attributes};
pub use traverse::{Ancestors, Descendants};

/// Handle to a node inside a [`Document`]: its index in the arena, so every
/// node ever created keeps a distinct id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// An element: lowercase tag name plus attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    /// Attributes in document order.
    pub attrs: Attributes,
}

impl Element {
    #[must_use]
    pub fn new(name: &str, attrs: Attributes) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs,
        }
    }

    /// Lowercase tag name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document root. Exactly one per tree, never detached.
    Document,
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An owned document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    doctype: Option<String>,
    document_uri: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            doctype: None,
            document_uri: None,
        }
    }

    /// Parse `html` without an element ceiling, discarding diagnostics.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        crate::parser::parse_markup(html, None, 0).document
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Name recorded from `<!DOCTYPE ...>`, if any.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub fn set_doctype(&mut self, doctype: Option<String>) {
        self.doctype = doctype;
    }

    /// URI the document was loaded from.
    #[must_use]
    pub fn document_uri(&self) -> Option<&str> {
        self.document_uri.as_deref()
    }

    pub fn set_document_uri(&mut self, uri: Option<String>) {
        self.document_uri = uri;
    }

    /// Number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    // === Construction ===

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(name, Attributes::new())))
    }

    /// Create a detached element with the given attributes.
    pub fn create_element_with_attrs(&mut self, name: &str, attrs: Attributes) -> NodeId {
        self.push(NodeData::Element(Element::new(name, attrs)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Comment(text.into()))
    }

    // === Node access ===

    #[inline]
    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    #[inline]
    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()].data
    }

    #[inline]
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.data(id) {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    #[inline]
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.data_mut(id) {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id), NodeData::Element(_))
    }

    #[inline]
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id), NodeData::Text(_))
    }

    /// Text of a text node.
    #[inline]
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Lowercase tag name, `None` for non-elements.
    #[inline]
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    /// Whether `id` is an element named `tag` (lowercase).
    #[inline]
    #[must_use]
    pub fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Change an element's tag name, keeping attributes, children and
    /// identity.
    pub fn rename(&mut self, id: NodeId, tag: &str) {
        if let Some(element) = self.element_mut(id) {
            element.name = tag.to_ascii_lowercase();
        }
    }

    // === Attributes ===

    #[must_use]
    pub fn attrs(&self, id: NodeId) -> Option<&Attributes> {
        self.element(id).map(|element| &element.attrs)
    }

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attrs.get(name)
    }

    #[must_use]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.element(id)
            .is_some_and(|element| element.attrs.contains(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.attrs.set(name, value);
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.attrs.remove(name)
    }

    /// `id` attribute, empty when absent.
    #[must_use]
    pub fn id_attr(&self, id: NodeId) -> &str {
        self.attr(id, "id").unwrap_or_default()
    }

    /// `class` attribute, empty when absent.
    #[must_use]
    pub fn class_name(&self, id: NodeId) -> &str {
        self.attr(id, "class").unwrap_or_default()
    }

    // === Structure ===

    #[inline]
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Element children in order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.is_element(c))
    }

    #[must_use]
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        self.children(parent)[index + 1..]
            .iter()
            .copied()
            .find(|&c| self.is_element(c))
    }

    #[must_use]
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        self.children(parent)[..index]
            .iter()
            .rev()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// Whether `node` is `ancestor` or lies inside it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether `id` is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(self.root(), id)
    }

    // === Mutation ===

    /// Detach `id` from its parent. The subtree stays intact and can be
    /// re-attached. Detaching the root is a no-op.
    pub fn detach(&mut self, id: NodeId) {
        if let Some((parent, index)) = self.index_in_parent(id) {
            self.nodes[parent.index()].children.remove(index);
        }
        self.nodes[id.index()].parent = None;
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Requests that would create a cycle, or move the root, are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if child == self.root() || self.contains(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Move `child` directly before `reference`, which must be attached to
    /// some parent.
    pub fn insert_before(&mut self, reference: NodeId, child: NodeId) {
        if child == reference || child == self.root() {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        if self.contains(child, parent) {
            return;
        }
        self.detach(child);
        if let Some((_, index)) = self.index_in_parent(reference) {
            self.nodes[child.index()].parent = Some(parent);
            self.nodes[parent.index()].children.insert(index, child);
        }
    }

    /// Put `new` where `old` is and detach `old`.
    ///
    /// `new` may currently live inside `old`; it is moved out first.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new || new == self.root() {
            return;
        }
        let Some(parent) = self.parent(old) else {
            return;
        };
        if self.contains(new, parent) {
            return;
        }
        self.detach(new);
        if let Some((_, index)) = self.index_in_parent(old) {
            self.nodes[parent.index()].children[index] = new;
            self.nodes[new.index()].parent = Some(parent);
            self.nodes[old.index()].parent = None;
        }
    }

    /// Append text to `parent`, merging with a trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.last_child(parent) {
            if let NodeData::Text(existing) = self.data_mut(last) {
                existing.push_str(text);
                return;
            }
        }
        let node = self.create_text(text);
        self.append_child(parent, node);
    }

    /// Deep copy of the subtree at `id`. The copy is detached and all of its
    /// nodes get fresh handles.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let data = self.data(id).clone();
        let copy = self.push(data);
        let mut pending = vec![(id, copy)];
        while let Some((source, target)) = pending.pop() {
            let children = self.children(source).to_vec();
            for child in children {
                let data = self.data(child).clone();
                let child_copy = self.push(data);
                self.append_child(target, child_copy);
                pending.push((child, child_copy));
            }
        }
        copy
    }

    /// Move every child of `from` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = self.children(from).to_vec();
        for child in children {
            self.append_child(to, child);
        }
    }

    // === Queries ===

    /// Concatenated text of every text node under `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let NodeData::Text(text) = self.data(id) {
            return text.clone();
        }
        let mut out = String::new();
        for node in self.descendants(id) {
            if let NodeData::Text(text) = self.data(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Descendant elements of `id` named `tag` in document order; `"*"`
    /// matches every element. `id` itself is never included.
    #[must_use]
    pub fn elements_by_tag_name(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&node| match self.tag_name(node) {
                Some(name) => tag == "*" || name == tag,
                None => false,
            })
            .collect()
    }

    /// Descendant elements whose tag is one of `tags`, in document order.
    #[must_use]
    pub fn elements_by_tag_names(&self, id: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&node| self.tag_name(node).is_some_and(|name| tags.contains(&name)))
            .collect()
    }

    /// Number of elements attached to the tree.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.descendants(self.root())
            .filter(|&node| self.is_element(node))
            .count()
    }

    /// First element child of the root.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(self.root())
    }

    /// First `body` element in document order.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.first_by_tag("body")
    }

    /// First `head` element in document order.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.first_by_tag("head")
    }

    fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&node| self.has_tag(node, tag))
    }

    /// Text of the first `<title>` element with whitespace collapsed.
    #[must_use]
    pub fn title(&self) -> String {
        self.first_by_tag("title")
            .map(|title| {
                self.text_content(title)
                    .split_ascii_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }
}
