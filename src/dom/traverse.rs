//! Lazy tree iterators.

use super::{Document, NodeId};

/// Pre-order iterator over the descendants of a node (the node itself is
/// excluded). Created by [`Document::descendants`]; call it again to restart.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    doc: &'a Document,
    scope: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.following(current, self.scope);
        Some(current)
    }
}

/// Iterator over the ancestors of a node, nearest first, ending with the
/// document root.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

impl Document {
    /// Descendants of `id` in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            scope: id,
            next: self.first_child(id),
        }
    }

    /// Ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Up to `max_depth` ancestors of `id`, nearest first. `0` means all.
    #[must_use]
    pub fn ancestors_up_to(&self, id: NodeId, max_depth: usize) -> Vec<NodeId> {
        let ancestors = self.ancestors(id);
        if max_depth == 0 {
            ancestors.collect()
        } else {
            ancestors.take(max_depth).collect()
        }
    }

    /// Next node after `node` in pre-order, staying inside `scope`.
    fn following(&self, node: NodeId, scope: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        loop {
            if current == scope {
                return None;
            }
            if let Some(sibling) = self.next_sibling(current) {
                return Some(sibling);
            }
            current = self.parent(current)?;
        }
    }
}
