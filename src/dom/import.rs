//! Import of trees built by `dom_query` (html5ever).
//!
//! Lets callers that already run a standards-compliant parser hand its result to
//! the extraction engine instead of going through the bundled lenient
//! parser. Comments and processing instructions are not carried over.

use dom_query::NodeRef;

use super::{Attributes, Document, NodeId};

impl Document {
    /// Copy the `<html>` tree of a `dom_query` document into a new
    /// [`Document`].
    #[must_use]
    pub fn from_dom_query(source: &dom_query::Document, document_uri: Option<&str>) -> Self {
        let mut doc = Document::new();
        doc.set_document_uri(document_uri.map(str::to_string));
        let selection = source.select("html");
        if let Some(html) = selection.nodes().first() {
            let root = doc.root();
            let mut pending: Vec<(NodeId, NodeRef)> = vec![(root, *html)];
            while let Some((parent, node)) = pending.pop() {
                if node.is_element() {
                    let Some(name) = node.node_name() else {
                        continue;
                    };
                    let attrs: Attributes = node
                        .attrs()
                        .iter()
                        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                        .collect();
                    let element = doc.create_element_with_attrs(&name, attrs);
                    doc.append_child(parent, element);
                    for child in node.children().into_iter().rev() {
                        pending.push((element, child));
                    }
                } else if node.is_text() {
                    let text = doc.create_text(node.text().to_string());
                    doc.append_child(parent, text);
                }
            }
        }
        doc
    }
}
