//! HTML serialization of document subtrees.
//!
//! Output re-parses to the same tree: text is escaped except inside raw-text
//! elements, attribute values are double-quoted, and void elements carry no
//! end tag.

use super::{Document, NodeData, NodeId};

/// Elements that never have content or an end tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose content is written verbatim.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl Document {
    /// Serialize the whole document, including the doctype.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = self.doctype() {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
        }
        self.write_children(self.root(), &mut out);
        out
    }

    /// Markup of the children of `id`.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_children(id, &mut out);
        out
    }

    /// Markup of `id` itself and its subtree.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_subtree(id, &mut out);
        out
    }

    fn write_children(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            self.write_subtree(child, out);
        }
    }

    // Iterative so that deeply nested input cannot exhaust the stack.
    fn write_subtree(&self, id: NodeId, out: &mut String) {
        let mut steps = vec![Step::Open(id)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Open(node) => match self.data(node) {
                    NodeData::Document => {
                        for &child in self.children(node).iter().rev() {
                            steps.push(Step::Open(child));
                        }
                    }
                    NodeData::Element(element) => {
                        out.push('<');
                        out.push_str(element.name());
                        for attr in &element.attrs {
                            out.push(' ');
                            out.push_str(&attr.name);
                            out.push_str("=\"");
                            out.push_str(&html_escape::encode_double_quoted_attribute(
                                &attr.value,
                            ));
                            out.push('"');
                        }
                        out.push('>');
                        if VOID_ELEMENTS.contains(&element.name()) {
                            continue;
                        }
                        steps.push(Step::Close(node));
                        for &child in self.children(node).iter().rev() {
                            steps.push(Step::Open(child));
                        }
                    }
                    NodeData::Text(text) => {
                        let raw = self
                            .parent(node)
                            .and_then(|parent| self.tag_name(parent))
                            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                        if raw {
                            out.push_str(text);
                        } else {
                            escape_text(text, out);
                        }
                    }
                    NodeData::Comment(text) => {
                        out.push_str("<!--");
                        out.push_str(text);
                        out.push_str("-->");
                    }
                },
                Step::Close(node) => {
                    if let Some(name) = self.tag_name(node) {
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                }
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    let escaped = html_escape::encode_text(text);
    if escaped.contains('\u{a0}') {
        out.push_str(&escaped.replace('\u{a0}', "&nbsp;"));
    } else {
        out.push_str(&escaped);
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::Document;

    #[test]
    fn test_void_and_escaping() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.set_attr(p, "title", "a \"b\" & c");
        let br = doc.create_element("br");
        doc.append_child(doc.root(), p);
        doc.append_text(p, "1 < 2 & 3");
        doc.append_child(p, br);
        assert_eq!(
            doc.to_html(),
            "<p title=\"a &quot;b&quot; &amp; c\">1 &lt; 2 &amp; 3<br></p>"
        );
    }

    #[test]
    fn test_raw_text_is_verbatim() {
        let mut doc = Document::new();
        let script = doc.create_element("script");
        doc.append_child(doc.root(), script);
        doc.append_text(script, "if (a < b && c) {}");
        assert_eq!(doc.outer_html(script), "<script>if (a < b && c) {}</script>");
    }

    #[test]
    fn test_nbsp_is_named() {
        let mut doc = Document::new();
        let span = doc.create_element("span");
        doc.append_child(doc.root(), span);
        doc.append_text(span, "a\u{a0}b");
        assert_eq!(doc.inner_html(span), "a&nbsp;b");
    }

    #[test]
    fn test_doctype_and_comment() {
        let mut doc = Document::new();
        doc.set_doctype(Some("html".to_string()));
        let comment = doc.create_comment(" note ");
        doc.append_child(doc.root(), comment);
        assert_eq!(doc.to_html(), "<!DOCTYPE html><!-- note -->");
    }
}
