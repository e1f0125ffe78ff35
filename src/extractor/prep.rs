//! Document preprocessing, run once before the scoring attempts.

use crate::dom::{Document, NodeData, NodeId};

use super::media::unwrap_noscript_images;
use super::nodes::{is_phrasing_content, is_whitespace, next_significant};

/// Elements that never carry article content.
const STRIPPED_ELEMS: [&str; 4] = ["script", "noscript", "style", "template"];

/// Prepare the tree for scoring.
///
/// Comments go first, then `noscript` image fallbacks are unwrapped before
/// `script`, `noscript`, `style` and `template` are removed. Whitespace-only
/// text outside `pre`/`textarea` collapses to a single space, `<br><br>`
/// runs in the body become paragraphs and `font` becomes `span`.
pub fn prep_document(doc: &mut Document) {
    remove_comments(doc);
    unwrap_noscript_images(doc);
    for node in doc.elements_by_tag_names(doc.root(), &STRIPPED_ELEMS) {
        doc.detach(node);
    }
    // Without a body the whole document is scored, so head content has to
    // go now that metadata has been read.
    if doc.body().is_none() {
        for head in doc.elements_by_tag_name(doc.root(), "head") {
            doc.detach(head);
        }
    }
    collapse_whitespace(doc);
    if let Some(body) = doc.body() {
        replace_brs(doc, body);
    }
    for font in doc.elements_by_tag_name(doc.root(), "font") {
        doc.rename(font, "span");
    }
}

fn remove_comments(doc: &mut Document) {
    let comments: Vec<NodeId> = doc
        .descendants(doc.root())
        .filter(|&node| matches!(doc.data(node), NodeData::Comment(_)))
        .collect();
    for comment in comments {
        doc.detach(comment);
    }
}

fn collapse_whitespace(doc: &mut Document) {
    let blank: Vec<NodeId> = doc
        .descendants(doc.root())
        .filter(|&node| {
            doc.text(node)
                .is_some_and(|text| text != " " && !text.is_empty() && text.trim().is_empty())
        })
        .filter(|&node| {
            !doc.ancestors(node)
                .any(|a| doc.has_tag(a, "pre") || doc.has_tag(a, "textarea"))
        })
        .collect();
    for node in blank {
        if let NodeData::Text(text) = doc.data_mut(node) {
            *text = " ".to_string();
        }
    }
}

/// Turn runs of two or more `<br>` into paragraph breaks.
///
/// The first `br` of a run becomes a `p` that absorbs the phrasing content
/// following it, up to the next `<br><br>` or block element.
fn replace_brs(doc: &mut Document, container: NodeId) {
    for br in doc.elements_by_tag_name(container, "br") {
        let mut next = doc.next_sibling(br);
        let mut replaced = false;
        while let Some(sibling) = next_significant(doc, next).filter(|&n| doc.has_tag(n, "br")) {
            replaced = true;
            next = doc.next_sibling(sibling);
            doc.detach(sibling);
        }
        if !replaced {
            continue;
        }

        let p = doc.create_element("p");
        doc.replace(br, p);
        let mut next = doc.next_sibling(p);
        while let Some(node) = next {
            if doc.has_tag(node, "br")
                && next_significant(doc, doc.next_sibling(node)).is_some_and(|n| doc.has_tag(n, "br"))
            {
                break;
            }
            if !is_phrasing_content(doc, node) {
                break;
            }
            next = doc.next_sibling(node);
            doc.append_child(p, node);
        }
        while let Some(last) = doc.last_child(p).filter(|&n| is_whitespace(doc, n)) {
            doc.detach(last);
        }
        if let Some(parent) = doc.parent(p).filter(|&n| doc.has_tag(n, "p")) {
            doc.rename(parent, "div");
        }
    }
}
