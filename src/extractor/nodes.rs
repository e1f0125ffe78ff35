//! Node predicates and tree walking helpers shared by the readerable check
//! and the extraction engine.

use crate::dom::{Document, NodeData, NodeId};
use crate::patterns::{HIDDEN_STYLE, NORMALIZE};

use super::tags::{is_div_to_p_elem, is_phrasing_elem};

/// Trimmed text content, with whitespace runs collapsed when
/// `normalize_spaces` is set.
#[must_use]
pub fn inner_text(doc: &Document, node: NodeId, normalize_spaces: bool) -> String {
    let text = doc.text_content(node);
    let trimmed = text.trim();
    if normalize_spaces {
        NORMALIZE.replace_all(trimmed, " ").into_owned()
    } else {
        trimmed.to_string()
    }
}

/// Character length of the normalized inner text.
#[inline]
#[must_use]
pub fn text_length(doc: &Document, node: NodeId) -> usize {
    inner_text(doc, node, true).chars().count()
}

/// Visible as far as inline markup can tell: no `hidden`, no
/// `aria-hidden="true"` (except on fallback images), no hiding inline style.
#[must_use]
pub fn is_probably_visible(doc: &Document, node: NodeId) -> bool {
    let Some(attrs) = doc.attrs(node) else {
        return true;
    };
    if attrs.get("style").is_some_and(|style| HIDDEN_STYLE.is_match(style)) {
        return false;
    }
    if attrs.contains("hidden") {
        return false;
    }
    if attrs.get("aria-hidden") == Some("true") {
        return attrs.get("class").is_some_and(|c| c.contains("fallback-image"));
    }
    true
}

/// Next element in depth-first order, optionally skipping the node's own
/// subtree.
#[must_use]
pub fn next_node(doc: &Document, node: NodeId, ignore_self_and_kids: bool) -> Option<NodeId> {
    if !ignore_self_and_kids {
        if let Some(child) = doc.first_element_child(node) {
            return Some(child);
        }
    }
    if let Some(sibling) = doc.next_element_sibling(node) {
        return Some(sibling);
    }
    let mut current = node;
    loop {
        current = doc.parent(current)?;
        if let Some(sibling) = doc.next_element_sibling(current) {
            return Some(sibling);
        }
    }
}

/// Detach `node` and return the element that followed its subtree.
pub fn remove_and_get_next(doc: &mut Document, node: NodeId) -> Option<NodeId> {
    let next = next_node(doc, node, true);
    doc.detach(node);
    next
}

/// `node` itself or the first following sibling that is not whitespace-only
/// text.
#[must_use]
pub fn next_significant(doc: &Document, node: Option<NodeId>) -> Option<NodeId> {
    let mut current = node;
    while let Some(id) = current {
        let skip = match doc.data(id) {
            NodeData::Element(_) => false,
            NodeData::Text(text) => text.trim().is_empty(),
            _ => true,
        };
        if !skip {
            return Some(id);
        }
        current = doc.next_sibling(id);
    }
    None
}

/// Whether an ancestor within `max_depth` levels (`0` = unlimited) is a
/// `tag` element accepted by `filter`.
#[must_use]
pub fn has_ancestor_tag(
    doc: &Document,
    node: NodeId,
    tag: &str,
    max_depth: usize,
    filter: Option<&dyn Fn(NodeId) -> bool>,
) -> bool {
    for (depth, ancestor) in doc.ancestors(node).enumerate() {
        if max_depth > 0 && depth > max_depth {
            return false;
        }
        if doc.has_tag(ancestor, tag) && filter.is_none_or(|accept| accept(ancestor)) {
            return true;
        }
    }
    false
}

/// Text, inline elements, and links or edits made only of inline content.
#[must_use]
pub fn is_phrasing_content(doc: &Document, node: NodeId) -> bool {
    match doc.data(node) {
        NodeData::Text(_) => true,
        NodeData::Element(element) => {
            let tag = element.name();
            is_phrasing_elem(tag)
                || (matches!(tag, "a" | "del" | "ins")
                    && doc
                        .children(node)
                        .iter()
                        .all(|&child| is_phrasing_content(doc, child)))
        }
        _ => false,
    }
}

/// Whitespace-only text or a `br`.
#[must_use]
pub fn is_whitespace(doc: &Document, node: NodeId) -> bool {
    match doc.data(node) {
        NodeData::Text(text) => text.trim().is_empty(),
        NodeData::Element(element) => element.name() == "br",
        _ => false,
    }
}

/// Exactly one element child, named `tag`, and no text of its own.
#[must_use]
pub fn has_single_tag_inside_element(doc: &Document, element: NodeId, tag: &str) -> bool {
    let mut children = doc.element_children(element);
    let (Some(only), None) = (children.next(), children.next()) else {
        return false;
    };
    if !doc.has_tag(only, tag) {
        return false;
    }
    !doc.children(element).iter().any(|&child| {
        doc.text(child)
            .is_some_and(|text| text.chars().last().is_some_and(|c| !c.is_whitespace()))
    })
}

/// Whether any descendant is a block-level element.
#[must_use]
pub fn has_child_block_element(doc: &Document, element: NodeId) -> bool {
    doc.descendants(element)
        .any(|node| doc.tag_name(node).is_some_and(is_div_to_p_elem))
}

/// An element with no text whose only children, if any, are line breaks
/// and rules.
#[must_use]
pub fn is_element_without_content(doc: &Document, node: NodeId) -> bool {
    if !doc.is_element(node) || !doc.text_content(node).trim().is_empty() {
        return false;
    }
    let children = doc.element_children(node).count();
    children == 0 || children == doc.elements_by_tag_names(node, &["br", "hr"]).len()
}

/// An image, or an element wrapping nothing but a single image.
#[must_use]
pub fn is_single_image(doc: &Document, node: NodeId) -> bool {
    let mut current = node;
    loop {
        if doc.has_tag(current, "img") {
            return true;
        }
        let mut children = doc.element_children(current);
        let (Some(only), None) = (children.next(), children.next()) else {
            return false;
        };
        if !doc.text_content(current).trim().is_empty() {
            return false;
        }
        current = only;
    }
}

/// Number of words, counting the way a whitespace split does.
#[must_use]
pub fn word_count(text: &str) -> usize {
    crate::patterns::WHITESPACE.split(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markup;

    fn parse(html: &str) -> Document {
        parse_markup(html, None, 0).document
    }

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.elements_by_tag_name(doc.root(), tag)[0]
    }

    #[test]
    fn test_inner_text_normalizes() {
        let doc = parse("<p>  a \n\n b   c </p>");
        let p = first(&doc, "p");
        assert_eq!(inner_text(&doc, p, true), "a b c");
        assert_eq!(inner_text(&doc, p, false), "a \n\n b   c");
    }

    #[test]
    fn test_visibility() {
        let doc = parse(
            "<div style=\"display:none\"></div><p hidden></p>\
             <span aria-hidden=\"true\"></span><img aria-hidden=\"true\" class=\"fallback-image\"><b></b>",
        );
        assert!(!is_probably_visible(&doc, first(&doc, "div")));
        assert!(!is_probably_visible(&doc, first(&doc, "p")));
        assert!(!is_probably_visible(&doc, first(&doc, "span")));
        assert!(is_probably_visible(&doc, first(&doc, "img")));
        assert!(is_probably_visible(&doc, first(&doc, "b")));
    }

    #[test]
    fn test_next_node_walk() {
        let doc = parse("<div><p>a</p><ul><li>b</li></ul></div><footer></footer>");
        let div = first(&doc, "div");
        let order: Vec<&str> = std::iter::successors(Some(div), |&n| next_node(&doc, n, false))
            .filter_map(|n| doc.tag_name(n))
            .collect();
        assert_eq!(order, vec!["div", "p", "ul", "li", "footer"]);
        assert_eq!(next_node(&doc, div, true), Some(first(&doc, "footer")));
    }

    #[test]
    fn test_phrasing_content() {
        let doc = parse("<a><b>x</b></a><a><div>y</div></a>");
        let links = doc.elements_by_tag_name(doc.root(), "a");
        assert!(is_phrasing_content(&doc, links[0]));
        assert!(!is_phrasing_content(&doc, links[1]));
    }

    #[test]
    fn test_single_tag_inside() {
        let doc = parse("<div> <p>x</p> </div><section>text<p>x</p></section>");
        assert!(has_single_tag_inside_element(&doc, first(&doc, "div"), "p"));
        assert!(!has_single_tag_inside_element(&doc, first(&doc, "section"), "p"));
    }

    #[test]
    fn test_without_content() {
        let doc = parse("<div><br><hr></div><section><span></span></section>");
        assert!(is_element_without_content(&doc, first(&doc, "div")));
        assert!(!is_element_without_content(&doc, first(&doc, "section")));
    }

    #[test]
    fn test_ancestor_tag_depth() {
        let doc = parse("<table><tr><td><div><span><i>x</i></span></div></td></tr></table>");
        let i = first(&doc, "i");
        assert!(!has_ancestor_tag(&doc, i, "table", 3, None));
        assert!(has_ancestor_tag(&doc, i, "table", 0, None));
        assert!(has_ancestor_tag(&doc, i, "td", 3, None));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three"), 3);
        assert_eq!(word_count(""), 1);
    }
}
