//! Link and text density measures.
//!
//! Navigation blocks, tag clouds and "related" lists are mostly link text.
//! The ratio of link text to all text is the main signal for telling them
//! apart from prose, both when ranking candidates and when cleaning.

use crate::dom::{Document, NodeId};
use crate::extractor::nodes::{inner_text, text_length};
use crate::patterns::HASH_URL;

/// Weight of in-page anchor links, which are rarely navigation.
const HASH_LINK_COEFFICIENT: f64 = 0.3;

/// Share of `node`'s text that sits inside links, in `[0, 1]`.
///
/// Links to in-page anchors (`href="#..."`) count for 30% of their length.
#[must_use]
pub fn link_density(doc: &Document, node: NodeId) -> f64 {
    let total = text_length(doc, node);
    if total == 0 {
        return 0.0;
    }
    let link_length: f64 = doc
        .elements_by_tag_name(node, "a")
        .into_iter()
        .map(|link| {
            let href = doc.attr(link, "href").unwrap_or_default();
            let coefficient = if HASH_URL.is_match(href) {
                HASH_LINK_COEFFICIENT
            } else {
                1.0
            };
            inner_text(doc, link, true).chars().count() as f64 * coefficient
        })
        .sum();
    link_length / total as f64
}

/// Share of `node`'s text found inside descendants named in `tags`.
#[must_use]
pub fn text_density(doc: &Document, node: NodeId, tags: &[&str]) -> f64 {
    let total = text_length(doc, node);
    if total == 0 {
        return 0.0;
    }
    let inside: usize = doc
        .elements_by_tag_names(node, tags)
        .into_iter()
        .map(|child| text_length(doc, child))
        .sum();
    inside as f64 / total as f64
}
