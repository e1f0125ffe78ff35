//! Cheap check for whether extraction is worth running.
//!
//! Sums a diminishing score over visible, likely paragraphs and stops as
//! soon as it crosses the threshold. The tree is only read.

use regex::Regex;

use crate::dom::{Document, NodeId};
use crate::extractor::nodes::is_probably_visible;
use crate::options::ReaderableOptions;
use crate::patterns::{READERABLE_OK_MAYBE, UNLIKELY_CANDIDATES};

/// Whether the document probably contains an article.
///
/// Candidates are `p`, `pre` and `article` elements plus every parent of a
/// `div > br`. Hidden nodes, nodes under page furniture and paragraphs in
/// list items are skipped. Each remaining node with at least
/// `min_content_length` characters of trimmed text adds
/// `sqrt(length - min_content_length)`.
///
/// # Example
///
/// ```rust
/// use rs_readability::{is_probably_readerable, parse_markup, ReaderableOptions};
///
/// let paragraph = "All work and no play makes Jack a dull boy. ".repeat(10);
/// let html = format!("<body><p>{paragraph}</p><p>{paragraph}</p></body>");
/// let doc = parse_markup(&html, None, 0).document;
/// assert!(is_probably_readerable(&doc, &ReaderableOptions::default()));
/// ```
#[must_use]
pub fn is_probably_readerable(doc: &Document, options: &ReaderableOptions) -> bool {
    let mut score = 0.0;
    for node in candidate_nodes(doc) {
        let visible = match options.visibility_checker {
            Some(check) => check(doc, node),
            None => is_probably_visible(doc, node),
        };
        if !visible || is_unlikely(doc, node, options) {
            continue;
        }
        if doc.has_tag(node, "p") && doc.ancestors(node).any(|a| doc.has_tag(a, "li")) {
            continue;
        }
        let length = doc.text_content(node).trim().chars().count();
        if length < options.min_content_length {
            continue;
        }
        score += ((length - options.min_content_length) as f64).sqrt();
        if score > options.min_score {
            return true;
        }
    }
    false
}

/// `p`, `pre` and `article` elements, then parents of `div > br` not
/// already listed.
fn candidate_nodes(doc: &Document) -> Vec<NodeId> {
    let mut nodes = doc.elements_by_tag_names(doc.root(), &["p", "pre", "article"]);
    for br in doc.elements_by_tag_name(doc.root(), "br") {
        if let Some(parent) = doc.parent(br).filter(|&p| doc.has_tag(p, "div")) {
            if !nodes.contains(&parent) {
                nodes.push(parent);
            }
        }
    }
    nodes
}

/// The node or one of its ancestors looks like page furniture and nothing
/// rescues it. Page-level containers never count, whatever their class.
fn is_unlikely(doc: &Document, node: NodeId, options: &ReaderableOptions) -> bool {
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .filter(|&n| doc.is_element(n) && !is_page_container(doc, n))
        .any(|n| {
            let match_string = format!("{} {}", doc.class_name(n), doc.id_attr(n));
            matches_any(&match_string, &UNLIKELY_CANDIDATES, &options.unlikely_patterns)
                && !matches_any(&match_string, &READERABLE_OK_MAYBE, &options.likely_patterns)
        })
}

fn is_page_container(doc: &Document, node: NodeId) -> bool {
    matches!(doc.tag_name(node), Some("html" | "body" | "main"))
        || doc.attr(node, "role") == Some("main")
}

fn matches_any(haystack: &str, builtin: &Regex, extra: &[Regex]) -> bool {
    builtin.is_match(haystack) || extra.iter().any(|pattern| pattern.is_match(haystack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markup;

    fn readerable(html: &str) -> bool {
        is_probably_readerable(&parse_markup(html, None, 0).document, &ReaderableOptions::default())
    }

    fn long_text() -> String {
        "x".repeat(600)
    }

    #[test]
    fn test_empty_document() {
        assert!(!readerable(""));
        assert!(!readerable("<p>short</p>"));
    }

    #[test]
    fn test_single_long_paragraph() {
        // sqrt(600 - 140) ≈ 21.4 > 20
        assert!(readerable(&format!("<p>{}</p>", long_text())));
    }

    #[test]
    fn test_hidden_and_unlikely_skipped() {
        let text = long_text();
        assert!(!readerable(&format!("<p style=\"display: none\">{text}</p>")));
        assert!(!readerable(&format!("<div class=\"sidebar\"><p>{text}</p></div>")));
        assert!(readerable(&format!("<div class=\"sidebar main\"><p>{text}</p></div>")));
        assert!(!readerable(&format!("<ul><li><p>{text}</p></li></ul>")));
    }

    #[test]
    fn test_page_container_classes_ignored() {
        let text = long_text();
        assert!(readerable(&format!(
            "<html><body class=\"has-sidebar\"><p>{text}</p></body></html>"
        )));
        assert!(readerable(&format!(
            "<html class=\"sidebar\"><body><main id=\"footer\"><p>{text}</p></main></body></html>"
        )));
        assert!(readerable(&format!(
            "<div role=\"main\" class=\"sidebar\"><p>{text}</p></div>"
        )));
    }

    #[test]
    fn test_div_with_br_counts() {
        let text = long_text();
        assert!(readerable(&format!("<div>{text}<br>more</div>")));
    }

    #[test]
    fn test_custom_patterns_and_checker() {
        let html = format!("<div class=\"promo-box\"><p>{}</p></div>", long_text());
        let doc = parse_markup(&html, None, 0).document;
        let strict = ReaderableOptions {
            unlikely_patterns: vec![Regex::new("promo").expect("regex")],
            ..ReaderableOptions::default()
        };
        assert!(is_probably_readerable(&doc, &ReaderableOptions::default()));
        assert!(!is_probably_readerable(&doc, &strict));

        let blind = ReaderableOptions {
            visibility_checker: Some(|_, _| false),
            ..ReaderableOptions::default()
        };
        assert!(!is_probably_readerable(&doc, &blind));
    }
}
