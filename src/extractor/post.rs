//! Final touches on the winning article.

use crate::dom::{Document, NodeId};
use crate::url_utils::UriResolver;

use super::nodes::{
    has_single_tag_inside_element, is_element_without_content, next_node, remove_and_get_next,
};
use super::tags::{MEDIA_ELEMS, URL_ATTRIBUTES};
use super::Context;

/// Absolute URLs, flattened wrappers, and (unless `keep_classes`) classes
/// reduced to the preserved set.
pub fn post_process(
    doc: &mut Document,
    article: NodeId,
    resolver: &UriResolver,
    ctx: &Context<'_>,
) {
    fix_relative_uris(doc, article, resolver);
    simplify_nested_elements(doc, article);
    if !ctx.options.keep_classes {
        clean_classes(doc, article, ctx.classes_to_preserve());
    }
}

fn fix_relative_uris(doc: &mut Document, article: NodeId, resolver: &UriResolver) {
    for link in doc.elements_by_tag_name(article, "a") {
        let Some(href) = doc.attr(link, "href").map(str::to_string) else {
            continue;
        };
        if href.trim_start().to_ascii_lowercase().starts_with("javascript:") {
            unwrap_script_link(doc, link);
        } else {
            doc.set_attr(link, "href", resolver.to_absolute(&href));
        }
    }

    for media in doc.elements_by_tag_names(article, &MEDIA_ELEMS) {
        for name in URL_ATTRIBUTES {
            if let Some(value) = doc.attr(media, name).map(str::to_string) {
                doc.set_attr(media, name, resolver.to_absolute(&value));
            }
        }
        if let Some(srcset) = doc.attr(media, "srcset").map(str::to_string) {
            doc.set_attr(media, "srcset", resolver.rewrite_srcset(&srcset));
        }
    }
}

/// Script links go nowhere outside the page: keep their content only.
fn unwrap_script_link(doc: &mut Document, link: NodeId) {
    let children = doc.children(link);
    let replacement = if children.len() == 1 && doc.is_text(children[0]) {
        let text = doc.text_content(link);
        doc.create_text(text)
    } else {
        let span = doc.create_element("span");
        doc.move_children(link, span);
        span
    };
    doc.replace(link, replacement);
}

/// Replace `div`/`section` wrappers holding a single `div`/`section` with
/// that child, and drop empty ones. Page wrappers are left alone.
fn simplify_nested_elements(doc: &mut Document, article: NodeId) {
    let mut next = Some(article);
    while let Some(node) = next {
        let is_wrapper = doc.parent(node).is_some()
            && (doc.has_tag(node, "div") || doc.has_tag(node, "section"))
            && !doc.id_attr(node).starts_with("readability");
        if is_wrapper {
            if is_element_without_content(doc, node) {
                next = remove_and_get_next(doc, node);
                continue;
            }
            if has_single_tag_inside_element(doc, node, "div")
                || has_single_tag_inside_element(doc, node, "section")
            {
                if let Some(child) = doc.first_element_child(node) {
                    let attrs: Vec<(String, String)> = doc
                        .attrs(node)
                        .map(|attrs| {
                            attrs
                                .iter()
                                .map(|attr| (attr.name.clone(), attr.value.clone()))
                                .collect()
                        })
                        .unwrap_or_default();
                    for (name, value) in attrs {
                        doc.set_attr(child, &name, value);
                    }
                    doc.replace(node, child);
                    next = Some(child);
                    continue;
                }
            }
        }
        next = next_node(doc, node, false);
    }
}

fn clean_classes(doc: &mut Document, root: NodeId, preserve: &[String]) {
    let elements: Vec<NodeId> = std::iter::once(root)
        .chain(doc.descendants(root))
        .filter(|&node| doc.is_element(node))
        .collect();
    for node in elements {
        let Some(class) = doc.attr(node, "class") else {
            continue;
        };
        let kept = class
            .split_whitespace()
            .filter(|token| preserve.iter().any(|p| p.as_str() == *token))
            .collect::<Vec<_>>()
            .join(" ");
        if kept.is_empty() {
            doc.remove_attr(node, "class");
        } else {
            doc.set_attr(node, "class", kept);
        }
    }
}
