//! Cleanup of the merged article.
//!
//! Runs on the detached article container after sibling merging. Most
//! passes remove nodes; removal goes in reverse document order so nested
//! matches are judged before their ancestors.

use crate::dom::{Document, NodeId};
use crate::link_density::{link_density, text_density};
use crate::patterns::{AD_WORDS, LOADING_WORDS, SHARE_ELEMENTS};

use super::grab::class_weight;
use super::media::fix_lazy_images;
use super::nodes::{
    has_ancestor_tag, has_single_tag_inside_element, inner_text, is_phrasing_content,
    next_node, next_significant, remove_and_get_next, text_length,
};
use super::state::{ExtractionState, Flags};
use super::tags::{
    CLEANED_AFTER_SHARE, CLEANED_BEFORE_SHARE, DEPRECATED_SIZE_ATTRIBUTE_ELEMS,
    DIV_TO_P_ELEMS, EMBED_ELEMS, PRESENTATIONAL_ATTRIBUTES,
};
use super::Context;

/// Share widgets with less text than this are removed.
const SHARE_ELEMENT_THRESHOLD: usize = 500;

/// Every cleanup pass, in order.
pub fn prep_article(
    doc: &mut Document,
    article: NodeId,
    state: &mut ExtractionState,
    flags: Flags,
    ctx: &Context<'_>,
) {
    clean_styles(doc, article);
    mark_data_tables(doc, article, state);
    fix_lazy_images(doc, article);

    clean_conditionally(doc, article, "form", state, flags, ctx);
    clean_conditionally(doc, article, "fieldset", state, flags, ctx);
    for tag in CLEANED_BEFORE_SHARE {
        clean(doc, article, tag, ctx);
    }
    remove_share_elements(doc, article);
    for tag in CLEANED_AFTER_SHARE {
        clean(doc, article, tag, ctx);
    }
    clean_headers(doc, article, flags);
    clean_conditionally(doc, article, "table", state, flags, ctx);
    clean_conditionally(doc, article, "ul", state, flags, ctx);
    clean_conditionally(doc, article, "div", state, flags, ctx);

    for h1 in doc.elements_by_tag_name(article, "h1") {
        doc.rename(h1, "h2");
    }
    remove_empty_paragraphs(doc, article);
    for br in doc.elements_by_tag_name(article, "br") {
        if next_significant(doc, doc.next_sibling(br)).is_some_and(|n| doc.has_tag(n, "p")) {
            doc.detach(br);
        }
    }
    flatten_single_cell_tables(doc, article);
}

/// Strip presentational attributes, and legacy sizes where deprecated.
/// SVG subtrees are left untouched.
fn clean_styles(doc: &mut Document, root: NodeId) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if doc.has_tag(node, "svg") {
            continue;
        }
        if let Some(element) = doc.element_mut(node) {
            element
                .attrs
                .retain(|attr| !PRESENTATIONAL_ATTRIBUTES.contains(&attr.name.as_str()));
            if DEPRECATED_SIZE_ATTRIBUTE_ELEMS.contains(&element.name()) {
                element
                    .attrs
                    .retain(|attr| attr.name != "width" && attr.name != "height");
            }
        }
        stack.extend(doc.element_children(node));
    }
}

fn mark_data_tables(doc: &Document, root: NodeId, state: &mut ExtractionState) {
    for table in doc.elements_by_tag_name(root, "table") {
        state.mark_data_table(table, is_data_table(doc, table));
    }
}

/// Whether a table holds data rather than layout.
fn is_data_table(doc: &Document, table: NodeId) -> bool {
    if doc.attr(table, "role") == Some("presentation") {
        return false;
    }
    if doc.attr(table, "datatable") == Some("0") {
        return false;
    }
    if doc.attr(table, "summary").is_some_and(|summary| !summary.is_empty()) {
        return true;
    }
    if let Some(&caption) = doc.elements_by_tag_name(table, "caption").first() {
        if !doc.children(caption).is_empty() {
            return true;
        }
    }
    if !doc
        .elements_by_tag_names(table, &["col", "colgroup", "tfoot", "thead", "th"])
        .is_empty()
    {
        return true;
    }
    if !doc.elements_by_tag_name(table, "table").is_empty() {
        return false;
    }
    let (rows, columns) = row_and_column_count(doc, table);
    if rows == 1 || columns == 1 {
        return false;
    }
    if rows >= 10 || columns > 4 {
        return true;
    }
    rows * columns > 10
}

fn row_and_column_count(doc: &Document, table: NodeId) -> (usize, usize) {
    let mut rows = 0;
    let mut columns = 0;
    for tr in doc.elements_by_tag_name(table, "tr") {
        rows += span(doc.attr(tr, "rowspan"));
        let in_row: usize = doc
            .elements_by_tag_name(tr, "td")
            .into_iter()
            .map(|cell| span(doc.attr(cell, "colspan")))
            .sum();
        columns = columns.max(in_row);
    }
    (rows, columns)
}

/// Leading integer of a span attribute, at least 1.
fn span(value: Option<&str>) -> usize {
    value
        .map(|v| {
            v.trim()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .and_then(|digits| digits.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// Whether an embed points at an allowed video host.
fn is_allowed_embed(doc: &Document, node: NodeId, ctx: &Context<'_>) -> bool {
    let videos = ctx.video_regex();
    doc.attrs(node)
        .is_some_and(|attrs| attrs.iter().any(|attr| videos.is_match(&attr.value)))
        || (doc.has_tag(node, "object") && videos.is_match(&doc.inner_html(node)))
}

/// Remove every `tag` element, except embeds of allowed videos.
fn clean(doc: &mut Document, root: NodeId, tag: &str, ctx: &Context<'_>) {
    let is_embed = EMBED_ELEMS.contains(&tag);
    for node in doc.elements_by_tag_name(root, tag).into_iter().rev() {
        if is_embed && is_allowed_embed(doc, node, ctx) {
            continue;
        }
        doc.detach(node);
    }
}

/// Remove share widgets inside each top-level child of the article.
fn remove_share_elements(doc: &mut Document, root: NodeId) {
    let children: Vec<NodeId> = doc.element_children(root).collect();
    for child in children {
        let end = next_node(doc, child, true);
        let mut next = next_node(doc, child, false);
        while let Some(node) = next.filter(|&n| Some(n) != end) {
            let match_string = format!("{} {}", doc.class_name(node), doc.id_attr(node));
            next = if SHARE_ELEMENTS.is_match(&match_string)
                && doc.text_content(node).chars().count() < SHARE_ELEMENT_THRESHOLD
            {
                remove_and_get_next(doc, node)
            } else {
                next_node(doc, node, false)
            };
        }
    }
}

/// Remove `h1`/`h2` headings with a negative class weight.
fn clean_headers(doc: &mut Document, root: NodeId, flags: Flags) {
    for heading in doc.elements_by_tag_names(root, &["h1", "h2"]).into_iter().rev() {
        if class_weight(doc, heading, flags) < 0.0 {
            doc.detach(heading);
        }
    }
}

/// Remove `tag` containers that look like boilerplate.
fn clean_conditionally(
    doc: &mut Document,
    root: NodeId,
    tag: &str,
    state: &ExtractionState,
    flags: Flags,
    ctx: &Context<'_>,
) {
    if !flags.clean_conditionally {
        return;
    }
    for node in doc.elements_by_tag_name(root, tag).into_iter().rev() {
        if should_remove(doc, node, tag, state, flags, ctx) {
            doc.detach(node);
        }
    }
}

fn should_remove(
    doc: &Document,
    node: NodeId,
    tag: &str,
    state: &ExtractionState,
    flags: Flags,
    ctx: &Context<'_>,
) -> bool {
    let mut is_list = matches!(tag, "ul" | "ol");
    if !is_list {
        let list_length: usize = doc
            .elements_by_tag_names(node, &["ul", "ol"])
            .into_iter()
            .map(|list| text_length(doc, list))
            .sum();
        let node_length = text_length(doc, node);
        is_list = node_length > 0 && list_length as f64 / node_length as f64 > 0.9;
    }

    if tag == "table" && state.is_data_table(node) {
        return false;
    }
    let is_data = |table: NodeId| state.is_data_table(table);
    if has_ancestor_tag(doc, node, "table", 0, Some(&is_data)) {
        return false;
    }
    if has_ancestor_tag(doc, node, "code", 3, None) {
        return false;
    }
    if doc
        .elements_by_tag_name(node, "table")
        .into_iter()
        .any(|table| state.is_data_table(table))
    {
        return false;
    }

    let weight = class_weight(doc, node, flags);
    if weight < 0.0 {
        return true;
    }

    let text = inner_text(doc, node, true);
    if text.matches(',').count() >= 10 {
        return false;
    }

    let count = |tag: &str| doc.elements_by_tag_name(node, tag).len();
    let p = count("p") as f64;
    let img_count = count("img");
    let img = img_count as f64;
    let li = count("li") as f64 - 100.0;
    let input = count("input") as f64;
    let heading_density = text_density(doc, node, &["h1", "h2", "h3", "h4", "h5", "h6"]);

    let mut embed_count = 0;
    for embed in doc.elements_by_tag_names(node, &EMBED_ELEMS) {
        if is_allowed_embed(doc, embed, ctx) {
            return false;
        }
        embed_count += 1;
    }

    if AD_WORDS.is_match(&text) || LOADING_WORDS.is_match(&text) {
        return true;
    }

    let content_length = text.chars().count();
    let density = link_density(doc, node);
    let textish: Vec<&str> = ["span", "li", "td"]
        .into_iter()
        .chain(DIV_TO_P_ELEMS)
        .collect();
    let textish_density = text_density(doc, node, &textish);
    let is_figure_child = has_ancestor_tag(doc, node, "figure", 3, None);
    let modifier = ctx.options.link_density_modifier;

    let have_to_remove = (!is_figure_child && img > 1.0 && p / img < 0.5)
        || (!is_list && li > p)
        || input > (p / 3.0).floor()
        || (!is_list
            && !is_figure_child
            && heading_density < 0.9
            && content_length < 25
            && (img_count == 0 || img_count > 2)
            && density > 0.0)
        || (!is_list && weight < 25.0 && density > 0.2 + modifier)
        || (weight >= 25.0 && density > 0.5 + modifier)
        || (embed_count == 1 && content_length < 75)
        || embed_count > 1
        || (img_count == 0 && textish_density == 0.0);

    // Simple lists of images stay.
    if is_list && have_to_remove {
        if doc
            .element_children(node)
            .any(|child| doc.element_children(child).count() > 1)
        {
            return true;
        }
        if img_count == doc.elements_by_tag_name(node, "li").len() {
            return false;
        }
    }
    have_to_remove
}

fn remove_empty_paragraphs(doc: &mut Document, root: NodeId) {
    for p in doc.elements_by_tag_name(root, "p").into_iter().rev() {
        let media = doc
            .elements_by_tag_names(p, &["img", "embed", "object", "iframe"])
            .len();
        if media == 0 && inner_text(doc, p, false).is_empty() {
            doc.detach(p);
        }
    }
}

/// Replace tables of a single cell with the cell, as `p` when it holds only
/// phrasing content and `div` otherwise.
fn flatten_single_cell_tables(doc: &mut Document, root: NodeId) {
    for table in doc.elements_by_tag_name(root, "table") {
        if doc.parent(table).is_none() {
            continue;
        }
        let body = if has_single_tag_inside_element(doc, table, "tbody") {
            doc.first_element_child(table)
        } else {
            Some(table)
        };
        let Some(body) = body.filter(|&b| has_single_tag_inside_element(doc, b, "tr")) else {
            continue;
        };
        let Some(row) = doc
            .first_element_child(body)
            .filter(|&r| has_single_tag_inside_element(doc, r, "td"))
        else {
            continue;
        };
        let Some(cell) = doc.first_element_child(row) else {
            continue;
        };
        let phrasing = doc
            .children(cell)
            .iter()
            .all(|&child| is_phrasing_content(doc, child));
        doc.rename(cell, if phrasing { "p" } else { "div" });
        doc.replace(table, cell);
    }
}
