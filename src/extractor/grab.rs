//! Candidate scoring, top candidate selection and sibling merging.
//!
//! One call of [`grab_article`] is one attempt of the retry ladder. It
//! rewrites the tree it is given, so every attempt works on its own copy.

use crate::dom::{Document, NodeId};
use crate::link_density::link_density;
use crate::metadata::text_similarity;
use crate::patterns::{
    BYLINE, COMMAS, NEGATIVE, OK_MAYBE_CANDIDATE, POSITIVE, SENTENCE_END, UNLIKELY_CANDIDATES,
};
use crate::result::TextDirection;

use super::clean::prep_article;
use super::nodes::{
    has_ancestor_tag, has_child_block_element, has_single_tag_inside_element, inner_text,
    is_element_without_content, is_phrasing_content, is_probably_visible, is_whitespace,
    next_node, remove_and_get_next,
};
use super::state::{ExtractionState, Flags};
use super::tags::{is_heading, is_tag_to_score, ALTER_TO_DIV_EXCEPTIONS, UNLIKELY_ROLES};
use super::{Article, Context};

/// Scored elements shorter than this are ignored.
const MIN_SCORED_TEXT_LENGTH: usize = 25;

/// Ancestors that receive a share of an element's score.
const SCORED_ANCESTOR_LEVELS: usize = 5;

/// Alternative candidates needed before their common ancestor is promoted.
const MINIMUM_TOP_CANDIDATES: usize = 3;

/// Bylines are short; anything longer is content.
const MAX_BYLINE_LENGTH: usize = 100;

/// Run one scoring attempt and build the article container.
///
/// Returns `None` only for a document without any element.
pub fn grab_article(
    doc: &mut Document,
    state: &mut ExtractionState,
    flags: Flags,
    ctx: &mut Context<'_>,
) -> Option<Article> {
    let first = doc.document_element()?;
    let page = doc.body().unwrap_or(doc.root());

    let elements_to_score = walk(doc, first, flags, ctx);
    let candidates = score_elements(doc, state, &elements_to_score, flags);
    let top_candidates = rank_candidates(doc, state, &candidates, ctx.options.nb_top_candidates);

    let mut needed_to_create = false;
    let top_candidate = match top_candidates
        .first()
        .copied()
        .filter(|&top| !doc.has_tag(top, "body"))
    {
        Some(top) => refine_top_candidate(doc, state, &top_candidates, top, page, flags),
        None => {
            // Nothing usable: the whole page becomes the candidate.
            needed_to_create = true;
            let created = doc.create_element("div");
            doc.move_children(page, created);
            doc.append_child(page, created);
            initialize_node(doc, state, created, flags);
            created
        }
    };
    debug_log!(
        ctx,
        "top candidate <{}> scored {:.2}",
        doc.tag_name(top_candidate).unwrap_or_default(),
        state.score(top_candidate)
    );

    let parent = doc.parent(top_candidate);
    let dir = article_direction(doc, top_candidate, parent);
    let container = merge_siblings(doc, state, top_candidate, parent);

    prep_article(doc, container, state, flags, ctx);

    if needed_to_create {
        doc.set_attr(top_candidate, "id", "readability-page-1");
        doc.set_attr(top_candidate, "class", "page");
    } else {
        let page_div = doc.create_element("div");
        doc.set_attr(page_div, "id", "readability-page-1");
        doc.set_attr(page_div, "class", "page");
        doc.move_children(container, page_div);
        doc.append_child(container, page_div);
    }

    Some(Article { container, dir })
}

// =============================================================================
// Walk
// =============================================================================

/// Depth-first pass that removes obvious non-content and normalizes divs.
/// Returns the elements whose text gets scored.
fn walk(doc: &mut Document, first: NodeId, flags: Flags, ctx: &mut Context<'_>) -> Vec<NodeId> {
    let mut elements_to_score = Vec::new();
    let mut should_remove_title_header = true;
    let mut node = Some(first);

    while let Some(mut current) = node {
        let match_string = format!("{} {}", doc.class_name(current), doc.id_attr(current));

        if !is_probably_visible(doc, current) {
            debug_log!(ctx, "removing hidden node {match_string:?}");
            node = remove_and_get_next(doc, current);
            continue;
        }

        if doc.attr(current, "aria-modal") == Some("true")
            && doc.attr(current, "role") == Some("dialog")
        {
            node = remove_and_get_next(doc, current);
            continue;
        }

        if check_byline(doc, current, &match_string, ctx) {
            node = remove_and_get_next(doc, current);
            continue;
        }

        if should_remove_title_header && header_duplicates_title(doc, current, &ctx.article_title)
        {
            debug_log!(ctx, "removing header duplicating the title");
            should_remove_title_header = false;
            node = remove_and_get_next(doc, current);
            continue;
        }

        if flags.strip_unlikelys {
            if is_unlikely_candidate(doc, current, &match_string) {
                debug_log!(ctx, "removing unlikely candidate {match_string:?}");
                node = remove_and_get_next(doc, current);
                continue;
            }
            if doc
                .attr(current, "role")
                .is_some_and(|role| UNLIKELY_ROLES.contains(&role))
            {
                node = remove_and_get_next(doc, current);
                continue;
            }
        }

        let tag = doc.tag_name(current).unwrap_or_default().to_string();

        if (matches!(tag.as_str(), "div" | "section" | "header") || is_heading(&tag))
            && is_element_without_content(doc, current)
        {
            node = remove_and_get_next(doc, current);
            continue;
        }

        if is_tag_to_score(&tag) {
            elements_to_score.push(current);
        }

        if tag == "div" {
            wrap_phrasing_runs(doc, current);
            if has_single_tag_inside_element(doc, current, "p")
                && link_density(doc, current) < 0.25
            {
                if let Some(child) = doc.first_element_child(current) {
                    doc.replace(current, child);
                    current = child;
                    elements_to_score.push(current);
                }
            } else if !has_child_block_element(doc, current) {
                doc.rename(current, "p");
                elements_to_score.push(current);
            }
        }

        node = next_node(doc, current, false);
    }

    elements_to_score
}

/// Wrap each run of phrasing children of a div in a `p`.
fn wrap_phrasing_runs(doc: &mut Document, div: NodeId) {
    let mut paragraph: Option<NodeId> = None;
    let mut child = doc.first_child(div);
    while let Some(current) = child {
        let next = doc.next_sibling(current);
        if is_phrasing_content(doc, current) {
            if let Some(p) = paragraph {
                doc.append_child(p, current);
            } else if !is_whitespace(doc, current) {
                let p = doc.create_element("p");
                doc.replace(current, p);
                doc.append_child(p, current);
                paragraph = Some(p);
            }
        } else if let Some(p) = paragraph.take() {
            trim_trailing_whitespace(doc, p);
        }
        child = next;
    }
    if let Some(p) = paragraph {
        trim_trailing_whitespace(doc, p);
    }
}

fn trim_trailing_whitespace(doc: &mut Document, node: NodeId) {
    while let Some(last) = doc.last_child(node).filter(|&n| is_whitespace(doc, n)) {
        doc.detach(last);
    }
}

/// Record the first short author line of the page. Returns true when
/// `node` is that line and should be removed.
fn check_byline(doc: &Document, node: NodeId, match_string: &str, ctx: &mut Context<'_>) -> bool {
    if ctx.article_byline.is_some() {
        return false;
    }
    let marked = doc.attr(node, "rel") == Some("author")
        || doc
            .attr(node, "itemprop")
            .is_some_and(|itemprop| itemprop.contains("author"))
        || BYLINE.is_match(match_string);
    if !marked {
        return false;
    }
    let text = doc.text_content(node);
    let byline = text.trim();
    let length = byline.chars().count();
    if length == 0 || length >= MAX_BYLINE_LENGTH {
        return false;
    }
    ctx.article_byline = Some(byline.to_string());
    true
}

fn header_duplicates_title(doc: &Document, node: NodeId, title: &str) -> bool {
    if !doc.has_tag(node, "h1") && !doc.has_tag(node, "h2") {
        return false;
    }
    let heading = inner_text(doc, node, false);
    text_similarity(title, &heading) > 0.75
}

fn is_unlikely_candidate(doc: &Document, node: NodeId, match_string: &str) -> bool {
    UNLIKELY_CANDIDATES.is_match(match_string)
        && !OK_MAYBE_CANDIDATE.is_match(match_string)
        && !has_ancestor_tag(doc, node, "table", 3, None)
        && !has_ancestor_tag(doc, node, "code", 3, None)
        && !matches!(
            doc.tag_name(node),
            Some("html" | "body" | "a" | "main")
        )
        && doc.attr(node, "role") != Some("main")
}

// =============================================================================
// Scoring
// =============================================================================

/// Class/id weight: -25 per negative and +25 per positive match on each of
/// `class` and `id`. Zero when class weighting is off.
#[must_use]
pub fn class_weight(doc: &Document, node: NodeId, flags: Flags) -> f64 {
    if !flags.weight_classes {
        return 0.0;
    }
    let mut weight = 0.0;
    for value in [doc.class_name(node), doc.id_attr(node)] {
        if value.is_empty() {
            continue;
        }
        if NEGATIVE.is_match(value) {
            weight -= 25.0;
        }
        if POSITIVE.is_match(value) {
            weight += 25.0;
        }
    }
    weight
}

/// Start a candidate's score from its tag and class weight.
pub fn initialize_node(doc: &Document, state: &mut ExtractionState, node: NodeId, flags: Flags) {
    let base = match doc.tag_name(node).unwrap_or_default() {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    state.set_score(node, base + class_weight(doc, node, flags));
}

/// Score every element and spread the score over its ancestors. Returns the
/// candidates in the order they were first reached.
fn score_elements(
    doc: &Document,
    state: &mut ExtractionState,
    elements: &[NodeId],
    flags: Flags,
) -> Vec<NodeId> {
    let mut candidates = Vec::new();
    for &element in elements {
        if doc.parent(element).is_none_or(|parent| !doc.is_element(parent)) {
            continue;
        }
        let text = inner_text(doc, element, true);
        let length = text.chars().count();
        if length < MIN_SCORED_TEXT_LENGTH {
            continue;
        }
        let ancestors = doc.ancestors_up_to(element, SCORED_ANCESTOR_LEVELS);
        if ancestors.is_empty() {
            continue;
        }

        let content_score =
            1.0 + COMMAS.split(&text).count() as f64 + (length / 100).min(3) as f64;

        for (level, ancestor) in ancestors.into_iter().enumerate() {
            if !doc.is_element(ancestor)
                || doc.parent(ancestor).is_none_or(|parent| !doc.is_element(parent))
            {
                continue;
            }
            if !state.is_candidate(ancestor) {
                initialize_node(doc, state, ancestor, flags);
                candidates.push(ancestor);
            }
            let divider = match level {
                0 => 1.0,
                1 => 2.0,
                _ => (level * 3) as f64,
            };
            state.add_score(ancestor, content_score / divider);
        }
    }
    candidates
}

/// Scale scores by link density and keep the best `limit`, best first.
fn rank_candidates(
    doc: &Document,
    state: &mut ExtractionState,
    candidates: &[NodeId],
    limit: usize,
) -> Vec<NodeId> {
    let mut top: Vec<NodeId> = Vec::with_capacity(limit + 1);
    for &candidate in candidates {
        let score = state.score(candidate) * (1.0 - link_density(doc, candidate));
        state.set_score(candidate, score);
        let slot = (0..limit).find(|&i| top.get(i).is_none_or(|&other| score > state.score(other)));
        if let Some(slot) = slot {
            top.insert(slot, candidate);
            top.truncate(limit);
        }
    }
    top
}

/// Whether the climb towards the page may continue through `node`.
fn below_page(doc: &Document, node: NodeId, page: NodeId) -> bool {
    node != page && doc.is_element(node) && !doc.has_tag(node, "body")
}

/// Move the top candidate up the tree when its ancestors hold the content.
///
/// 1. A common ancestor of at least three strong alternatives wins.
/// 2. A parent scoring higher than the current pick wins, while parents
///    stay above a third of the pick's score.
/// 3. Parents with no other element child are absorbed.
fn refine_top_candidate(
    doc: &Document,
    state: &mut ExtractionState,
    top_candidates: &[NodeId],
    first: NodeId,
    page: NodeId,
    flags: Flags,
) -> NodeId {
    let mut top_candidate = first;
    let top_score = state.score(first);

    let alternative_ancestors: Vec<Vec<NodeId>> = top_candidates
        .iter()
        .skip(1)
        .filter(|&&candidate| state.score(candidate) / top_score >= 0.75)
        .map(|&candidate| doc.ancestors_up_to(candidate, 0))
        .collect();
    if alternative_ancestors.len() >= MINIMUM_TOP_CANDIDATES {
        let mut parent = doc.parent(top_candidate);
        while let Some(ancestor) = parent.filter(|&p| below_page(doc, p, page)) {
            let lists = alternative_ancestors
                .iter()
                .filter(|ancestors| ancestors.contains(&ancestor))
                .count();
            if lists >= MINIMUM_TOP_CANDIDATES {
                top_candidate = ancestor;
                break;
            }
            parent = doc.parent(ancestor);
        }
    }
    if !state.is_candidate(top_candidate) {
        initialize_node(doc, state, top_candidate, flags);
    }

    let mut parent = doc.parent(top_candidate);
    let mut last_score = state.score(top_candidate);
    let score_threshold = last_score / 3.0;
    while let Some(ancestor) = parent.filter(|&p| below_page(doc, p, page)) {
        parent = doc.parent(ancestor);
        if !state.is_candidate(ancestor) {
            continue;
        }
        let parent_score = state.score(ancestor);
        if parent_score < score_threshold {
            break;
        }
        if parent_score > last_score {
            top_candidate = ancestor;
            break;
        }
        last_score = parent_score;
    }

    let mut parent = doc.parent(top_candidate);
    while let Some(ancestor) = parent.filter(|&p| below_page(doc, p, page)) {
        if doc.element_children(ancestor).count() != 1 {
            break;
        }
        top_candidate = ancestor;
        parent = doc.parent(ancestor);
    }
    if !state.is_candidate(top_candidate) {
        initialize_node(doc, state, top_candidate, flags);
    }
    top_candidate
}

/// First usable `dir` among the parent, the candidate and the parent's
/// ancestors.
fn article_direction(
    doc: &Document,
    top_candidate: NodeId,
    parent: Option<NodeId>,
) -> Option<TextDirection> {
    let ancestors = parent.map(|p| doc.ancestors_up_to(p, 0)).unwrap_or_default();
    parent
        .into_iter()
        .chain(std::iter::once(top_candidate))
        .chain(ancestors)
        .filter_map(|node| doc.attr(node, "dir"))
        .find_map(TextDirection::from_attr)
}

// =============================================================================
// Sibling merging
// =============================================================================

/// Move the top candidate and its related siblings into a new detached
/// container.
fn merge_siblings(
    doc: &mut Document,
    state: &ExtractionState,
    top_candidate: NodeId,
    parent: Option<NodeId>,
) -> NodeId {
    let container = doc.create_element("div");
    let top_score = state.score(top_candidate);
    let threshold = f64::max(10.0, top_score * 0.2);
    let top_class = doc.class_name(top_candidate).to_string();
    let siblings: Vec<NodeId> = match parent {
        Some(parent) => doc.element_children(parent).collect(),
        None => vec![top_candidate],
    };

    for sibling in siblings {
        let append = sibling == top_candidate || {
            let bonus = if !top_class.is_empty() && doc.class_name(sibling) == top_class {
                top_score * 0.2
            } else {
                0.0
            };
            (state.is_candidate(sibling) && state.score(sibling) + bonus >= threshold)
                || is_related_paragraph(doc, sibling)
        };
        if !append {
            continue;
        }
        if doc
            .tag_name(sibling)
            .is_some_and(|tag| !ALTER_TO_DIV_EXCEPTIONS.contains(&tag))
        {
            doc.rename(sibling, "div");
        }
        doc.append_child(container, sibling);
    }
    container
}

/// A sibling paragraph that reads as part of the article: long with few
/// links, or short, link-free and ending a sentence.
fn is_related_paragraph(doc: &Document, node: NodeId) -> bool {
    if !doc.has_tag(node, "p") {
        return false;
    }
    let density = link_density(doc, node);
    let content = inner_text(doc, node, true);
    let length = content.chars().count();
    (length > 80 && density < 0.25)
        || (length < 80 && length > 0 && density == 0.0 && SENTENCE_END.is_match(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::parser::parse_markup;

    fn parse(html: &str) -> Document {
        parse_markup(html, None, 0).document
    }

    #[test]
    fn test_class_weight() {
        let doc = parse(r#"<div class="article-body" id="sidebar"></div><p class="x"></p>"#);
        let div = doc.elements_by_tag_name(doc.root(), "div")[0];
        let p = doc.elements_by_tag_name(doc.root(), "p")[0];
        assert_eq!(class_weight(&doc, div, Flags::ALL), 0.0);
        assert_eq!(class_weight(&doc, p, Flags::ALL), 0.0);
        let doc = parse(r#"<div class="content"></div>"#);
        let div = doc.elements_by_tag_name(doc.root(), "div")[0];
        assert_eq!(class_weight(&doc, div, Flags::ALL), 25.0);
        let no_weights = Flags {
            weight_classes: false,
            ..Flags::ALL
        };
        assert_eq!(class_weight(&doc, div, no_weights), 0.0);
    }

    #[test]
    fn test_initialize_node_tag_weights() {
        let doc = parse("<div></div><li></li><th></th><pre></pre>");
        let mut state = ExtractionState::new();
        let nodes = doc.elements_by_tag_names(doc.root(), &["div", "li", "th", "pre"]);
        for &node in &nodes {
            initialize_node(&doc, &mut state, node, Flags::ALL);
        }
        let scores: Vec<f64> = nodes.iter().map(|&n| state.score(n)).collect();
        assert_eq!(scores, vec![5.0, -3.0, -5.0, 3.0]);
    }

    #[test]
    fn test_walk_wraps_phrasing_and_renames_divs() {
        let mut doc = parse("<body><div>some <b>inline</b> text<div>inner</div>tail</div></body>");
        let options = Options::default();
        let mut ctx = Context::new(&options, String::new());
        let first = doc.document_element().expect("root element");
        walk(&mut doc, first, Flags::ALL, &mut ctx);
        let body = doc.body().expect("body");
        assert_eq!(
            doc.inner_html(body),
            "<div><p>some <b>inline</b> text</p><p>inner</p><p>tail</p></div>"
        );
    }

    #[test]
    fn test_walk_removes_unlikely_and_byline() {
        let mut doc = parse(
            r#"<body><div class="sidebar">menu</div><div class="sidebar main">kept</div>
            <p class="byline">By Someone</p><table><tr><td><div class="comment">cell</div></td></tr></table></body>"#,
        );
        let options = Options::default();
        let mut ctx = Context::new(&options, String::new());
        let first = doc.document_element().expect("root element");
        walk(&mut doc, first, Flags::ALL, &mut ctx);
        let html = doc.to_html();
        assert!(!html.contains("menu"));
        assert!(html.contains("kept"));
        assert!(!html.contains("By Someone"));
        assert!(html.contains("cell"));
        assert_eq!(ctx.article_byline.as_deref(), Some("By Someone"));
    }

    #[test]
    fn test_duplicate_title_heading_removed() {
        let mut doc = parse("<body><h1>Frogs of the world</h1><h2>Frogs of the world</h2><p>x</p></body>");
        let options = Options::default();
        let mut ctx = Context::new(&options, "Frogs of the world".to_string());
        let first = doc.document_element().expect("root element");
        walk(&mut doc, first, Flags::ALL, &mut ctx);
        assert!(doc.elements_by_tag_name(doc.root(), "h1").is_empty());
        assert_eq!(doc.elements_by_tag_name(doc.root(), "h2").len(), 1);
    }

    #[test]
    fn test_rank_keeps_best_first() {
        let doc = parse("<div></div><div></div><div></div>");
        let divs = doc.elements_by_tag_name(doc.root(), "div");
        let mut state = ExtractionState::new();
        state.set_score(divs[0], 1.0);
        state.set_score(divs[1], 3.0);
        state.set_score(divs[2], 2.0);
        let top = rank_candidates(&doc, &mut state, &divs, 2);
        assert_eq!(top, vec![divs[1], divs[2]]);
    }
}
