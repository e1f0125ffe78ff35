//! Article title heuristics.
//!
//! Page titles usually carry the site name (`Story headline | Site`). The
//! heuristic strips such suffixes and prefixes while refusing results that
//! are too short to be a real headline.

use crate::dom::Document;
use crate::extractor::nodes::{inner_text, word_count};
use crate::patterns::{
    NORMALIZE, TITLE_HIERARCHY_SEPARATOR, TITLE_LEADING_PART, TITLE_SEPARATOR,
    TITLE_SEPARATOR_RUN, TOKENIZE,
};

/// Best guess at the article's headline from `<title>` and the page's
/// headings.
#[must_use]
pub fn article_title(doc: &Document) -> String {
    let original = doc.title().trim().to_string();
    let mut title = original.clone();
    let mut had_hierarchical_separators = false;

    if TITLE_SEPARATOR.is_match(&title) {
        had_hierarchical_separators = TITLE_HIERARCHY_SEPARATOR.is_match(&title);
        // Drop everything after the last separator.
        if let Some(last) = TITLE_SEPARATOR.find_iter(&original).last() {
            title = original[..last.start()].to_string();
        }
        // Too little left: drop the leading part instead.
        if word_count(&title) < 3 {
            title = TITLE_LEADING_PART.replace(&original, "").into_owned();
        }
    } else if title.contains(": ") {
        let trimmed = title.trim();
        let matches_heading = doc
            .elements_by_tag_names(doc.root(), &["h1", "h2"])
            .into_iter()
            .any(|heading| doc.text_content(heading).trim() == trimmed);
        if !matches_heading {
            let last_colon = original.rfind(':').map_or(0, |i| i + 1);
            title = original[last_colon..].to_string();
            if word_count(&title) < 3 {
                let first_colon = original.find(':').map_or(0, |i| i + 1);
                title = original[first_colon..].to_string();
            } else if original
                .find(':')
                .is_some_and(|i| word_count(&original[..i]) > 5)
            {
                title = original.clone();
            }
        }
    } else {
        let length = title.chars().count();
        if length > 150 || length < 15 {
            let h1s = doc.elements_by_tag_name(doc.root(), "h1");
            if let [only] = h1s.as_slice() {
                title = inner_text(doc, *only, false);
            }
        }
    }

    let title = NORMALIZE.replace_all(title.trim(), " ").into_owned();
    // Short results are only trusted when they came from a clean split on
    // hierarchical separators.
    let words = word_count(&title);
    if words <= 4
        && (!had_hierarchical_separators
            || words != word_count(&TITLE_SEPARATOR_RUN.replace_all(&original, "")) - 1)
    {
        return original;
    }
    title
}

/// Share of `b`'s tokens also found in `a`, weighted by length, in `[0, 1]`.
#[must_use]
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let tokens_a: Vec<&str> = TOKENIZE.split(&a).filter(|t| !t.is_empty()).collect();
    let tokens_b: Vec<&str> = TOKENIZE.split(&b).filter(|t| !t.is_empty()).collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let unique_b: Vec<&str> = tokens_b
        .iter()
        .copied()
        .filter(|token| !tokens_a.contains(token))
        .collect();
    let distance = unique_b.join(" ").chars().count() as f64
        / tokens_b.join(" ").chars().count() as f64;
    1.0 - distance
}
