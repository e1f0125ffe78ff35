//! Tag tables used while scoring and cleaning.
//!
//! Arrays are kept small enough that a linear `contains` is as fast as a
//! hash lookup; the helpers below are what the rest of the engine calls.

/// Elements whose text is scored directly.
pub static TAGS_TO_SCORE: [&str; 7] = ["section", "h2", "h3", "h4", "h5", "h6", "p"];

/// Scored only to count text inside table cells and preformatted blocks.
pub static EXTRA_TAGS_TO_SCORE: [&str; 2] = ["td", "pre"];

/// Block-level children that stop a `div` from being treated as a paragraph.
pub static DIV_TO_P_ELEMS: [&str; 9] = [
    "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul",
];

/// Sibling tags kept as-is when merged into the article; others become `div`.
pub static ALTER_TO_DIV_EXCEPTIONS: [&str; 6] = ["div", "article", "section", "p", "ol", "ul"];

/// Presentational attributes stripped from the article.
pub static PRESENTATIONAL_ATTRIBUTES: [&str; 12] = [
    "align", "background", "bgcolor", "border", "cellpadding", "cellspacing", "frame", "hspace",
    "rules", "style", "valign", "vspace",
];

/// Elements whose legacy `width`/`height` attributes are stripped.
pub static DEPRECATED_SIZE_ATTRIBUTE_ELEMS: [&str; 5] = ["table", "th", "td", "hr", "pre"];

/// Inline content elements.
pub static PHRASING_ELEMS: [&str; 39] = [
    "abbr", "audio", "b", "bdo", "br", "button", "cite", "code", "data", "datalist", "dfn", "em",
    "embed", "i", "img", "input", "kbd", "label", "mark", "math", "meter", "noscript", "object",
    "output", "progress", "q", "ruby", "samp", "script", "select", "small", "span", "strong",
    "sub", "sup", "textarea", "time", "var", "wbr",
];

/// ARIA roles of page furniture.
pub static UNLIKELY_ROLES: [&str; 7] = [
    "menu",
    "menubar",
    "complementary",
    "navigation",
    "alert",
    "alertdialog",
    "dialog",
];

/// Classes that survive class stripping regardless of options.
pub static CLASSES_TO_PRESERVE: [&str; 1] = ["page"];

/// Embedded content checked against the video allow-list.
pub static EMBED_ELEMS: [&str; 3] = ["object", "embed", "iframe"];

/// Removed from the article before share widgets are looked for.
pub static CLEANED_BEFORE_SHARE: [&str; 5] = ["object", "embed", "footer", "link", "aside"];

/// Removed from the article after share widgets, so their text still counts
/// toward a widget's size.
pub static CLEANED_AFTER_SHARE: [&str; 5] = ["iframe", "input", "textarea", "select", "button"];

/// Media elements whose URL attributes are made absolute.
pub static MEDIA_ELEMS: [&str; 6] = ["img", "picture", "figure", "video", "audio", "source"];

/// Attributes rewritten to absolute URLs.
pub static URL_ATTRIBUTES: [&str; 2] = ["src", "poster"];

#[inline]
#[must_use]
pub fn is_tag_to_score(tag: &str) -> bool {
    TAGS_TO_SCORE.contains(&tag) || EXTRA_TAGS_TO_SCORE.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_div_to_p_elem(tag: &str) -> bool {
    DIV_TO_P_ELEMS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_phrasing_elem(tag: &str) -> bool {
    PHRASING_ELEMS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}
