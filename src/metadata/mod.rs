//! Article metadata extraction.
//!
//! Metadata is read from the untouched document before any cleanup, since
//! cleanup removes the `<script>` and `<meta>` elements it comes from.
//! Sources, highest priority first:
//!
//! 1. schema.org JSON-LD (`<script type="application/ld+json">`)
//! 2. `<meta>` tags (Dublin Core, Open Graph, Twitter, Parse.ly, Weibo)
//! 3. the `<title>` element, trimmed by [`title::article_title`]

pub mod json_ld;
pub mod meta_tags;
pub mod title;

use crate::dom::Document;

pub use json_ld::extract_json_ld;
pub use meta_tags::collect_meta_values;
pub use title::{article_title, text_similarity};

/// Metadata gathered for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub published_time: Option<String>,
    pub lang: Option<String>,
}

/// Gather metadata from every source, JSON-LD first unless
/// `disable_json_ld` is set.
#[must_use]
pub fn extract_metadata(doc: &Document, disable_json_ld: bool) -> Metadata {
    let json_ld = if disable_json_ld {
        Metadata::default()
    } else {
        extract_json_ld(doc)
    };
    let values = collect_meta_values(doc);

    let title = json_ld
        .title
        .or_else(|| {
            values.first_of(&[
                "dc:title",
                "dcterm:title",
                "og:title",
                "weibo:article:title",
                "weibo:webpage:title",
                "title",
                "twitter:title",
                "parsely-title",
            ])
        })
        .or_else(|| Some(article_title(doc)).filter(|t| !t.is_empty()));

    let article_author = values
        .get("article:author")
        .filter(|author| !crate::url_utils::is_url(author))
        .map(str::to_string);
    let byline = json_ld
        .byline
        .or_else(|| values.first_of(&["dc:creator", "dcterm:creator", "author", "parsely-author"]))
        .or(article_author);

    let excerpt = json_ld.excerpt.or_else(|| {
        values.first_of(&[
            "dc:description",
            "dcterm:description",
            "og:description",
            "weibo:article:description",
            "weibo:webpage:description",
            "description",
            "twitter:description",
        ])
    });

    let site_name = json_ld.site_name.or_else(|| values.first_of(&["og:site_name"]));

    let published_time = json_ld
        .published_time
        .or_else(|| values.first_of(&["article:published_time", "parsely-pub-date"]));

    Metadata {
        title: title.map(|t| unescape(&t)),
        byline: byline.map(|b| unescape(&b)),
        excerpt: excerpt.map(|e| unescape(&e)),
        site_name: site_name.map(|s| unescape(&s)),
        published_time: published_time.map(|p| unescape(&p)),
        lang: document_lang(doc),
    }
}

/// `lang` of the root element, falling back to a `content-language`
/// declaration.
#[must_use]
pub fn document_lang(doc: &Document) -> Option<String> {
    let from_root = doc
        .document_element()
        .and_then(|root| doc.attr(root, "lang"))
        .map(str::trim)
        .filter(|lang| !lang.is_empty());
    if let Some(lang) = from_root {
        return Some(lang.to_string());
    }
    doc.elements_by_tag_name(doc.root(), "meta")
        .into_iter()
        .filter(|&meta| {
            doc.attr(meta, "http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("content-language"))
        })
        .find_map(|meta| doc.attr(meta, "content"))
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Decode character references left in a value, e.g. `&amp;` in a
/// double-escaped `content` attribute.
fn unescape(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markup;

    fn metadata(html: &str) -> Metadata {
        extract_metadata(&parse_markup(html, None, 0).document, false)
    }

    #[test]
    fn test_meta_precedence() {
        let m = metadata(
            r#"<html lang="fr"><head>
            <title>Fallback title for the page</title>
            <meta property="og:title" content="OG title">
            <meta name="dc.title" content="DC title">
            <meta name="author" content="Jane Doe">
            <meta property="og:description" content="OG description">
            <meta name="description" content="Plain description">
            <meta property="og:site_name" content="Example News">
            <meta property="article:published_time" content="2020-01-02T03:04:05Z">
            </head></html>"#,
        );
        assert_eq!(m.title.as_deref(), Some("DC title"));
        assert_eq!(m.byline.as_deref(), Some("Jane Doe"));
        assert_eq!(m.excerpt.as_deref(), Some("OG description"));
        assert_eq!(m.site_name.as_deref(), Some("Example News"));
        assert_eq!(m.published_time.as_deref(), Some("2020-01-02T03:04:05Z"));
        assert_eq!(m.lang.as_deref(), Some("fr"));
    }

    #[test]
    fn test_article_author_url_ignored() {
        let m = metadata(
            r#"<head><meta property="article:author" content="https://example.com/jane"></head>"#,
        );
        assert_eq!(m.byline, None);
        let m = metadata(r#"<head><meta property="article:author" content="Jane Roe"></head>"#);
        assert_eq!(m.byline.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn test_entities_unescaped() {
        let m = metadata(r#"<head><meta name="description" content="Fish &amp;amp; chips"></head>"#);
        assert_eq!(m.excerpt.as_deref(), Some("Fish & chips"));
    }

    #[test]
    fn test_title_fallback() {
        let m = metadata("<head><title>Just a plain page title here</title></head>");
        assert_eq!(m.title.as_deref(), Some("Just a plain page title here"));
        assert_eq!(metadata("<p>no title</p>").title, None);
    }

    #[test]
    fn test_lang_from_content_language() {
        let m = metadata(r#"<head><meta http-equiv="Content-Language" content="de"></head>"#);
        assert_eq!(m.lang.as_deref(), Some("de"));
    }
}
