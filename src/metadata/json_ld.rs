//! schema.org JSON-LD parsing.
//!
//! Only the first `<script type="application/ld+json">` block that describes
//! an article is used. Blocks that fail to parse, use another vocabulary or
//! describe something else are skipped.

use serde_json::Value;

use crate::dom::Document;
use crate::patterns::{JSON_LD_ARTICLE_TYPES, SCHEMA_ORG};

use super::title::{article_title, text_similarity};
use super::Metadata;

/// Metadata from the first article JSON-LD block, or empty metadata.
#[must_use]
pub fn extract_json_ld(doc: &Document) -> Metadata {
    doc.elements_by_tag_name(doc.root(), "script")
        .into_iter()
        .filter(|&script| doc.attr(script, "type") == Some("application/ld+json"))
        .find_map(|script| {
            let content = doc.text_content(script);
            let content = strip_cdata(&content);
            let parsed: Value = serde_json::from_str(content).ok()?;
            let article = find_article(&parsed)?;
            Some(article_metadata(doc, article))
        })
        .unwrap_or_default()
}

fn strip_cdata(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed.strip_prefix("<![CDATA[").unwrap_or(trimmed);
    trimmed.strip_suffix("]]>").unwrap_or(trimmed)
}

fn is_article_type(value: &Value) -> bool {
    match value {
        Value::String(kind) => JSON_LD_ARTICLE_TYPES.is_match(kind),
        Value::Array(kinds) => kinds.iter().any(is_article_type),
        _ => false,
    }
}

fn is_schema_org(value: &Value) -> bool {
    match value.get("@context") {
        Some(Value::String(context)) => SCHEMA_ORG.is_match(context),
        Some(Value::Object(context)) => context
            .get("@vocab")
            .and_then(Value::as_str)
            .is_some_and(|vocab| SCHEMA_ORG.is_match(vocab)),
        _ => false,
    }
}

/// The article object of a JSON-LD document: a top-level article, the
/// first article of a top-level array, or the first article of `@graph`.
fn find_article(parsed: &Value) -> Option<&Value> {
    let candidate = match parsed {
        Value::Array(items) => items
            .iter()
            .find(|item| item.get("@type").is_some_and(is_article_type))?,
        other => other,
    };
    if !is_schema_org(candidate) {
        return None;
    }
    let candidate = match (candidate.get("@type"), candidate.get("@graph")) {
        (None, Some(Value::Array(graph))) => graph
            .iter()
            .find(|item| item.get("@type").is_some_and(is_article_type))?,
        _ => candidate,
    };
    candidate
        .get("@type")
        .is_some_and(is_article_type)
        .then_some(candidate)
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn article_metadata(doc: &Document, article: &Value) -> Metadata {
    let name = string_field(article, "name");
    let headline = string_field(article, "headline");
    let title = match (name, headline) {
        (Some(name), Some(headline)) if name != headline => {
            // Prefer whichever matches the page title.
            let page_title = article_title(doc);
            let name_matches = text_similarity(name, &page_title) > 0.75;
            let headline_matches = text_similarity(headline, &page_title) > 0.75;
            if headline_matches && !name_matches {
                Some(headline.trim())
            } else {
                Some(name.trim())
            }
        }
        (Some(name), _) => Some(name.trim()),
        (None, Some(headline)) => Some(headline.trim()),
        (None, None) => None,
    };

    let byline = match article.get("author") {
        Some(Value::Array(authors)) => {
            let names: Vec<&str> = authors
                .iter()
                .filter_map(|author| string_field(author, "name"))
                .map(str::trim)
                .collect();
            (!names.is_empty()).then(|| names.join(", "))
        }
        Some(author) => string_field(author, "name").map(|name| name.trim().to_string()),
        None => None,
    };

    Metadata {
        title: title.map(str::to_string),
        byline,
        excerpt: string_field(article, "description").map(|d| d.trim().to_string()),
        site_name: article
            .get("publisher")
            .and_then(|publisher| string_field(publisher, "name"))
            .map(|name| name.trim().to_string()),
        published_time: string_field(article, "datePublished").map(|d| d.trim().to_string()),
        lang: None,
    }
}
