//! `<meta>` tag collection.

use std::collections::HashMap;

use crate::dom::Document;
use crate::patterns::{META_NAME, META_PROPERTY};

/// Normalized `<meta>` values keyed by lowercase property or name, e.g.
/// `og:title`, `dc:creator`, `parsely-pub-date`. Later tags win.
#[derive(Debug, Clone, Default)]
pub struct MetaValues(HashMap<String, String>);

impl MetaValues {
    /// Value for `key`, ignoring empty values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// First non-empty value among `keys`, in order.
    #[must_use]
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|key| self.get(key))
            .map(str::to_string)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collect every recognised `<meta property=...>` and `<meta name=...>`.
///
/// A `property` that matches takes precedence over the `name` of the same
/// tag. Names are normalized by removing whitespace and turning `.` into
/// `:` so `DC.title` and `dc:title` are the same key.
#[must_use]
pub fn collect_meta_values(doc: &Document) -> MetaValues {
    let mut values = HashMap::new();
    for meta in doc.elements_by_tag_name(doc.root(), "meta") {
        let Some(content) = doc.attr(meta, "content").filter(|c| !c.is_empty()) else {
            continue;
        };
        let content = content.trim().to_string();

        let property_key = doc
            .attr(meta, "property")
            .and_then(|property| META_PROPERTY.find(property))
            .map(|found| strip_whitespace(found.as_str()));
        if let Some(key) = property_key {
            values.insert(key, content);
            continue;
        }

        if let Some(name) = doc.attr(meta, "name").filter(|name| META_NAME.is_match(name)) {
            values.insert(strip_whitespace(name).replace('.', ":"), content);
        }
    }
    MetaValues(values)
}

fn strip_whitespace(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markup;

    fn values(html: &str) -> MetaValues {
        collect_meta_values(&parse_markup(html, None, 0).document)
    }

    #[test]
    fn test_property_and_name_keys() {
        let v = values(
            r#"<meta property=" OG : Title " content=" Spaced "><meta name="DC.Creator" content="A. Writer">
            <meta name="parsely-pub-date" content="2021-05-06"><meta name="viewport" content="width=device-width">"#,
        );
        assert_eq!(v.get("og:title"), Some("Spaced"));
        assert_eq!(v.get("dc:creator"), Some("A. Writer"));
        assert_eq!(v.get("parsely-pub-date"), Some("2021-05-06"));
        assert_eq!(v.get("viewport"), None);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_later_tags_win_and_empty_skipped() {
        let v = values(
            r#"<meta name="author" content="First"><meta name="author" content="Second"><meta name="title" content="">"#,
        );
        assert_eq!(v.get("author"), Some("Second"));
        assert_eq!(v.first_of(&["title", "author"]), Some("Second".to_string()));
    }
}
