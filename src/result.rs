//! Result types for extraction output.

use serde::{Deserialize, Serialize};

/// Base text direction of the article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Parse a `dir` attribute value. `auto` and unknown values give `None`.
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ltr" => Some(Self::Ltr),
            "rtl" => Some(Self::Rtl),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// The readable article extracted from a document.
///
/// Serializes with camelCase field names (`textContent`, `siteName`,
/// `publishedTime`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Article title.
    pub title: String,

    /// Article HTML: the inner HTML of the article container.
    pub content: String,

    /// Article text without markup.
    pub text_content: String,

    /// Length of `text_content` in characters.
    pub length: usize,

    /// Short description, from metadata or the first paragraph.
    pub excerpt: String,

    /// Author line.
    pub byline: Option<String>,

    /// Text direction of the article.
    pub dir: Option<TextDirection>,

    /// Name of the publishing site.
    pub site_name: Option<String>,

    /// Document language.
    pub lang: Option<String>,

    /// Publication time as found in metadata, unparsed.
    pub published_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!(TextDirection::from_attr(" RTL "), Some(TextDirection::Rtl));
        assert_eq!(TextDirection::from_attr("ltr"), Some(TextDirection::Ltr));
        assert_eq!(TextDirection::from_attr("auto"), None);
    }

    #[test]
    fn test_json_field_names() {
        let result = ExtractionResult {
            title: "T".to_string(),
            text_content: "abc".to_string(),
            length: 3,
            dir: Some(TextDirection::Rtl),
            site_name: Some("Site".to_string()),
            ..ExtractionResult::default()
        };
        let json = serde_json::to_value(&result).expect("serializes");
        assert_eq!(json["textContent"], "abc");
        assert_eq!(json["siteName"], "Site");
        assert_eq!(json["dir"], "rtl");
        assert!(json["publishedTime"].is_null());
    }
}
