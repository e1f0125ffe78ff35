//! Compiled regex patterns and keyword tables used by the readerable check
//! and the extraction engine.
//!
//! All patterns are compiled once on first use with `LazyLock` and never
//! mutated. They are public so callers can test or reuse them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Class / id signals
// =============================================================================

/// Class or id fragments of page furniture: ads, comments, sidebars, footers
/// and the like.
pub static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .expect("UNLIKELY_CANDIDATES regex")
});

/// Fragments that rescue an otherwise unlikely candidate.
pub static OK_MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|mathjax|shadow")
        .expect("OK_MAYBE_CANDIDATE regex")
});

/// The readerable check's rescue list (no `mathjax`).
pub static READERABLE_OK_MAYBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|shadow")
        .expect("READERABLE_OK_MAYBE regex")
});

/// Class or id fragments that raise a node's weight.
pub static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story",
    )
    .expect("POSITIVE regex")
});

/// Class or id fragments that lower a node's weight.
pub static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|footer|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|widget",
    )
    .expect("NEGATIVE regex")
});

/// Markers of an author line.
pub static BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)byline|author|dateline|writtenby|p-author").expect("BYLINE regex")
});

/// Social sharing widgets, matched per class token.
pub static SHARE_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\b|_)(share|sharedaddy)(\b|_)").expect("SHARE_ELEMENTS regex")
});

// =============================================================================
// Media and URLs
// =============================================================================

/// Embedded video hosts kept inside the article.
pub static VIDEOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)//(www\.)?((dailymotion|youtube|youtube-nocookie|player\.vimeo|v\.qq)\.com|(archive|upload\.wikimedia)\.org|player\.twitch\.tv)",
    )
    .expect("VIDEOS regex")
});

/// In-page anchor links.
pub static HASH_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#.+").expect("HASH_URL regex"));

/// One candidate of a `srcset` list: URL, optional descriptor, separator.
pub static SRCSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\S+)(\s+[\d.]+[xw])?(\s*(?:,|$))").expect("SRCSET_URL regex")
});

/// A base64 `data:` URL, capturing the MIME type.
pub static B64_DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:\s*([^\s;,]+)\s*;\s*base64\s*,").expect("B64_DATA_URL regex")
});

/// Image file extensions, used when hunting for lazy-load sources.
pub static IMAGE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp)").expect("IMAGE_EXTENSION regex")
});

/// An attribute value that looks like a `srcset`.
pub static SRCSET_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp)\s+\d").expect("SRCSET_LIKE regex")
});

/// An attribute value that is a single image URL.
pub static SRC_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\S+\.(jpg|jpeg|png|webp)\S*\s*$").expect("SRC_LIKE regex")
});

// =============================================================================
// Text
// =============================================================================

/// Comma characters across scripts.
pub static COMMAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\u{002C}|\u{060C}|\u{FE50}|\u{FE10}|\u{FE11}|\u{2E41}|\u{2E34}|\u{2E32}|\u{FF0C}")
        .expect("COMMAS regex")
});

/// Two or more whitespace characters.
pub static NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("NORMALIZE regex"));

/// Whitespace runs, for word counting.
pub static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE regex"));

/// Word tokens, for title similarity.
pub static TOKENIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("TOKENIZE regex"));

/// A sentence end: period followed by a space or the end of text.
pub static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.( |$)").expect("SENTENCE_END regex"));

/// Advertisement labels in many languages.
pub static AD_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?iu)^(ad(vertising|vertisement)?|pub(licité)?|werb(ung)?|广告|Реклама|Anuncio)$")
        .expect("AD_WORDS regex")
});

/// Loading placeholders in many languages.
pub static LOADING_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?iu)^((loading|正在加载|Загрузка|chargement|cargando)(…|\.\.\.)?)$")
        .expect("LOADING_WORDS regex")
});

// =============================================================================
// Titles
// =============================================================================

/// Hierarchical title separators surrounded by spaces.
pub static TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\|\-\\/>»] ").expect("TITLE_SEPARATOR regex"));

/// Separators that are less likely to split a site name off.
pub static TITLE_HIERARCHY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\\/>»] ").expect("TITLE_HIERARCHY_SEPARATOR regex"));

/// Everything up to and including the first separator.
pub static TITLE_LEADING_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^\|\-\\/>»]*[\|\-\\/>»]").expect("TITLE_LEADING_PART regex")
});

/// Runs of separator characters, removed when counting title words.
pub static TITLE_SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\|\-\\/>»]+").expect("TITLE_SEPARATOR_RUN regex"));

// =============================================================================
// Metadata
// =============================================================================

/// Schema.org types accepted as an article in JSON-LD.
pub static JSON_LD_ARTICLE_TYPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Article|AdvertiserContentArticle|NewsArticle|AnalysisNewsArticle|AskPublicNewsArticle|BackgroundNewsArticle|OpinionNewsArticle|ReportageNewsArticle|ReviewNewsArticle|Report|SatiricalArticle|ScholarlyArticle|MedicalScholarlyArticle|SocialMediaPosting|BlogPosting|LiveBlogPosting|DiscussionForumPosting|TechArticle|APIReference$",
    )
    .expect("JSON_LD_ARTICLE_TYPES regex")
});

/// `@context` values that identify schema.org.
pub static SCHEMA_ORG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://schema\.org/?$").expect("SCHEMA_ORG regex")
});

/// `property` attribute values we read.
pub static META_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*(article|dc|dcterm|og|twitter)\s*:\s*(author|creator|description|published_time|title|site_name)\s*",
    )
    .expect("META_PROPERTY regex")
});

/// `name` attribute values we read.
pub static META_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(dc|dcterm|og|twitter|parsely|weibo:(article|webpage))\s*[-\.:]\s*)?(author|creator|pub-date|description|title|site_name)\s*$",
    )
    .expect("META_NAME regex")
});

// =============================================================================
// Visibility
// =============================================================================

/// Inline styles that hide an element.
pub static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|;)\s*(display\s*:\s*none|visibility\s*:\s*hidden)\s*(!important)?\s*(;|$)")
        .expect("HIDDEN_STYLE regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlikely_and_rescue() {
        assert!(UNLIKELY_CANDIDATES.is_match("site-footer"));
        assert!(UNLIKELY_CANDIDATES.is_match("Sidebar"));
        assert!(OK_MAYBE_CANDIDATE.is_match("main-sidebar"));
        assert!(!UNLIKELY_CANDIDATES.is_match("story-body"));
    }

    #[test]
    fn test_negative_hid_forms() {
        assert!(NEGATIVE.is_match("hid"));
        assert!(NEGATIVE.is_match("box hid"));
        assert!(!NEGATIVE.is_match("hidalgo"));
    }

    #[test]
    fn test_commas() {
        assert_eq!(COMMAS.split("a, b\u{FF0C}c\u{060C} d").count(), 4);
    }

    #[test]
    fn test_videos() {
        assert!(VIDEOS.is_match("https://www.youtube.com/embed/xyz"));
        assert!(VIDEOS.is_match("//player.vimeo.com/video/1"));
        assert!(!VIDEOS.is_match("https://ads.example.com/frame"));
    }

    #[test]
    fn test_meta_patterns() {
        assert!(META_PROPERTY.is_match("og:title"));
        assert!(META_PROPERTY.is_match("article:published_time"));
        assert!(META_NAME.is_match("dc:creator"));
        assert!(META_NAME.is_match("parsely-pub-date"));
        assert!(META_NAME.is_match("weibo:article:description"));
        assert!(!META_NAME.is_match("viewport"));
    }

    #[test]
    fn test_hidden_style() {
        assert!(HIDDEN_STYLE.is_match("display:none"));
        assert!(HIDDEN_STYLE.is_match("color: red; display: none !important;"));
        assert!(HIDDEN_STYLE.is_match("visibility: hidden"));
        assert!(!HIDDEN_STYLE.is_match("display: block"));
    }

    #[test]
    fn test_srcset_candidates() {
        let urls: Vec<&str> = SRCSET_URL
            .captures_iter("a.jpg 1x, b.jpg 2x")
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        assert_eq!(urls, vec!["a.jpg", "b.jpg"]);
    }
}
