//! Configuration options for extraction and the readerable check.
//!
//! Both structs have public fields and sensible defaults; customize them
//! with struct-update syntax.

use regex::Regex;

use crate::dom::{Document, NodeId};

/// Configuration options for [`extract`](crate::extract).
///
/// # Example
///
/// ```rust
/// use rs_readability::Options;
///
/// let options = Options {
///     char_threshold: 200,
///     keep_classes: true,
///     ..Options::default()
/// };
/// assert_eq!(options.nb_top_candidates, 5);
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Emit engine diagnostics through the `log` facade at debug level.
    ///
    /// Default: `false`
    pub debug: bool,

    /// Refuse trees with more elements than this. `0` disables the limit.
    ///
    /// Default: `0`
    pub max_elems_to_parse: usize,

    /// Number of top candidates compared when choosing the article root.
    ///
    /// Default: `5`
    pub nb_top_candidates: usize,

    /// Minimum article text length (characters) for an attempt to succeed.
    ///
    /// Default: `500`
    pub char_threshold: usize,

    /// Class names kept when classes are stripped. `page` is always kept.
    ///
    /// Default: empty
    pub classes_to_preserve: Vec<String>,

    /// Keep every `class` attribute in the article.
    ///
    /// Default: `false`
    pub keep_classes: bool,

    /// Ignore schema.org JSON-LD when collecting metadata.
    ///
    /// Default: `false`
    pub disable_json_ld: bool,

    /// Embeds (`object`, `embed`, `iframe`) whose source matches are kept.
    /// `None` uses the built-in list of video hosts.
    ///
    /// Default: `None`
    pub allowed_video_regex: Option<Regex>,

    /// Added to the link density limits used by conditional cleaning.
    /// Positive values keep more link-heavy blocks.
    ///
    /// Default: `0.0`
    pub link_density_modifier: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debug: false,
            max_elems_to_parse: 0,
            nb_top_candidates: 5,
            char_threshold: 500,
            classes_to_preserve: Vec::new(),
            keep_classes: false,
            disable_json_ld: false,
            allowed_video_regex: None,
            link_density_modifier: 0.0,
        }
    }
}

/// Visibility test used by the readerable check.
pub type VisibilityChecker = fn(&Document, NodeId) -> bool;

/// Configuration options for
/// [`is_probably_readerable`](crate::is_probably_readerable).
#[derive(Debug, Clone)]
pub struct ReaderableOptions {
    /// Shortest paragraph (characters, trimmed) that contributes to the
    /// score.
    ///
    /// Default: `140`
    pub min_content_length: usize,

    /// Score above which the document is considered readable.
    ///
    /// Default: `20.0`
    pub min_score: f64,

    /// Extra class/id patterns that mark a node as page furniture.
    ///
    /// Default: empty
    pub unlikely_patterns: Vec<Regex>,

    /// Extra class/id patterns that override the unlikely patterns.
    ///
    /// Default: empty
    pub likely_patterns: Vec<Regex>,

    /// Replaces the built-in inline-style visibility test.
    ///
    /// Default: `None`
    pub visibility_checker: Option<VisibilityChecker>,
}

impl Default for ReaderableOptions {
    fn default() -> Self {
        Self {
            min_content_length: 140,
            min_score: 20.0,
            unlikely_patterns: Vec::new(),
            likely_patterns: Vec::new(),
            visibility_checker: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();
        assert!(!opts.debug);
        assert_eq!(opts.max_elems_to_parse, 0);
        assert_eq!(opts.nb_top_candidates, 5);
        assert_eq!(opts.char_threshold, 500);
        assert!(opts.classes_to_preserve.is_empty());
        assert!(!opts.keep_classes);
        assert!(!opts.disable_json_ld);
        assert!(opts.allowed_video_regex.is_none());
        assert!(opts.link_density_modifier.abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_readerable_options() {
        let opts = ReaderableOptions::default();
        assert_eq!(opts.min_content_length, 140);
        assert!((opts.min_score - 20.0).abs() < f64::EPSILON);
        assert!(opts.unlikely_patterns.is_empty());
        assert!(opts.likely_patterns.is_empty());
        assert!(opts.visibility_checker.is_none());
    }

    #[test]
    fn test_struct_update() {
        let opts = Options {
            char_threshold: 20,
            classes_to_preserve: vec!["caption".to_string()],
            ..Options::default()
        };
        assert_eq!(opts.char_threshold, 20);
        assert_eq!(opts.classes_to_preserve, vec!["caption".to_string()]);
        assert_eq!(opts.nb_top_candidates, 5);
    }
}
