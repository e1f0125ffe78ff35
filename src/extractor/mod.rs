//! Readable content extraction.
//!
//! # Module Structure
//!
//! - `tags`: tag tables used while scoring and cleaning
//! - `state`: per-attempt scores, data-table marks and the retry ladder
//! - `nodes`: node predicates and tree walking helpers
//! - `media`: `noscript` image fallbacks and lazy-loaded images
//! - `prep`: document preprocessing before scoring
//! - `grab`: the scoring walk, top candidate selection and sibling merging
//! - `clean`: cleanup of the merged article
//! - `post`: URL rewriting, nested wrapper removal and class stripping
//!
//! # Pipeline
//!
//! 1. Refuse trees over `max_elems_to_parse` elements.
//! 2. Read metadata from the untouched tree.
//! 3. Preprocess once.
//! 4. For each step of [`RETRY_LADDER`], score a fresh copy of the
//!    preprocessed tree, merge siblings and clean the result. The first
//!    article with at least `char_threshold` characters wins.
//! 5. Post-process the winner and assemble the [`ExtractionResult`].

/// Debug-level log line, emitted only when `Options::debug` is set.
macro_rules! debug_log {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.options.debug {
            log::debug!($($arg)*);
        }
    };
}

pub mod clean;
pub mod grab;
pub mod media;
pub mod nodes;
pub mod post;
pub mod prep;
pub mod state;
pub mod tags;

use regex::Regex;

use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::metadata::{extract_metadata, Metadata};
use crate::options::Options;
use crate::patterns::VIDEOS;
use crate::result::{ExtractionResult, TextDirection};
use crate::url_utils::UriResolver;

pub use state::{ExtractionState, Flags, RETRY_LADDER};

use nodes::inner_text;
use tags::CLASSES_TO_PRESERVE;

/// Settings and findings shared by every attempt of one extraction.
pub struct Context<'a> {
    pub options: &'a Options,
    /// Title from metadata, used to drop a heading that repeats it.
    pub article_title: String,
    /// Byline found in the page body. Once set, later attempts keep it.
    pub article_byline: Option<String>,
    classes_to_preserve: Vec<String>,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(options: &'a Options, article_title: String) -> Self {
        let classes_to_preserve = CLASSES_TO_PRESERVE
            .iter()
            .map(|class| (*class).to_string())
            .chain(options.classes_to_preserve.iter().cloned())
            .collect();
        Self {
            options,
            article_title,
            article_byline: None,
            classes_to_preserve,
        }
    }

    /// Pattern for embeds that are kept.
    #[must_use]
    pub fn video_regex(&self) -> &Regex {
        self.options.allowed_video_regex.as_ref().unwrap_or(&*VIDEOS)
    }

    #[must_use]
    pub fn classes_to_preserve(&self) -> &[String] {
        &self.classes_to_preserve
    }
}

/// An article produced by one attempt.
#[derive(Debug)]
pub struct Article {
    /// Detached `div` holding the article.
    pub container: NodeId,
    /// Direction found on or above the top candidate.
    pub dir: Option<TextDirection>,
}

/// Extract the readable article from `doc`.
///
/// The tree is consumed: extraction rewrites it in place.
///
/// # Errors
///
/// - [`Error::TooManyElements`] when `max_elems_to_parse` is set and
///   exceeded. Checked before anything else.
/// - [`Error::NotReadable`] when no attempt of the retry ladder produced
///   `char_threshold` characters of text.
pub fn extract(mut doc: Document, options: &Options) -> Result<ExtractionResult> {
    if options.max_elems_to_parse > 0 {
        let count = doc.element_count();
        if count > options.max_elems_to_parse {
            return Err(Error::TooManyElements { count });
        }
    }

    let metadata = extract_metadata(&doc, options.disable_json_ld);
    let mut ctx = Context::new(options, metadata.title.clone().unwrap_or_default());
    debug_log!(ctx, "metadata: {metadata:?}");
    // `<base>` may live in a head that preprocessing drops.
    let resolver = UriResolver::for_document(&doc);

    prep::prep_document(&mut doc);

    for (attempt, flags) in RETRY_LADDER.iter().enumerate() {
        let mut working = doc.clone();
        let mut state = ExtractionState::new();
        let Some(article) = grab::grab_article(&mut working, &mut state, *flags, &mut ctx) else {
            debug_log!(ctx, "attempt {attempt}: no article");
            continue;
        };
        let text_length = inner_text(&working, article.container, true).chars().count();
        debug_log!(ctx, "attempt {attempt} with {flags:?}: {text_length} characters");
        if text_length < options.char_threshold {
            continue;
        }
        post::post_process(&mut working, article.container, &resolver, &ctx);
        return Ok(assemble(&working, &article, metadata, ctx.article_byline));
    }

    debug_log!(ctx, "every attempt fell below {} characters", options.char_threshold);
    Err(Error::NotReadable)
}

fn assemble(
    doc: &Document,
    article: &Article,
    metadata: Metadata,
    article_byline: Option<String>,
) -> ExtractionResult {
    let container = article.container;
    let text_content = doc.text_content(container);
    let excerpt = metadata.excerpt.unwrap_or_else(|| {
        doc.elements_by_tag_name(container, "p")
            .first()
            .map(|&p| doc.text_content(p).trim().to_string())
            .unwrap_or_default()
    });
    ExtractionResult {
        title: metadata.title.unwrap_or_default(),
        content: doc.inner_html(container),
        length: text_content.chars().count(),
        text_content,
        excerpt,
        byline: metadata.byline.or(article_byline),
        dir: article.dir,
        site_name: metadata.site_name,
        lang: metadata.lang,
        published_time: metadata.published_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(seed: &str) -> String {
        format!(
            "{seed} is a paragraph of article text, with commas, clauses, and enough words \
             to be scored as real content by the extraction engine. "
        )
        .repeat(3)
    }

    #[test]
    fn test_too_many_elements() {
        let doc = Document::parse("<html><div>yo</div></html>");
        let opts = Options {
            max_elems_to_parse: 1,
            ..Options::default()
        };
        assert_eq!(
            extract(doc, &opts).expect_err("too many"),
            Error::TooManyElements { count: 2 }
        );
    }

    #[test]
    fn test_short_document_not_readable() {
        let doc = Document::parse("<html><body><div>yo</div></body></html>");
        assert_eq!(
            extract(doc, &Options::default()).expect_err("not readable"),
            Error::NotReadable
        );
    }

    #[test]
    fn test_article_extracted_and_wrapped() {
        let html = format!(
            "<html><head><title>A long enough page title for tests</title></head><body>\
             <div id=\"story\"><p>{}</p><p>{}</p><p>{}</p></div></body></html>",
            paragraph("First"),
            paragraph("Second"),
            paragraph("Third")
        );
        let result = extract(Document::parse(&html), &Options::default()).expect("readable");
        assert!(result.content.starts_with("<div id=\"readability-page-1\" class=\"page\">"));
        assert!(result.text_content.contains("Second is a paragraph"));
        assert_eq!(result.length, result.text_content.chars().count());
        assert!(result.length >= 500);
        assert!(result.excerpt.starts_with("First is a paragraph"));
        assert_eq!(result.title, "A long enough page title for tests");
    }

    #[test]
    fn test_byline_from_body() {
        let html = format!(
            "<html><body><div><p class=\"byline\">By Jane Doe</p><p>{}</p><p>{}</p></div></body></html>",
            paragraph("One"),
            paragraph("Two")
        );
        let result = extract(Document::parse(&html), &Options::default()).expect("readable");
        assert_eq!(result.byline.as_deref(), Some("By Jane Doe"));
        assert!(!result.content.contains("By Jane Doe"));
    }
}
