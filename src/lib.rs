//! # rs-readability
//!
//! Readable article extraction from arbitrary, noisy markup.
//!
//! The crate bundles a lenient markup parser, an arena-backed document tree,
//! a content scoring engine and a cheap "is this page an article?" check.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_readability::{extract_html, Options};
//!
//! let paragraph = "Readable text with commas, clauses, and enough length to count. ".repeat(4);
//! let html = format!(
//!     "<html><head><title>My Article</title></head><body><div>\
//!      <p>{paragraph}</p><p>{paragraph}</p><p>{paragraph}</p></div></body></html>"
//! );
//!
//! let result = extract_html(&html, Some("https://example.com/post"), &Options::default())?;
//! assert_eq!(result.title, "My Article");
//! assert!(result.length >= 500);
//! # Ok::<(), rs_readability::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Lenient parsing**: malformed markup never fails, problems come back
//!   as diagnostics next to a usable tree
//! - **Readerable check**: a fast pre-check that never modifies the tree
//! - **Metadata**: title, byline, excerpt, site name, language and
//!   publication time from JSON-LD and meta tags
//! - **`dom-query` feature**: import trees built by an html5ever-based parser

mod error;
mod options;
mod result;

/// Arena document tree.
pub mod dom;

/// Lenient markup parser.
pub mod parser;

/// Character encoding detection and decoding.
pub mod encoding;

/// Regex tables shared by the readerable check and the engine.
pub mod patterns;

/// Metadata extraction (JSON-LD, meta tags, title cleanup).
pub mod metadata;

/// Content extraction engine.
pub mod extractor;

/// Link and text density measures.
pub mod link_density;

/// URL resolution.
pub mod url_utils;

/// The readerable pre-check.
pub mod readerable;

// Public API - re-exports
pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use extractor::extract;
pub use options::{Options, ReaderableOptions, VisibilityChecker};
pub use parser::{parse_markup, parse_markup_bytes, DiagnosticKind, ParseDiagnostic, ParseOutput};
pub use readerable::is_probably_readerable;
pub use result::{ExtractionResult, TextDirection};

/// Parse `html` and extract its article.
///
/// `base_uri` is used to make links absolute. The whole input is parsed;
/// `max_elems_to_parse` is enforced by [`extract`] on the parsed tree. Call
/// [`parse_markup`] directly for a hard parser ceiling.
///
/// # Errors
///
/// Any error of [`extract`], such as [`Error::TooManyElements`] or
/// [`Error::NotReadable`].
///
/// # Example
///
/// ```rust
/// use rs_readability::{extract_html, Error, Options};
///
/// let err = extract_html("<div>yo</div>", None, &Options::default()).unwrap_err();
/// assert_eq!(err, Error::NotReadable);
/// ```
pub fn extract_html(
    html: &str,
    base_uri: Option<&str>,
    options: &Options,
) -> Result<ExtractionResult> {
    let doc = parse_markup(html, base_uri, 0).document;
    extract(doc, options)
}

/// Decode `bytes` (BOM, `<meta charset>`, UTF-8 fallback) and extract the
/// article, like [`extract_html`].
///
/// # Errors
///
/// Same as [`extract_html`].
///
/// # Example
///
/// ```rust
/// use rs_readability::{extract_bytes, Options};
///
/// let text = "Caf\u{e9} society, with commas, clauses, and enough words to count. ".repeat(10);
/// let html = format!("<html><head><meta charset=\"ISO-8859-1\"></head><body><div><p>{text}</p></div></body></html>");
/// let (latin1, _, _) = encoding_rs::WINDOWS_1252.encode(&html);
/// let result = extract_bytes(&latin1, None, &Options::default())?;
/// assert!(result.text_content.contains("Café"));
/// # Ok::<(), rs_readability::Error>(())
/// ```
pub fn extract_bytes(
    bytes: &[u8],
    base_uri: Option<&str>,
    options: &Options,
) -> Result<ExtractionResult> {
    let doc = parse_markup_bytes(bytes, base_uri, 0).document;
    extract(doc, options)
}
