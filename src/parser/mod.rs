//! Lenient markup parser.
//!
//! Turns arbitrary, possibly broken markup into a [`Document`]. Parsing never
//! fails on malformed input: problems are reported as [`ParseDiagnostic`]s
//! next to a usable tree. The only fatal condition is the optional element
//! ceiling, which stops the parse with [`DiagnosticKind::DocumentTooLarge`].
//!
//! # Example
//!
//! ```rust
//! use rs_readability::parse_markup;
//!
//! let output = parse_markup("<p>One<p>Two</span>", None, 0);
//! assert!(!output.fatal);
//! assert_eq!(output.document.to_html(), "<p>One</p><p>Two</p>");
//! assert_eq!(output.diagnostics.len(), 1);
//! ```

mod tokenizer;
mod tree_builder;

use crate::dom::Document;
use crate::encoding;
use crate::error::{Error, Result};

pub use tokenizer::{Tag, Token, Tokenizer};

/// Kind of a recoverable (or, for `DocumentTooLarge`, fatal) parse problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticKind {
    #[error("end tag </{0}> has no matching open element")]
    StrayEndTag(String),

    #[error("duplicate attribute `{0}`")]
    DuplicateAttribute(String),

    #[error("malformed attribute: {0}")]
    MalformedAttribute(String),

    #[error("unterminated <{0}> tag")]
    UnterminatedTag(String),

    #[error("unterminated comment")]
    UnterminatedComment,

    #[error("doctype after content")]
    UnexpectedDoctype,

    #[error("empty end tag </>")]
    EmptyEndTag,

    /// The element ceiling was exceeded; the parse stopped here.
    #[error("document too large: {count} elements")]
    DocumentTooLarge { count: usize },
}

/// A problem found while parsing, with the byte offset where it was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub offset: usize,
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)
    }
}

/// Result of [`parse_markup`].
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// The parsed tree. After a fatal stop it only holds what was built so
    /// far.
    pub document: Document,
    /// Recoverable problems in input order.
    pub diagnostics: Vec<ParseDiagnostic>,
    /// Whether the element ceiling stopped the parse.
    pub fatal: bool,
}

impl ParseOutput {
    /// The document, or [`Error::DocumentTooLarge`] when the parse was
    /// stopped by the element ceiling.
    pub fn into_result(self) -> Result<Document> {
        if self.fatal {
            let count = self
                .diagnostics
                .iter()
                .find_map(|d| match d.kind {
                    DiagnosticKind::DocumentTooLarge { count } => Some(count),
                    _ => None,
                })
                .unwrap_or_default();
            return Err(Error::DocumentTooLarge { count });
        }
        Ok(self.document)
    }
}

/// Parse `text` into a document.
///
/// `base_uri` is recorded on the document for later link resolution.
/// `max_elems` caps the number of elements created; `0` means unlimited.
#[must_use]
pub fn parse_markup(text: &str, base_uri: Option<&str>, max_elems: usize) -> ParseOutput {
    let mut tokenizer = Tokenizer::new(text);
    let mut builder = tree_builder::TreeBuilder::new(max_elems);
    let mut fatal = None;

    loop {
        let offset = tokenizer.offset();
        let Some(token) = tokenizer.next_token() else {
            break;
        };
        if let Err(count) = builder.process(token, offset) {
            fatal = Some(ParseDiagnostic {
                offset,
                kind: DiagnosticKind::DocumentTooLarge { count },
            });
            break;
        }
    }

    let (mut document, mut diagnostics) = builder.finish();
    diagnostics.extend(tokenizer.take_diagnostics());
    diagnostics.sort_by_key(|d| d.offset);
    let is_fatal = fatal.is_some();
    diagnostics.extend(fatal);
    document.set_document_uri(base_uri.map(str::to_string));

    ParseOutput {
        document,
        diagnostics,
        fatal: is_fatal,
    }
}

/// Decode raw bytes (BOM, `<meta charset>`, UTF-8 fallback) and parse them.
#[must_use]
pub fn parse_markup_bytes(bytes: &[u8], base_uri: Option<&str>, max_elems: usize) -> ParseOutput {
    let text = encoding::decode_markup(bytes);
    parse_markup(&text, base_uri, max_elems)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(input: &str) -> String {
        parse_markup(input, None, 0).document.to_html()
    }

    #[test]
    fn test_no_implicit_wrappers() {
        assert_eq!(html("<div>yo</div>"), "<div>yo</div>");
        assert_eq!(
            html("<html><div>yo</div></html>"),
            "<html><div>yo</div></html>"
        );
    }

    #[test]
    fn test_paragraph_implied_close() {
        assert_eq!(html("<p>a<p>b<div>c</div>"), "<p>a</p><p>b</p><div>c</div>");
        assert_eq!(html("<p><span>a<div>b</div>"), "<p><span>a</span></p><div>b</div>");
    }

    #[test]
    fn test_list_and_table_implied_close() {
        assert_eq!(
            html("<ul><li>a<li>b</ul>"),
            "<ul><li>a</li><li>b</li></ul>"
        );
        assert_eq!(
            html("<table><tr><td>a<td>b<tr><td>c</table>"),
            "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>"
        );
        assert_eq!(
            html("<ul><li>a<ul><li>b</ul></ul>"),
            "<ul><li>a<ul><li>b</li></ul></li></ul>"
        );
    }

    #[test]
    fn test_void_and_self_closing() {
        assert_eq!(html("<p>a<br>b<img src=x>c</p>"), "<p>a<br>b<img src=\"x\">c</p>");
        assert_eq!(html("<div/><span>x</span>"), "<div></div><span>x</span>");
        assert_eq!(html("a</br>b"), "a<br>b");
    }

    #[test]
    fn test_end_tag_does_not_cross_cell() {
        let output = parse_markup("<div><table><tr><td>x</div>y</td></tr></table></div>", None, 0);
        assert_eq!(
            output.document.to_html(),
            "<div><table><tr><td>xy</td></tr></table></div>"
        );
        assert_eq!(output.diagnostics.len(), 1);
    }

    #[test]
    fn test_stray_end_tag_diagnostic() {
        let output = parse_markup("<div>a</span></div>", None, 0);
        assert!(!output.fatal);
        assert_eq!(output.document.to_html(), "<div>a</div>");
        assert_eq!(
            output.diagnostics[0].kind,
            DiagnosticKind::StrayEndTag("span".to_string())
        );
        assert_eq!(output.diagnostics[0].offset, 6);
    }

    #[test]
    fn test_head_closed_by_content() {
        assert_eq!(
            html("<html><head><title>t</title><div>x</div></html>"),
            "<html><head><title>t</title></head><div>x</div></html>"
        );
    }

    #[test]
    fn test_content_after_body_stays_in_body() {
        assert_eq!(
            html("<html><body><p>a</p></body></html>\n"),
            "<html><body><p>a</p>\n</body></html>"
        );
    }

    #[test]
    fn test_element_ceiling() {
        let output = parse_markup("<html><div>yo</div></html>", None, 1);
        assert!(output.fatal);
        assert!(matches!(
            output.diagnostics.last().map(|d| &d.kind),
            Some(DiagnosticKind::DocumentTooLarge { count: 2 })
        ));
        assert!(matches!(
            output.into_result(),
            Err(Error::DocumentTooLarge { count: 2 })
        ));
    }

    #[test]
    fn test_base_uri_recorded() {
        let output = parse_markup("<p>x</p>", Some("http://fakehost/test/page.html"), 0);
        assert_eq!(
            output.document.document_uri(),
            Some("http://fakehost/test/page.html")
        );
    }

    #[test]
    fn test_doctype_round_trip() {
        assert_eq!(html("<!DOCTYPE html><p>x</p>"), "<!DOCTYPE html><p>x</p>");
    }
}
