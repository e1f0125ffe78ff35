//! URL resolution for extracted content.
//!
//! Links inside the article are rewritten to absolute form so the content
//! stays usable outside the page it came from. The base is the page's
//! `<base href>` (itself resolved against the document URI) or, without one,
//! the document URI.

use url::Url;

use crate::dom::Document;
use crate::patterns::SRCSET_URL;

/// Whether `s` parses as an absolute URL.
#[must_use]
pub fn is_url(s: &str) -> bool {
    Url::parse(s.trim()).is_ok()
}

/// Resolves relative references against a document's base URL.
#[derive(Debug, Clone, Default)]
pub struct UriResolver {
    base: Option<Url>,
    document: Option<Url>,
}

impl UriResolver {
    /// Build a resolver from the document URI and the first `<base href>`.
    #[must_use]
    pub fn for_document(doc: &Document) -> Self {
        let document = doc.document_uri().and_then(|uri| Url::parse(uri).ok());
        let base_href = doc
            .elements_by_tag_name(doc.root(), "base")
            .into_iter()
            .find_map(|base| doc.attr(base, "href").map(str::trim));
        let base = match (base_href, &document) {
            (Some(href), Some(document)) => document.join(href).ok().or_else(|| Some(document.clone())),
            (Some(href), None) => Url::parse(href).ok(),
            (None, document) => document.clone(),
        };
        Self { base, document }
    }

    /// Absolute form of `uri`, or `uri` unchanged when it cannot be
    /// resolved.
    #[must_use]
    pub fn to_absolute(&self, uri: &str) -> String {
        // In-page anchors stay relative when the base is the page itself.
        if self.base.is_some() && self.base == self.document && uri.starts_with('#') {
            return uri.to_string();
        }
        let resolved = match &self.base {
            Some(base) => base.join(uri),
            None => Url::parse(uri),
        };
        resolved.map_or_else(|_| uri.to_string(), |url| url.to_string())
    }

    /// Rewrite every URL of a `srcset` list, keeping descriptors.
    #[must_use]
    pub fn rewrite_srcset(&self, srcset: &str) -> String {
        SRCSET_URL
            .replace_all(srcset, |caps: &regex::Captures| {
                let url = caps.get(1).map_or("", |m| m.as_str());
                let descriptor = caps.get(2).map_or("", |m| m.as_str());
                let separator = caps.get(3).map_or("", |m| m.as_str());
                format!("{}{descriptor}{separator}", self.to_absolute(url))
            })
            .into_owned()
    }
}
