//! Stack-of-open-elements tree construction.
//!
//! A deliberately small subset of HTML tree construction: implied end tags
//! for the common cases (paragraphs, list items, table parts, headings,
//! nested links), void elements, and end tags that never reach across a
//! table cell. No `html`/`head`/`body` elements are synthesized.

use crate::dom::{Document, NodeId};

use super::tokenizer::{Tag, Token};
use super::{DiagnosticKind, ParseDiagnostic};

pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Start tags that close an open `p`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "li", "dd", "dt", "listing", "main", "menu", "nav", "ol",
    "p", "plaintext", "pre", "section", "summary", "table", "ul", "xmp",
];

/// Elements that bound the "button scope" used for implied `p` closing.
const BUTTON_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];

/// Button scope plus list containers, for `li`.
const LIST_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "ol", "table", "td", "template",
    "th", "ul",
];

const DEFINITION_SCOPE: &[&str] = &[
    "applet", "button", "caption", "dl", "html", "marquee", "object", "table", "td", "template",
    "th",
];

/// Elements an ordinary end tag may not reach across.
const END_TAG_BARRIERS: &[&str] = &[
    "applet", "caption", "marquee", "object", "table", "td", "template", "th",
];

const TABLE_PARTS: &[&str] = &[
    "caption", "colgroup", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that may stay inside an open `head`.
const HEAD_CONTENT: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noscript", "script", "style", "template",
    "title",
];

pub(crate) struct TreeBuilder {
    doc: Document,
    open: Vec<NodeId>,
    max_elems: usize,
    elements: usize,
    diagnostics: Vec<ParseDiagnostic>,
}

impl TreeBuilder {
    pub(crate) fn new(max_elems: usize) -> Self {
        Self {
            doc: Document::new(),
            open: Vec::new(),
            max_elems,
            elements: 0,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> (Document, Vec<ParseDiagnostic>) {
        (self.doc, self.diagnostics)
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn open_tag(&self, index: usize) -> &str {
        self.doc.tag_name(self.open[index]).unwrap_or_default()
    }

    /// Feed one token. Returns `Err(count)` when the element ceiling is hit.
    pub(crate) fn process(&mut self, token: Token, offset: usize) -> Result<(), usize> {
        match token {
            Token::Doctype(name) => {
                if self.doc.doctype().is_none() && self.elements == 0 {
                    self.doc.set_doctype(Some(name));
                } else {
                    self.diagnose(offset, DiagnosticKind::UnexpectedDoctype);
                }
            }
            Token::StartTag(tag) => return self.start_tag(tag),
            Token::EndTag(name) => return self.end_tag(&name, offset),
            Token::Text(text) | Token::CharRef(text) => {
                let parent = self.current();
                self.doc.append_text(parent, &text);
            }
            Token::Comment(text) => {
                let comment = self.doc.create_comment(text);
                let parent = self.current();
                self.doc.append_child(parent, comment);
            }
        }
        Ok(())
    }

    fn diagnose(&mut self, offset: usize, kind: DiagnosticKind) {
        self.diagnostics.push(ParseDiagnostic { offset, kind });
    }

    fn start_tag(&mut self, tag: Tag) -> Result<(), usize> {
        self.close_implied(&tag.name);

        self.elements += 1;
        if self.max_elems > 0 && self.elements > self.max_elems {
            return Err(self.elements);
        }

        let element = self.doc.create_element_with_attrs(&tag.name, tag.attrs);
        let parent = self.current();
        self.doc.append_child(parent, element);
        if !tag.self_closing && !VOID_ELEMENTS.contains(&tag.name.as_str()) {
            self.open.push(element);
        }
        Ok(())
    }

    fn close_implied(&mut self, name: &str) {
        if !HEAD_CONTENT.contains(&name) {
            self.close_within(&["head"], &[]);
        }
        if CLOSES_PARAGRAPH.contains(&name) {
            self.close_within(&["p"], BUTTON_SCOPE);
        }
        match name {
            "li" => self.close_within(&["li"], LIST_SCOPE),
            "dd" | "dt" => self.close_within(&["dd", "dt"], DEFINITION_SCOPE),
            "tr" => self.close_within(&["tr"], &["table", "tbody", "tfoot", "thead", "template"]),
            "td" | "th" => self.close_within(&["td", "th"], &["table", "template", "tr"]),
            "tbody" | "tfoot" | "thead" => {
                self.close_within(&["tbody", "tfoot", "thead"], &["table", "template"]);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if self
                    .open
                    .last()
                    .and_then(|&top| self.doc.tag_name(top))
                    .is_some_and(|tag| HEADINGS.contains(&tag))
                {
                    self.open.pop();
                }
            }
            "a" => self.close_within(&["a"], BUTTON_SCOPE),
            "option" => self.close_top(&["option"]),
            "optgroup" => self.close_top(&["option", "optgroup"]),
            _ => {}
        }
    }

    /// Pop through the nearest open element named in `targets`, unless an
    /// element named in `boundary` is found first.
    fn close_within(&mut self, targets: &[&str], boundary: &[&str]) {
        for index in (0..self.open.len()).rev() {
            let tag = self.open_tag(index);
            if targets.contains(&tag) {
                self.open.truncate(index);
                return;
            }
            if boundary.contains(&tag) {
                return;
            }
        }
    }

    fn close_top(&mut self, targets: &[&str]) {
        if let Some(&top) = self.open.last() {
            if self.doc.tag_name(top).is_some_and(|tag| targets.contains(&tag)) {
                self.open.pop();
            }
        }
    }

    fn end_tag(&mut self, name: &str, offset: usize) -> Result<(), usize> {
        if name == "br" {
            return self.start_tag(Tag {
                name: name.to_string(),
                attrs: crate::dom::Attributes::new(),
                self_closing: true,
            });
        }

        // Content after </body> or </html> still belongs to the body.
        if name == "body" || name == "html" {
            if !self.open.iter().any(|&id| self.doc.has_tag(id, name)) {
                self.diagnose(offset, DiagnosticKind::StrayEndTag(name.to_string()));
            }
            return Ok(());
        }

        let crosses_barriers = TABLE_PARTS.contains(&name);
        for index in (0..self.open.len()).rev() {
            let tag = self.open_tag(index);
            if tag == name {
                self.open.truncate(index);
                return Ok(());
            }
            if !crosses_barriers && END_TAG_BARRIERS.contains(&tag) {
                break;
            }
        }
        self.diagnose(offset, DiagnosticKind::StrayEndTag(name.to_string()));
        Ok(())
    }
}
