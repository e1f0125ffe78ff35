//! Forward-scanning markup tokenizer.
//!
//! Produces [`Token`]s on demand. The scan never fails: anything that does
//! not look like markup is text, and broken constructs are recovered from
//! with a [`ParseDiagnostic`] recorded for the caller.

use crate::dom::Attributes;

use super::{DiagnosticKind, ParseDiagnostic};

/// Elements whose content is not markup.
const RAW_TEXT: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Elements whose content is text with character references.
const ESCAPABLE_RAW_TEXT: &[&str] = &["title", "textarea"];

/// Legacy references decoded in text even without a trailing `;`.
const LEGACY_REFERENCES: &[&str] = &["amp", "lt", "gt", "quot", "nbsp", "copy", "reg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attrs: Attributes,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag(Tag),
    EndTag(String),
    Text(String),
    /// A decoded character reference.
    CharRef(String),
    Comment(String),
}

enum Markup {
    Token(Token),
    /// Construct consumed without producing a token.
    Skip,
    /// The `<` starts nothing and is text.
    Literal,
}

pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a raw-text start tag: (tag name, decode references).
    raw_text: Option<(String, bool)>,
    diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text: None,
            diagnostics: Vec::new(),
        }
    }

    /// Byte offset of the next unread character.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn take_diagnostics(&mut self) -> Vec<ParseDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn diagnose(&mut self, offset: usize, kind: DiagnosticKind) {
        self.diagnostics.push(ParseDiagnostic { offset, kind });
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if let Some((name, decode)) = self.raw_text.take() {
            if let Some(token) = self.raw_text_content(&name, decode) {
                return Some(token);
            }
        }
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return None;
            }
            if rest.starts_with('<') {
                match self.markup() {
                    Markup::Token(token) => return Some(token),
                    Markup::Skip => continue,
                    Markup::Literal => {
                        self.pos += 1;
                        let mut text = String::from("<");
                        text.push_str(self.text_run());
                        return Some(Token::Text(text));
                    }
                }
            }
            if rest.starts_with('&') {
                return Some(self.char_ref());
            }
            return Some(Token::Text(self.text_run().to_string()));
        }
    }

    /// Text up to the next `<` or `&`.
    fn text_run(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest.find(['<', '&']).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn raw_text_content(&mut self, name: &str, decode: bool) -> Option<Token> {
        let rest = self.rest();
        let end = find_end_tag(rest, name).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        self.pos += end;
        let content = &rest[..end];
        if decode {
            Some(Token::Text(decode_text(content)))
        } else {
            Some(Token::Text(content.to_string()))
        }
    }

    /// Classify a construct starting with `<`.
    fn markup(&mut self) -> Markup {
        let rest = self.rest();
        let start = self.pos;
        let after = &rest[1..];
        if after.starts_with("!--") {
            return Markup::Token(self.comment());
        }
        if after.starts_with('!') {
            if after
                .get(1..8)
                .is_some_and(|word| word.eq_ignore_ascii_case("doctype"))
            {
                let body_end = after.find('>').map_or(after.len(), |i| i + 1);
                let inner = after[8..body_end].trim_end_matches('>').trim();
                self.pos += 1 + body_end;
                return Markup::Token(Token::Doctype(inner.to_string()));
            }
            return Markup::Token(self.bogus_comment(2));
        }
        if after.starts_with('?') {
            return Markup::Token(self.bogus_comment(1));
        }
        if let Some(end_rest) = after.strip_prefix('/') {
            return match end_rest.chars().next() {
                Some(c) if c.is_ascii_alphabetic() => self.end_tag(),
                Some('>') => {
                    self.pos += 3;
                    self.diagnose(start, DiagnosticKind::EmptyEndTag);
                    Markup::Skip
                }
                Some(_) => Markup::Token(self.bogus_comment(2)),
                None => Markup::Literal,
            };
        }
        match after.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => self.start_tag(),
            _ => Markup::Literal,
        }
    }

    fn comment(&mut self) -> Token {
        let start = self.pos;
        let body = &self.rest()[4..];
        // "<!-->" and "<!--->" are empty comments.
        if body.starts_with('>') {
            self.pos += 5;
            return Token::Comment(String::new());
        }
        if body.starts_with("->") {
            self.pos += 6;
            return Token::Comment(String::new());
        }
        if let Some(end) = body.find("-->") {
            self.pos += 4 + end + 3;
            Token::Comment(body[..end].to_string())
        } else {
            self.pos = self.input.len();
            self.diagnose(start, DiagnosticKind::UnterminatedComment);
            Token::Comment(body.to_string())
        }
    }

    /// `<!foo>`, `<?xml ...?>` and `</ foo>` become comments.
    fn bogus_comment(&mut self, skip: usize) -> Token {
        let body = &self.rest()[skip..];
        let end = body.find('>').unwrap_or(body.len());
        self.pos += skip + (end + 1).min(body.len());
        Token::Comment(body[..end].to_string())
    }

    fn end_tag(&mut self) -> Markup {
        let start = self.pos;
        self.pos += 2;
        let name = self.tag_name();
        // Attributes on end tags are ignored.
        let rest = self.rest();
        if let Some(end) = rest.find('>') {
            self.pos += end + 1;
            Markup::Token(Token::EndTag(name))
        } else {
            self.pos = self.input.len();
            self.diagnose(start, DiagnosticKind::UnterminatedTag(name));
            Markup::Skip
        }
    }

    fn tag_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        self.pos += rest.len() - trimmed.len();
    }

    fn start_tag(&mut self) -> Markup {
        let start = self.pos;
        self.pos += 1;
        let name = self.tag_name();
        let mut attrs = Attributes::new();
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                self.pos = self.input.len();
                self.diagnose(start, DiagnosticKind::UnterminatedTag(name));
                return Markup::Skip;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            self.attribute(&mut attrs);
        }

        if !self_closing {
            if RAW_TEXT.contains(&name.as_str()) {
                self.raw_text = Some((name.clone(), false));
            } else if ESCAPABLE_RAW_TEXT.contains(&name.as_str()) {
                self.raw_text = Some((name.clone(), true));
            }
        }
        Markup::Token(Token::StartTag(Tag {
            name,
            attrs,
            self_closing,
        }))
    }

    fn attribute(&mut self, attrs: &mut Attributes) {
        let offset = self.pos;
        let rest = self.rest();
        // A leading '=' belongs to the name.
        let name_start = usize::from(rest.starts_with('='));
        let name_len = rest[name_start..]
            .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>' || c == '=')
            .unwrap_or(rest.len() - name_start);
        let name = rest[..name_start + name_len].to_ascii_lowercase();
        self.pos += name_start + name_len;

        let before_value = self.pos;
        self.skip_whitespace();
        let value = if self.rest().starts_with('=') {
            self.pos += 1;
            self.skip_whitespace();
            self.attribute_value(&name, offset)
        } else {
            self.pos = before_value;
            String::new()
        };

        if !attrs.insert_new(&name, value) {
            self.diagnose(offset, DiagnosticKind::DuplicateAttribute(name));
        }
    }

    fn attribute_value(&mut self, name: &str, offset: usize) -> String {
        let rest = self.rest();
        let Some(first) = rest.chars().next() else {
            return String::new();
        };
        if first == '"' || first == '\'' {
            let body = &rest[1..];
            if let Some(end) = body.find(first) {
                self.pos += end + 2;
                return decode_attribute(&body[..end]);
            }
            self.pos = self.input.len();
            self.diagnose(
                offset,
                DiagnosticKind::MalformedAttribute(format!("unterminated value for `{name}`")),
            );
            return decode_attribute(body);
        }
        if first == '>' {
            self.diagnose(
                offset,
                DiagnosticKind::MalformedAttribute(format!("missing value for `{name}`")),
            );
            return String::new();
        }
        let end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '>')
            .unwrap_or(rest.len());
        let raw = &rest[..end];
        if raw.contains(['"', '\'', '<', '=', '`']) {
            self.diagnose(
                offset,
                DiagnosticKind::MalformedAttribute(format!("unexpected character in `{name}`")),
            );
        }
        self.pos += end;
        decode_attribute(raw)
    }

    fn char_ref(&mut self) -> Token {
        let rest = self.rest();
        if let Some((decoded, consumed)) = match_char_ref(rest) {
            self.pos += consumed;
            Token::CharRef(decoded)
        } else {
            self.pos += 1;
            Token::Text("&".to_string())
        }
    }
}

/// Decode a character reference at the start of `input` (which begins with
/// `&`). Returns the decoded text and the number of bytes consumed.
fn match_char_ref(input: &str) -> Option<(String, usize)> {
    let body = &input[1..];
    if let Some(numeric) = body.strip_prefix('#') {
        let (hex, digits_start) = match numeric.chars().next() {
            Some('x' | 'X') => (true, 1),
            _ => (false, 0),
        };
        let digits = &numeric[digits_start..];
        let len = digits
            .find(|c: char| if hex { !c.is_ascii_hexdigit() } else { !c.is_ascii_digit() })
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let has_semicolon = digits[len..].starts_with(';');
        let candidate = format!(
            "&#{}{};",
            if hex { "x" } else { "" },
            &digits[..len]
        );
        let decoded = html_escape::decode_html_entities(&candidate);
        let decoded = if decoded == candidate {
            '\u{fffd}'.to_string()
        } else {
            decoded.into_owned()
        };
        let consumed = 2 + digits_start + len + usize::from(has_semicolon);
        return Some((decoded, consumed));
    }

    let len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    if len == 0 {
        return None;
    }
    let name = &body[..len];
    let has_semicolon = body[len..].starts_with(';');
    if !has_semicolon && !LEGACY_REFERENCES.contains(&name) {
        return None;
    }
    let candidate = format!("&{name};");
    let decoded = html_escape::decode_html_entities(&candidate);
    if decoded == candidate {
        return None;
    }
    Some((decoded.into_owned(), 1 + len + usize::from(has_semicolon)))
}

/// Decode every character reference in a run of text.
pub(crate) fn decode_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(index) = rest.find('&') {
        out.push_str(&rest[..index]);
        rest = &rest[index..];
        if let Some((decoded, consumed)) = match_char_ref(rest) {
            out.push_str(&decoded);
            rest = &rest[consumed..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

fn decode_attribute(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

/// Byte index of `</name` (case-insensitive) followed by a tag delimiter.
fn find_end_tag(haystack: &str, name: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let mut from = 0;
    while let Some(found) = haystack[from..].find("</") {
        let start = from + found;
        let name_end = start + 2 + name.len();
        if name_end <= bytes.len()
            && bytes[start + 2..name_end].eq_ignore_ascii_case(name.as_bytes())
            && bytes
                .get(name_end)
                .is_none_or(|&b| b.is_ascii_whitespace() || b == b'/' || b == b'>')
        {
            return Some(start);
        }
        from = start + 2;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(input);
        std::iter::from_fn(|| tokenizer.next_token()).collect()
    }

    #[test]
    fn test_tags_and_text() {
        let toks = tokens("<P Class=\"a\">Hi</p>");
        assert_eq!(toks.len(), 3);
        match &toks[0] {
            Token::StartTag(tag) => {
                assert_eq!(tag.name, "p");
                assert_eq!(tag.attrs.get("class"), Some("a"));
                assert!(!tag.self_closing);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(toks[1], Token::Text("Hi".to_string()));
        assert_eq!(toks[2], Token::EndTag("p".to_string()));
    }

    #[test]
    fn test_char_refs() {
        let toks = tokens("a &amp; b &#169; &#x41; &bogus; &nbsp");
        let text: String = toks
            .iter()
            .map(|t| match t {
                Token::Text(s) | Token::CharRef(s) => s.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(text, "a & b \u{a9} A &bogus; \u{a0}");
    }

    #[test]
    fn test_raw_text_script() {
        let toks = tokens("<script>if (a<b) { x = '</p>'; }</script>after");
        assert_eq!(
            toks[1],
            Token::Text("if (a<b) { x = '</p>'; }".to_string())
        );
        assert_eq!(toks[2], Token::EndTag("script".to_string()));
        assert_eq!(toks[3], Token::Text("after".to_string()));
    }

    #[test]
    fn test_title_decodes_references() {
        let toks = tokens("<title>A &amp; <b>B</b></title>");
        assert_eq!(toks[1], Token::Text("A & <b>B</b>".to_string()));
    }

    #[test]
    fn test_comments_and_doctype() {
        let toks = tokens("<!DOCTYPE html><!-- x --><?xml v?><!-->");
        assert_eq!(toks[0], Token::Doctype("html".to_string()));
        assert_eq!(toks[1], Token::Comment(" x ".to_string()));
        assert_eq!(toks[2], Token::Comment("?xml v?".to_string()));
        assert_eq!(toks[3], Token::Comment(String::new()));
    }

    #[test]
    fn test_literal_less_than() {
        let toks = tokens("1 < 2 <3");
        let text: String = toks
            .iter()
            .map(|t| match t {
                Token::Text(s) => s.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(text, "1 < 2 <3");
    }

    #[test]
    fn test_attribute_forms() {
        let toks = tokens("<img src=a.png alt='x &amp; y' hidden data-x = \"1\"/>");
        match &toks[0] {
            Token::StartTag(tag) => {
                assert_eq!(tag.attrs.get("src"), Some("a.png"));
                assert_eq!(tag.attrs.get("alt"), Some("x & y"));
                assert_eq!(tag.attrs.get("hidden"), Some(""));
                assert_eq!(tag.attrs.get("data-x"), Some("1"));
                assert!(tag.self_closing);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_attribute_diagnostic() {
        let mut tokenizer = Tokenizer::new("<div id=a id=b>");
        while tokenizer.next_token().is_some() {}
        let diagnostics = tokenizer.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::DuplicateAttribute("id".to_string())
        );
    }

    #[test]
    fn test_unterminated_tag_is_dropped() {
        let mut tokenizer = Tokenizer::new("text<div class=");
        assert_eq!(tokenizer.next_token(), Some(Token::Text("text".to_string())));
        assert_eq!(tokenizer.next_token(), None);
        assert!(!tokenizer.take_diagnostics().is_empty());
    }
}
