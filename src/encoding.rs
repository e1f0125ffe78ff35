//! Byte-to-text decoding for markup.
//!
//! The parser works on `&str`. Callers holding raw bytes go through
//! [`decode_markup`], which picks an encoding the way browsers do for a
//! document without transport headers: byte order mark first, then a
//! `charset` declaration in the first kilobyte, then UTF-8.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use regex::Regex;

/// How far into the document a charset declaration is looked for.
const PRESCAN_LIMIT: usize = 1024;

/// `<meta charset=...>` or `<meta http-equiv=... content="...; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?\bcharset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#)
        .expect("META_CHARSET regex")
});

/// Encoding named by a `<meta>` declaration near the top of `bytes`.
#[must_use]
pub fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(PRESCAN_LIMIT)]);
    let label = META_CHARSET.captures(&head)?.get(1)?.as_str().to_string();
    let encoding = Encoding::for_label(label.as_bytes())?;
    // A document that could be read as ASCII to find this is not UTF-16.
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Some(UTF_8);
    }
    Some(encoding)
}

/// Pick the encoding for `bytes`: BOM, then meta declaration, then UTF-8.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    sniff_meta_charset(bytes).unwrap_or(UTF_8)
}

/// Decode `bytes` to text. Malformed sequences become U+FFFD.
///
/// # Examples
///
/// ```
/// use rs_readability::encoding::decode_markup;
///
/// let text = decode_markup(b"<meta charset=\"windows-1252\"><p>caf\xe9</p>");
/// assert!(text.contains("café"));
/// ```
#[must_use]
pub fn decode_markup(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    // `decode` strips a BOM if one is present.
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_wins_over_meta() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<meta charset=\"iso-8859-2\"><p>x</p>");
        assert_eq!(detect_encoding(&bytes), UTF_8);
        assert!(decode_markup(&bytes).starts_with("<meta"));
    }

    #[test]
    fn test_meta_charset() {
        let html = br#"<html><head><meta charset="ISO-8859-1"></head></html>"#;
        // encoding_rs maps ISO-8859-1 to windows-1252 as browsers do.
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn test_http_equiv_charset() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
        assert_eq!(detect_encoding(html).name(), "Shift_JIS");
    }

    #[test]
    fn test_utf16_declaration_is_utf8() {
        let html = br#"<meta charset="utf-16">"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn test_default_and_invalid_bytes() {
        assert_eq!(detect_encoding(b"<p>plain</p>"), UTF_8);
        let text = decode_markup(b"<p>\xff</p>");
        assert_eq!(text, "<p>\u{fffd}</p>");
    }
}
