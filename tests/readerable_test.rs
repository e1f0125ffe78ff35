use regex::Regex;
use rs_readability::{is_probably_readerable, parse_markup, Document, NodeId, ReaderableOptions};

fn doc(html: &str) -> Document {
    parse_markup(html, None, 0).document
}

fn text(length: usize) -> String {
    "a".repeat(length)
}

#[test]
fn short_paragraphs_are_not_readerable() {
    let html = format!("<body><p>{}</p><p>{}</p></body>", text(50), text(120));
    assert!(!is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
}

#[test]
fn long_paragraphs_are_readerable() {
    // sqrt(700 - 140) is about 23.7, over the default score of 20.
    let html = format!("<body><p>{}</p></body>", text(700));
    assert!(is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
}

#[test]
fn score_accumulates_over_paragraphs() {
    // Each paragraph adds sqrt(240 - 140) = 10; two only reach 20.
    let two = format!("<body><p>{0}</p><p>{0}</p></body>", text(240));
    assert!(!is_probably_readerable(&doc(&two), &ReaderableOptions::default()));
    let three = format!("<body><p>{0}</p><p>{0}</p><p>{0}</p></body>", text(240));
    assert!(is_probably_readerable(&doc(&three), &ReaderableOptions::default()));
}

#[test]
fn custom_thresholds() {
    let html = format!("<body><p>{}</p></body>", text(200));
    let options = ReaderableOptions {
        min_content_length: 100,
        min_score: 5.0,
        ..ReaderableOptions::default()
    };
    assert!(is_probably_readerable(&doc(&html), &options));
    assert!(!is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
}

#[test]
fn hidden_nodes_are_skipped() {
    let html = format!(
        r#"<body><p style="display:none">{0}</p><p hidden>{0}</p><p aria-hidden="true">{0}</p></body>"#,
        text(1000)
    );
    assert!(!is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
}

#[test]
fn unlikely_ancestors_are_skipped_unless_rescued() {
    let html = format!(r#"<body><div class="sidebar"><p>{}</p></div></body>"#, text(1000));
    assert!(!is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
    let html = format!(r#"<body><div class="sidebar main"><p>{}</p></div></body>"#, text(1000));
    assert!(is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
}

#[test]
fn paragraphs_in_list_items_are_skipped() {
    let html = format!("<body><ul><li><p>{}</p></li></ul></body>", text(1000));
    assert!(!is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
}

#[test]
fn div_with_line_breaks_counts() {
    let html = format!("<body><div>{0}<br>{0}</div></body>", text(400));
    assert!(is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
}

#[test]
fn extra_patterns() {
    let html = format!(r#"<body><div class="story-box"><p>{}</p></div></body>"#, text(1000));
    let unlikely = ReaderableOptions {
        unlikely_patterns: vec![Regex::new("story-box").unwrap()],
        ..ReaderableOptions::default()
    };
    assert!(!is_probably_readerable(&doc(&html), &unlikely));

    let html = format!(r#"<body><div class="sidebar keep-me"><p>{}</p></div></body>"#, text(1000));
    let likely = ReaderableOptions {
        likely_patterns: vec![Regex::new("keep-me").unwrap()],
        ..ReaderableOptions::default()
    };
    assert!(is_probably_readerable(&doc(&html), &likely));
}

#[test]
fn custom_visibility_checker() {
    fn never_visible(_: &Document, _: NodeId) -> bool {
        false
    }
    let html = format!("<body><p>{}</p></body>", text(1000));
    let options = ReaderableOptions {
        visibility_checker: Some(never_visible),
        ..ReaderableOptions::default()
    };
    assert!(!is_probably_readerable(&doc(&html), &options));
}

#[test]
fn check_does_not_modify_the_tree() {
    let html = format!(
        r#"<html><body><div class="sidebar"><p>{0}</p></div><p>{0}</p></body></html>"#,
        text(300)
    );
    let document = doc(&html);
    let before = document.to_html();
    let _ = is_probably_readerable(&document, &ReaderableOptions::default());
    assert_eq!(document.to_html(), before);
}

#[test]
fn body_class_does_not_veto_an_extractable_page() {
    let paragraph = "The council voted on Tuesday to extend the tram line, after months of debate, \
                     petitions, and a public consultation that drew thousands of replies. "
        .repeat(3);
    let html = format!(
        r#"<html><body class="has-sidebar"><div><p>{paragraph}</p><p>{paragraph}</p><p>{paragraph}</p></div></body></html>"#
    );
    assert!(is_probably_readerable(&doc(&html), &ReaderableOptions::default()));
    assert!(rs_readability::extract_html(&html, None, &rs_readability::Options::default()).is_ok());
}
