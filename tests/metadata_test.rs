use rs_readability::metadata::{article_title, extract_metadata, Metadata};
use rs_readability::{extract_html, parse_markup, Options};

fn metadata(html: &str) -> Metadata {
    extract_metadata(&parse_markup(html, None, 0).document, false)
}

fn body() -> String {
    let text = "Birds migrate in autumn, flying south over mountains, rivers, and seas, \
                and return in spring, tired, thin, and ready to nest. "
        .repeat(3);
    format!("<body><div><p>{text}</p><p>{text}</p></div></body>")
}

const JSON_LD: &str = r#"<script type="application/ld+json">
{
  "@context": "https://schema.org",
  "@type": "NewsArticle",
  "headline": "Where the birds go in winter",
  "description": "A short guide to migration.",
  "datePublished": "2023-10-02",
  "author": [{"@type": "Person", "name": "Ana Lima"}, {"@type": "Person", "name": "Tom Berg"}],
  "publisher": {"@type": "Organization", "name": "Sky Weekly"}
}
</script>"#;

#[test]
fn json_ld_takes_precedence_over_meta_tags() {
    let html = format!(
        r#"<html><head><title>Page title that is long enough</title>
        <meta property="og:title" content="OG title">
        <meta name="author" content="Meta Author">
        {JSON_LD}</head>{}</html>"#,
        body()
    );
    let result = extract_html(&html, None, &Options::default()).unwrap();
    assert_eq!(result.title, "Where the birds go in winter");
    assert_eq!(result.byline.as_deref(), Some("Ana Lima, Tom Berg"));
    assert_eq!(result.excerpt, "A short guide to migration.");
    assert_eq!(result.site_name.as_deref(), Some("Sky Weekly"));
    assert_eq!(result.published_time.as_deref(), Some("2023-10-02"));
}

#[test]
fn disable_json_ld_falls_back_to_meta_tags() {
    let html = format!(
        r#"<html><head><title>Page title that is long enough</title>
        <meta property="og:title" content="OG title">
        <meta name="author" content="Meta Author">
        {JSON_LD}</head>{}</html>"#,
        body()
    );
    let options = Options {
        disable_json_ld: true,
        ..Options::default()
    };
    let result = extract_html(&html, None, &options).unwrap();
    assert_eq!(result.title, "OG title");
    assert_eq!(result.byline.as_deref(), Some("Meta Author"));
    assert_eq!(result.site_name, None);
}

#[test]
fn dublin_core_names_are_normalized() {
    let m = metadata(
        r#"<head><meta name="DC.title" content="DC title"><meta name="dc.creator" content="DC Creator"></head>"#,
    );
    assert_eq!(m.title.as_deref(), Some("DC title"));
    assert_eq!(m.byline.as_deref(), Some("DC Creator"));
}

#[test]
fn twitter_and_parsely_values() {
    let m = metadata(
        r#"<head><meta name="twitter:description" content="Tweet text">
        <meta name="parsely-pub-date" content="2020-01-01"></head>"#,
    );
    assert_eq!(m.excerpt.as_deref(), Some("Tweet text"));
    assert_eq!(m.published_time.as_deref(), Some("2020-01-01"));
}

#[test]
fn unparsable_json_ld_is_ignored() {
    let m = metadata(
        r#"<head><script type="application/ld+json">{ not json</script>
        <meta property="og:title" content="Fallback"></head>"#,
    );
    assert_eq!(m.title.as_deref(), Some("Fallback"));
}

#[test]
fn title_cleanup_from_title_element() {
    let doc = parse_markup(
        "<head><title>How to keep bees in the city - Garden Monthly</title></head>",
        None,
        0,
    )
    .document;
    assert_eq!(article_title(&doc), "How to keep bees in the city");
}

#[test]
fn language_from_root_element() {
    let m = metadata(r#"<html lang="pt-BR"><head></head><body></body></html>"#);
    assert_eq!(m.lang.as_deref(), Some("pt-BR"));
}
