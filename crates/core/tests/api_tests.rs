//! Library API integration tests
use gleaner_core::*;
use rstest::rstest;
use serde_json::json;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn load(name: &str) -> Document {
    let html = std::fs::read_to_string(get_fixture_path(name)).unwrap();
    Document::parse(&html).unwrap()
}

#[test]
fn test_news_article_metadata() {
    let doc = load("news_article.html");
    let metadata = doc.extract_metadata();

    assert_eq!(metadata.title, "Rivers Return to the Valley");
    assert_eq!(
        metadata.description,
        "Spring floods reshaped the valley floor for the first time in a decade."
    );
    assert_eq!(metadata.domain, "valleycourier.example");
    assert_eq!(metadata.favicon, "/favicon-32.png");
    assert_eq!(metadata.image, "https://www.valleycourier.example/img/river.jpg");
    assert_eq!(metadata.published, "2024-04-02T08:00:00Z");
    assert_eq!(metadata.author, "Ana Ortiz, Sam Lee");
    assert_eq!(metadata.site, "The Valley Courier");
}

#[test]
fn test_location_takes_priority_over_schema_url() {
    let html = std::fs::read_to_string(get_fixture_path("news_article.html")).unwrap();
    let doc = Document::parse_with_location(&html, "https://mirror.example.net/copy").unwrap();
    assert_eq!(doc.extract_metadata().domain, "mirror.example.net");
}

#[test]
fn test_caller_supplied_sources() {
    let doc = load("news_article.html");
    let tags = vec![
        MetaTagItem::with_property("og:title", "Override Title"),
        MetaTagItem::named("author", "Desk Editor"),
    ];
    let schema = json!({"headline": "Ignored", "publisher": {"name": "Other Paper"}});

    let metadata = extract(&doc, Some(&schema), &tags);
    assert_eq!(metadata.title, "Override Title");
    assert_eq!(metadata.author, "Desk Editor");
    assert_eq!(metadata.site, "Other Paper");
    assert_eq!(metadata.schema_org_data, Some(schema));
}

#[test]
fn test_legacy_layout_metadata() {
    let metadata = load("legacy_layout.html").extract_metadata();
    assert_eq!(metadata.title, "Old Home Page");
    assert_eq!(metadata.author, "Webmaster");
    assert_eq!(metadata.site, "Webmaster");
    assert_eq!(metadata.domain, "");
    assert_eq!(metadata.favicon, "");
}

#[test]
fn test_best_element_in_news_article() {
    let doc = load("news_article.html");
    let candidates = candidate_elements(&doc);
    let best = find_best_element(&candidates, &ScoreConfig::default()).expect("should find content");

    assert_eq!(best.element.tag_name(), "article");
    assert!(best.score > 50.0);
}

#[test]
fn test_best_element_in_legacy_layout() {
    let doc = load("legacy_layout.html");
    let candidates = candidate_elements(&doc);
    let best = find_best_element(&candidates, &ScoreConfig::default()).expect("should find content");
    assert_eq!(best.element.attr("id"), Some("main-cell"));

    let without_bonus = ScoreConfig::builder().layout_cell_bonus(0.0).build();
    assert_eq!(best.score - score_element(&best.element, &without_bonus), 10.0);
}

#[test]
fn test_no_content_found() {
    let doc = load("empty_content.html");
    assert!(find_best_element(&candidate_elements(&doc), &ScoreConfig::default()).is_none());
}

#[rstest]
#[case(json!({"author": [{"name": "A"}, {"name": "B"}]}), "author.name", Some("A, B"))]
#[case(json!({"image": [{"url": "x"}, {"url": "y"}]}), "image.[0].url", Some("x"))]
#[case(json!({"author": {"name": "Solo"}}), "author.[].name", Some("Solo"))]
#[case(json!([{"@type": "WebPage"}, {"isPartOf": {"name": "Series"}}]), "isPartOf.name", Some("Series"))]
#[case(json!({"wrapper": {"publisher": {"name": "Deep"}}}), "publisher.name", Some("Deep"))]
#[case(json!({"publisher": "Plain"}), "publisher.name", None)]
#[case(json!({}), "headline", None)]
fn test_resolve_cases(#[case] data: serde_json::Value, #[case] path: &str, #[case] expected: Option<&str>) {
    assert_eq!(resolve(&data, path).as_deref(), expected);
}

#[rstest]
#[case("https://www.example.com/a", "example.com")]
#[case("http://blog.example.org", "blog.example.org")]
#[case("https://WWW.Example.com/", "example.com")]
#[case("not a url", "")]
#[case("", "")]
fn test_domain_cases(#[case] location: &str, #[case] expected: &str) {
    let doc = Document::parse_with_location("<html></html>", location).unwrap();
    assert_eq!(extract(&doc, None, &[]).domain, expected);
}

#[rstest]
#[case("Headline | Site", "Site", "Headline")]
#[case("Site — Headline", "site", "Headline")]
#[case("Headline", "Site", "Headline")]
#[case("Headline - Other", "Site", "Headline - Other")]
fn test_clean_title_cases(#[case] title: &str, #[case] site: &str, #[case] expected: &str) {
    assert_eq!(clean_title(title, site), expected);
}

#[test]
fn test_metadata_json_shape() {
    let metadata = load("news_article.html").extract_metadata();
    let value = serde_json::to_value(&metadata).unwrap();

    for key in ["title", "description", "domain", "favicon", "image", "published", "author", "site"] {
        assert!(value[key].is_string(), "{} should be a string", key);
    }
    assert!(value["schemaOrgData"].is_array());
}
