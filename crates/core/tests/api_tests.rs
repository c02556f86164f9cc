//! Library API integration tests
use quarry_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> Content {
    Content::from(std::fs::read_to_string(get_fixture_path(name)).unwrap())
}

fn block_count(report: &str) -> usize {
    report.matches("--- Element ").count()
}

#[test]
fn test_html_tag_and_classes() {
    let content = read_fixture("page.html");

    let report = extract(&content, Format::Html, "p.text").unwrap();
    assert!(report.starts_with("Found 2 elements\n\n"));
    assert!(report.contains("Text: First paragraph.\n"));
    assert!(report.contains("Text: Secondparagraph.\n"));

    let report = extract(&content, Format::Html, "p.lead.text").unwrap();
    assert_eq!(block_count(&report), 1);
}

#[test]
fn test_html_class_superset_property() {
    let html = std::fs::read_to_string(get_fixture_path("page.html")).unwrap();
    let doc = HtmlDocument::parse(&html);

    for query in ["img.avatar", "div.content.wide", "a.nav"] {
        let spec = HtmlQuery::parse(query);
        let matches = doc.find(&spec);
        assert!(!matches.is_empty(), "{query} should match");
        for m in &matches {
            assert_eq!(m.tag_name(), spec.tag);
            for class in &spec.classes {
                assert!(m.classes().contains(&class.as_str()));
            }
        }
    }
}

#[test]
fn test_html_attribute_equality() {
    let content = read_fixture("page.html");

    let report = extract(&content, Format::Html, "div.id=main").unwrap();
    assert_eq!(block_count(&report), 1);
    assert!(report.contains("  id: main\n"));

    assert_eq!(extract(&content, Format::Html, "div.id=Main").unwrap(), NO_MATCHES);
}

#[test]
fn test_html_links_and_images() {
    let content = read_fixture("page.html");

    let report = extract(&content, Format::Html, "a").unwrap();
    assert_eq!(block_count(&report), 3);
    assert!(report.contains("Link: /about\n"));
    assert!(report.contains("Link: no link\n"));

    let report = extract(&content, Format::Html, "img.avatar").unwrap();
    assert!(report.contains("Source: /img/avatar.png\nDescription: Avatar\n"));
    assert!(report.contains("Source: no source\nDescription: no description\n"));
}

#[test]
fn test_html_non_ascii_text() {
    let content = read_fixture("page.html");
    let report = extract(&content, Format::Html, "div.footer").unwrap();
    assert!(report.contains("Text: Grüße aus Köln\n"));
}

#[test]
fn test_html_file_source_decoded_from_bytes() {
    let source = Source::from_input(&get_fixture_path("page.html"));
    let report = extract_source(&source, Format::Html, "div.footer").unwrap();
    assert!(report.contains("Text: Grüße aus Köln\n"));

    let report = extract_source(&source, Format::Html, "body").unwrap();
    assert_eq!(block_count(&report), 1);
}

#[test]
fn test_xml_simple_tag_document_order() {
    let content = read_fixture("catalog.xml");
    let report = extract(&content, Format::Xml, "title").unwrap();

    assert!(report.starts_with("Found 4 elements\n\n"));
    let guide = report.find("XML Developer's Guide").unwrap();
    let rain = report.find("Midnight Rain").unwrap();
    let review = report.find("Monthly Review").unwrap();
    let march = report.find("March").unwrap();
    assert!(guide < rain && rain < review && review < march);
}

#[test]
fn test_xml_child_steps() {
    let content = read_fixture("catalog.xml");
    let report = extract(&content, Format::Xml, "book/title").unwrap();
    assert_eq!(block_count(&report), 2);
    assert!(!report.contains("Monthly Review"));
}

#[test]
fn test_xml_attribute_predicate() {
    let xml = std::fs::read_to_string(get_fixture_path("catalog.xml")).unwrap();
    let doc = XmlDocument::parse(&xml).unwrap();

    let matches = doc.find(&XmlQuery::parse("//book[@lang='fr']"));
    assert_eq!(matches.len(), 1);
    for m in &matches {
        assert_eq!(m.tag(), "book");
        assert_eq!(m.attr("lang"), Some("fr"));
    }
    assert_eq!(matches[0].attr("id"), Some("bk102"));
}

#[test]
fn test_xml_positional_predicate_matches_nothing() {
    let content = read_fixture("catalog.xml");
    assert_eq!(extract(&content, Format::Xml, "//book[1]").unwrap(), NO_MATCHES);
}

#[test]
fn test_xml_malformed() {
    let content = read_fixture("malformed.xml");
    let err = extract(&content, Format::Xml, "book").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
}

#[test]
fn test_json_wildcard_counts_all_keys() {
    let content = read_fixture("users.json");
    let report = extract(&content, Format::Json, "*").unwrap();
    assert!(report.starts_with("Found 12 elements\n\n"));
}

#[test]
fn test_json_key_at_any_depth() {
    let content = read_fixture("users.json");
    let report = extract(&content, Format::Json, "name").unwrap();

    assert_eq!(block_count(&report), 3);
    let ana = report.find("\"Ana\"").unwrap();
    let bjorn = report.find("\"Björn\"").unwrap();
    let directory = report.find("\"directory\"").unwrap();
    assert!(ana < bjorn && bjorn < directory);
}

#[test]
fn test_json_value_types() {
    let content = read_fixture("users.json");

    let report = extract(&content, Format::Json, "users").unwrap();
    assert!(report.contains("Type: array\n"));

    let report = extract(&content, Format::Json, "version").unwrap();
    assert!(report.contains("Type: float\nValue: 1.5\n"));

    let report = extract(&content, Format::Json, "active").unwrap();
    assert!(report.contains("Type: boolean\nValue: false\n"));
}

#[test]
fn test_json_dotted_path_is_not_resolved() {
    let content = read_fixture("users.json");
    assert_eq!(extract(&content, Format::Json, "data.users").unwrap(), NO_MATCHES);
}

#[test]
fn test_json_malformed() {
    let content = read_fixture("malformed.json");
    let err = extract(&content, Format::Json, "data").unwrap_err();
    assert!(matches!(err, QuarryError::JsonParseError(_)));
}

#[test]
fn test_extract_source_file() {
    let source = Source::from_input(&get_fixture_path("users.json"));
    assert_eq!(source.infer_format(), Some(Format::Json));

    let report = extract_source(&source, Format::Json, "total").unwrap();
    assert!(report.contains("Key: total\nType: integer\nValue: 2\n"));
}

#[test]
fn test_extract_source_errors() {
    let source = Source::from_input(&get_fixture_path("empty.json"));
    let err = extract_source(&source, Format::Json, "a").unwrap_err();
    assert!(matches!(err, QuarryError::EmptyDocument(_)));
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);

    let source = Source::from_input(&get_fixture_path("missing.json"));
    let err = extract_source(&source, Format::Json, "a").unwrap_err();
    assert!(matches!(err, QuarryError::FileNotFound(_)));
}

#[test]
fn test_report_matches_text_output() {
    let service = ExtractionService::new();
    let content = read_fixture("users.json");

    let report = service.report(&content, Format::Json, "*").unwrap().unwrap();
    let text = service.run(&content, Format::Json, "*").unwrap();
    assert_eq!(report.count, block_count(&text));
    assert!(report.to_json().unwrap().contains("\"format\": \"json\""));

    let source = Source::from_input(&get_fixture_path("catalog.xml"));
    let report = service.report_source(&source, Format::Xml, "//book[@lang='en']").unwrap().unwrap();
    assert_eq!(report.count, 1);
}

#[test]
fn test_same_input_same_report() {
    let service = ExtractionService::new();
    for (fixture, format, query) in [
        ("page.html", Format::Html, "div"),
        ("catalog.xml", Format::Xml, "//book"),
        ("users.json", Format::Json, "*"),
    ] {
        let content = read_fixture(fixture);
        assert_eq!(
            service.run(&content, format, query).unwrap(),
            service.run(&content, format, query).unwrap()
        );
    }
}
