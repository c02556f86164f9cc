use crate::formatters::{FormatterConfig, NO_MATCHES, push_attributes, push_block_header, start_report, truncate_text};
use crate::xml::XmlMatch;

/// Renders XML matches: tag, attributes, and direct text.
pub fn format_xml(matches: &[XmlMatch<'_>], config: &FormatterConfig) -> String {
    let Some(mut output) = start_report(matches.len()) else {
        return NO_MATCHES.to_string();
    };

    for (i, element) in matches.iter().enumerate() {
        push_block_header(&mut output, i + 1);
        output.push_str(&format!("Tag: {}\n", element.tag()));

        push_attributes(&mut output, &element.attrs());

        if let Some(text) = element.text() {
            output.push_str(&format!("Text: {}\n", truncate_text(&text, config.text_limit)));
        }

        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::XmlQuery;
    use crate::xml::XmlDocument;

    fn render(xml: &str, query: &str, config: &FormatterConfig) -> String {
        let doc = XmlDocument::parse(xml).unwrap();
        format_xml(&doc.find(&XmlQuery::parse(query)), config)
    }

    #[test]
    fn test_no_matches_sentinel() {
        assert_eq!(render("<root/>", "item", &FormatterConfig::default()), NO_MATCHES);
    }

    #[test]
    fn test_element_block() {
        let output = render(
            r#"<root><item id="7">  Widget  </item></root>"#,
            "//item[@id='7']",
            &FormatterConfig::default(),
        );
        assert_eq!(
            output,
            "Found 1 elements\n\n\
             --- Element 1 ---\n\
             Tag: item\n\
             Attributes:\n\
             \x20 id: 7\n\
             Text: Widget\n\n"
        );
    }

    #[test]
    fn test_blank_text_omitted() {
        let output = render("<root>\n  <child/>\n</root>", "root", &FormatterConfig::default());
        assert_eq!(output, "Found 1 elements\n\n--- Element 1 ---\nTag: root\n\n");
    }

    #[test]
    fn test_custom_text_limit() {
        let config = FormatterConfig { text_limit: 4 };
        let output = render("<note>abcdefgh</note>", "note", &config);
        assert!(output.contains("Text: abcd...\n"));
    }
}
