use crate::formatters::{FormatterConfig, NO_MATCHES, push_attributes, push_block_header, start_report, truncate_text};
use crate::html::HtmlMatch;

/// Renders HTML matches: text, attributes, and link/image details.
pub fn format_html(matches: &[HtmlMatch<'_>], config: &FormatterConfig) -> String {
    let Some(mut output) = start_report(matches.len()) else {
        return NO_MATCHES.to_string();
    };

    for (i, element) in matches.iter().enumerate() {
        push_block_header(&mut output, i + 1);

        let text = element.text();
        if !text.is_empty() {
            output.push_str(&format!("Text: {}\n", truncate_text(&text, config.text_limit)));
        }

        push_attributes(&mut output, &element.attrs());

        match element.tag_name() {
            "a" => {
                output.push_str(&format!("Link: {}\n", element.attr("href").unwrap_or("no link")));
            }
            "img" => {
                output.push_str(&format!("Source: {}\n", element.attr("src").unwrap_or("no source")));
                output.push_str(&format!("Description: {}\n", element.attr("alt").unwrap_or("no description")));
            }
            _ => {}
        }

        output.push('\n');
    }

    output
}
