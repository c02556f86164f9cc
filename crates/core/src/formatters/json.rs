use crate::formatters::{NO_MATCHES, push_block_header, start_report};
use crate::json::JsonMatch;

/// Renders JSON matches: key, type name, and the pretty-printed value.
///
/// Values are never truncated; non-ASCII text is written as-is.
pub fn format_json(matches: &[JsonMatch]) -> String {
    let Some(mut output) = start_report(matches.len()) else {
        return NO_MATCHES.to_string();
    };

    for (i, entry) in matches.iter().enumerate() {
        push_block_header(&mut output, i + 1);
        output.push_str(&format!("Key: {}\n", entry.key));
        output.push_str(&format!("Type: {}\n", entry.type_name()));

        let value = serde_json::to_string_pretty(&entry.value).unwrap_or_else(|_| entry.value.to_string());
        output.push_str(&format!("Value: {}\n\n", value));
    }

    output
}
