// Output formatting: colored terminal report and the Markdown report
// written next to the SVG charts.

pub mod markdown;
pub mod terminal;

/// Cut `text` to at most `max_chars` characters, appending "..." when cut.
/// Counts chars, not bytes, so multi-byte text never splits mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}
