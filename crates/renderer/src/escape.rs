//! Text preparation for SVG markup.

/// Escape the five markup-significant characters.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shorten `text` to at most `max_chars` characters, ending in an ellipsis
/// when cut. Counts characters, not bytes.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

/// Truncate then escape; the order keeps entities from being cut in half.
pub fn prepare(text: &str, max_chars: usize) -> String {
    escape_markup(&truncate(text, max_chars))
}
