//! Common utility functions shared across the codebase.

use unicode_width::UnicodeWidthChar;

/// Normalizes an identifier for loose name matching.
///
/// Lowercases and drops `-` and `_`, so `page_content`, `pageContent` and
/// `page-content` all compare equal.
///
/// # Examples
///
/// ```
/// use dictscope::utils::normalize_case;
///
/// assert_eq!(normalize_case("pageContent"), "pagecontent");
/// assert_eq!(normalize_case("page_content"), "pagecontent");
/// assert_eq!(normalize_case("Page-Content"), "pagecontent");
/// ```
pub fn normalize_case(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collapses runs of whitespace into single spaces and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates text to at most `max_width` terminal columns, appending `...`
/// when anything was cut.
///
/// Width is measured with `unicode-width`, so CJK text is cut at half the
/// character count of latin text.
///
/// # Examples
///
/// ```
/// use dictscope::utils::truncate_display;
///
/// assert_eq!(truncate_display("Hello", 10), "Hello");
/// assert_eq!(truncate_display("Hello world", 8), "Hello...");
/// ```
pub fn truncate_display(text: &str, max_width: usize) -> String {
    const ELLIPSIS: &str = "...";

    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(ELLIPSIS.len());
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}
