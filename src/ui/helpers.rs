//! Shared rendering utilities.
//!
//! # Features
//!
//! - **Match Highlighting**: Marks character ranges of a title with brackets
//! - **Centering**: Pads a line to the terminal width
//! - **UTF-8 Safe**: Operates on character indices, not byte indices
//!
//! # Example
//!
//! ```rust
//! use marquee::ui::helpers::highlight;
//!
//! assert_eq!(highlight("Batman", &[(0, 3)]), "[Bat]man");
//! ```

/// Wraps each highlighted character range of `text` in brackets.
///
/// Ranges are `(start, end)` character indices with an exclusive end, sorted
/// and non-overlapping. Out-of-range ends are clamped.
#[must_use]
pub fn highlight(text: &str, ranges: &[(usize, usize)]) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 2);
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }
        out.extend(&chars[current_pos..start]);
        out.push('[');
        out.extend(&chars[start..end]);
        out.push(']');
        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
    out
}

/// Centers `text` in a line of `cols` characters.
///
/// Text wider than the line is returned unchanged.
#[must_use]
pub fn centered(text: &str, cols: usize) -> String {
    let len = text.chars().count();
    let padding = cols.saturating_sub(len) / 2;
    format!("{}{text}", " ".repeat(padding))
}

/// Truncates `text` to `max` characters, ending in `...` when shortened.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
