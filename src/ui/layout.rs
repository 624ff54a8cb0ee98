//! Display-width helpers shared by the terminal views and CLI listings.
//!
//! Guest names and replies routinely carry emoji and non-Latin scripts, so
//! all column math goes through `unicode-width` rather than `len()`.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// `text` cut to at most `width` columns, ending in `…` when cut.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    out
}

/// `text` fitted to `width` columns and right-padded with spaces to exactly
/// that width.
pub fn pad(text: &str, width: usize) -> String {
    let mut out = fit(text, width);
    let used = out.width();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

/// `text` centered in `width` columns.
pub fn center(text: &str, width: usize) -> String {
    let text = fit(text, width);
    let spare = width.saturating_sub(text.width());
    let left = spare / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(spare - left))
}
