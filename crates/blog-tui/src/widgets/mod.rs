pub mod filter_input;
pub mod notification;
pub mod pane_chrome;
pub mod status_bar;
pub mod text_field;

use unicode_width::UnicodeWidthChar;

/// The tail of `text` after its first `columns` display columns.
///
/// A wide character straddling the boundary is dropped whole.
pub fn skip_columns(text: &str, columns: usize) -> &str {
    let mut used = 0;
    for (idx, c) in text.char_indices() {
        if used >= columns {
            return &text[idx..];
        }
        used += c.width().unwrap_or(0);
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_columns_ascii() {
        assert_eq!(skip_columns("hello", 2), "llo");
        assert_eq!(skip_columns("hello", 0), "hello");
        assert_eq!(skip_columns("hi", 5), "");
    }

    #[test]
    fn test_skip_columns_counts_wide_chars_twice() {
        // each CJK char is two columns wide
        assert_eq!(skip_columns("日本語です", 4), "語です");
        assert_eq!(skip_columns("日本語です", 3), "語です");
        assert_eq!(skip_columns("ab😀cd", 4), "cd");
    }
}
