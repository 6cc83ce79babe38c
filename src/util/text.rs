use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Terminal columns occupied by `s` (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_width` columns, appending "..." when text is lost.
///
/// Widths of 3 or less leave no room for the ellipsis, so the prefix that fits
/// is returned bare. Borrows when nothing is cut.
///
/// ```
/// use postdeck::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Launch Day", 20), "Launch Day");
/// assert_eq!(truncate_to_width("My Launch Recap", 9), "My Lau...");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(prefix_within(s, max_width).to_string());
    }
    let kept = prefix_within(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", kept, ELLIPSIS))
}

/// Pad `s` with spaces on the right to exactly `width` columns, truncating
/// first if it is wider.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let cut = truncate_to_width(s, width);
    let fill = width.saturating_sub(display_width(&cut));
    format!("{}{}", cut, " ".repeat(fill))
}

/// Longest prefix of `s` no wider than `width` columns.
fn prefix_within(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Remove control characters and ANSI escape sequences so captured text
/// cannot drive the terminal. Tab, newline and carriage return are kept.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let unsafe_char = |c: char| c == '\x1b' || (c.is_control() && !matches!(c, '\t' | '\n' | '\r'));
    if !s.chars().any(unsafe_char) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                // CSI: parameters up to a final byte in 0x40..=0x7e
                Some('[') => {
                    chars.next();
                    for n in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&n) {
                            break;
                        }
                    }
                }
                // OSC: up to BEL or ESC \
                Some(']') => {
                    chars.next();
                    while let Some(n) = chars.next() {
                        if n == '\x07' {
                            break;
                        }
                        if n == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !unsafe_char(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // 2 columns per char
        assert_eq!(truncate_to_width("日本語テスト", 7), "日本...");
        assert_eq!(truncate_to_width("日本語テスト", 3), "日");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Testing", 2), "Te");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_truncate_borrows_when_fitting() {
        assert!(matches!(truncate_to_width("fits", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 5), "ab   ");
        assert_eq!(pad_to_width("abcdefgh", 6), "abc...");
        assert_eq!(display_width(&pad_to_width("日本", 5)), 5);
    }

    #[test]
    fn test_strip_clean_text_borrows() {
        let input = "line1\nline2\ttabbed\r\n";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_controls_and_escapes() {
        assert_eq!(strip_control_chars("he\x00ll\x07o\x7f"), "hello");
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip_control_chars("été \x1b[1m日本\x1b[0m"), "été 日本");
    }
}
