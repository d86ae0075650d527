use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculates the display width of a string in terminal columns.
///
/// CJK characters and emoji count as two columns, combining marks as zero.
///
/// ```
/// use osnote::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("你好"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns, appending
/// "..." when text was cut.
///
/// Widths of three columns or fewer leave no room for the ellipsis, so the
/// result is just the prefix that fits. Strings that already fit are
/// returned borrowed.
///
/// ```
/// use osnote::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Context Switching", 10), "Context...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let mut used = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut = idx + c.len_utf8();
    }

    if max_width <= ELLIPSIS_WIDTH {
        Cow::Owned(s[..cut].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
    }
}

/// Greedy word wrap to `width` columns.
///
/// Words longer than a full line are hard-split. Existing newlines start a
/// new line. An empty input produces a single empty line so callers can
/// count rows uniformly.
pub fn wrap_to_width(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in s.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word;
            let mut word_width = display_width(word);
            let sep = usize::from(line_width > 0);

            if line_width + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += sep + word_width;
                continue;
            }

            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            while word_width > width {
                let mut cut = 0;
                let mut used = 0;
                for (idx, c) in word.char_indices() {
                    let w = UnicodeWidthChar::width(c).unwrap_or(0);
                    if used + w > width && cut > 0 {
                        break;
                    }
                    used += w;
                    cut = idx + c.len_utf8();
                }
                lines.push(word[..cut].to_string());
                word = &word[cut..];
                word_width = display_width(word);
            }

            line.push_str(word);
            line_width = word_width;
        }

        lines.push(line);
    }

    lines
}

fn is_stripped_control(c: char) -> bool {
    (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{7f}'
}

/// Strip terminal control characters and ANSI escape sequences from text
/// loaded from outside the binary.
///
/// Removes ASCII controls other than tab, newline and carriage return, CSI
/// sequences (`ESC [` up to a final byte in `@..=~`), OSC sequences
/// (`ESC ]` up to BEL or `ESC \`), and bare ESC.
///
/// Clean input is returned borrowed.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for n in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&n) {
                            break;
                        }
                    }
                }
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
        } else if !is_stripped_control(c) {
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
    fn test_ascii_truncation() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
    }

    #[test]
    fn test_cjk_truncation() {
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
    }

    #[test]
    fn test_narrow_widths_have_no_ellipsis() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
    }

    #[test]
    fn test_fitting_string_is_borrowed() {
        assert!(matches!(truncate_to_width("fits", 4), Cow::Borrowed(_)));
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(
            wrap_to_width("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_hard_splits_long_words() {
        assert_eq!(
            wrap_to_width("multiprogramming", 6),
            vec!["multip", "rogram", "ming"]
        );
    }

    #[test]
    fn test_wrap_keeps_explicit_newlines_and_empty_input() {
        assert_eq!(wrap_to_width("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_to_width("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_lines_fit_width() {
        let text = "Context switching saves the state of the running process into its PCB";
        for line in wrap_to_width(text, 12) {
            assert!(display_width(&line) <= 12, "{line:?} too wide");
        }
    }

    #[test]
    fn test_strip_clean_text_is_borrowed() {
        let s = "Process Control Block\twith tabs\nand newlines";
        assert!(matches!(strip_control_chars(s), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_csi_and_osc() {
        assert_eq!(strip_control_chars("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(
            strip_control_chars("\x1b]0;title\x07kernel\x1b]8;;x\x1b\\"),
            "kernel"
        );
    }

    #[test]
    fn test_strip_bare_controls() {
        assert_eq!(strip_control_chars("a\x00b\x7fc\x1bd"), "abcd");
    }
}
