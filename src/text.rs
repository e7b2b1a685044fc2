// Line-oriented text helpers shared by the extractor and the renderers

/// Remove at most `width` leading whitespace characters from `line`.
pub fn strip_indent(line: &str, width: usize) -> &str {
    let mut cut = 0;
    for (taken, (offset, c)) in line.char_indices().enumerate() {
        if taken == width || !c.is_whitespace() {
            return &line[offset..];
        }
        cut = offset + c.len_utf8();
    }
    &line[cut..]
}

/// Number of leading whitespace characters in `line`.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Normalize the indentation of a multi-line string.
///
/// Drops a blank first and last line, then removes the indentation shared by
/// every non-blank line. Blank lines come out empty; other lines keep their
/// trailing whitespace.
pub fn trim_indent(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                strip_indent(l, common)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix every non-empty line with `width` spaces.
pub fn indent_lines(text: &str, width: usize) -> String {
    let prefix = " ".repeat(width);
    text.split('\n')
        .map(|l| {
            if l.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, l)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_indent() {
        assert_eq!(strip_indent("        foo", 4), "    foo");
        assert_eq!(strip_indent("  foo", 4), "foo");
        assert_eq!(strip_indent("foo", 4), "foo");
        assert_eq!(strip_indent("    ", 8), "");
    }

    #[test]
    fn test_trim_indent_drops_blank_edges() {
        let text = "\n        # Title\n\n        Some text\n    ";
        assert_eq!(trim_indent(text), "# Title\n\nSome text");
    }

    #[test]
    fn test_trim_indent_keeps_relative_indent() {
        let text = "    a\n        b\n    c";
        assert_eq!(trim_indent(text), "a\n    b\nc");
    }

    #[test]
    fn test_trim_indent_keeps_hard_breaks() {
        let text = "\n    first line  \n    second line\n";
        assert_eq!(trim_indent(text), "first line  \nsecond line");
    }

    #[test]
    fn test_trim_indent_single_line() {
        assert_eq!(trim_indent("x"), "x");
        assert_eq!(trim_indent(""), "");
    }

    #[test]
    fn test_indent_lines_skips_empty() {
        assert_eq!(indent_lines("a\n\nb", 4), "    a\n\n    b");
    }
}
