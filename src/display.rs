/// Column width the summary is wrapped to when printed.
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// Greedy word wrap. Words wider than `width` sit alone on their line.
pub fn wrap_text(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{wrap_text, DEFAULT_WRAP_WIDTH};

    #[test]
    fn lines_never_exceed_the_width() {
        let text = "The speaker walks through ownership, borrowing and lifetimes. ".repeat(12);
        let wrapped = wrap_text(&text, DEFAULT_WRAP_WIDTH);

        assert!(wrapped.lines().count() > 1);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= DEFAULT_WRAP_WIDTH, "{line:?}");
            assert_eq!(line, line.trim());
        }
        assert_eq!(
            wrapped.split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text("Test summary.", 80), "Test summary.");
        assert_eq!(wrap_text("", 80), "");
    }

    #[test]
    fn long_words_get_their_own_line() {
        assert_eq!(wrap_text("a bbbbbbbbbb c", 5), "a\nbbbbbbbbbb\nc");
    }
}
