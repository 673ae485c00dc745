use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());

/// Normalize whitespace before chunking.
///
/// Runs of two or more blank lines collapse to a single blank line, runs of spaces collapse
/// to one space, every line is trimmed, and so is the result as a whole.
#[must_use]
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let collapsed = BLANK_RUN_RE.replace_all(text, "\n\n");
    let collapsed = SPACE_RUN_RE.replace_all(&collapsed, " ");

    let joined = collapsed
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    joined.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn whitespace_only_input() {
        assert_eq!(clean_text(" \n\t\n  \n"), "");
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(clean_text("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean_text("a\n  \n \t \n\nb"), "a\n\nb");
    }

    #[test]
    fn keeps_single_blank_line() {
        assert_eq!(clean_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn collapses_spaces() {
        assert_eq!(clean_text("one   two    three"), "one two three");
    }

    #[test]
    fn tabs_inside_line_are_kept() {
        assert_eq!(clean_text("a\t\tb"), "a\t\tb");
    }

    #[test]
    fn trims_each_line() {
        assert_eq!(clean_text("  first  \n\tsecond\t\n third"), "first\nsecond\nthird");
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        assert_eq!(clean_text("a\r\nb\r\n"), "a\nb");
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(clean_text("  héllo   wörld  \n\n\n\n日本語  "), "héllo wörld\n\n日本語");
    }

    mod proptest_cleaner {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn cleaning_is_idempotent(text in "[a-z .!?\\t\\n]{0,300}") {
                let once = clean_text(&text);
                prop_assert_eq!(clean_text(&once), once);
            }

            #[test]
            fn never_emits_three_newlines_or_double_spaces(text in "[a-z \\n]{0,300}") {
                let cleaned = clean_text(&text);
                prop_assert!(!cleaned.contains("\n\n\n"));
                prop_assert!(!cleaned.contains("  "));
            }
        }
    }
}
