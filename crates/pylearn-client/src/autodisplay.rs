//! Notebook-style display of a trailing bare name.
//!
//! A snippet whose last non-blank line is just `total` (or `total;`) is sent
//! as `print(total)`, so learners see the value the way a notebook cell would
//! show it. Nothing else in the code is touched.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static BARE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*);?$").expect("bare name pattern is valid")
});

/// Statement keywords that are valid on their own line and must stay put.
const STATEMENT_WORDS: &[&str] = &["pass", "break", "continue", "return", "yield", "raise"];

/// Rewrites a trailing bare name into a `print` call.
///
/// Returns the input borrowed when no rewrite applies. Applying the
/// transform twice gives the same result as applying it once.
pub fn auto_display(code: &str) -> Cow<'_, str> {
    let Some((offset, line)) = last_non_blank_line(code) else {
        return Cow::Borrowed(code);
    };

    let content = line.trim();
    let Some(name) = BARE_NAME
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return Cow::Borrowed(code);
    };
    if STATEMENT_WORDS.contains(&name) {
        return Cow::Borrowed(code);
    }

    let indent = line.len() - line.trim_start().len();
    let content_end = line.trim_end().len();

    let mut out = String::with_capacity(code.len() + 8);
    out.push_str(&code[..offset + indent]);
    out.push_str("print(");
    out.push_str(name);
    out.push(')');
    out.push_str(&code[offset + content_end..]);

    tracing::trace!("auto-display wraps `{}`", name);
    Cow::Owned(out)
}

/// Byte offset and text (without the newline) of the last non-blank line.
fn last_non_blank_line(code: &str) -> Option<(usize, &str)> {
    let mut offset = 0;
    let mut found = None;
    for raw in code.split_inclusive('\n') {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        if !line.trim().is_empty() {
            found = Some((offset, line));
        }
        offset += raw.len();
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bare_name_is_printed() {
        assert_eq!(auto_display("x = 5\nx"), "x = 5\nprint(x)");
        assert_eq!(auto_display("x = 5\nx;"), "x = 5\nprint(x)");
    }

    #[test]
    fn test_trailing_blank_lines_preserved() {
        assert_eq!(auto_display("total = 3\ntotal\n\n  \n"), "total = 3\nprint(total)\n\n  \n");
    }

    #[test]
    fn test_indentation_and_line_endings_kept() {
        assert_eq!(
            auto_display("for i in range(3):\n    i\r\n"),
            "for i in range(3):\n    print(i)\r\n"
        );
    }

    #[test]
    fn test_other_shapes_untouched() {
        for code in [
            "",
            "\n\n",
            "print(x)",
            "x = 1",
            "x + 1",
            "x  # show it",
            "x;;",
            "obj.attr",
            "1x",
            "while True:\n    pass",
            "for i in items:\n    continue",
        ] {
            assert!(
                matches!(auto_display(code), Cow::Borrowed(_)),
                "rewrote {code:?}"
            );
        }
    }

    #[test]
    fn test_only_last_non_blank_line_inspected() {
        let code = "a\nb = 2\n";
        assert_eq!(auto_display(code), "a\nb = 2\n");
    }

    mod proptests {
        use super::*;

        proptest! {
            #[test]
            fn auto_display_is_idempotent(code in "[a-z_ =;()0-9\n]{0,64}") {
                let once = auto_display(&code).into_owned();
                let twice = auto_display(&once).into_owned();
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn auto_display_keeps_every_other_line(code in "[a-z_ =;0-9\n]{0,64}") {
                let out = auto_display(&code);
                let before: Vec<&str> = code.split('\n').collect();
                let after: Vec<&str> = out.split('\n').collect();
                prop_assert_eq!(before.len(), after.len());

                let last = before.iter().rposition(|l| !l.trim().is_empty());
                for (idx, (a, b)) in before.iter().zip(after.iter()).enumerate() {
                    if Some(idx) != last {
                        prop_assert_eq!(a, b);
                    }
                }
            }

            #[test]
            fn auto_display_prints_trailing_name(
                prefix in "([a-z]{1,6} = [0-9]{1,3}\n){0,4}",
                name in "[a-z][a-z0-9_]{0,8}",
            ) {
                prop_assume!(!STATEMENT_WORDS.contains(&name.as_str()));
                let code = format!("{prefix}{name}");
                let expected = format!("{prefix}print({name})");
                prop_assert_eq!(auto_display(&code).into_owned(), expected);
            }
        }
    }
}
