// src/util.rs

//! Small string helpers shared by error rendering and callers building
//! command lines.

use std::borrow::Cow;

/// Prefix every non-empty line of `s` with `indent`. Empty lines are dropped.
pub fn indent_lines(s: &str, indent: &str) -> String {
    s.split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quote a single word for `sh` if it needs it.
///
/// Words the shell reads literally come back borrowed and unchanged;
/// anything else is single-quoted.
pub fn quote(word: &str) -> Cow<'_, str> {
    shell_words::quote(word)
}

/// Join words into a command line, quoting each with [`quote`].
///
/// Command lines passed to [`Context::exec`](crate::Context::exec) reach the
/// shell verbatim, so interpolated values that are not trusted should go
/// through this first.
pub fn shell_join<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    shell_words::join(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_skips_empty_lines() {
        assert_eq!(indent_lines("a\n\nb\n", " > "), " > a\n > b");
        assert_eq!(indent_lines("", " > "), "");
    }

    #[test]
    fn quote_leaves_plain_words_alone() {
        assert_eq!(quote("src/main.rs"), "src/main.rs");
        assert_eq!(quote("-la"), "-la");
    }

    #[test]
    fn quote_wraps_special_characters() {
        assert_eq!(quote("two words"), "'two words'");
        assert_eq!(quote("$HOME"), "'$HOME'");
        assert_eq!(quote("it's"), r"'it'\''s'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn shell_join_quotes_each_word() {
        assert_eq!(shell_join(["grep", "-r", "a b", "."]), "grep -r 'a b' .");
    }

    #[test]
    fn plain_words_are_borrowed() {
        assert!(matches!(quote("plain"), Cow::Borrowed("plain")));
        assert!(matches!(quote("a;b"), Cow::Owned(_)));
    }

    #[test]
    fn joined_words_split_back_the_same() {
        let words = ["echo", "it's", "$HOME", "a\tb", ""];
        let line = shell_join(words);
        assert_eq!(shell_words::split(&line).unwrap(), words);
    }
}
