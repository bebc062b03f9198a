use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Equivalence policy applied to lines before they are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineComparator {
    /// Lines must match byte for byte, including the line terminator.
    #[default]
    Default,
    /// All whitespace is ignored.
    IgnoreAllWhitespace,
    /// Leading whitespace is ignored.
    IgnoreLeadingWhitespace,
    /// Trailing whitespace (including the terminator) is ignored.
    IgnoreTrailingWhitespace,
    /// Runs of whitespace compare equal to a single space; trailing
    /// whitespace is ignored.
    IgnoreWhitespaceChange,
}

impl LineComparator {
    /// Produce the comparison key for a raw line.
    #[must_use]
    pub fn normalize<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        match self {
            Self::Default => Cow::Borrowed(line),
            Self::IgnoreAllWhitespace => {
                if line.iter().any(u8::is_ascii_whitespace) {
                    Cow::Owned(
                        line.iter()
                            .copied()
                            .filter(|byte| !byte.is_ascii_whitespace())
                            .collect(),
                    )
                } else {
                    Cow::Borrowed(line)
                }
            }
            Self::IgnoreLeadingWhitespace => Cow::Borrowed(trim_start(line)),
            Self::IgnoreTrailingWhitespace => Cow::Borrowed(trim_end(line)),
            Self::IgnoreWhitespaceChange => {
                let trimmed = trim_end(line);
                let mut key = Vec::with_capacity(trimmed.len());
                let mut in_whitespace = false;
                for &byte in trimmed {
                    if byte.is_ascii_whitespace() {
                        in_whitespace = true;
                        continue;
                    }
                    if in_whitespace {
                        key.push(b' ');
                        in_whitespace = false;
                    }
                    key.push(byte);
                }
                Cow::Owned(key)
            }
        }
    }
}

/// Split content into lines terminated by `\n`.
///
/// The terminator stays attached to its line. A trailing fragment without a
/// terminator is a line of its own; empty content has no lines.
#[must_use]
pub fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    content.split_inclusive(|byte| *byte == b'\n').collect()
}

fn trim_start(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(line.len());
    &line[start..]
}

fn trim_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(0, |index| index + 1);
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_terminators_and_trailing_fragment() {
        assert!(split_lines(b"").is_empty());
        assert_eq!(split_lines(b"a\nb\n"), vec![&b"a\n"[..], &b"b\n"[..]]);
        assert_eq!(split_lines(b"a\nb"), vec![&b"a\n"[..], &b"b"[..]]);
        assert_eq!(split_lines(b"\n\n").len(), 2);
    }

    #[test]
    fn default_is_exact() {
        let comparator = LineComparator::Default;
        assert_ne!(comparator.normalize(b"a \n"), comparator.normalize(b"a\n"));
        assert_ne!(comparator.normalize(b"a"), comparator.normalize(b"a\n"));
    }

    #[test]
    fn ignore_all_whitespace() {
        let comparator = LineComparator::IgnoreAllWhitespace;
        assert_eq!(
            comparator.normalize(b"  let x = 1;\n"),
            comparator.normalize(b"letx=1;")
        );
    }

    #[test]
    fn ignore_leading_and_trailing() {
        let leading = LineComparator::IgnoreLeadingWhitespace;
        assert_eq!(leading.normalize(b"\t\tfoo\n"), leading.normalize(b"foo\n"));
        assert_ne!(leading.normalize(b"foo \n"), leading.normalize(b"foo\n"));

        let trailing = LineComparator::IgnoreTrailingWhitespace;
        assert_eq!(trailing.normalize(b"foo  \r\n"), trailing.normalize(b"foo"));
        assert_ne!(trailing.normalize(b" foo\n"), trailing.normalize(b"foo\n"));
    }

    #[test]
    fn ignore_whitespace_change_collapses_runs() {
        let comparator = LineComparator::IgnoreWhitespaceChange;
        assert_eq!(
            comparator.normalize(b"a   b\t c  \n"),
            comparator.normalize(b"a b c")
        );
        assert_ne!(comparator.normalize(b"ab\n"), comparator.normalize(b"a b\n"));
    }

    #[test]
    fn comparator_serde_is_snake_case() {
        let json = serde_json::to_string(&LineComparator::IgnoreWhitespaceChange)
            .expect("serialize comparator");
        assert_eq!(json, "\"ignore_whitespace_change\"");
    }
}
