/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Character-level diffs between expected and actual output.
//!
//! Purely presentational: whether a case passed has already been decided by
//! the time a diff is rendered.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    /// Present in both.
    Equal,
    /// Present only in the actual output.
    Insert,
    /// Present only in the expected output.
    Delete,
}

/// A run of consecutive characters with the same change kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSpan {
    pub kind: SpanKind,
    pub text: String,
}

/// Diff `expected` against `actual` character by character, merging
/// adjacent characters of the same kind into spans.
pub fn char_diff(expected: &str, actual: &str) -> Vec<DiffSpan> {
    let diff = TextDiff::from_chars(expected, actual);
    let mut spans: Vec<DiffSpan> = Vec::new();

    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SpanKind::Equal,
            ChangeTag::Insert => SpanKind::Insert,
            ChangeTag::Delete => SpanKind::Delete,
        };
        match spans.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => spans.push(DiffSpan {
                kind,
                text: change.value().to_string(),
            }),
        }
    }

    spans
}

/// Render spans as plain text, marking removals `[-like this-]` and
/// insertions `{+like this+}`.
pub fn render_plain(spans: &[DiffSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        match span.kind {
            SpanKind::Equal => out.push_str(&span.text),
            SpanKind::Delete => {
                out.push_str("[-");
                out.push_str(&span.text);
                out.push_str("-]");
            }
            SpanKind::Insert => {
                out.push_str("{+");
                out.push_str(&span.text);
                out.push_str("+}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_are_one_equal_span() {
        let spans = char_diff("Smith 2024a.", "Smith 2024a.");
        assert_eq!(
            spans,
            vec![DiffSpan {
                kind: SpanKind::Equal,
                text: "Smith 2024a.".to_string()
            }]
        );
    }

    #[test]
    fn test_changed_suffix() {
        let spans = char_diff("Smith 2024a.", "Smith 2024b.");
        assert_eq!(render_plain(&spans), "Smith 2024[-a-]{+b+}.");
    }

    #[test]
    fn test_spans_rebuild_both_sides() {
        let expected = "Smith 2015.";
        let actual = "Doe 1995.";
        let spans = char_diff(expected, actual);
        let old: String = spans
            .iter()
            .filter(|s| s.kind != SpanKind::Insert)
            .map(|s| s.text.as_str())
            .collect();
        let new: String = spans
            .iter()
            .filter(|s| s.kind != SpanKind::Delete)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(old, expected);
        assert_eq!(new, actual);
    }

    #[test]
    fn test_adjacent_spans_differ_in_kind() {
        let spans = char_diff("- Jane Doe, 1990.", "- John Doe, 1991.");
        for pair in spans.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn test_empty_expected() {
        let spans = char_diff("", "ibid.");
        assert_eq!(render_plain(&spans), "{+ibid.+}");
    }
}
