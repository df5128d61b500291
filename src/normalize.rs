//! Line normalization.
//!
//! Repairs the damage text picks up on its way out of a PDF content stream
//! or a DOCX run: stray NBSPs, uneven whitespace, and sentences hard-wrapped
//! across extraction boundaries.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Characters that end a sentence; a line ending in one of these is never
/// joined with its successor.
const TERMINAL_PUNCTUATION: [char; 8] = ['.', '!', '?', ':', ';', '。', '！', '？'];

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Normalize a single line: NBSP to space, Unicode NFC, whitespace runs
/// collapsed to one space, leading/trailing whitespace trimmed.
pub fn normalize_line(line: &str) -> String {
    let line: String = line.replace('\u{00A0}', " ").nfc().collect();
    whitespace_run().replace_all(&line, " ").trim().to_string()
}

/// Case-folded form of [`normalize_line`], used as the identity key for the
/// repetition heuristic.
pub fn normalized_key(line: &str) -> String {
    normalize_line(line).to_lowercase()
}

/// Merge hard-wrapped sentence fragments.
///
/// A line that does not end in terminal punctuation is joined with the next
/// line when that line starts with a lowercase letter. Callers apply this
/// within one page/section only; a table boundary splits the input into
/// separate calls.
pub fn join_continuations(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(prev) = out.last_mut() {
            if !ends_sentence(prev) && starts_lowercase(&line) {
                prev.push(' ');
                prev.push_str(&line);
                continue;
            }
        }
        out.push(line);
    }
    out
}

fn ends_sentence(line: &str) -> bool {
    line.chars()
        .last()
        .map(|c| TERMINAL_PUNCTUATION.contains(&c))
        .unwrap_or(true)
}

fn starts_lowercase(line: &str) -> bool {
    line.chars().next().map(|c| c.is_lowercase()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_line("  foo \t bar\u{00A0}baz  "), "foo bar baz");
    }

    #[test]
    fn test_normalize_nfc() {
        // e + combining acute normalizes to the precomposed form
        assert_eq!(normalize_line("cafe\u{0301}"), "caf\u{00E9}");
    }

    #[test]
    fn test_normalized_key_case_folds() {
        assert_eq!(normalized_key("  Page  1 "), "page 1");
        assert_eq!(normalized_key("CONFIDENTIAL"), "confidential");
    }

    #[test]
    fn test_join_continuation() {
        let lines = vec![
            "The vendor shall provide".to_string(),
            "redundant power supplies.".to_string(),
        ];
        let joined = join_continuations(lines);
        assert_eq!(joined, vec!["The vendor shall provide redundant power supplies."]);
    }

    #[test]
    fn test_no_join_after_terminal_punctuation() {
        let lines = vec![
            "First requirement.".to_string(),
            "and a second one".to_string(),
        ];
        let joined = join_continuations(lines);
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn test_no_join_before_uppercase() {
        let lines = vec![
            "A dangling fragment".to_string(),
            "New Heading".to_string(),
        ];
        let joined = join_continuations(lines);
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn test_chained_joins() {
        let lines = vec![
            "split across".to_string(),
            "three separate".to_string(),
            "lines entirely.".to_string(),
        ];
        let joined = join_continuations(lines);
        assert_eq!(joined, vec!["split across three separate lines entirely."]);
    }
}
