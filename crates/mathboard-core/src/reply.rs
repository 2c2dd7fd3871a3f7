//! Splitting a tutor reply into whiteboard steps and an explanation.
//!
//! The structured endpoint is prompted to answer as
//!
//! ```text
//! MATH:
//! 1. first step
//! 2. second step
//! ---
//! EXPLANATION:
//! prose with $inline$ math
//! ```
//!
//! Anything that does not look like that is treated as explanation text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const SECTION_DELIMITER: &str = "---";

/// Math steps and explanation extracted from one raw reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReply {
    pub math_steps: Vec<String>,
    pub explanation: String,
}

impl ParsedReply {
    /// A reply with no whiteboard content.
    pub fn explanation_only(text: impl Into<String>) -> Self {
        Self {
            math_steps: Vec::new(),
            explanation: text.into(),
        }
    }
}

fn math_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*MATH:\s*").expect("valid regex"))
}

fn explanation_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*EXPLANATION:\s*").expect("valid regex"))
}

fn numbered_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.\s").expect("valid regex"))
}

fn numbering_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.\s*").expect("valid regex"))
}

/// Parse a raw reply from the structured endpoint. Never fails.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let fragments: Vec<&str> = raw.split(SECTION_DELIMITER).collect();

    if fragments.len() < 2 || !fragments[0].to_uppercase().contains("MATH:") {
        return ParsedReply::explanation_only(raw.trim());
    }

    let math_part = math_label().replace(fragments[0], "");
    // Numbering is not checked for order; "1. a" then "1. b" gives two steps.
    let math_steps = math_part
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| numbered_line().is_match(line))
        .map(|line| numbering_prefix().replace(line, "").into_owned())
        .collect();

    let explanation = explanation_label()
        .replace(fragments[1], "")
        .trim()
        .to_string();

    ParsedReply {
        math_steps,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_reply() {
        let parsed = parse_reply("MATH:\n1. 2/3 + 1\n2. 5/3\n---\nEXPLANATION: Add the fractions.");
        assert_eq!(parsed.math_steps, vec!["2/3 + 1", "5/3"]);
        assert_eq!(parsed.explanation, "Add the fractions.");
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let parsed = parse_reply("Math:\n1. x = 2\n---\nexplanation:\nSolve for x.");
        assert_eq!(parsed.math_steps, vec!["x = 2"]);
        assert_eq!(parsed.explanation, "Solve for x.");
    }

    #[test]
    fn test_prompted_layout_with_blank_lines() {
        let raw = "MATH:\n1. 2x + 3 = 7\n2. 2x = 4\n3. x = 2\n\n---\n\nEXPLANATION:\n1. Subtract 3.\n2. Divide by 2.\nDoes that make sense?";
        let parsed = parse_reply(raw);
        assert_eq!(parsed.math_steps, vec!["2x + 3 = 7", "2x = 4", "x = 2"]);
        assert_eq!(parsed.explanation, "1. Subtract 3.\n2. Divide by 2.\nDoes that make sense?");
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = parse_reply("MATH:\r\n1. a + b\r\n2. c\r\n---\r\nEXPLANATION: ok");
        assert_eq!(parsed.math_steps, vec!["a + b", "c"]);
        assert_eq!(parsed.explanation, "ok");
    }

    #[test]
    fn test_unnumbered_lines_are_dropped() {
        let parsed = parse_reply("MATH:\nStart here\n1. x\n - not a step\n12. y\n3.z\n---\nDone");
        assert_eq!(parsed.math_steps, vec!["x", "y"]);
        assert_eq!(parsed.explanation, "Done");
    }

    #[test]
    fn test_duplicate_numbering_is_kept() {
        let parsed = parse_reply("MATH:\n1. a\n1. b\n---\nx");
        assert_eq!(parsed.math_steps, vec!["a", "b"]);
    }

    #[test]
    fn test_delimiter_without_numbered_lines() {
        let parsed = parse_reply("MATH: nothing numbered\n---\nEXPLANATION: Just words.");
        assert!(parsed.math_steps.is_empty());
        assert_eq!(parsed.explanation, "Just words.");
    }

    #[test]
    fn test_only_second_fragment_is_explanation() {
        let parsed = parse_reply("MATH:\n1. a\n---\nfirst\n---\nsecond");
        assert_eq!(parsed.explanation, "first");
    }

    #[test]
    fn test_missing_marker_is_all_explanation() {
        let raw = "  The answer is $42$.\n---\nmore  ";
        let parsed = parse_reply(raw);
        assert!(parsed.math_steps.is_empty());
        assert_eq!(parsed.explanation, raw.trim());
    }

    #[test]
    fn test_missing_delimiter_is_all_explanation() {
        let raw = "MATH:\n1. 2 + 2\n2. 4\n";
        let parsed = parse_reply(raw);
        assert!(parsed.math_steps.is_empty());
        assert_eq!(parsed.explanation, raw.trim());
    }

    #[test]
    fn test_empty_reply() {
        assert_eq!(parse_reply(""), ParsedReply::default());
        assert_eq!(parse_reply("   \n"), ParsedReply::default());
    }
}
