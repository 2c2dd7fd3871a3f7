//! Inline `$...$` math inside explanations and chat replies.

use crate::expr::{map_all, named_unicode, subscript, superscript};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Math between a pair of single dollar signs, without the dollars.
    Math(String),
}

impl Segment {
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text(s) | Segment::Math(s) => s,
        }
    }
}

fn inline_math() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$[^$]+\$").expect("valid regex"))
}

/// Split text into plain and math segments, left to right.
///
/// A `$` without a partner stays in the surrounding text. Empty text between
/// two adjacent math runs is not emitted.
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in inline_math().find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Text(text[last..m.start()].to_string()));
        }
        let inner = &m.as_str()[1..m.as_str().len() - 1];
        segments.push(Segment::Math(inner.to_string()));
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }

    segments
}

/// Render inline LaTeX as a single readable line of unicode text.
///
/// Handles the commands tutors actually emit: fractions, roots, operators,
/// Greek letters, and `^`/`_` scripts. Unknown commands are left as written.
pub fn to_unicode(latex: &str) -> String {
    let chars: Vec<char> = latex.chars().collect();
    let mut pos = 0;
    render_until(&chars, &mut pos, None, 0)
}

/// Groups and commands nested deeper than this are printed as written.
const MAX_NESTING: usize = 64;

/// Everything from the opener the caller just consumed to the end, verbatim.
fn rest_verbatim(chars: &[char], pos: &mut usize) -> String {
    let rest = chars[pos.saturating_sub(1)..].iter().collect();
    *pos = chars.len();
    rest
}

fn render_until(chars: &[char], pos: &mut usize, close: Option<char>, depth: usize) -> String {
    if depth > MAX_NESTING {
        return rest_verbatim(chars, pos);
    }
    let mut out = String::new();
    while *pos < chars.len() {
        let c = chars[*pos];
        if Some(c) == close {
            *pos += 1;
            return out;
        }
        *pos += 1;
        match c {
            '\\' => out.push_str(&render_command(chars, pos, depth + 1)),
            '{' => out.push_str(&render_until(chars, pos, Some('}'), depth + 1)),
            '^' => {
                let arg = read_arg(chars, pos, depth);
                match map_all(&arg, superscript) {
                    Some(sup) => out.push_str(&sup),
                    None => out.push_str(&format!("^{}", wrap_if_compound(&arg))),
                }
            }
            '_' => {
                let arg = read_arg(chars, pos, depth);
                match map_all(&arg, subscript) {
                    Some(sub) => out.push_str(&sub),
                    None => out.push_str(&format!("_{}", wrap_if_compound(&arg))),
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Read one argument: a braced group, a command, or a single character.
fn read_arg(chars: &[char], pos: &mut usize, depth: usize) -> String {
    while *pos < chars.len() && chars[*pos] == ' ' {
        *pos += 1;
    }
    let Some(&c) = chars.get(*pos) else {
        return String::new();
    };
    *pos += 1;
    match c {
        '{' => render_until(chars, pos, Some('}'), depth + 1),
        '\\' => render_command(chars, pos, depth + 1),
        c => c.to_string(),
    }
}

/// Render the command whose name starts at `pos` (just after the backslash).
fn render_command(chars: &[char], pos: &mut usize, depth: usize) -> String {
    if depth > MAX_NESTING {
        return rest_verbatim(chars, pos);
    }
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_alphabetic() {
        *pos += 1;
    }
    let name: String = chars[start..*pos].iter().collect();

    if name.is_empty() {
        // Escaped symbol or spacing command: \{ \$ \, \; \!
        let Some(&c) = chars.get(*pos) else {
            return String::new();
        };
        *pos += 1;
        return match c {
            ',' | ';' | ':' | ' ' => " ".to_string(),
            '!' => String::new(),
            '\\' => "\n".to_string(),
            c => c.to_string(),
        };
    }

    match name.as_str() {
        "frac" | "dfrac" | "tfrac" => {
            let num = read_arg(chars, pos, depth);
            let den = read_arg(chars, pos, depth);
            format!("{}/{}", wrap_if_compound(&num), wrap_if_compound(&den))
        }
        "sqrt" => {
            let mut index = String::new();
            if chars.get(*pos) == Some(&'[') {
                *pos += 1;
                index = render_until(chars, pos, Some(']'), depth + 1);
            }
            let arg = read_arg(chars, pos, depth);
            let root = match index.as_str() {
                "" => "√".to_string(),
                "3" => "∛".to_string(),
                "4" => "∜".to_string(),
                n => map_all(n, superscript).map_or_else(|| format!("[{}]√", n), |s| format!("{}√", s)),
            };
            format!("{}{}", root, wrap_if_compound(&arg))
        }
        "left" | "right" | "big" | "Big" | "bigg" | "Bigg" => {
            // The delimiter that follows is printed as-is; `\left.` prints nothing.
            if chars.get(*pos) == Some(&'.') {
                *pos += 1;
            }
            String::new()
        }
        "text" | "mathrm" | "mathbf" | "mathit" | "operatorname" | "textbf" | "boxed" => {
            read_arg(chars, pos, depth)
        }
        "quad" | "qquad" => " ".to_string(),
        _ => match command_glyph(&name) {
            Some(glyph) => glyph.to_string(),
            None => format!("\\{}", name),
        },
    }
}

fn command_glyph(name: &str) -> Option<&'static str> {
    if let Some(greek) = named_unicode(name) {
        return Some(greek);
    }
    Some(match name {
        "times" => "×",
        "cdot" => "·",
        "div" => "÷",
        "pm" => "±",
        "mp" => "∓",
        "le" | "leq" => "≤",
        "ge" | "geq" => "≥",
        "ne" | "neq" => "≠",
        "approx" => "≈",
        "equiv" => "≡",
        "to" | "rightarrow" => "→",
        "Rightarrow" | "implies" => "⇒",
        "circ" => "∘",
        "degree" => "°",
        "angle" => "∠",
        "perp" => "⊥",
        "parallel" => "∥",
        "triangle" => "△",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "partial" => "∂",
        "ldots" | "dots" | "cdots" => "…",
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "log" => "log",
        "ln" => "ln",
        "exp" => "exp",
        "lim" => "lim",
        _ => return None,
    })
}

/// Wrap `s` in parentheses unless it is a single number or symbol.
fn wrap_if_compound(s: &str) -> String {
    let simple = !s.is_empty()
        && (s.chars().all(|c| c.is_ascii_digit() || c == '.') || s.chars().count() == 1);
    if simple {
        s.to_string()
    } else {
        format!("({})", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_answer() {
        assert_eq!(
            segment("The answer is $42$."),
            vec![
                Segment::Text("The answer is ".to_string()),
                Segment::Math("42".to_string()),
                Segment::Text(".".to_string()),
            ]
        );
    }

    #[test]
    fn test_segment_plain_text() {
        assert_eq!(segment("no math here"), vec![Segment::Text("no math here".to_string())]);
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_segment_unmatched_dollar_is_text() {
        assert_eq!(segment("costs $5"), vec![Segment::Text("costs $5".to_string())]);
        assert_eq!(
            segment("$$x$"),
            vec![Segment::Text("$".to_string()), Segment::Math("x".to_string())]
        );
    }

    #[test]
    fn test_segment_adjacent_math() {
        assert_eq!(
            segment("$a$$b$"),
            vec![Segment::Math("a".to_string()), Segment::Math("b".to_string())]
        );
    }

    #[test]
    fn test_segment_keeps_order_and_text() {
        let input = "If $x = 2$, then $2x$ is $4$, right?";
        let segments = segment(input);
        let text: String = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Text(t) => Some(t.as_str()),
                Segment::Math(_) => None,
            })
            .collect();
        assert_eq!(text, "If , then  is , right?");

        let rebuilt: String = segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) => t.clone(),
                Segment::Math(m) => format!("${}$", m),
            })
            .collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_to_unicode_fraction_and_operators() {
        assert_eq!(to_unicode("\\frac{2}{3} + 1"), "2/3 + 1");
        assert_eq!(to_unicode("\\frac{x+1}{2}"), "(x+1)/2");
        assert_eq!(to_unicode("3 \\times 4 \\div 2"), "3 × 4 ÷ 2");
        assert_eq!(to_unicode("x \\leq 5"), "x ≤ 5");
    }

    #[test]
    fn test_to_unicode_scripts() {
        assert_eq!(to_unicode("x^2 + y^{10}"), "x² + y¹⁰");
        assert_eq!(to_unicode("a_1"), "a₁");
        assert_eq!(to_unicode("e^{kt}"), "e^(kt)");
    }

    #[test]
    fn test_to_unicode_roots_and_greek() {
        assert_eq!(to_unicode("\\sqrt{16}"), "√16");
        assert_eq!(to_unicode("\\sqrt[3]{x}"), "∛x");
        assert_eq!(to_unicode("2\\pi r"), "2π r");
        assert_eq!(to_unicode("\\left(a\\right)"), "(a)");
    }

    #[test]
    fn test_to_unicode_unknown_command_is_kept() {
        assert_eq!(to_unicode("\\mathbb{R}"), "\\mathbbR");
        assert_eq!(to_unicode("\\text{area} = 5"), "area = 5");
    }

    #[test]
    fn test_to_unicode_nested_groups() {
        assert_eq!(to_unicode("\\frac{\\frac{1}{2}}{3}"), "(1/2)/3");
        assert_eq!(to_unicode("{{{x}}}"), "x");
    }

    #[test]
    fn test_to_unicode_deep_nesting_is_kept_as_written() {
        let braces = "{".repeat(50_000);
        let out = to_unicode(&braces);
        assert!(out.chars().all(|c| c == '{'));
        assert_eq!(out.len(), 50_000 - MAX_NESTING);

        let roots = "\\sqrt".repeat(10_000);
        let out = to_unicode(&roots);
        assert!(out.starts_with('√'));
        assert!(out.contains("\\sqrt\\sqrt"));
    }
}
