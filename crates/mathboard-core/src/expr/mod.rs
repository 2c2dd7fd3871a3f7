//! Math expression support: parsing step strings into a tree and rendering
//! that tree either as LaTeX or as a 2-D block for the terminal whiteboard.
//!
//! The two converters at the bottom never fail. A step the parser rejects is
//! handed back unchanged so the caller can show it as plain text.

mod glyphs;
mod latex;
mod layout;
mod lexer;
mod parser;

use thiserror::Error;

pub(crate) use glyphs::{map_all, named_unicode, subscript, superscript};
pub use latex::to_latex;
pub use layout::{layout, Block};
pub use parser::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Multiplication written by juxtaposition, e.g. `2x`.
    ImplicitMul,
    Div,
    Pow,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal, kept exactly as written.
    Number(String),
    Symbol(String),
    /// Parentheses from the source; kept so rendering preserves them.
    Paren(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Factorial(Box<Expr>),
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Height of the tree; a lone number or symbol is 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Symbol(_) => 1,
            Expr::Paren(inner) | Expr::Factorial(inner) | Expr::Unary { operand: inner, .. } => {
                1 + inner.depth()
            }
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
            Expr::Call { args, .. } => 1 + args.iter().map(Expr::depth).max().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected {found} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unbalanced parenthesis at position {pos}")]
    UnbalancedParen { pos: usize },
    #[error("expression nested too deeply at position {pos}")]
    TooDeep { pos: usize },
}

/// A math step ready for the whiteboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Typeset {
    Layout(Block),
    /// The step could not be parsed and is shown verbatim.
    Plain(String),
}

impl Typeset {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Typeset::Layout(block) => block.lines().to_vec(),
            Typeset::Plain(text) => vec![text.clone()],
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, Typeset::Plain(_))
    }
}

/// Convert a math step to LaTeX, or return it unchanged if it does not parse.
pub fn expression_to_latex(step: &str) -> String {
    match parse(step) {
        Ok(expr) => to_latex(&expr),
        Err(e) => {
            tracing::debug!(step, error = %e, "math step did not parse, showing raw text");
            step.to_string()
        }
    }
}

/// Lay out a math step for the terminal, falling back to the raw text.
pub fn typeset(step: &str) -> Typeset {
    match parse(step) {
        Ok(expr) => Typeset::Layout(layout(&expr)),
        Err(e) => {
            tracing::debug!(step, error = %e, "math step did not parse, showing raw text");
            Typeset::Plain(step.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_to_latex_converts_fractions() {
        assert_eq!(expression_to_latex("2/3 + 1"), "\\frac{2}{3}+1");
        assert_eq!(expression_to_latex("5/3"), "\\frac{5}{3}");
    }

    #[test]
    fn test_expression_to_latex_falls_back_to_input() {
        for raw in ["", "2 +", "(x + 1", "{text: area}", "x = = 2", "Add 3 to both sides."] {
            assert_eq!(expression_to_latex(raw), raw, "input {:?}", raw);
        }
    }

    #[test]
    fn test_typeset_falls_back_to_plain() {
        let result = typeset("2 + * 3");
        assert_eq!(result, Typeset::Plain("2 + * 3".to_string()));
        assert!(result.is_plain());
        assert_eq!(result.lines(), vec!["2 + * 3".to_string()]);
    }

    #[test]
    fn test_typeset_lays_out_fraction() {
        let result = typeset("1/2");
        assert!(!result.is_plain());
        assert_eq!(result.lines(), vec![" 1 ", "───", " 2 "]);
    }

    #[test]
    fn test_deep_nesting_falls_back_to_input() {
        let unclosed = "(".repeat(20_000);
        assert_eq!(expression_to_latex(&unclosed), unclosed);

        let balanced = format!("{}1{}", "(".repeat(3_000), ")".repeat(3_000));
        assert_eq!(expression_to_latex(&balanced), balanced);
        assert!(typeset(&balanced).is_plain());

        let signs = format!("{}1", "-".repeat(5_000));
        assert_eq!(expression_to_latex(&signs), signs);
    }

    #[test]
    fn test_long_chains_fall_back_to_input() {
        let sum = format!("{}1", "1+".repeat(5_000));
        assert_eq!(expression_to_latex(&sum), sum);
        assert!(typeset(&sum).is_plain());

        let factorials = format!("3{}", "!".repeat(5_000));
        assert!(typeset(&factorials).is_plain());
    }

    #[test]
    fn test_moderate_nesting_still_renders() {
        assert_eq!(expression_to_latex("((x))"), "\\left(\\left(x\\right)\\right)");
        let sum = format!("{}1", "1+".repeat(50));
        assert!(!typeset(&sum).is_plain());
    }

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(ParseError::Empty.to_string(), "empty expression");
        assert_eq!(
            ParseError::UnexpectedChar { ch: '$', pos: 3 }.to_string(),
            "unexpected character '$' at position 3"
        );
    }
}
