use super::glyphs::{map_all, named_unicode, superscript};
use super::{BinaryOp, Expr, UnaryOp};

/// A rectangle of text with a baseline row, used to draw math in a terminal.
///
/// All lines have the same character width. Blocks are joined side by side
/// on their baselines, so a term next to a stacked fraction sits on its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
    baseline: usize,
    width: usize,
}

impl Block {
    pub fn text(s: &str) -> Self {
        Self {
            lines: vec![s.to_string()],
            baseline: 0,
            width: s.chars().count(),
        }
    }

    fn from_lines(lines: Vec<String>, baseline: usize) -> Self {
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = lines.into_iter().map(|l| pad_right(&l, width)).collect();
        Self { lines, baseline, width }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn baseline(&self) -> usize {
        self.baseline
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Place blocks left to right, aligning their baselines.
    pub fn hcat(blocks: &[Block]) -> Block {
        let above = blocks.iter().map(|b| b.baseline).max().unwrap_or(0);
        let below = blocks
            .iter()
            .map(|b| b.height() - b.baseline - 1)
            .max()
            .unwrap_or(0);
        let height = above + below + 1;

        let mut lines = vec![String::new(); height];
        for block in blocks {
            let top = above - block.baseline;
            for (row, line) in lines.iter_mut().enumerate() {
                match row.checked_sub(top).and_then(|r| block.lines.get(r)) {
                    Some(content) => line.push_str(content),
                    None => line.push_str(&" ".repeat(block.width)),
                }
            }
        }
        Block::from_lines(lines, above)
    }

    fn fraction(num: Block, den: Block) -> Block {
        let width = num.width.max(den.width) + 2;
        let mut lines: Vec<String> = num.lines.iter().map(|l| center(l, width)).collect();
        let baseline = lines.len();
        lines.push("─".repeat(width));
        lines.extend(den.lines.iter().map(|l| center(l, width)));
        Block::from_lines(lines, baseline)
    }

    fn parenthesize(inner: Block, open: [char; 4], close: [char; 4]) -> Block {
        let left = Self::delimiter(inner.height(), inner.baseline, open);
        let right = Self::delimiter(inner.height(), inner.baseline, close);
        Block::hcat(&[left, inner, right])
    }

    /// A one column delimiter; `pieces` is `[single, top, middle, bottom]`.
    fn delimiter(height: usize, baseline: usize, pieces: [char; 4]) -> Block {
        if height <= 1 {
            return Block::text(&pieces[0].to_string());
        }
        let lines = (0..height)
            .map(|row| {
                let piece = if row == 0 {
                    pieces[1]
                } else if row == height - 1 {
                    pieces[3]
                } else {
                    pieces[2]
                };
                piece.to_string()
            })
            .collect();
        Block::from_lines(lines, baseline)
    }

    fn power(base: Block, exponent: Block) -> Block {
        if exponent.height() == 1 {
            if let Some(sup) = map_all(exponent.lines[0].trim_end(), superscript) {
                // Attach to the top row of the base.
                let mut lines = vec![String::new(); base.height()];
                lines[0] = sup;
                let raised = Block::from_lines(lines, base.baseline);
                return Block::hcat(&[base, raised]);
            }
        }

        let mut lines: Vec<String> = exponent
            .lines
            .iter()
            .map(|l| format!("{}{}", " ".repeat(base.width), l))
            .collect();
        let offset = lines.len();
        lines.extend(base.lines.iter().cloned());
        Block::from_lines(lines, offset + base.baseline)
    }

    fn radical(inner: Block) -> Block {
        let mut lines = vec![format!(" {}", "_".repeat(inner.width))];
        let last = inner.height() - 1;
        for (row, line) in inner.lines.iter().enumerate() {
            let mark = if row == last { '√' } else { '│' };
            lines.push(format!("{}{}", mark, line));
        }
        Block::from_lines(lines, inner.baseline + 1)
    }
}

const PARENS: ([char; 4], [char; 4]) = (['(', '⎛', '⎜', '⎝'], [')', '⎞', '⎟', '⎠']);
const BARS: ([char; 4], [char; 4]) = (['|', '│', '│', '│'], ['|', '│', '│', '│']);

/// Lay out an expression tree for display in a terminal.
pub fn layout(expr: &Expr) -> Block {
    match expr {
        Expr::Number(n) => Block::text(n),
        Expr::Symbol(name) => Block::text(named_unicode(name).unwrap_or(name.as_str())),
        Expr::Paren(inner) => Block::parenthesize(layout(inner), PARENS.0, PARENS.1),
        Expr::Unary { op, operand } => {
            let sign = match op {
                UnaryOp::Neg => "-",
                UnaryOp::Plus => "+",
            };
            Block::hcat(&[Block::text(sign), layout(operand)])
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs),
        Expr::Factorial(inner) => Block::hcat(&[layout(inner), Block::text("!")]),
        Expr::Call { name, args } => call(name, args),
    }
}

fn binary(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Block {
    let l = layout(lhs);
    let r = layout(rhs);
    let symbol = match op {
        BinaryOp::Div => return Block::fraction(l, r),
        BinaryOp::Pow => return Block::power(l, r),
        BinaryOp::Add => " + ",
        BinaryOp::Sub => " - ",
        BinaryOp::Mul => " · ",
        BinaryOp::ImplicitMul => "·",
        BinaryOp::Eq => " = ",
        BinaryOp::Ne => " ≠ ",
        BinaryOp::Lt => " < ",
        BinaryOp::Gt => " > ",
        BinaryOp::Le => " ≤ ",
        BinaryOp::Ge => " ≥ ",
    };
    Block::hcat(&[l, Block::text(symbol), r])
}

fn call(name: &str, args: &[Expr]) -> Block {
    match (name, args) {
        ("sqrt", [arg]) => Block::radical(layout(arg)),
        ("abs", [arg]) => Block::parenthesize(layout(arg), BARS.0, BARS.1),
        _ => {
            let mut parts = Vec::with_capacity(args.len() * 2);
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    parts.push(Block::text(", "));
                }
                parts.push(layout(arg));
            }
            let inner = if parts.is_empty() {
                Block::text("")
            } else {
                Block::hcat(&parts)
            };
            Block::hcat(&[
                Block::text(named_unicode(name).unwrap_or(name)),
                Block::parenthesize(inner, PARENS.0, PARENS.1),
            ])
        }
    }
}

fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

fn center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    let left = width.saturating_sub(len) / 2;
    pad_right(&format!("{}{}", " ".repeat(left), s), width)
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    fn draw(input: &str) -> Vec<String> {
        layout(&parse(input).unwrap()).lines().to_vec()
    }

    #[test]
    fn test_single_line_expression() {
        assert_eq!(draw("2x + 3 = 7"), vec!["2·x + 3 = 7"]);
    }

    #[test]
    fn test_fraction_aligns_with_surrounding_terms() {
        assert_eq!(
            draw("2/3 + 1"),
            vec![
                " 2     ",
                "─── + 1",
                " 3     ",
            ]
        );
    }

    #[test]
    fn test_fraction_centers_shorter_side() {
        assert_eq!(
            draw("(x + 1)/2"),
            vec![
                " (x + 1) ",
                "─────────",
                "    2    ",
            ]
        );
    }

    #[test]
    fn test_simple_exponent_uses_superscript() {
        assert_eq!(draw("x^2 - 4"), vec!["x² - 4"]);
        assert_eq!(draw("2^-1"), vec!["2⁻¹"]);
    }

    #[test]
    fn test_complex_exponent_is_raised() {
        assert_eq!(draw("e^(k t)"), vec![" (k·t)", "e     "]);
    }

    #[test]
    fn test_tall_parentheses() {
        assert_eq!(
            draw("(1/2)"),
            vec![
                "⎛ 1 ⎞",
                "⎜───⎟",
                "⎝ 2 ⎠",
            ]
        );
    }

    #[test]
    fn test_square_root() {
        assert_eq!(draw("sqrt(16)"), vec![" __", "√16"]);
    }

    #[test]
    fn test_named_symbols() {
        assert_eq!(draw("2pi r"), vec!["2·π·r"]);
    }

    #[test]
    fn test_hcat_baseline() {
        let block = Block::hcat(&[Block::text("a"), Block::fraction(Block::text("1"), Block::text("2"))]);
        assert_eq!(block.baseline(), 1);
        assert_eq!(block.height(), 3);
        assert_eq!(block.width(), 4);
    }
}
