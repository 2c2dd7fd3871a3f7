use super::glyphs::named_latex;
use super::{BinaryOp, Expr, UnaryOp};

/// Functions with a dedicated LaTeX operator command.
const KNOWN_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc", "arcsin", "arccos", "arctan", "sinh", "cosh",
    "tanh", "log", "ln", "exp", "min", "max", "det", "gcd", "lim",
];

/// Render an expression tree as LaTeX.
///
/// Source parentheses are kept as `\left( .. \right)`, implicit
/// multiplication is written out as `\cdot`, and every division becomes a
/// `\frac`.
pub fn to_latex(expr: &Expr) -> String {
    match expr {
        Expr::Number(n) => n.clone(),
        Expr::Symbol(name) => symbol(name),
        Expr::Paren(inner) => format!("\\left({}\\right)", to_latex(inner)),
        Expr::Unary { op, operand } => {
            let sign = match op {
                UnaryOp::Neg => "-",
                UnaryOp::Plus => "+",
            };
            format!("{}{}", sign, to_latex(operand))
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs),
        Expr::Factorial(inner) => format!("{}!", to_latex(inner)),
        Expr::Call { name, args } => call(name, args),
    }
}

fn binary(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> String {
    let l = to_latex(lhs);
    let r = to_latex(rhs);
    match op {
        BinaryOp::Add => format!("{}+{}", l, r),
        BinaryOp::Sub => format!("{}-{}", l, r),
        BinaryOp::Mul | BinaryOp::ImplicitMul => format!("{}\\cdot {}", l, r),
        BinaryOp::Div => format!("\\frac{{{}}}{{{}}}", l, r),
        BinaryOp::Pow => format!("{{{}}}^{{{}}}", l, r),
        BinaryOp::Eq => format!("{}={}", l, r),
        BinaryOp::Ne => format!("{}\\neq {}", l, r),
        BinaryOp::Lt => format!("{}<{}", l, r),
        BinaryOp::Gt => format!("{}>{}", l, r),
        BinaryOp::Le => format!("{}\\leq {}", l, r),
        BinaryOp::Ge => format!("{}\\geq {}", l, r),
    }
}

fn call(name: &str, args: &[Expr]) -> String {
    let rendered: Vec<String> = args.iter().map(to_latex).collect();

    match (name, rendered.as_slice()) {
        ("sqrt", [arg]) => format!("\\sqrt{{{}}}", arg),
        ("nthRoot", [arg, n]) => format!("\\sqrt[{}]{{{}}}", n, arg),
        ("abs", [arg]) => format!("\\left|{}\\right|", arg),
        _ => {
            let head = if KNOWN_FUNCTIONS.contains(&name) {
                format!("\\{}", name)
            } else {
                symbol(name)
            };
            format!("{}\\left({}\\right)", head, rendered.join(","))
        }
    }
}

fn symbol(name: &str) -> String {
    if let Some(command) = named_latex(name) {
        return command.to_string();
    }
    if name.chars().count() == 1 {
        name.to_string()
    } else {
        format!("\\mathrm{{{}}}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    fn tex(input: &str) -> String {
        to_latex(&parse(input).unwrap())
    }

    #[test]
    fn test_fraction() {
        assert_eq!(tex("2/3 + 1"), "\\frac{2}{3}+1");
        assert_eq!(tex("(a+b)/c"), "\\frac{\\left(a+b\\right)}{c}");
    }

    #[test]
    fn test_implicit_multiplication_is_shown() {
        assert_eq!(tex("2x"), "2\\cdot x");
        assert_eq!(tex("3(x+1)"), "3\\cdot \\left(x+1\\right)");
    }

    #[test]
    fn test_power_and_negation() {
        assert_eq!(tex("x^2"), "{x}^{2}");
        assert_eq!(tex("-x^2 + 1"), "-{x}^{2}+1");
        assert_eq!(tex("2^-1"), "{2}^{-1}");
    }

    #[test]
    fn test_relations() {
        assert_eq!(tex("2x + 3 = 7"), "2\\cdot x+3=7");
        assert_eq!(tex("x <= 4"), "x\\leq 4");
        assert_eq!(tex("x != 0"), "x\\neq 0");
    }

    #[test]
    fn test_functions() {
        assert_eq!(tex("sqrt(16)"), "\\sqrt{16}");
        assert_eq!(tex("nthRoot(8, 3)"), "\\sqrt[3]{8}");
        assert_eq!(tex("abs(-3)"), "\\left|-3\\right|");
        assert_eq!(tex("sin(x)"), "\\sin\\left(x\\right)");
        assert_eq!(tex("area(r)"), "\\mathrm{area}\\left(r\\right)");
    }

    #[test]
    fn test_symbols() {
        assert_eq!(tex("2pi r"), "2\\cdot \\pi\\cdot r");
        assert_eq!(tex("theta"), "\\theta");
        assert_eq!(tex("π"), "\\pi");
        assert_eq!(tex("speed"), "\\mathrm{speed}");
    }

    #[test]
    fn test_factorial() {
        assert_eq!(tex("5!/3!"), "\\frac{5!}{3!}");
    }
}
